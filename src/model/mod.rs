//! Document model types.
//!
//! A [`Document`] is an ordered list of [`Block`]s, each made of styled
//! [`Run`]s. Readers produce it, the transform engine rewrites it, and
//! writers serialize it back to the original format.

mod block;
mod document;

pub use block::{Alignment, Block, BlockStyle, Emphasis, Run, Spacing, TextStyle};
pub use document::{Document, Metadata, BLOCK_SEPARATOR};
