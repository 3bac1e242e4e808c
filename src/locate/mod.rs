//! Anchor location.
//!
//! Search runs on normalized text while splicing happens on the original
//! text. [`NormalizedText`] keeps the byte mapping between the two and
//! [`TextView`] maps original offsets to block indices, so a match can
//! always be turned into an [`Anchor`] on a real block.

mod anchor;
mod locator;
mod normalize;
mod view;

pub use anchor::{Anchor, PatternSpec};
pub use locator::locate;
pub use normalize::{normalize, normalize_str, NormalizeOptions, NormalizedText};
pub use view::{split_paragraphs, TextView};
