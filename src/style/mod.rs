//! Style resolution for newly constructed content.

mod profile;
mod resolver;

pub use profile::{StyleProfile, FALLBACK_FONT, FALLBACK_SIZE, FALLBACK_SPACING};
pub use resolver::{resolve_block, resolve_contextual, resolve_default};
