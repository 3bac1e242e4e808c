//! Rule-driven document transforms.
//!
//! A [`TransformRule`] describes one edit relative to an anchor; the
//! [`Engine`] applies it and returns the amended document.

mod content;
mod engine;
mod options;
mod rule;
mod sentence;

pub use content::{segments_text, Content, Segment};
pub use engine::Engine;
pub use options::{EngineOptions, TextLayout};
pub use rule::{Relabel, TransformRule};
pub use sentence::split_sentences;
