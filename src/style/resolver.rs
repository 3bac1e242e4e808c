//! Style resolution for inserted content.

use super::StyleProfile;
use crate::model::{Block, Document};

/// Resolve the document-wide default profile.
///
/// The first block with a run supplies the profile; emphasis is not
/// inherited. Documents without runs get [`StyleProfile::fallback`].
pub fn resolve_default(doc: &Document) -> StyleProfile {
    doc.blocks
        .iter()
        .find_map(|block| {
            block
                .first_run()
                .map(|run| StyleProfile::from_block(block, run, false))
        })
        .unwrap_or_else(StyleProfile::fallback)
}

/// Resolve the profile for a block inserted at `position`.
///
/// `position` is the index the new block will occupy. The block just before
/// it is preferred, then the block currently at `position`; a candidate
/// must have at least one run. Otherwise falls back to [`resolve_default`].
pub fn resolve_contextual(doc: &Document, position: usize) -> StyleProfile {
    let preceding = position.checked_sub(1).and_then(|i| doc.blocks.get(i));
    let following = doc.blocks.get(position);

    [preceding, following]
        .into_iter()
        .flatten()
        .find_map(|block| {
            block
                .first_run()
                .map(|run| StyleProfile::from_block(block, run, true))
        })
        .unwrap_or_else(|| resolve_default(doc))
}

/// Resolve the profile used to rebuild an existing block.
///
/// The block's own leading run wins; a block without runs uses the
/// document default.
pub fn resolve_block(doc: &Document, block: &Block) -> StyleProfile {
    block
        .first_run()
        .map(|run| StyleProfile::from_block(block, run, true))
        .unwrap_or_else(|| resolve_default(doc))
}
