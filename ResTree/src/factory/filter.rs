//! Redaction of disk paths outside the mod directory

use std::path::Path;

use crate::paths::{is_within, FullPath};
use crate::tree::ResourceTree;

/// Blank every disk path that should not leave this machine
///
/// With `only_within` unset only paths missing from disk are blanked.
pub(crate) fn filter_full_paths(tree: &mut ResourceTree, only_within: Option<&Path>) {
    for id in tree.flat_node_list() {
        if shall_keep_path(tree[id].full_path(), only_within) {
            continue;
        }
        tracing::debug!("Redacting {}", tree[id].full_path());
        tree.node_mut(id).set_full_path(FullPath::empty());
    }
}

/// Game-internal paths are always kept; rooted paths must exist and lie
/// under `only_within` when given
fn shall_keep_path(full_path: &FullPath, only_within: Option<&Path>) -> bool {
    if !full_path.is_rooted() {
        return true;
    }
    if let Some(root) = only_within
        && !is_within(root, full_path.as_path())
    {
        return false;
    }
    full_path.exists()
}
