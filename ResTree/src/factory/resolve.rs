//! Forward and reverse resolution of node paths against a collection
//!
//! Nodes that only know their game path get a disk path; nodes that only
//! know their disk path get candidate game paths. Both directions are sent
//! to the collection as one batch each.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;

use crate::collection::ModCollection;
use crate::paths::{FullPath, GamePath};
use crate::tree::{ResourceNode, ResourceTree};

enum Pending {
    /// One game path, no disk path
    Forward,
    /// A disk path, no game path
    Reverse,
}

fn pending(node: &ResourceNode) -> Option<Pending> {
    match (node.possible_game_paths().len(), node.full_path().is_empty()) {
        (0, false) => Some(Pending::Reverse),
        (1, true) => Some(Pending::Forward),
        _ => None,
    }
}

/// Fill in missing disk paths and game paths for every flat node
pub(crate) fn resolve_game_paths(tree: &mut ResourceTree, collection: &dyn ModCollection) {
    let ids = tree.flat_node_list();

    let mut forward_set: IndexSet<GamePath> = IndexSet::new();
    let mut reverse_set: IndexSet<FullPath> = IndexSet::new();
    for &id in &ids {
        let node = &tree[id];
        match pending(node) {
            Some(Pending::Forward) => {
                forward_set.insert(node.possible_game_paths()[0].clone());
            }
            Some(Pending::Reverse) => {
                reverse_set.insert(node.full_path().clone());
            }
            None => {}
        }
    }

    let forward: Vec<GamePath> = forward_set.into_iter().collect();
    let forward_resolved = collection.resolve_paths(&forward);
    if forward_resolved.len() != forward.len() {
        tracing::warn!(
            "Collection {} answered {} of {} forward paths",
            collection.name(),
            forward_resolved.len(),
            forward.len()
        );
    }
    let forward_map: HashMap<GamePath, Option<FullPath>> = forward.into_iter().zip(forward_resolved).collect();

    let reverse: Vec<FullPath> = reverse_set.into_iter().collect();
    let reverse_resolved = collection.reverse_resolve_paths(&reverse);
    if reverse_resolved.len() != reverse.len() {
        tracing::warn!(
            "Collection {} answered {} of {} reverse paths",
            collection.name(),
            reverse_resolved.len(),
            reverse.len()
        );
    }
    let reverse_map: HashMap<FullPath, HashSet<GamePath>> = reverse.into_iter().zip(reverse_resolved).collect();

    tracing::debug!(
        "Resolving {} forward and {} reverse paths in {}",
        forward_map.len(),
        reverse_map.len(),
        collection.name()
    );

    for id in ids {
        let node = &tree[id];
        match pending(node) {
            Some(Pending::Forward) => {
                let game_path = &node.possible_game_paths()[0];
                if let Some(resolved) = forward_map.get(game_path) {
                    let full_path = resolved.clone().unwrap_or_else(|| FullPath::from(game_path));
                    tree.node_mut(id).set_full_path(full_path);
                }
            }
            Some(Pending::Reverse) => {
                if let Some(resolved) = reverse_map.get(node.full_path()) {
                    let game_paths = select_game_paths(node, resolved, collection.name());
                    tree.node_mut(id).set_possible_game_paths(game_paths);
                }
            }
            None => {}
        }
    }
}

/// Narrow reverse-resolved candidates using the node's own context
///
/// Candidates are sorted so the outcome and the log do not depend on set
/// iteration order. If the context filters everything out the unfiltered
/// list is kept; any count other than one is reported, never guessed.
fn select_game_paths(node: &ResourceNode, resolved: &HashSet<GamePath>, collection_name: &str) -> Vec<GamePath> {
    let mut candidates: Vec<GamePath> = resolved.iter().cloned().collect();
    candidates.sort();

    if candidates.len() > 1
        && let Some(context) = node.context()
    {
        let filtered = context.filter_game_paths(&candidates);
        if !filtered.is_empty() {
            candidates = filtered;
        }
    }

    if candidates.len() != 1 {
        tracing::info!(
            "Found {} game paths while reverse-resolving {} in {}:",
            candidates.len(),
            node.full_path(),
            collection_name
        );
        for game_path in &candidates {
            tracing::info!("Game path: {game_path}");
        }
    }

    candidates
}
