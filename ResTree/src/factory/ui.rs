//! Display names and icons for nodes nobody named

use crate::tree::{ResourceTree, ResourceType};
use crate::ui_data::UiGuesser;

/// Guess names for unnamed nodes, then collapse names repeated from the parent
pub(crate) fn resolve_ui_data(tree: &mut ResourceTree, guesser: &dyn UiGuesser) {
    for id in tree.flat_node_list() {
        let node = &tree[id];
        if node.name().is_some() {
            continue;
        }
        let Some(game_path) = node.possible_game_paths().first() else {
            continue;
        };
        let data = match node.resource_type() {
            ResourceType::Imc => guesser.guess_model_ui_data(game_path).prepend_name("IMC: "),
            ResourceType::Mdl => guesser.guess_model_ui_data(game_path),
            _ => guesser.guess_ui_data_from_path(game_path),
        };
        tree.node_mut(id).set_ui_data(data);
    }

    // Children first, so a grandchild is compared before its parent loses
    // its own name
    tree.process_postfix(|tree, id, parent| {
        let Some(parent) = parent else {
            return;
        };
        if tree[id].name().is_some() && tree[id].name() == tree[parent].name() {
            tree.node_mut(id).clear_name();
        }
    });
}
