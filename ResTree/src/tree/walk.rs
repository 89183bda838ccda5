//! Postfix traversal over graphs that may share or revisit nodes

use std::collections::HashSet;
use std::hash::Hash;

struct Frame<K> {
    node: K,
    parent: Option<K>,
    children: Vec<K>,
    next: usize,
}

/// Visit every node reachable from `roots` once, children before parents
///
/// `action` receives the node and the parent it was first reached through
/// (`None` for roots). A node reachable through several parents, or through a
/// cycle, is only visited the first time it is reached. The traversal keeps
/// its own stack, so deep graphs do not overflow.
pub fn postfix<K, R, C, I, A>(roots: R, mut children: C, mut action: A)
where
    K: Copy + Eq + Hash,
    R: IntoIterator<Item = K>,
    C: FnMut(K) -> I,
    I: IntoIterator<Item = K>,
    A: FnMut(K, Option<K>),
{
    let mut visited = HashSet::new();
    let mut stack: Vec<Frame<K>> = Vec::new();

    for root in roots {
        if !visited.insert(root) {
            continue;
        }
        stack.push(Frame {
            node: root,
            parent: None,
            children: children(root).into_iter().collect(),
            next: 0,
        });

        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = frame.children.get(frame.next) {
                frame.next += 1;
                if visited.insert(child) {
                    let parent = frame.node;
                    stack.push(Frame {
                        node: child,
                        parent: Some(parent),
                        children: children(child).into_iter().collect(),
                        next: 0,
                    });
                }
                continue;
            }

            if let Some(done) = stack.pop() {
                action(done.node, done.parent);
            }
        }
    }
}
