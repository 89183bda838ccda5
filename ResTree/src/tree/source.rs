use super::GlobalResolveContext;

/// Walks a character's live visual dependencies into a tree
///
/// Implementations create every node through
/// [`GlobalResolveContext::get_or_create`], keyed by raw resource identity,
/// so shared resources end up as a single node, and wire them up with
/// [`GlobalResolveContext::add_child`] and [`GlobalResolveContext::add_root`].
/// The character is identified by [`GlobalResolveContext::object_index`].
pub trait ResourceGraphSource {
    fn load_resources(&self, context: &mut GlobalResolveContext<'_>);
}
