use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a node stored in the window arena.
    ///
    /// `NodeId`s are weak by construction: they can be copied freely and held
    /// across structural changes, and resolving a stale id simply yields
    /// nothing. Parent and window back-references are plain `NodeId`s, so the
    /// tree never contains ownership cycles.
    pub struct NodeId;
}
