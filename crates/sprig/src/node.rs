//! Node data stored in the window arena.

use std::collections::HashMap;

use crate::{
    event::{Event, EventKind},
    geom::Rect,
    id::NodeId,
    style::Style,
    widget::{Context, Widget},
};

/// A callback bound to an event kind on a responder. Invoked with the
/// application context and the event; at most one per kind.
pub type Action = Box<dyn FnMut(&mut Context<'_>, &mut Event) + Send>;

/// What a node is: a plain scene leaf or a responder.
pub(crate) enum Content {
    /// A decorative scene node. Participates in rendering order only and is
    /// transparent to hit testing, along with its whole subtree.
    Leaf,
    /// A responder: event handling behavior plus bound actions.
    Responder(ResponderState),
}

/// Behavior slot and actions for a responder node.
pub(crate) struct ResponderState {
    /// Widget behavior. Taken out of the slot for the duration of a widget
    /// call and restored afterwards; an empty slot means a call is in
    /// flight and re-entrant invocation is skipped.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Bound actions, one per event kind. Setting replaces.
    pub(crate) actions: HashMap<EventKind, Action>,
}

/// Node data stored in the arena.
pub struct Node {
    /// Leaf or responder content.
    pub(crate) content: Content,
    /// Parent in the tree; the next responder in the chain.
    pub(crate) parent: Option<NodeId>,
    /// Children in back-to-front order.
    pub(crate) children: Vec<NodeId>,
    /// Frame relative to the parent's origin.
    pub(crate) frame: Rect,
    /// Node-level style, if any.
    pub(crate) style: Option<Style>,
    /// Whether the mount hook has run. Mounting happens once, on first
    /// attachment to the window.
    pub(crate) mounted: bool,
}

impl Node {
    pub(crate) fn leaf(frame: Rect) -> Self {
        Self {
            content: Content::Leaf,
            parent: None,
            children: Vec::new(),
            frame,
            style: None,
            mounted: false,
        }
    }

    pub(crate) fn responder(frame: Rect, widget: Box<dyn Widget>) -> Self {
        Self {
            content: Content::Responder(ResponderState {
                widget: Some(widget),
                actions: HashMap::new(),
            }),
            parent: None,
            children: Vec::new(),
            frame,
            style: None,
            mounted: false,
        }
    }

    /// The node's frame, relative to its parent.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// The node's parent, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The node's children, in back-to-front order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Is this node a responder (as opposed to a plain scene leaf)?
    pub fn is_responder(&self) -> bool {
        matches!(self.content, Content::Responder(_))
    }

    /// The node's own style, if one was set.
    pub fn style(&self) -> Option<&Style> {
        self.style.as_ref()
    }

    pub(crate) fn responder_state_mut(&mut self) -> Option<&mut ResponderState> {
        match &mut self.content {
            Content::Responder(state) => Some(state),
            Content::Leaf => None,
        }
    }
}
