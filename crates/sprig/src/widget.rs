//! Widget trait, event outcomes and the dispatch context.

use std::any::Any;

use crate::{
    error::Result,
    event::{Event, EventKind, Payload},
    id::NodeId,
    window::Window,
};

/// The result of a widget's event handler.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum EventOutcome {
    /// The event was processed; propagation stops and the event is reported
    /// as handled.
    Handle,
    /// The event was swallowed; propagation stops but the event is reported
    /// as unhandled. This is the modal-capture and routing-miss outcome.
    Consume,
    /// Not handled here; fall through to base responder behavior and bubble.
    Ignore,
}

/// Context passed to event handlers and actions.
///
/// Bundles the window, the opaque application state owned by the run loop,
/// and the node the call is addressed to. The widget itself is held out of
/// the arena for the duration of the call, so the window can be mutated
/// freely.
pub struct Context<'a> {
    /// The window owning the tree under dispatch.
    pub win: &'a mut Window,
    /// Application state, as registered with the run loop.
    pub app: &'a mut dyn Any,
    /// The node this call is addressed to.
    pub node: NodeId,
}

impl Context<'_> {
    /// Downcast the application state.
    pub fn state_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.app.downcast_mut::<T>()
    }

    /// Dispatch an event to a target responder, bubbling up its chain.
    pub fn dispatch(&mut self, target: NodeId, event: &mut Event) -> bool {
        self.win.handle_event(self.app, target, event)
    }

    /// Dispatch a fresh event to this context's own node.
    pub fn emit(&mut self, kind: EventKind, payload: Payload) -> bool {
        let mut event = Event {
            kind,
            payload,
        };
        let target = self.node;
        self.dispatch(target, &mut event)
    }
}

/// Behavior attached to a responder node.
///
/// All methods are defaulted; a bare responder participates in the chain,
/// bubbles everything, and gets tap synthesis for free. Hooks that change
/// appearance must mark the window dirty themselves.
pub trait Widget: Any + Send {
    /// Called exactly once, when the node first becomes reachable from the
    /// window root. Layout that needs the window's bounds belongs here, not
    /// in the constructor.
    fn on_mount(&mut self, _win: &mut Window, _node: NodeId) -> Result<()> {
        Ok(())
    }

    /// Widget-specific event handling, consulted before base responder
    /// behavior at this node.
    fn on_event(&mut self, _ctx: &mut Context<'_>, _event: &mut Event) -> EventOutcome {
        EventOutcome::Ignore
    }

    /// About to become the active responder. The window's active responder
    /// reads as the fallback (the window itself) for the duration.
    fn will_become_active(&mut self, _win: &mut Window, _node: NodeId, _event: Option<&Event>) {}

    /// Became the active responder.
    fn did_become_active(&mut self, _win: &mut Window, _node: NodeId, _event: Option<&Event>) {}

    /// About to stop being the active responder. Runs strictly before the
    /// incoming responder's `will_become_active`.
    fn will_resign_active(&mut self, _win: &mut Window, _node: NodeId, _event: Option<&Event>) {}

    /// Stopped being the active responder.
    fn did_resign_active(&mut self, _win: &mut Window, _node: NodeId, _event: Option<&Event>) {}

    /// Name used in logs.
    fn name(&self) -> &'static str {
        "responder"
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}

/// A responder with no behavior of its own.
pub struct Blank;

impl Widget for Blank {
    fn name(&self) -> &'static str {
        "blank"
    }
}
