//! The window: node arena, responder chain dispatch, focus state and the
//! deferred event queue.

use std::{
    any::Any,
    collections::{HashMap, VecDeque},
};

use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use crate::{
    error::{Error, Result},
    event::{Event, EventKind, Payload, Value, keys},
    geom::{Direction, Point, Rect},
    id::NodeId,
    node::{Action, Node},
    style::{Style, StyleValues, resolve},
    widget::{Blank, Context, EventOutcome, Widget},
};

/// Directional neighbors for one node in the focus graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors {
    /// Target when navigating up.
    pub up: Option<NodeId>,
    /// Target when navigating right.
    pub right: Option<NodeId>,
    /// Target when navigating down.
    pub down: Option<NodeId>,
    /// Target when navigating left.
    pub left: Option<NodeId>,
}

impl Neighbors {
    /// No neighbors in any direction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the upward neighbor.
    pub fn up(mut self, id: NodeId) -> Self {
        self.up = Some(id);
        self
    }

    /// Set the rightward neighbor.
    pub fn right(mut self, id: NodeId) -> Self {
        self.right = Some(id);
        self
    }

    /// Set the downward neighbor.
    pub fn down(mut self, id: NodeId) -> Self {
        self.down = Some(id);
        self
    }

    /// Set the leftward neighbor.
    pub fn left(mut self, id: NodeId) -> Self {
        self.left = Some(id);
        self
    }

    fn toward(&self, dir: Direction) -> Option<NodeId> {
        match dir {
            Direction::Up => self.up,
            Direction::Right => self.right,
            Direction::Down => self.down,
            Direction::Left => self.left,
        }
    }
}

enum Hook {
    WillBecome,
    DidBecome,
    WillResign,
    DidResign,
}

/// The root of a responder tree and the state machine driving it.
///
/// The window owns every node in an arena keyed by [`NodeId`]; handles stay
/// valid until the node is removed and lookups on removed handles fail
/// cleanly. The window itself is the root responder and the chain's last
/// stop.
pub struct Window {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    /// The active responder. `None` only transiently, mid focus transition;
    /// readers see the root as the fallback.
    active: Option<NodeId>,
    queue: VecDeque<(NodeId, Event)>,
    focus_graph: HashMap<NodeId, Neighbors>,
    style: Style,
    needs_display: bool,
}

impl Window {
    /// Create a window with the given style and pixel bounds. The style must
    /// carry a font; there is no fallback for it.
    pub fn new(style: Style, width: i32, height: i32) -> Result<Self> {
        if style.font.is_none() {
            return Err(Error::Config("window style requires a font".into()));
        }
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::responder(
            Rect::new(0, 0, width, height),
            Box::new(Blank),
        ));
        nodes[root].mounted = true;
        Ok(Self {
            nodes,
            root,
            active: Some(root),
            queue: VecDeque::new(),
            focus_graph: HashMap::new(),
            style,
            needs_display: true,
        })
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The window's pixel bounds.
    pub fn bounds(&self) -> Rect {
        self.nodes[self.root].frame
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// A node's frame, relative to its parent.
    pub fn frame(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.frame)
    }

    /// Move and resize a node.
    pub fn set_frame(&mut self, id: NodeId, frame: Rect) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        node.frame = frame;
        self.needs_display = true;
        Ok(())
    }

    /// Set a node-level style.
    pub fn set_style(&mut self, id: NodeId, style: Style) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        node.style = Some(style);
        self.needs_display = true;
        Ok(())
    }

    /// The resolved style for a node: node-level values, then window-level,
    /// then fixed defaults.
    pub fn style_for(&self, id: NodeId) -> StyleValues {
        let node_style = self.nodes.get(id).and_then(|n| n.style.as_ref());
        resolve(node_style, &self.style)
    }

    /// The window-level style.
    pub fn style(&self) -> &Style {
        &self.style
    }

    // ------------------------------------------------------------------
    // Tree construction
    // ------------------------------------------------------------------

    /// Create a detached responder node.
    pub fn create(&mut self, frame: Rect, widget: impl Into<Box<dyn Widget>>) -> NodeId {
        self.nodes.insert(Node::responder(frame, widget.into()))
    }

    /// Create a detached scene leaf. Leaves render but never respond;
    /// hit testing skips them and their whole subtree.
    pub fn create_leaf(&mut self, frame: Rect) -> NodeId {
        self.nodes.insert(Node::leaf(frame))
    }

    /// Attach a detached node as the frontmost child of `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let index = self
            .nodes
            .get(parent)
            .ok_or(Error::NodeNotFound(parent))?
            .children
            .len();
        self.attach_at(parent, index, child)
    }

    /// Attach a detached node at a position in `parent`'s child list.
    /// Children are kept in back-to-front order; an out-of-range index
    /// appends.
    pub fn attach_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        let node = self.nodes.get(child).ok_or(Error::NodeNotFound(child))?;
        if node.parent.is_some() {
            return Err(Error::Invalid("node is already attached".into()));
        }
        // Reject attachment that would close a cycle.
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(Error::Invalid("attachment would create a cycle".into()));
            }
            cursor = self.nodes[id].parent;
        }
        let index = index.min(self.nodes[parent].children.len());
        self.nodes[parent].children.insert(index, child);
        self.nodes[child].parent = Some(parent);
        if self.is_attached(parent) {
            self.needs_display = true;
            self.mount_subtree(child)?;
        }
        Ok(())
    }

    /// Create a responder and attach it to `parent` in one step.
    pub fn add(
        &mut self,
        parent: NodeId,
        frame: Rect,
        widget: impl Into<Box<dyn Widget>>,
    ) -> Result<NodeId> {
        let child = self.create(frame, widget);
        if let Err(err) = self.attach(parent, child) {
            self.nodes.remove(child);
            return Err(err);
        }
        Ok(child)
    }

    /// Create a scene leaf and attach it to `parent` in one step.
    pub fn add_leaf(&mut self, parent: NodeId, frame: Rect) -> Result<NodeId> {
        let child = self.create_leaf(frame);
        if let Err(err) = self.attach(parent, child) {
            self.nodes.remove(child);
            return Err(err);
        }
        Ok(child)
    }

    /// Detach a node from its parent, keeping it and its subtree alive for
    /// later re-attachment. If the active responder is inside the detached
    /// subtree it resigns first.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::Invalid("cannot detach the root".into()));
        }
        let parent = self
            .nodes
            .get(id)
            .ok_or(Error::NodeNotFound(id))?
            .parent
            .ok_or_else(|| Error::Invalid("node is not attached".into()))?;
        if let Some(active) = self.active
            && self.is_ancestor(id, active)
        {
            self.resign_active(active, None);
        }
        self.nodes[parent].children.retain(|&c| c != id);
        self.nodes[id].parent = None;
        self.needs_display = true;
        Ok(())
    }

    /// Remove a node and its entire subtree from the window. Handles into
    /// the subtree become stale; later lookups fail with
    /// [`Error::NodeNotFound`].
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::Invalid("cannot remove the root".into()));
        }
        if !self.nodes.contains_key(id) {
            return Err(Error::NodeNotFound(id));
        }
        if let Some(active) = self.active
            && self.is_ancestor(id, active)
        {
            self.resign_active(active, None);
        }
        if let Some(parent) = self.nodes[id].parent {
            self.nodes[parent].children.retain(|&c| c != id);
        }
        for node in self.collect_subtree(id) {
            self.focus_graph.remove(&node);
            self.nodes.remove(node);
        }
        self.needs_display = true;
        Ok(())
    }

    /// Is `id` reachable from the root?
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if node == self.root {
                return true;
            }
            cursor = self.nodes.get(node).and_then(|n| n.parent);
        }
        false
    }

    /// Does the chain from `descendant` upward pass through `ancestor`?
    pub fn is_ancestor(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        let mut cursor = Some(descendant);
        while let Some(node) = cursor {
            if node == ancestor {
                return true;
            }
            cursor = self.nodes.get(node).and_then(|n| n.parent);
        }
        false
    }

    fn collect_subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if let Some(n) = self.nodes.get(node) {
                stack.extend(n.children.iter().copied());
                out.push(node);
            }
        }
        out
    }

    /// Run the mount hook, once, on every not-yet-mounted responder in the
    /// subtree. Hooks may grow the tree; nodes they attach mount through
    /// their own attachment.
    fn mount_subtree(&mut self, id: NodeId) -> Result<()> {
        for node in self.collect_subtree(id) {
            let needs_mount = self
                .nodes
                .get(node)
                .is_some_and(|n| n.is_responder() && !n.mounted);
            if !needs_mount {
                continue;
            }
            self.nodes[node].mounted = true;
            let mounted = self.with_widget_dyn(node, |w, win| w.on_mount(win, node));
            if let Some(result) = mounted {
                result?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Bind an action to an event kind on a responder, replacing any action
    /// already bound to that kind.
    pub fn set_action<F>(&mut self, id: NodeId, kind: EventKind, action: F) -> Result<()>
    where
        F: FnMut(&mut Context<'_>, &mut Event) + Send + 'static,
    {
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        let state = node
            .responder_state_mut()
            .ok_or_else(|| Error::Invalid("scene leaves cannot hold actions".into()))?;
        state.actions.insert(kind, Box::new(action));
        Ok(())
    }

    /// Unbind the action for an event kind, if any. Removing the action for
    /// the kind currently being invoked has no effect on that invocation.
    pub fn remove_action(&mut self, id: NodeId, kind: EventKind) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        if let Some(state) = node.responder_state_mut() {
            state.actions.remove(&kind);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// The active responder. While a transition is mid-flight this reads as
    /// the root.
    pub fn active_responder(&self) -> NodeId {
        self.active.unwrap_or(self.root)
    }

    /// Make `id` the active responder, running the four-phase hook sequence:
    /// outgoing `will_resign`, outgoing `did_resign`, incoming
    /// `will_become`, incoming `did_become`. Activating the already-active
    /// responder re-runs the sequence.
    pub fn become_active(&mut self, id: NodeId, event: Option<&Event>) -> Result<()> {
        if !self.nodes.contains_key(id) {
            return Err(Error::NodeNotFound(id));
        }
        let outgoing = self.active_responder();
        debug!(?outgoing, incoming = ?id, "focus transition");
        self.fire(outgoing, Hook::WillResign, event);
        self.active = None;
        self.fire(outgoing, Hook::DidResign, event);
        self.fire(id, Hook::WillBecome, event);
        self.active = Some(id);
        self.fire(id, Hook::DidBecome, event);
        Ok(())
    }

    /// Resign the active responder, handing focus back to the root. A no-op
    /// unless `id` is currently active.
    pub fn resign_active(&mut self, id: NodeId, event: Option<&Event>) {
        if self.active != Some(id) {
            return;
        }
        debug!(outgoing = ?id, "focus resigned to root");
        self.fire(id, Hook::WillResign, event);
        self.active = None;
        self.fire(id, Hook::DidResign, event);
        let root = self.root;
        self.fire(root, Hook::WillBecome, event);
        self.active = Some(root);
        self.fire(root, Hook::DidBecome, event);
    }

    /// Declare directional neighbors for a node, replacing any previous
    /// entry. The graph is consulted when a directional button event bubbles
    /// all the way to the window.
    pub fn set_focus_targets(&mut self, id: NodeId, neighbors: Neighbors) {
        self.focus_graph.insert(id, neighbors);
    }

    /// Drop a node's focus graph entry.
    pub fn remove_focus_targets(&mut self, id: NodeId) {
        self.focus_graph.remove(&id);
    }

    /// Directional navigation at the window: walk up from the active
    /// responder to the nearest node with a focus graph entry, and activate
    /// its neighbor in the event's direction. Widgets that manage their own
    /// internal focus intercept directional events before they get here, so
    /// the graph only ever moves focus between top-level regions.
    fn focus_navigate(&mut self, event: &Event) -> bool {
        let Some(dir) = event.kind.direction() else {
            return false;
        };
        if self.focus_graph.is_empty() {
            return false;
        }
        let mut cursor = Some(self.active_responder());
        let source = loop {
            let Some(id) = cursor else {
                return false;
            };
            if self.focus_graph.contains_key(&id) {
                break id;
            }
            cursor = self.nodes.get(id).and_then(|n| n.parent);
        };
        let Some(target) = self.focus_graph[&source].toward(dir) else {
            return false;
        };
        if !self.nodes.contains_key(target) {
            warn!(?source, ?dir, "stale focus graph target, ignoring");
            return false;
        }
        trace!(?source, ?target, ?dir, "focus graph navigation");
        self.become_active(target, Some(event)).is_ok()
    }

    // ------------------------------------------------------------------
    // Dirty tracking
    // ------------------------------------------------------------------

    /// Does the scene need re-rendering?
    pub fn needs_display(&self) -> bool {
        self.needs_display
    }

    /// Set or clear the dirty flag. Structural changes and focus-sensitive
    /// widgets set it; the render task clears it after a successful refresh.
    pub fn set_needs_display(&mut self, dirty: bool) {
        self.needs_display = dirty;
    }

    // ------------------------------------------------------------------
    // Deferred queue
    // ------------------------------------------------------------------

    /// Enqueue an event for deferred delivery. The run loop drains the
    /// queue, in order, once per iteration after the input tasks have run.
    pub fn queue_event(&mut self, target: NodeId, event: Event) {
        self.queue.push_back((target, event));
    }

    /// Number of events waiting in the deferred queue.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Deliver every queued event, in FIFO order. Events enqueued during
    /// delivery are delivered in the same drain.
    pub fn drain(&mut self, app: &mut dyn Any) {
        while let Some((target, mut event)) = self.queue.pop_front() {
            self.handle_event(app, target, &mut event);
        }
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Dispatch an event at `target` and bubble it up the responder chain.
    ///
    /// At each hop the node's widget is consulted first; on
    /// [`EventOutcome::Ignore`] base behavior applies: tap-synthesizing
    /// kinds synthesize a [`EventKind::Tapped`] at the node, a bound action
    /// for the kind fires, and otherwise the event steps to the parent.
    /// Returns whether the event was handled.
    pub fn handle_event(&mut self, app: &mut dyn Any, target: NodeId, event: &mut Event) -> bool {
        let mut cursor = Some(target);
        while let Some(id) = cursor {
            if !self.nodes.contains_key(id) {
                trace!(?id, "dispatch target vanished");
                return false;
            }
            trace!(?id, kind = ?event.kind, "dispatch hop");
            if id == self.root && self.focus_navigate(event) {
                return true;
            }
            let outcome = self.with_widget_dyn(id, |w, win| {
                let mut ctx = Context {
                    win,
                    app: &mut *app,
                    node: id,
                };
                w.on_event(&mut ctx, &mut *event)
            });
            match outcome {
                Some(EventOutcome::Handle) => return true,
                Some(EventOutcome::Consume) => return false,
                Some(EventOutcome::Ignore) | None => {}
            }
            if event.kind.synthesizes_tap() {
                let mut tapped =
                    Event::new(EventKind::Tapped).with(keys::ORIGINATOR, Value::Node(id));
                self.handle_event(app, id, &mut tapped);
                return true;
            }
            if let Some(mut action) = self.take_action(id, event.kind) {
                event.payload.set(keys::ORIGINATOR, Value::Node(id));
                {
                    let mut ctx = Context {
                        win: &mut *self,
                        app,
                        node: id,
                    };
                    action(&mut ctx, event);
                }
                self.restore_action(id, event.kind, action);
                return true;
            }
            cursor = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Dispatch a fresh event at the active responder.
    pub fn generate_event(&mut self, app: &mut dyn Any, kind: EventKind, payload: Payload) -> bool {
        let target = self.active_responder();
        let mut event = Event { kind, payload };
        self.handle_event(app, target, &mut event)
    }

    /// Hit-test a touch against the tree and enqueue a
    /// [`EventKind::TouchBegan`] at the deepest responder containing the
    /// point. Frontmost (last-attached) children win; scene leaves and
    /// everything under them are transparent. Returns the hit responder.
    pub fn handle_touch(&mut self, touched: bool, x: i32, y: i32) -> Option<NodeId> {
        if !touched {
            return None;
        }
        self.touch_node(self.root, Point::new(x, y))
    }

    fn touch_node(&mut self, id: NodeId, point: Point) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if !node.is_responder() || !node.frame.contains(point) {
            return None;
        }
        let frame = node.frame;
        let children = node.children.clone();
        let local = Point::new(point.x - frame.tl.x, point.y - frame.tl.y);
        for child in children.into_iter().rev() {
            if let Some(hit) = self.touch_node(child, local) {
                return Some(hit);
            }
        }
        trace!(?id, ?point, "touch hit");
        let event = Event::new(EventKind::TouchBegan)
            .with(keys::X, Value::Int(point.x.into()))
            .with(keys::Y, Value::Int(point.y.into()))
            .with(keys::ORIGINATOR, Value::Node(id));
        self.queue_event(id, event);
        Some(id)
    }

    // ------------------------------------------------------------------
    // Widget access
    // ------------------------------------------------------------------

    /// Borrow a node's widget at a concrete type, alongside a dispatch
    /// context. Fails if the node is gone, is a leaf, or holds a widget of
    /// a different type.
    pub fn with_widget<W, R>(
        &mut self,
        app: &mut dyn Any,
        id: NodeId,
        f: impl FnOnce(&mut W, &mut Context<'_>) -> R,
    ) -> Result<R>
    where
        W: Widget,
    {
        let mut widget = self.take_widget(id).ok_or(Error::NodeNotFound(id))?;
        let result = match (widget.as_mut() as &mut dyn Any).downcast_mut::<W>() {
            Some(typed) => {
                let mut ctx = Context {
                    win: &mut *self,
                    app,
                    node: id,
                };
                Ok(f(typed, &mut ctx))
            }
            None => Err(Error::Invalid("widget type mismatch".into())),
        };
        self.restore_widget(id, widget);
        result
    }

    /// Take the node's widget out of its slot, run `f` with the widget and
    /// the window both borrowed, and put the widget back. Returns `None`
    /// when the node has no available widget, including when a call on the
    /// same widget is already in flight.
    pub(crate) fn with_widget_dyn<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> R,
    ) -> Option<R> {
        let mut widget = self.take_widget(id)?;
        let out = f(widget.as_mut(), self);
        self.restore_widget(id, widget);
        Some(out)
    }

    fn take_widget(&mut self, id: NodeId) -> Option<Box<dyn Widget>> {
        self.nodes.get_mut(id)?.responder_state_mut()?.widget.take()
    }

    fn restore_widget(&mut self, id: NodeId, widget: Box<dyn Widget>) {
        // The node may have been removed while its widget was out.
        if let Some(state) = self.nodes.get_mut(id).and_then(|n| n.responder_state_mut())
            && state.widget.is_none()
        {
            state.widget = Some(widget);
        }
    }

    fn take_action(&mut self, id: NodeId, kind: EventKind) -> Option<Action> {
        self.nodes
            .get_mut(id)?
            .responder_state_mut()?
            .actions
            .remove(&kind)
    }

    fn restore_action(&mut self, id: NodeId, kind: EventKind, action: Action) {
        // An action set from within the running action wins over the restore.
        if let Some(state) = self.nodes.get_mut(id).and_then(|n| n.responder_state_mut())
            && !state.actions.contains_key(&kind)
        {
            state.actions.insert(kind, action);
        }
    }

    fn fire(&mut self, id: NodeId, hook: Hook, event: Option<&Event>) {
        let ran = self.with_widget_dyn(id, |w, win| match hook {
            Hook::WillBecome => w.will_become_active(win, id, event),
            Hook::DidBecome => w.did_become_active(win, id, event),
            Hook::WillResign => w.will_resign_active(win, id, event),
            Hook::DidResign => w.did_resign_active(win, id, event),
        });
        if ran.is_none() {
            trace!(?id, "focus hook skipped, widget unavailable");
        }
    }
}
