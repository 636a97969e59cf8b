//! Event types driving the responder chain.

use std::collections::HashMap;

use crate::{geom::Direction, id::NodeId};

/// Well-known payload keys.
pub mod keys {
    /// The responder the event originated at.
    pub const ORIGINATOR: &str = "originator";
    /// Touch x coordinate, in the coordinate space the hit responder was
    /// tested in.
    pub const X: &str = "x";
    /// Touch y coordinate.
    pub const Y: &str = "y";
    /// Item index annotated by a table onto a bubbling tap.
    pub const INDEX: &str = "index";
    /// Page delta (`-1` or `+1`) on page-change events.
    pub const OFFSET: &str = "offset";
    /// Button index annotated by an alert onto a bubbling tap.
    pub const BUTTON_INDEX: &str = "button_index";
    /// The alert node a button tap came from.
    pub const ALERT: &str = "alert";
}

/// The kind of an event. A closed enumeration; applications extend it
/// through the reserved [`EventKind::User`] range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A responder was activated, by touch or by the select button.
    Tapped,
    /// A touch was hit-tested onto a responder. Synthesizes [`Self::Tapped`]
    /// on delivery.
    TouchBegan,
    /// Directional pad up.
    ButtonUp,
    /// Directional pad down.
    ButtonDown,
    /// Directional pad left.
    ButtonLeft,
    /// Directional pad right.
    ButtonRight,
    /// Select / confirm. Synthesizes [`Self::Tapped`] on delivery.
    ButtonA,
    /// Cancel / back.
    ButtonB,
    /// A table is about to change pages. Consumers can pause side effects.
    PageWillChange,
    /// A table finished changing pages.
    PageDidChange,
    /// Application-defined event kinds.
    User(u16),
}

impl EventKind {
    /// The navigation direction of a directional button kind, if any.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::ButtonUp => Some(Direction::Up),
            Self::ButtonRight => Some(Direction::Right),
            Self::ButtonDown => Some(Direction::Down),
            Self::ButtonLeft => Some(Direction::Left),
            _ => None,
        }
    }

    /// Kinds that synthesize a `Tapped` event when they reach base chain
    /// handling.
    pub(crate) fn synthesizes_tap(self) -> bool {
        matches!(self, Self::TouchBegan | Self::ButtonA)
    }
}

/// A payload value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed integer.
    Int(i64),
    /// A string.
    Str(String),
    /// A node handle.
    Node(NodeId),
    /// A boolean.
    Bool(bool),
}

/// Free-form event annotations, added to while the event is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload(HashMap<&'static str, Value>);

impl Payload {
    /// An empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn set(&mut self, key: &'static str, value: Value) {
        self.0.insert(key, value);
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up an integer value.
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(Value::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Look up a node value.
    pub fn node(&self, key: &str) -> Option<NodeId> {
        match self.0.get(key) {
            Some(Value::Node(id)) => Some(*id),
            _ => None,
        }
    }

    /// Is the payload empty?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An event: a kind plus free-form annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// Annotations, mutable while the event bubbles.
    pub payload: Payload,
}

impl Event {
    /// Construct an event with an empty payload.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            payload: Payload::new(),
        }
    }

    /// Builder-style payload annotation.
    pub fn with(mut self, key: &'static str, value: Value) -> Self {
        self.payload.set(key, value);
        self
    }

    /// The responder this event originated at, if annotated.
    pub fn originator(&self) -> Option<NodeId> {
        self.payload.node(keys::ORIGINATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_kinds() {
        assert_eq!(EventKind::ButtonUp.direction(), Some(Direction::Up));
        assert_eq!(EventKind::ButtonLeft.direction(), Some(Direction::Left));
        assert_eq!(EventKind::Tapped.direction(), None);
        assert_eq!(EventKind::User(7).direction(), None);
    }

    #[test]
    fn payload_typed_lookups() {
        let mut p = Payload::new();
        p.set(keys::INDEX, Value::Int(3));
        assert_eq!(p.int(keys::INDEX), Some(3));
        assert_eq!(p.int(keys::OFFSET), None);
        assert_eq!(p.node(keys::INDEX), None);
    }
}
