//! Sprig: a responder-chain UI runtime for small interactive displays.
//!
//! Sprig manages a tree of responders owned by a [`Window`], routes events
//! up the chain, tracks a single active responder with a four-phase focus
//! transition, hit-tests touches, and drives everything from a cooperative
//! [`App`] run loop. Rendering and hardware input stay outside: a render
//! task reads the tree and [`Window::style_for`], and input tasks feed
//! [`Window::handle_touch`] and [`App::generate_event`].
//!
//! # Quick start
//!
//! The main entry points are:
//! - [`Window`] - the responder tree, focus machine and event queue
//! - [`Widget`] - the trait implemented by responder behavior
//! - [`App`] - the cooperative run loop
//! - [`widgets`] - stock widgets (buttons, tables, alerts)

/// Error types.
pub mod error;
/// Event kinds and payloads.
pub mod event;
/// Geometry primitives.
pub mod geom;
/// Stock run loop tasks.
pub mod tasks;
/// Stock widgets.
pub mod widgets;

mod id;
mod node;
mod runloop;
mod style;
#[cfg(any(test, feature = "testing"))]
/// Testing utilities.
pub mod testing;
mod widget;
mod window;

pub use error::{Error, Result};
pub use event::{Event, EventKind, Payload, Value, keys};
pub use geom::{Direction, Insets, Point, Rect};
pub use id::NodeId;
pub use node::{Action, Node};
pub use runloop::{App, Task, TaskId};
pub use style::{Style, StyleValues};
pub use widget::{Blank, Context, EventOutcome, Widget};
pub use window::{Neighbors, Window};
