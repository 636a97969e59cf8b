//! A single table row.

use crate::{event::Event, id::NodeId, widget::Widget, window::Window};

/// One row in a [`Table`](super::Table). Tables regenerate their cells on
/// every page change rather than patching them in place.
pub struct Cell {
    text: String,
    active: bool,
    nav: bool,
}

impl Cell {
    /// A content row.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            active: false,
            nav: false,
        }
    }

    /// A navigation-button row ("Previous" / "Next").
    pub fn nav(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            active: false,
            nav: true,
        }
    }

    /// The row's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Is the cell the active responder?
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Is this a navigation-button row?
    pub fn is_nav(&self) -> bool {
        self.nav
    }
}

impl Widget for Cell {
    fn will_become_active(&mut self, win: &mut Window, _node: NodeId, _event: Option<&Event>) {
        self.active = true;
        win.set_needs_display(true);
    }

    fn will_resign_active(&mut self, win: &mut Window, _node: NodeId, _event: Option<&Event>) {
        self.active = false;
        win.set_needs_display(true);
    }

    fn name(&self) -> &'static str {
        "cell"
    }
}
