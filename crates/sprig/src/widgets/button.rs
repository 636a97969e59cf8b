//! A tappable control with a text label.

use crate::{event::Event, id::NodeId, widget::Widget, window::Window};

/// A labeled, tappable control. Activation flips the `active` flag and marks
/// the window dirty; drawing it is the render task's job, using
/// [`Window::style_for`](crate::Window::style_for) on the button's node.
pub struct Button {
    text: String,
    active: bool,
}

impl Button {
    /// A button with the given label.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            active: false,
        }
    }

    /// The button's label.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Is the button the active responder?
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Widget for Button {
    fn will_become_active(&mut self, win: &mut Window, _node: NodeId, _event: Option<&Event>) {
        self.active = true;
        win.set_needs_display(true);
    }

    fn will_resign_active(&mut self, win: &mut Window, _node: NodeId, _event: Option<&Event>) {
        self.active = false;
        win.set_needs_display(true);
    }

    fn name(&self) -> &'static str {
        "button"
    }
}
