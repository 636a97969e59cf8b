//! A modal dialog that captures input until dismissed.

use tracing::warn;

use crate::{
    error::Result,
    event::{Event, EventKind, Value, keys},
    geom::Rect,
    id::NodeId,
    widget::{Context, EventOutcome, Widget},
    widgets::Button,
    window::Window,
};

/// A full-screen modal overlay with a message and a row of buttons.
///
/// Construct it detached and attach it when needed; the dialog lays itself
/// out on first attachment, since centering needs the window's bounds. Once
/// a button is active, focus cannot leave the dialog: background taps are
/// swallowed and Left/Right refuse to move past the end buttons.
///
/// A tap on a button bubbles as `Tapped` annotated with `button_index` and
/// `alert`, so the dismissal action is usually bound on the alert itself.
/// Dismiss by removing the alert from the tree.
pub struct Alert {
    text: String,
    dialog_width: i32,
    dialog_height: i32,
    button_labels: Vec<String>,
    buttons: Vec<NodeId>,
    background: Option<NodeId>,
}

impl Alert {
    /// A dialog with a message, a centered body of the given size, and one
    /// button per label.
    pub fn new<L>(text: impl Into<String>, width: i32, height: i32, button_labels: L) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            text: text.into(),
            dialog_width: width,
            dialog_height: height,
            button_labels: button_labels.into_iter().map(Into::into).collect(),
            buttons: Vec::new(),
            background: None,
        }
    }

    /// The dialog message.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The button nodes, in label order. Empty until first attachment.
    pub fn buttons(&self) -> &[NodeId] {
        &self.buttons
    }

    /// The dialog body leaf. `None` until first attachment.
    pub fn background(&self) -> Option<NodeId> {
        self.background
    }
}

impl Widget for Alert {
    fn on_mount(&mut self, win: &mut Window, node: NodeId) -> Result<()> {
        let bounds = win.bounds();
        win.set_frame(node, Rect::new(0, 0, bounds.w, bounds.h))?;
        let x = (bounds.w - self.dialog_width) / 2;
        let y = (bounds.h - self.dialog_height) / 2;
        self.background = Some(win.add_leaf(
            node,
            Rect::new(x, y, self.dialog_width, self.dialog_height),
        )?);
        let labels = self.button_labels.clone();
        let count = labels.len() as i32;
        for (i, label) in labels.into_iter().enumerate() {
            let frame = Rect::new(
                x + 8 + i as i32 * (self.dialog_width - 8) / count,
                y + self.dialog_height - 32,
                (self.dialog_width - 8) / count - 8,
                24,
            );
            let button = win.add(node, frame, Button::new(label))?;
            self.buttons.push(button);
        }
        Ok(())
    }

    fn on_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) -> EventOutcome {
        if event.kind == EventKind::Tapped {
            let Some(originator) = event.originator() else {
                return EventOutcome::Consume;
            };
            if originator == ctx.node {
                // A tap on the dialog background. Swallow it; the user
                // cannot escape the modal by touching around it.
                return EventOutcome::Consume;
            }
            let Some(index) = self.buttons.iter().position(|&b| b == originator) else {
                return EventOutcome::Consume;
            };
            event
                .payload
                .set(keys::BUTTON_INDEX, Value::Int(index as i64));
        }
        let active = ctx.win.active_responder();
        let Some(active_index) = self.buttons.iter().position(|&b| b == active) else {
            return EventOutcome::Consume;
        };
        event.payload.set(keys::ALERT, Value::Node(ctx.node));
        match event.kind {
            EventKind::ButtonLeft => {
                if active_index > 0 {
                    if let Err(err) = ctx.win.become_active(self.buttons[active_index - 1], None)
                    {
                        warn!(%err, "button activation failed");
                    }
                    EventOutcome::Handle
                } else {
                    EventOutcome::Consume
                }
            }
            EventKind::ButtonRight => {
                if active_index + 1 < self.buttons.len() {
                    if let Err(err) = ctx.win.become_active(self.buttons[active_index + 1], None)
                    {
                        warn!(%err, "button activation failed");
                    }
                    EventOutcome::Handle
                } else {
                    EventOutcome::Consume
                }
            }
            _ => EventOutcome::Ignore,
        }
    }

    fn did_become_active(&mut self, win: &mut Window, _node: NodeId, _event: Option<&Event>) {
        if let Some(&first) = self.buttons.first()
            && let Err(err) = win.become_active(first, None)
        {
            warn!(%err, "button activation failed");
        }
    }

    fn name(&self) -> &'static str {
        "alert"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event::Payload, testing::test_window};

    fn setup() -> (Window, NodeId, Vec<NodeId>) {
        let mut win = test_window();
        let root = win.root();
        let alert = win
            .add(
                root,
                Rect::new(0, 0, 0, 0),
                Alert::new("Erase everything?", 100, 80, ["Cancel", "OK"]),
            )
            .unwrap();
        win.become_active(alert, None).unwrap();
        let mut app = ();
        let buttons = win
            .with_widget::<Alert, _>(&mut app, alert, |a, _| a.buttons().to_vec())
            .unwrap();
        (win, alert, buttons)
    }

    #[test]
    fn mounts_centered_with_buttons_once() {
        let (mut win, alert, buttons) = setup();
        assert_eq!(win.frame(alert), Some(Rect::new(0, 0, 200, 200)));
        let mut app = ();
        let background = win
            .with_widget::<Alert, _>(&mut app, alert, |a, _| a.background())
            .unwrap()
            .unwrap();
        assert_eq!(win.frame(background), Some(Rect::new(50, 60, 100, 80)));
        assert_eq!(buttons.len(), 2);
        assert_eq!(win.frame(buttons[0]), Some(Rect::new(58, 108, 38, 24)));
        assert_eq!(win.frame(buttons[1]), Some(Rect::new(104, 108, 38, 24)));
        // Re-attachment does not rebuild the buttons.
        win.detach(alert).unwrap();
        let root = win.root();
        win.attach(root, alert).unwrap();
        let rebuilt = win
            .with_widget::<Alert, _>(&mut app, alert, |a, _| a.buttons().to_vec())
            .unwrap();
        assert_eq!(rebuilt, buttons);
    }

    #[test]
    fn activation_lands_on_the_first_button() {
        let (win, _alert, buttons) = setup();
        assert_eq!(win.active_responder(), buttons[0]);
    }

    #[test]
    fn directional_movement_stays_inside_the_dialog() {
        let (mut win, alert, buttons) = setup();
        let mut app = ();
        // Left at the first button refuses to move or propagate.
        assert!(!win.generate_event(&mut app, EventKind::ButtonLeft, Payload::new()));
        assert_eq!(win.active_responder(), buttons[0]);
        assert!(win.generate_event(&mut app, EventKind::ButtonRight, Payload::new()));
        assert_eq!(win.active_responder(), buttons[1]);
        assert!(!win.generate_event(&mut app, EventKind::ButtonRight, Payload::new()));
        assert_eq!(win.active_responder(), buttons[1]);
        assert!(win.generate_event(&mut app, EventKind::ButtonLeft, Payload::new()));
        assert_eq!(win.active_responder(), buttons[0]);
        assert!(win.is_ancestor(alert, win.active_responder()));
    }

    #[test]
    fn background_taps_are_swallowed() {
        let (mut win, alert, buttons) = setup();
        let mut app = ();
        let root = win.root();
        let leaked = std::sync::Arc::new(std::sync::Mutex::new(0));
        let leaked2 = leaked.clone();
        win.set_action(root, EventKind::Tapped, move |_ctx, _event| {
            *leaked2.lock().unwrap() += 1;
        })
        .unwrap();
        // A touch on the dialog body hits the alert itself; the synthesized
        // tap must never reach the underlying tree.
        assert_eq!(win.handle_touch(true, 60, 65), Some(alert));
        win.drain(&mut app);
        assert_eq!(*leaked.lock().unwrap(), 0);
        assert_eq!(win.active_responder(), buttons[0]);
    }

    #[test]
    fn button_tap_bubbles_with_index_and_alert() {
        let (mut win, alert, _buttons) = setup();
        let mut app = ();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        win.set_action(alert, EventKind::Tapped, move |_ctx, event| {
            seen2.lock().unwrap().push((
                event.payload.int(keys::BUTTON_INDEX),
                event.payload.node(keys::ALERT),
            ));
        })
        .unwrap();
        // Touch the second button ("OK").
        win.handle_touch(true, 110, 110);
        win.drain(&mut app);
        assert_eq!(seen.lock().unwrap().as_slice(), &[(Some(1), Some(alert))]);
    }

    #[test]
    fn alert_without_buttons_consumes_everything() {
        let mut win = test_window();
        let root = win.root();
        let alert = win
            .add(
                root,
                Rect::new(0, 0, 0, 0),
                Alert::new("Notice", 100, 60, Vec::<String>::new()),
            )
            .unwrap();
        win.become_active(alert, None).unwrap();
        assert_eq!(win.active_responder(), alert);
        let mut app = ();
        assert!(!win.generate_event(&mut app, EventKind::ButtonRight, Payload::new()));
        assert_eq!(win.active_responder(), alert);
    }
}
