//! Stock tasks: input polling, display refresh and deliberate stalls.
//!
//! Hardware access stays behind closures, so the runtime never links
//! against a particular board. Wire the real pins and the real display in
//! at construction time.

use std::time::Duration;

use tracing::warn;

use crate::{
    error::Result,
    event::{EventKind, Payload},
    runloop::{App, Task},
    window::Window,
};

type PollButton = Box<dyn FnMut() -> bool + Send>;

/// Polls button sources once per iteration and fires the mapped event kind
/// at the active responder for each source reporting a press.
#[derive(Default)]
pub struct ButtonPoller {
    sources: Vec<(PollButton, EventKind)>,
}

impl ButtonPoller {
    /// No sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a polled source to an event kind.
    pub fn source(mut self, poll: impl FnMut() -> bool + Send + 'static, kind: EventKind) -> Self {
        self.sources.push((Box::new(poll), kind));
        self
    }
}

impl Task for ButtonPoller {
    fn run(&mut self, app: &mut App) -> Result<bool> {
        for (poll, kind) in &mut self.sources {
            if poll() {
                app.generate_event(*kind, Payload::new());
            }
        }
        Ok(false)
    }

    fn name(&self) -> &'static str {
        "button-poller"
    }
}

/// Polls a touch source once per iteration and routes any reported point
/// into the window's hit testing.
pub struct TouchPoller {
    poll: Box<dyn FnMut() -> Option<(i32, i32)> + Send>,
}

impl TouchPoller {
    /// `poll` reports the touched point, if any, each iteration.
    pub fn new(poll: impl FnMut() -> Option<(i32, i32)> + Send + 'static) -> Self {
        Self {
            poll: Box::new(poll),
        }
    }
}

impl Task for TouchPoller {
    fn run(&mut self, app: &mut App) -> Result<bool> {
        if let Some((x, y)) = (self.poll)() {
            app.window.handle_touch(true, x, y);
        }
        Ok(false)
    }

    fn name(&self) -> &'static str {
        "touch-poller"
    }
}

/// Redraws the scene when the window is dirty. The dirty flag is cleared
/// only after a successful refresh; a failed refresh keeps it set, so the
/// redraw is retried next iteration.
pub struct DisplayRefresh {
    refresh: Box<dyn FnMut(&mut Window) -> Result<()> + Send>,
}

impl DisplayRefresh {
    /// `refresh` walks the tree and pushes pixels to the hardware.
    pub fn new(refresh: impl FnMut(&mut Window) -> Result<()> + Send + 'static) -> Self {
        Self {
            refresh: Box::new(refresh),
        }
    }
}

impl Task for DisplayRefresh {
    fn run(&mut self, app: &mut App) -> Result<bool> {
        if app.window.needs_display() {
            match (self.refresh)(&mut app.window) {
                Ok(()) => app.window.set_needs_display(false),
                Err(err) => warn!(%err, "display refresh failed, retrying next iteration"),
            }
        }
        Ok(false)
    }

    fn name(&self) -> &'static str {
        "display-refresh"
    }
}

/// Blocks the whole loop for a fixed duration each iteration. The loop is
/// the whole program; stalling it is how an application paces itself.
pub struct Sleep(pub Duration);

impl Task for Sleep {
    fn run(&mut self, _app: &mut App) -> Result<bool> {
        std::thread::sleep(self.0);
        Ok(false)
    }

    fn name(&self) -> &'static str {
        "sleep"
    }
}
