//! The cooperative run loop.

use std::any::Any;

use tracing::{debug, trace};

use crate::{
    error::Result,
    event::{Event, EventKind, Payload},
    id::NodeId,
    widget::{Context, Widget},
    window::Window,
};

/// Handle to a registered task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// A unit of cooperative work, invoked once per loop iteration in
/// registration order. Returning `Ok(true)` stops the loop immediately.
///
/// Hardware I/O errors belong to the task: recover locally and retry next
/// iteration rather than returning `Err`, which tears the loop down.
pub trait Task: Send {
    /// Run one iteration's worth of work.
    fn run(&mut self, app: &mut App) -> Result<bool>;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        "task"
    }
}

struct TaskEntry {
    id: TaskId,
    /// Taken out for the duration of the task's `run`, so the task can
    /// borrow the whole [`App`].
    task: Option<Box<dyn Task>>,
    removed: bool,
}

/// The application: a window, opaque application state handed to actions,
/// and the task list. `run` is the whole program on a single cooperative
/// thread; a task that blocks stalls everything, deliberately.
pub struct App {
    /// The window under management.
    pub window: Window,
    state: Box<dyn Any + Send>,
    tasks: Vec<TaskEntry>,
    next_task: u64,
}

impl App {
    /// Bundle a window with the application state that actions downcast to.
    pub fn new(window: Window, state: impl Any + Send) -> Self {
        Self {
            window,
            state: Box::new(state),
            tasks: Vec::new(),
            next_task: 0,
        }
    }

    /// Downcast the application state.
    pub fn state_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.state.downcast_mut::<T>()
    }

    /// Register a task. Tasks run once per iteration, in registration order.
    pub fn add_task(&mut self, task: impl Task + 'static) -> TaskId {
        let id = TaskId(self.next_task);
        self.next_task += 1;
        self.tasks.push(TaskEntry {
            id,
            task: Some(Box::new(task)),
            removed: false,
        });
        id
    }

    /// Deregister a task. Takes effect at the next iteration boundary, not
    /// immediately.
    pub fn remove_task(&mut self, id: TaskId) {
        if let Some(entry) = self.tasks.iter_mut().find(|e| e.id == id) {
            entry.removed = true;
        }
    }

    /// Dispatch a fresh event synchronously to the active responder.
    pub fn generate_event(&mut self, kind: EventKind, payload: Payload) -> bool {
        let state: &mut dyn Any = &mut *self.state;
        self.window.generate_event(state, kind, payload)
    }

    /// Dispatch an event at a specific responder.
    pub fn dispatch(&mut self, target: NodeId, event: &mut Event) -> bool {
        let state: &mut dyn Any = &mut *self.state;
        self.window.handle_event(state, target, event)
    }

    /// Borrow a node's widget at a concrete type, alongside a dispatch
    /// context carrying the application state.
    pub fn with_widget<W, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut W, &mut Context<'_>) -> R,
    ) -> Result<R>
    where
        W: Widget,
    {
        let state: &mut dyn Any = &mut *self.state;
        self.window.with_widget(state, id, f)
    }

    /// Deliver everything on the window's deferred queue, in FIFO order.
    pub fn drain(&mut self) {
        let state: &mut dyn Any = &mut *self.state;
        self.window.drain(state);
    }

    /// One loop iteration: compact removed tasks, then run each task in
    /// registration order, draining the deferred queue completely after
    /// each one. Per-task draining bounds how stale a deferred event can
    /// get relative to the task that produced it.
    ///
    /// Returns `Ok(true)` when a task asked the loop to stop; the queue is
    /// not drained for that task, and the iteration's remaining tasks do
    /// not run.
    pub fn run_once(&mut self) -> Result<bool> {
        self.tasks.retain(|entry| !entry.removed);
        for i in 0..self.tasks.len() {
            let Some(mut task) = self.tasks[i].task.take() else {
                continue;
            };
            trace!(task = task.name(), "running task");
            let stop = task.run(self);
            self.tasks[i].task = Some(task);
            if stop? {
                debug!("task requested loop stop");
                return Ok(true);
            }
            self.drain();
        }
        Ok(false)
    }

    /// Run the loop until a task asks for a stop or fails.
    pub fn run(&mut self) -> Result<()> {
        debug!(tasks = self.tasks.len(), "run loop started");
        while !self.run_once()? {}
        debug!("run loop stopped");
        Ok(())
    }
}
