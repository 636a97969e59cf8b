//! A scripted, headless demo: a paged table driven by synthetic button
//! input. The "display" is a closure that prints the visible rows whenever
//! the window is dirty.

use sprig::{
    App, EventKind, Payload, Rect, Result, Style, Task, Window, keys,
    tasks::DisplayRefresh,
    widgets::{Cell, Table},
};

struct DemoState {
    picks: u32,
}

struct Script {
    events: std::vec::IntoIter<EventKind>,
}

impl Task for Script {
    fn run(&mut self, app: &mut App) -> Result<bool> {
        match self.events.next() {
            Some(kind) => {
                app.generate_event(kind, Payload::new());
                Ok(false)
            }
            None => Ok(true),
        }
    }

    fn name(&self) -> &'static str {
        "script"
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .init();

    let mut win = Window::new(Style::with_font("terminus-16"), 128, 128)?;
    let root = win.root();
    let table = win.add(root, Rect::new(0, 0, 128, 96), Table::new(24, true))?;
    win.set_action(root, EventKind::Tapped, |ctx, event| {
        if let Some(index) = event.payload.int(keys::INDEX) {
            if let Some(state) = ctx.state_mut::<DemoState>() {
                state.picks += 1;
            }
            println!("selected item {index}");
        }
    })?;

    let mut app = App::new(win, DemoState { picks: 0 });
    app.with_widget::<Table, _>(table, |t, ctx| {
        let node = ctx.node;
        t.set_items(ctx.win, node, (1..=8).map(|i| format!("Track {i}")).collect())
    })??;

    // Walk down the first page, then confirm a row.
    app.add_task(Script {
        events: vec![
            EventKind::ButtonDown,
            EventKind::ButtonDown,
            EventKind::ButtonA,
        ]
        .into_iter(),
    });
    app.add_task(DisplayRefresh::new(move |win| {
        let rows: Vec<String> = win
            .node(table)
            .map(|n| n.children().to_vec())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| {
                win.with_widget::<Cell, _>(&mut (), c, |cell, _| cell.text().to_string())
                    .ok()
            })
            .collect();
        println!("[display] {}", rows.join(" | "));
        Ok(())
    }));
    app.run()?;

    if let Some(state) = app.state_mut::<DemoState>() {
        println!("picks: {}", state.picks);
    }
    Ok(())
}
