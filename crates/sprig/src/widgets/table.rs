//! A paged, virtualized list of cells.

use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    event::{Event, EventKind, Payload, Value, keys},
    geom::Rect,
    id::NodeId,
    widget::{Context, EventOutcome, Widget},
    widgets::Cell,
    window::Window,
};

/// A paged list. Shows as many [`Cell`] rows as fit the table's frame; when
/// the items overflow one page and `show_navigation_buttons` is set, the
/// last row is reserved for a "Previous"/"Next" button pair. Cells are
/// regenerated wholesale on every rebuild, never patched.
///
/// A `Tapped` on a content row is annotated with `index` (the item's
/// position in `items`) and left bubbling, so an ancestor can react to the
/// selection.
pub struct Table {
    items: Vec<String>,
    cell_height: i32,
    start_offset: usize,
    cells_per_page: usize,
    show_navigation_buttons: bool,
    add_buttons: bool,
}

impl Table {
    /// A table with the given row height. `show_navigation_buttons` reserves
    /// the last visible row for an on-screen "Previous"/"Next" pair whenever
    /// the items overflow one page; useful for touch-only devices.
    pub fn new(cell_height: i32, show_navigation_buttons: bool) -> Self {
        Self {
            items: Vec::new(),
            cell_height,
            start_offset: 0,
            cells_per_page: 0,
            show_navigation_buttons,
            add_buttons: false,
        }
    }

    /// The full item list.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Index of the first visible item. Always a multiple of
    /// [`cells_per_page`](Self::cells_per_page) and in range while items are
    /// non-empty.
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    /// Content rows per page.
    pub fn cells_per_page(&self) -> usize {
        self.cells_per_page
    }

    /// Replace the item list, recompute the page size and whether the
    /// navigation row is needed, and rebuild. The current page is kept where
    /// possible; it is re-aligned and clamped when the new list or page size
    /// no longer covers it.
    pub fn set_items(
        &mut self,
        win: &mut Window,
        node: NodeId,
        items: Vec<String>,
    ) -> Result<()> {
        self.items = items;
        let height = win.frame(node).ok_or(Error::NodeNotFound(node))?.h;
        let max_cells = if self.cell_height > 0 {
            (height / self.cell_height).max(0) as usize
        } else {
            0
        };
        let mut per_page = self.items.len().min(max_cells);
        self.add_buttons =
            self.show_navigation_buttons && max_cells > 0 && self.items.len() > max_cells;
        if self.add_buttons {
            // Last row reserved for the Previous/Next pair.
            per_page -= 1;
        }
        self.cells_per_page = per_page;
        if self.cells_per_page == 0 || self.items.is_empty() {
            self.start_offset = 0;
        } else {
            self.start_offset -= self.start_offset % self.cells_per_page;
            let last_page = ((self.items.len() - 1) / self.cells_per_page) * self.cells_per_page;
            self.start_offset = self.start_offset.min(last_page);
        }
        self.rebuild(win, node)
    }

    /// Drop all current rows and regenerate the visible page, plus the
    /// navigation pair when active. The first row becomes active.
    pub fn rebuild(&mut self, win: &mut Window, node: NodeId) -> Result<()> {
        let table = win.node(node).ok_or(Error::NodeNotFound(node))?;
        let width = table.frame().w;
        for child in table.children().to_vec() {
            win.remove(child)?;
        }
        let end = (self.start_offset + self.cells_per_page).min(self.items.len());
        for (i, item) in self.items[self.start_offset..end].iter().enumerate() {
            let frame = Rect::new(0, i as i32 * self.cell_height, width, self.cell_height);
            win.add(node, frame, Cell::new(item.clone()))?;
        }
        if self.add_buttons {
            let y = self.cells_per_page as i32 * self.cell_height;
            for (i, label) in ["Previous", "Next"].into_iter().enumerate() {
                let frame = Rect::new(i as i32 * width / 2, y, width / 2, self.cell_height);
                win.add(node, frame, Cell::nav(label))?;
            }
        }
        let first = win
            .node(node)
            .and_then(|n| n.children().first().copied());
        if let Some(first) = first {
            win.become_active(first, None)?;
        }
        win.set_needs_display(true);
        Ok(())
    }

    /// Page backward. A no-op on the first page; otherwise fires
    /// `PageWillChange`, shifts, rebuilds, re-activates the "Previous"
    /// button, and fires `PageDidChange`.
    pub fn previous_page(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        if self.cells_per_page == 0 || self.start_offset == 0 {
            return Ok(());
        }
        self.turn_page(ctx, -1)
    }

    /// Page forward. A no-op on the last page.
    pub fn next_page(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        if self.cells_per_page == 0 || self.start_offset + self.cells_per_page >= self.items.len()
        {
            return Ok(());
        }
        self.turn_page(ctx, 1)
    }

    fn turn_page(&mut self, ctx: &mut Context<'_>, offset: i64) -> Result<()> {
        let node = ctx.node;
        debug!(from = self.start_offset, offset, "table page change");
        let mut payload = Payload::new();
        payload.set(keys::OFFSET, Value::Int(offset));
        ctx.emit(EventKind::PageWillChange, payload.clone());
        if offset > 0 {
            self.start_offset += self.cells_per_page;
        } else {
            self.start_offset -= self.cells_per_page;
        }
        self.rebuild(ctx.win, node)?;
        if self.add_buttons {
            let children = ctx
                .win
                .node(node)
                .ok_or(Error::NodeNotFound(node))?
                .children()
                .to_vec();
            let target = if offset > 0 {
                children.last().copied()
            } else {
                children.len().checked_sub(2).and_then(|i| children.get(i).copied())
            };
            if let Some(target) = target {
                ctx.win.become_active(target, None)?;
            }
        }
        ctx.emit(EventKind::PageDidChange, payload);
        Ok(())
    }

    fn children(&self, ctx: &Context<'_>) -> Vec<NodeId> {
        ctx.win
            .node(ctx.node)
            .map(|n| n.children().to_vec())
            .unwrap_or_default()
    }

    fn activate(&self, ctx: &mut Context<'_>, target: NodeId) {
        if let Err(err) = ctx.win.become_active(target, None) {
            warn!(%err, "row activation failed");
        }
    }
}

impl Widget for Table {
    fn on_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) -> EventOutcome {
        match event.kind {
            EventKind::Tapped => {
                let children = self.children(ctx);
                let Some(index) = event
                    .originator()
                    .and_then(|o| children.iter().position(|&c| c == o))
                else {
                    // Routing miss: the tap is not ours, and must not reach
                    // whatever sits behind the table either.
                    return EventOutcome::Consume;
                };
                if self.add_buttons {
                    if index == children.len() - 1 {
                        if let Err(err) = self.next_page(ctx) {
                            warn!(%err, "page change failed");
                        }
                        return EventOutcome::Handle;
                    }
                    if index == children.len() - 2 {
                        if let Err(err) = self.previous_page(ctx) {
                            warn!(%err, "page change failed");
                        }
                        return EventOutcome::Handle;
                    }
                }
                event.payload.set(
                    keys::INDEX,
                    Value::Int((self.start_offset + index) as i64),
                );
                // Annotate, don't consume: an ancestor reacts to the
                // selection with the derived index attached.
                EventOutcome::Ignore
            }
            EventKind::ButtonUp
            | EventKind::ButtonDown
            | EventKind::ButtonLeft
            | EventKind::ButtonRight => {
                let children = self.children(ctx);
                let active = ctx.win.active_responder();
                let Some(index) = children.iter().position(|&c| c == active) else {
                    return EventOutcome::Consume;
                };
                let count = children.len();
                if self.add_buttons {
                    // Lateral movement between the two navigation buttons,
                    // and up from "Next" into the last content row.
                    if event.kind == EventKind::ButtonLeft && index == count - 1 {
                        self.activate(ctx, children[count - 2]);
                        return EventOutcome::Handle;
                    }
                    if event.kind == EventKind::ButtonRight && index == count - 2 {
                        self.activate(ctx, children[count - 1]);
                        return EventOutcome::Handle;
                    }
                    if event.kind == EventKind::ButtonUp && index == count - 1 {
                        if let Some(target) =
                            index.checked_sub(2).and_then(|i| children.get(i).copied())
                        {
                            self.activate(ctx, target);
                        }
                        return EventOutcome::Handle;
                    }
                }
                let last = if self.add_buttons {
                    count.saturating_sub(2)
                } else {
                    count.saturating_sub(1)
                };
                if event.kind == EventKind::ButtonUp && index > 0 {
                    self.activate(ctx, children[index - 1]);
                    return EventOutcome::Handle;
                }
                if event.kind == EventKind::ButtonDown && index < last {
                    self.activate(ctx, children[index + 1]);
                    return EventOutcome::Handle;
                }
                EventOutcome::Ignore
            }
            _ => EventOutcome::Ignore,
        }
    }

    fn did_become_active(&mut self, win: &mut Window, node: NodeId, event: Option<&Event>) {
        let children = win
            .node(node)
            .map(|n| n.children().to_vec())
            .unwrap_or_default();
        // Entering from below lands on the last row, otherwise the first.
        let target = if event.is_some_and(|e| e.kind == EventKind::ButtonUp) {
            children.last().copied()
        } else {
            children.first().copied()
        };
        if let Some(target) = target
            && let Err(err) = win.become_active(target, None)
        {
            warn!(%err, "row activation failed");
        }
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_window;

    fn setup(items: &[&str], height: i32, cell_height: i32, nav: bool) -> (Window, NodeId) {
        let mut win = test_window();
        let root = win.root();
        let table = win
            .add(root, Rect::new(0, 0, 128, height), Table::new(cell_height, nav))
            .unwrap();
        let mut app = ();
        win.with_widget::<Table, _>(&mut app, table, |t, ctx| {
            let node = ctx.node;
            t.set_items(ctx.win, node, items.iter().map(|s| s.to_string()).collect())
        })
        .unwrap()
        .unwrap();
        (win, table)
    }

    fn row_texts(win: &mut Window, table: NodeId) -> Vec<String> {
        let mut app = ();
        let children = win.node(table).unwrap().children().to_vec();
        children
            .into_iter()
            .map(|c| {
                win.with_widget::<Cell, _>(&mut app, c, |cell, _| cell.text().to_string())
                    .unwrap()
            })
            .collect()
    }

    fn offset(win: &mut Window, table: NodeId) -> usize {
        let mut app = ();
        win.with_widget::<Table, _>(&mut app, table, |t, _| t.start_offset())
            .unwrap()
    }

    fn page_forward(win: &mut Window, table: NodeId) {
        let mut app = ();
        win.with_widget::<Table, _>(&mut app, table, |t, ctx| t.next_page(ctx))
            .unwrap()
            .unwrap();
    }

    #[test]
    fn five_items_three_rows_with_navigation() {
        let (mut win, table) = setup(&["A", "B", "C", "D", "E"], 60, 20, true);
        // Three rows fit; one is reserved for the navigation pair.
        assert_eq!(row_texts(&mut win, table), ["A", "B", "Previous", "Next"]);
        assert_eq!(offset(&mut win, table), 0);
        page_forward(&mut win, table);
        assert_eq!(row_texts(&mut win, table), ["C", "D", "Previous", "Next"]);
        assert_eq!(offset(&mut win, table), 2);
        page_forward(&mut win, table);
        assert_eq!(row_texts(&mut win, table), ["E", "Previous", "Next"]);
        assert_eq!(offset(&mut win, table), 4);
        // Already on the last page.
        page_forward(&mut win, table);
        assert_eq!(offset(&mut win, table), 4);
        assert_eq!(row_texts(&mut win, table), ["E", "Previous", "Next"]);
    }

    #[test]
    fn short_list_omits_navigation() {
        let (mut win, table) = setup(&["A", "B"], 60, 20, true);
        assert_eq!(row_texts(&mut win, table), ["A", "B"]);
    }

    #[test]
    fn first_row_is_active_after_rebuild() {
        let (win, table) = setup(&["A", "B", "C"], 60, 20, false);
        let first = win.node(table).unwrap().children()[0];
        assert_eq!(win.active_responder(), first);
    }

    #[test]
    fn page_events_fire_only_on_actual_change() {
        let (mut win, table) = setup(&["A", "B", "C", "D", "E"], 60, 20, true);
        let fired = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        for kind in [EventKind::PageWillChange, EventKind::PageDidChange] {
            let fired = fired.clone();
            win.set_action(table, kind, move |_ctx, event| {
                fired
                    .lock()
                    .unwrap()
                    .push((event.kind, event.payload.int(keys::OFFSET).unwrap()));
            })
            .unwrap();
        }
        page_forward(&mut win, table);
        assert_eq!(
            fired.lock().unwrap().as_slice(),
            &[
                (EventKind::PageWillChange, 1),
                (EventKind::PageDidChange, 1)
            ]
        );
        // Move to the last page, then try to page past it.
        page_forward(&mut win, table);
        fired.lock().unwrap().clear();
        page_forward(&mut win, table);
        assert!(fired.lock().unwrap().is_empty());
    }

    #[test]
    fn next_button_activates_after_paging_forward() {
        let (mut win, table) = setup(&["A", "B", "C", "D", "E"], 60, 20, true);
        page_forward(&mut win, table);
        let children = win.node(table).unwrap().children().to_vec();
        assert_eq!(win.active_responder(), *children.last().unwrap());
    }

    #[test]
    fn tap_on_a_row_bubbles_with_the_item_index() {
        let (mut win, table) = setup(&["A", "B", "C", "D", "E"], 60, 20, true);
        page_forward(&mut win, table);
        let root = win.root();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        win.set_action(root, EventKind::Tapped, move |_ctx, event| {
            seen2.lock().unwrap().push(event.payload.int(keys::INDEX));
        })
        .unwrap();
        // Touch the second visible row; the tap bubbles to the root with the
        // absolute item index attached.
        let mut app = ();
        win.handle_touch(true, 10, 30);
        win.drain(&mut app);
        assert_eq!(seen.lock().unwrap().as_slice(), &[Some(3)]);
    }

    #[test]
    fn tap_on_a_navigation_button_turns_the_page() {
        let (mut win, table) = setup(&["A", "B", "C", "D", "E"], 60, 20, true);
        let mut app = ();
        // "Next" occupies the right half of the reserved bottom row.
        win.handle_touch(true, 100, 50);
        win.drain(&mut app);
        assert_eq!(offset(&mut win, table), 2);
        // "Previous" is the left half.
        win.handle_touch(true, 10, 50);
        win.drain(&mut app);
        assert_eq!(offset(&mut win, table), 0);
    }

    #[test]
    fn foreign_tap_is_swallowed() {
        let (mut win, table) = setup(&["A", "B"], 60, 20, false);
        let root = win.root();
        let outside = win.add(root, Rect::new(0, 100, 10, 10), crate::widget::Blank).unwrap();
        let mut app = ();
        let mut event =
            Event::new(EventKind::Tapped).with(keys::ORIGINATOR, Value::Node(outside));
        // Dispatched at the table with an originator it does not own: a
        // routing miss, swallowed rather than bubbled.
        assert!(!win.handle_event(&mut app, table, &mut event));
        assert!(event.payload.int(keys::INDEX).is_none());
    }

    #[test]
    fn directional_movement_walks_the_rows() {
        let (mut win, table) = setup(&["A", "B", "C"], 60, 20, false);
        let children = win.node(table).unwrap().children().to_vec();
        let mut app = ();
        win.generate_event(&mut app, EventKind::ButtonDown, Payload::new());
        assert_eq!(win.active_responder(), children[1]);
        win.generate_event(&mut app, EventKind::ButtonDown, Payload::new());
        // The last row is reachable when no navigation pair is shown.
        assert_eq!(win.active_responder(), children[2]);
        win.generate_event(&mut app, EventKind::ButtonDown, Payload::new());
        assert_eq!(win.active_responder(), children[2]);
        win.generate_event(&mut app, EventKind::ButtonUp, Payload::new());
        assert_eq!(win.active_responder(), children[1]);
    }

    #[test]
    fn lateral_movement_between_navigation_buttons() {
        let (mut win, table) = setup(&["A", "B", "C", "D", "E"], 60, 20, true);
        let children = win.node(table).unwrap().children().to_vec();
        let count = children.len();
        let mut app = ();
        // Walk down into the navigation row ("Previous"), right to "Next",
        // and back up into the last content row.
        win.generate_event(&mut app, EventKind::ButtonDown, Payload::new());
        win.generate_event(&mut app, EventKind::ButtonDown, Payload::new());
        assert_eq!(win.active_responder(), children[count - 2]);
        win.generate_event(&mut app, EventKind::ButtonRight, Payload::new());
        assert_eq!(win.active_responder(), children[count - 1]);
        win.generate_event(&mut app, EventKind::ButtonUp, Payload::new());
        assert_eq!(win.active_responder(), children[count - 3]);
        win.generate_event(&mut app, EventKind::ButtonLeft, Payload::new());
        // Left from a content row is not table movement; it bubbles away.
        assert_eq!(win.active_responder(), children[count - 3]);
    }

    #[test]
    fn set_items_clamps_the_page_into_range() {
        let (mut win, table) = setup(&["A", "B", "C", "D", "E"], 40, 20, false);
        let mut app = ();
        // Two rows per page; go to the last page (offset 4).
        page_forward(&mut win, table);
        page_forward(&mut win, table);
        assert_eq!(offset(&mut win, table), 4);
        win.with_widget::<Table, _>(&mut app, table, |t, ctx| {
            let node = ctx.node;
            t.set_items(ctx.win, node, vec!["A".into(), "B".into(), "C".into()])
        })
        .unwrap()
        .unwrap();
        assert_eq!(offset(&mut win, table), 2);
        assert_eq!(row_texts(&mut win, table), ["C"]);
    }
}

#[cfg(test)]
mod paging_invariant {
    use proptest::prelude::*;

    use super::*;
    use crate::testing::test_window;

    proptest! {
        // After any sequence of page turns, the start offset is a multiple
        // of the page size and in range.
        #[test]
        fn offset_stays_aligned_and_in_range(
            item_count in 0usize..40,
            height in 1i32..120,
            nav in proptest::bool::ANY,
            turns in proptest::collection::vec(proptest::bool::ANY, 0..20),
        ) {
            let mut win = test_window();
            let root = win.root();
            let table = win
                .add(root, Rect::new(0, 0, 128, height), Table::new(20, nav))
                .unwrap();
            let mut app = ();
            let items: Vec<String> = (0..item_count).map(|i| format!("item {i}")).collect();
            win.with_widget::<Table, _>(&mut app, table, |t, ctx| {
                let node = ctx.node;
                t.set_items(ctx.win, node, items)
            })
            .unwrap()
            .unwrap();
            for forward in turns {
                win.with_widget::<Table, _>(&mut app, table, |t, ctx| {
                    if forward { t.next_page(ctx) } else { t.previous_page(ctx) }
                })
                .unwrap()
                .unwrap();
                let (start, per_page) = win
                    .with_widget::<Table, _>(&mut app, table, |t, _| {
                        (t.start_offset(), t.cells_per_page())
                    })
                    .unwrap();
                if per_page > 0 {
                    prop_assert_eq!(start % per_page, 0);
                }
                if item_count == 0 {
                    prop_assert_eq!(start, 0);
                } else {
                    prop_assert!(start < item_count);
                }
            }
        }
    }
}
