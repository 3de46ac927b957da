use cursive_core::buffer::PrintBuffer;
use cursive_core::theme::Theme;
use cursive_core::views::{LinearLayout, TextView};
use cursive_core::{Printer, Vec2, View};
use cursive_sticky::views::{ObservedScrollView, StickyHeader, StickyHeaderBuilder};
use cursive_sticky::{FrameQueue, ScrollPosition};
use parking_lot::{Mutex, RwLock};

use std::sync::Arc;

type Section = StickyHeader<TextView, TextView>;

fn section(title: &str, rows: usize, position: &ScrollPosition) -> Section {
    let content: Vec<String> = (0..rows).map(|i| format!("{} {}", title, i)).collect();
    StickyHeader::new(TextView::new(title), TextView::new(content.join("\n")))
        .scroll_position(position.clone())
}

fn get_section(view: &ObservedScrollView<LinearLayout>, i: usize) -> &Section {
    view.get_inner()
        .get_inner()
        .get_child(i)
        .and_then(|child| child.downcast_ref::<Section>())
        .unwrap()
}

// Draws `view` on a blank screen and returns its rows.
fn render<V: View>(view: &V, size: Vec2) -> Vec<String> {
    let theme = Theme::default();
    let buffer = RwLock::new(PrintBuffer::new());
    buffer.write().resize(size);

    view.draw(&Printer::new(size, &theme, &buffer));

    let buffer = buffer.read();
    (0..size.y)
        .map(|y| {
            (0..size.x)
                .map(|x| buffer.cell_text(Vec2::new(x, y)).unwrap_or(" "))
                .collect::<String>()
        })
        .collect()
}

#[test]
fn headers_stick_while_scrolling() {
    let position = ScrollPosition::new();
    let list = LinearLayout::vertical()
        .child(section("A", 5, &position))
        .child(section("B", 5, &position));
    let mut view = ObservedScrollView::new(list, position.clone());

    view.layout(Vec2::new(20, 4));
    assert_eq!(position.offset(), 0);
    // Both sections entered the tree.
    assert_eq!(position.listener_count(), 2);

    let first = get_section(&view, 0).measurement().copied().unwrap();
    assert_eq!(first.size.y, 6);
    assert_eq!(first.content_offset, Vec2::new(0, 1));

    view.set_offset((0, 3));
    assert_eq!(position.offset(), 3);
    assert!(get_section(&view, 0).needs_relayout());
    assert!(get_section(&view, 1).needs_relayout());

    // The viewport is at the top of the screen.
    position.attach(Vec2::zero());

    // First section starts at row 0, now 3 rows above the viewport.
    let placement = get_section(&view, 0).place_at(-3).unwrap();
    assert_eq!(placement.header_offset, Vec2::new(0, 3));
    assert_eq!(placement.stuck_amount, -1.0);

    // Second section starts at row 6, still 3 rows below the viewport top.
    let placement = get_section(&view, 1).place_at(3).unwrap();
    assert_eq!(placement.header_offset, Vec2::zero());
    assert_eq!(placement.stuck_amount, 1.0);

    drop(view);
    assert!(!position.is_attached());
    assert_eq!(position.listener_count(), 0);
}

#[test]
fn builder_header_follows_stuck_amount() {
    let position = ScrollPosition::new();
    let frames = FrameQueue::new();

    let content: Vec<String> = (0..8).map(|i| format!("Row {}", i)).collect();
    let mut view = StickyHeaderBuilder::new(
        TextView::new(content.join("\n")),
        frames.clone(),
        |amount| {
            let title = if amount < 0.0 { "Rows (stuck)" } else { "Rows" };
            TextView::new(title)
        },
    )
    .scroll_position(position.clone());

    view.layout(Vec2::new(20, 9));
    assert_eq!(view.get_inner().measurement().unwrap().header_size.x, 4);

    position.attach(Vec2::zero());
    view.get_inner().place_at(-4);
    view.get_inner().place_at(-5);
    assert_eq!(frames.len(), 1);

    // Next frame: the header is rebuilt with the latest amount.
    frames.run_pending();
    assert!(view.needs_relayout());
    view.layout(Vec2::new(20, 9));

    assert_eq!(view.stuck_amount(), -1.0);
    assert_eq!(view.get_inner().measurement().unwrap().header_size.x, 12);
}

#[test]
fn draws_stuck_header_over_content() {
    let position = ScrollPosition::new();
    let amounts = Arc::new(Mutex::new(Vec::new()));

    let mut list = LinearLayout::vertical();
    for title in ["A", "B"] {
        let amounts = Arc::clone(&amounts);
        list.add_child(
            section(title, 5, &position)
                .on_stuck_amount(move |amount| amounts.lock().push((title, amount))),
        );
    }
    let mut view = ObservedScrollView::new(list, position.clone());

    let size = Vec2::new(20, 4);
    view.layout(size);
    view.set_offset((0, 3));
    view.layout(size);
    assert_eq!(position.offset(), 3);

    let rows = render(&view, size);
    assert!(position.is_attached());

    // Row 0 would show "A 2": the stuck header hides it.
    assert!(rows[0].starts_with("A    "), "{:?}", rows[0]);
    assert!(rows[1].starts_with("A 3"));
    assert!(rows[2].starts_with("A 4"));
    assert!(rows[3].starts_with('B'));

    assert_eq!(*amounts.lock(), vec![("A", -1.0), ("B", 1.0)]);
}
