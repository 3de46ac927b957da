use cursive::view::Resizable;
use cursive::views::{Dialog, LinearLayout, TextView};
use cursive::Cursive;
use cursive_sticky::views::{ObservedScrollView, StickyHeader};
use cursive_sticky::ScrollPosition;

fn main() {
    let mut siv = cursive::default();
    let position = ScrollPosition::new();

    let mut list = LinearLayout::vertical();
    for month in ["Jan", "Feb", "Mar", "Apr", "May", "Jun"] {
        let days: Vec<String> = (1..=8).map(|day| format!("Event on day {}", day * 3)).collect();

        // The month stays beside its events, sliding up with the last one.
        list.add_child(
            StickyHeader::new(TextView::new(month), TextView::new(days.join("\n")))
                .overlap_headers(true)
                .offset_from_headers(true)
                .header_width(4)
                .content_offsets(1, 1)
                .scroll_position(position.clone()),
        );
    }

    siv.add_layer(
        Dialog::around(ObservedScrollView::new(list, position).fixed_height(12))
            .title("Agenda")
            .button("Quit", Cursive::quit),
    );
    siv.add_global_callback('q', Cursive::quit);

    siv.run();
}
