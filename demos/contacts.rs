use cursive::views::{Dialog, Layer, LinearLayout, TextView};
use cursive::Cursive;
use cursive_sticky::views::{ObservedScrollView, StickyHeaderBuilder};
use cursive_sticky::ScrollPosition;

const CONTACTS: &[&str] = &[
    "Aaron", "Abigail", "Adam", "Alice", "Amelia", "Anna", "Benjamin", "Bob", "Brooke", "Carla",
    "Charlie", "Chloe", "Daniel", "David", "Diana", "Elena", "Emma", "Ethan", "Felix", "Fiona",
    "George", "Grace", "Hannah", "Henry", "Isaac", "Isabel", "Jack", "Julia", "Kevin", "Laura",
    "Leo", "Lucas", "Maria", "Max", "Nina", "Oscar", "Paul", "Rose", "Sam", "Zoe",
];

fn main() {
    cursive::logger::init();

    let mut siv = cursive::default();
    let position = ScrollPosition::new();

    let mut list = LinearLayout::vertical();
    for initial in 'A'..='Z' {
        let names: Vec<&str> = CONTACTS
            .iter()
            .copied()
            .filter(|name| name.starts_with(initial))
            .collect();
        if names.is_empty() {
            continue;
        }

        // Headers get a marker while stuck to the top of the list.
        let section = StickyHeaderBuilder::new(
            TextView::new(names.join("\n")),
            siv.cb_sink().clone(),
            move |amount| {
                let label = if amount < 0.0 {
                    format!("{} ^", initial)
                } else {
                    initial.to_string()
                };
                Layer::new(TextView::new(label))
            },
        )
        .scroll_position(position.clone());

        list.add_child(section);
    }

    siv.add_layer(
        Dialog::around(ObservedScrollView::new(list, position))
            .title("Contacts")
            .button("Quit", Cursive::quit),
    );
    siv.add_global_callback('q', Cursive::quit);
    siv.add_global_callback('~', Cursive::toggle_debug_console);

    siv.run();
}
