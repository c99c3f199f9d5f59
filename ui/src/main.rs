mod components;

use components::app::App;

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}
