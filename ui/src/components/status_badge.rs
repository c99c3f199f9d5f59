use dioxus::prelude::*;

use scraplink_common::order::OrderStatus;

/// Pill badge for an order's current status. Total over every status the
/// store can write, including values outside the known vocabulary.
#[component]
pub fn StatusBadge(status: OrderStatus) -> Element {
    rsx! {
        span { class: "{status.css_class()}", "{status.label()}" }
    }
}
