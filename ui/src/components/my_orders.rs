use dioxus::prelude::*;

use scraplink_common::identity::UserId;
use scraplink_common::money::format_inr;
use scraplink_common::order::Order;

use super::app::Route;
use super::auth_state::use_auth_state;
use super::orders_state::{use_orders_state, OrdersState};
use super::realtime::{RealtimeChannel, Scope};
use super::status_badge::StatusBadge;
use super::store_client::StoreClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    All,
    Active,
    Completed,
}

impl Filter {
    fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    fn admits(self, order: &Order) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => order.status.is_active(),
            Filter::Completed => order.status.is_terminal(),
        }
    }
}

/// The customer's order list, kept current by a channel scoped to their
/// rows. Change events merge into the shared book by id; only a fresh
/// fetch replaces the list wholesale.
#[component]
pub fn MyOrders() -> Element {
    let auth = use_auth_state();
    let nav = use_navigator();
    let mut orders = use_orders_state();
    let mut channel = use_signal(|| None::<RealtimeChannel>);
    let mut filter = use_signal(|| Filter::All);
    // Bumped by the channel callback on every (re)connect; the effect
    // below re-fetches in scope since the callback runs outside it.
    let mut resync = use_signal(|| 0u32);

    let session = auth.read().session.clone();

    {
        let user_id = session.as_ref().map(|s| s.user_id.clone());
        use_hook(move || {
            let Some(user_id) = user_id else { return };
            let opened = RealtimeChannel::open(
                Scope::User(user_id),
                move |event| {
                    orders.write().book.apply(event);
                },
                move || {
                    orders.write().connected = true;
                    resync += 1;
                },
                move || {
                    orders.write().connected = false;
                },
            );
            if opened.is_none() {
                orders.write().connected = false;
            }
            channel.set(opened);
        });
    }

    {
        let user_id = session.as_ref().map(|s| s.user_id.clone());
        use_effect(move || {
            resync();
            if let Some(user_id) = user_id.clone() {
                spawn(load(user_id, orders));
            }
        });
    }

    let Some(session) = session else {
        return rsx! {};
    };
    let user_id = session.user_id.clone();

    let state = orders.read().clone();
    let active = *filter.read();
    let rows: Vec<Order> = state
        .book
        .newest_first()
        .into_iter()
        .filter(|o| active.admits(o))
        .cloned()
        .collect();

    rsx! {
        div { class: "my-orders",
            div { class: "orders-header",
                h2 { "My Pickups" }
                if state.connected {
                    span { class: "live-dot", "Live" }
                }
            }

            if let Some(err) = state.last_error.as_ref() {
                div { class: "toast toast-error",
                    "{err}"
                    button {
                        onclick: {
                            let user_id = user_id.clone();
                            move |_| { spawn(load(user_id.clone(), orders)); }
                        },
                        "Retry"
                    }
                }
            }

            div { class: "filter-tabs",
                {[Filter::All, Filter::Active, Filter::Completed].iter().map(|&f| {
                    rsx! {
                        button {
                            key: "{f.label()}",
                            class: if f == active { "filter-tab selected" } else { "filter-tab" },
                            onclick: move |_| filter.set(f),
                            "{f.label()}"
                        }
                    }
                })}
            }

            if rows.is_empty() {
                div { class: "empty-state",
                    p { "No pickups here yet." }
                    button {
                        onclick: move |_| { nav.push(Route::NewPickup {}); },
                        "Schedule Pickup"
                    }
                }
            } else {
                div { class: "order-list",
                    {rows.into_iter().map(|order| {
                        let id = order.id.0.clone();
                        rsx! {
                            div { class: "order-card",
                                key: "{order.id.0}",
                                onclick: move |_| { nav.push(Route::Tracking { id: id.clone() }); },
                                div { class: "order-card-top",
                                    span { class: "order-scrap",
                                        "{order.scrap_type.icon()} {order.scrap_type.label()}"
                                    }
                                    StatusBadge { status: order.status }
                                }
                                div { class: "order-card-when",
                                    "{order.pickup_date}, {order.pickup_time}"
                                }
                                if let Some(amount) = order.final_amount {
                                    div { class: "order-card-amount", "{format_inr(amount)}" }
                                } else if let Some(amount) = order.estimated_amount {
                                    div { class: "order-card-amount",
                                        "est. {format_inr(amount)}"
                                    }
                                }
                            }
                        }
                    })}
                }
            }
        }
    }
}

async fn load(user_id: UserId, mut orders: Signal<OrdersState>) {
    match StoreClient::new().fetch_orders(&user_id).await {
        Ok(rows) => {
            let mut state = orders.write();
            state.book.replace_all(rows);
            state.last_error = None;
        }
        Err(e) => {
            tracing::error!("order list fetch failed: {e}");
            orders.write().last_error = Some("Could not load your pickups".into());
        }
    }
}
