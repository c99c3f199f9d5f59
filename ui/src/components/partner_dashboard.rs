use std::collections::HashMap;

use dioxus::prelude::*;

use scraplink_common::assignment::{OrderAssignment, PartnerId};
use scraplink_common::location::GeoLocation;
use scraplink_common::money::format_inr;
use scraplink_common::order::{Order, OrderId, OrderStatus};

use super::auth_state::use_auth_state;
use super::geo;
use super::status_badge::StatusBadge;
use super::store_client::StoreClient;

/// The field action a partner can take from an order's current status.
fn next_action(status: OrderStatus) -> Option<(OrderStatus, &'static str)> {
    match status {
        OrderStatus::Assigned | OrderStatus::Accepted => {
            Some((OrderStatus::OnTheWay, "Start Journey"))
        }
        OrderStatus::OnTheWay => Some((OrderStatus::AtLocation, "Reached Location")),
        OrderStatus::AtLocation => Some((OrderStatus::PickedUp, "Scrap Picked Up")),
        OrderStatus::PickedUp => Some((OrderStatus::Completed, "Complete Pickup")),
        _ => None,
    }
}

/// Pickup-partner work queue: assigned orders with their field actions.
/// Each status advance is written to the store and echoed back into the
/// list from the returned row.
#[component]
pub fn PartnerDashboard() -> Element {
    let auth = use_auth_state();
    let mut jobs = use_signal(Vec::<(Order, OrderAssignment)>::new);
    let mut amounts = use_signal(HashMap::<String, String>::new);
    let mut in_flight = use_signal(|| None::<OrderId>);
    let mut position = use_signal(|| None::<GeoLocation>);
    let mut notice = use_signal(|| None::<String>);
    let mut loading = use_signal(|| true);

    let session = auth.read().session.clone();

    {
        let partner_id = session
            .as_ref()
            .map(|s| PartnerId(s.user_id.0.clone()));
        use_hook(move || {
            let Some(partner_id) = partner_id else { return };
            spawn(load(partner_id, jobs, notice, loading));
            spawn(async move {
                if let Ok(here) = geo::current_position().await {
                    position.set(Some(here));
                }
            });
        });
    }

    if session.is_none() {
        return rsx! {};
    }

    let advance = move |order: Order, to: OrderStatus| {
        if in_flight.read().is_some() {
            return;
        }
        // Completion records the settled amount in the same write.
        let final_amount = if to == OrderStatus::Completed {
            let typed = amounts
                .read()
                .get(&order.id.0)
                .and_then(|s| s.trim().parse::<f64>().ok());
            match typed {
                Some(v) if v >= 0.0 => Some(v),
                _ => {
                    notice.set(Some("Enter the final amount before completing".into()));
                    return;
                }
            }
        } else {
            None
        };

        in_flight.set(Some(order.id.clone()));
        notice.set(None);
        spawn(async move {
            match StoreClient::new()
                .update_order_status(&order.id, to, final_amount)
                .await
            {
                Ok(updated) => {
                    let mut list = jobs.write();
                    if let Some(entry) = list.iter_mut().find(|(o, _)| o.id == updated.id) {
                        entry.0 = updated;
                    }
                }
                Err(e) => {
                    tracing::error!("status update failed: {e}");
                    notice.set(Some("Could not update the pickup status".into()));
                }
            }
            in_flight.set(None);
        });
    };

    let here = position.read().clone();
    let busy_id = in_flight.read().clone();
    let rows = jobs.read().clone();

    rsx! {
        div { class: "partner-dashboard",
            h2 { "My Pickups" }

            if let Some(msg) = notice.read().as_ref() {
                div { class: "toast toast-error", "{msg}" }
            }

            if *loading.read() {
                div { class: "loading", "Loading pickups..." }
            } else if rows.is_empty() {
                div { class: "empty-state",
                    p { "No pickups assigned to you right now." }
                }
            } else {
                div { class: "job-list",
                    {rows.into_iter().map(|(order, _assignment)| {
                        let distance = match (&here, order.latitude, order.longitude) {
                            (Some(here), Some(lat), Some(lon)) => {
                                Some(here.distance_km(&GeoLocation::new(lat, lon)))
                            }
                            _ => None,
                        };
                        let action = next_action(order.status);
                        let busy = busy_id.as_ref() == Some(&order.id);
                        let amount_value = amounts
                            .read()
                            .get(&order.id.0)
                            .cloned()
                            .unwrap_or_default();
                        let amount_key = order.id.0.clone();
                        let advance_order = order.clone();

                        rsx! {
                            div { class: "job-card",
                                key: "{order.id.0}",
                                div { class: "job-top",
                                    span { class: "order-scrap",
                                        "{order.scrap_type.icon()} {order.scrap_type.label()}"
                                    }
                                    StatusBadge { status: order.status }
                                }
                                div { class: "job-when", "{order.pickup_date}, {order.pickup_time}" }
                                div { class: "job-address", "{order.address}" }
                                if let Some(km) = distance {
                                    div { class: "job-distance", "{km:.1} km away" }
                                }
                                if let Some(amount) = order.estimated_amount {
                                    div { class: "job-estimate", "est. {format_inr(amount)}" }
                                }

                                if let Some((to, label)) = action {
                                    div { class: "job-actions",
                                        if to == OrderStatus::Completed {
                                            input {
                                                r#type: "number",
                                                placeholder: "Final amount (₹)",
                                                value: "{amount_value}",
                                                oninput: move |evt| {
                                                    amounts.write().insert(amount_key.clone(), evt.value());
                                                },
                                            }
                                        }
                                        button {
                                            disabled: busy,
                                            onclick: move |_| advance(advance_order.clone(), to),
                                            if busy { "Saving..." } else { "{label}" }
                                        }
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

async fn load(
    partner_id: PartnerId,
    mut jobs: Signal<Vec<(Order, OrderAssignment)>>,
    mut notice: Signal<Option<String>>,
    mut loading: Signal<bool>,
) {
    match StoreClient::new().fetch_assigned_orders(&partner_id).await {
        Ok(rows) => jobs.set(rows),
        Err(e) => {
            tracing::error!("assigned orders fetch failed: {e}");
            notice.set(Some("Could not load your pickups".into()));
        }
    }
    loading.set(false);
}
