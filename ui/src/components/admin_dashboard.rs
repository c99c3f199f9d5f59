use std::collections::HashMap;

use dioxus::prelude::*;

use scraplink_common::assignment::{AssignmentDraft, PartnerId, PartnerProfile};
use scraplink_common::feedback::{average_stars, positive_share, stars_label, OrderRating};
use scraplink_common::money::format_inr;
use scraplink_common::order::{Order, OrderId, OrderStatus};
use scraplink_common::pricing::{parse_rate, RateCard};
use scraplink_common::scrap::ScrapType;

use super::status_badge::StatusBadge;
use super::store_client::StoreClient;

/// Admin operations board: every order in the store, with manual partner
/// assignment and estimate entry on pending ones. Assigning writes the
/// assignment row and moves the order to `assigned` in two store calls;
/// the second failing leaves a dangling assignment the admin can see and
/// redo, never a lost order. Below the orders sit the per-category rate
/// editor and the customer feedback board.
#[component]
pub fn AdminDashboard() -> Element {
    let mut orders = use_signal(Vec::<Order>::new);
    let mut partners = use_signal(Vec::<PartnerProfile>::new);
    let mut picks = use_signal(HashMap::<String, String>::new);
    let mut estimates = use_signal(HashMap::<String, String>::new);
    let mut rates = use_signal(RateCard::new);
    let mut rate_edits = use_signal(HashMap::<String, String>::new);
    let ratings = use_signal(Vec::<OrderRating>::new);
    let mut in_flight = use_signal(|| None::<OrderId>);
    let mut notice = use_signal(|| None::<String>);
    let mut loading = use_signal(|| true);

    use_hook(move || {
        spawn(load(orders, partners, rates, ratings, notice, loading));
    });

    let assign = move |order: Order| {
        if in_flight.read().is_some() {
            return;
        }
        let Some(partner_id) = picks
            .read()
            .get(&order.id.0)
            .filter(|p| !p.is_empty())
            .cloned()
        else {
            notice.set(Some("Pick a partner first".into()));
            return;
        };

        in_flight.set(Some(order.id.clone()));
        notice.set(None);
        spawn(async move {
            let client = StoreClient::new();
            let draft = AssignmentDraft {
                order_id: order.id.clone(),
                partner_id: PartnerId(partner_id),
            };
            let result = async {
                client.assign_partner(&draft).await?;
                client
                    .update_order_status(&order.id, OrderStatus::Assigned, None)
                    .await
            }
            .await;

            match result {
                Ok(updated) => {
                    let mut list = orders.write();
                    if let Some(row) = list.iter_mut().find(|o| o.id == updated.id) {
                        *row = updated;
                    }
                }
                Err(e) => {
                    tracing::error!("partner assignment failed: {e}");
                    notice.set(Some("Assignment failed, try again".into()));
                }
            }
            in_flight.set(None);
        });
    };

    let estimate = move |order: Order| {
        if in_flight.read().is_some() {
            return;
        }
        let Some(amount) = estimates
            .read()
            .get(&order.id.0)
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| *v >= 0.0)
        else {
            notice.set(Some("Enter a valid estimate amount".into()));
            return;
        };

        in_flight.set(Some(order.id.clone()));
        notice.set(None);
        spawn(async move {
            match StoreClient::new().update_estimate(&order.id, amount).await {
                Ok(updated) => {
                    let mut list = orders.write();
                    if let Some(row) = list.iter_mut().find(|o| o.id == updated.id) {
                        *row = updated;
                    }
                }
                Err(e) => {
                    tracing::error!("estimate update failed: {e}");
                    notice.set(Some("Could not save the estimate".into()));
                }
            }
            in_flight.set(None);
        });
    };

    let save_rate = move |scrap: ScrapType| {
        let Some(new_rate) = rate_edits
            .read()
            .get(scrap.wire_name())
            .and_then(|s| parse_rate(s))
        else {
            notice.set(Some("Enter a valid rate".into()));
            return;
        };

        notice.set(None);
        spawn(async move {
            match StoreClient::new().update_rate(scrap, new_rate).await {
                Ok(stored) => {
                    rates.write().upsert(stored);
                    rate_edits.write().remove(scrap.wire_name());
                }
                Err(e) => {
                    tracing::error!("rate update failed: {e}");
                    notice.set(Some("Could not save the rate".into()));
                }
            }
        });
    };

    let partner_options = partners.read().clone();
    let busy_id = in_flight.read().clone();
    let rows = orders.read().clone();
    let rate_card = rates.read().clone();
    let feedback = ratings.read().clone();

    rsx! {
        div { class: "admin-dashboard",
            div { class: "orders-header",
                h2 { "All Pickup Requests" }
                button {
                    class: "secondary",
                    onclick: move |_| {
                        loading.set(true);
                        spawn(load(orders, partners, rates, ratings, notice, loading));
                    },
                    "Refresh"
                }
            }

            if let Some(msg) = notice.read().as_ref() {
                div { class: "toast toast-error", "{msg}" }
            }

            if *loading.read() {
                div { class: "loading", "Loading requests..." }
            } else if rows.is_empty() {
                div { class: "empty-state", p { "No pickup requests yet." } }
            } else {
                div { class: "order-list",
                    {rows.into_iter().map(|order| {
                        let busy = busy_id.as_ref() == Some(&order.id);
                        let needs_partner = order.status == OrderStatus::Pending
                            || order.status == OrderStatus::Accepted;
                        let pick_value = picks
                            .read()
                            .get(&order.id.0)
                            .cloned()
                            .unwrap_or_default();
                        let estimate_value = estimates
                            .read()
                            .get(&order.id.0)
                            .cloned()
                            .unwrap_or_default();
                        let pick_key = order.id.0.clone();
                        let estimate_key = order.id.0.clone();
                        let assign_order = order.clone();
                        let estimate_order = order.clone();

                        rsx! {
                            div { class: "admin-order-card",
                                key: "{order.id.0}",
                                div { class: "order-card-top",
                                    span { class: "order-id", "#{order.id.short()}" }
                                    span { class: "order-scrap",
                                        "{order.scrap_type.icon()} {order.scrap_type.label()}"
                                    }
                                    StatusBadge { status: order.status }
                                }
                                div { class: "order-card-when",
                                    "{order.pickup_date}, {order.pickup_time}"
                                }
                                div { class: "order-card-address", "{order.address}" }
                                if let Some(weight) = order.weight {
                                    div { class: "order-card-weight", "{weight.label()}" }
                                }
                                if let Some(amount) = order.estimated_amount {
                                    div { class: "order-card-amount",
                                        "est. {format_inr(amount)}"
                                    }
                                }
                                if let Some(amount) = order.final_amount {
                                    div { class: "order-card-amount amount-final",
                                        "{format_inr(amount)}"
                                    }
                                }

                                if needs_partner {
                                    div { class: "admin-actions",
                                        select {
                                            onchange: move |evt| {
                                                picks.write().insert(pick_key.clone(), evt.value());
                                            },
                                            option {
                                                value: "",
                                                selected: pick_value.is_empty(),
                                                "Assign partner..."
                                            }
                                            {partner_options.iter().map(|p| rsx! {
                                                option {
                                                    key: "{p.id.0}",
                                                    value: "{p.id.0}",
                                                    selected: pick_value == p.id.0,
                                                    "{p.name}"
                                                }
                                            })}
                                        }
                                        button {
                                            disabled: busy,
                                            onclick: move |_| assign(assign_order.clone()),
                                            if busy { "Assigning..." } else { "Assign" }
                                        }
                                        input {
                                            r#type: "number",
                                            placeholder: "Estimate (₹)",
                                            value: "{estimate_value}",
                                            oninput: move |evt| {
                                                estimates.write().insert(estimate_key.clone(), evt.value());
                                            },
                                        }
                                        button {
                                            class: "secondary",
                                            disabled: busy,
                                            onclick: move |_| estimate(estimate_order.clone()),
                                            "Save Estimate"
                                        }
                                    }
                                }
                            }
                        }
                    })}
                }
            }

            div { class: "rate-board",
                h2 { "Scrap Rates" }
                div { class: "rate-grid",
                    {ScrapType::all().iter().map(|&scrap| {
                        let current = rate_card.display_rate(scrap);
                        let edit_value = rate_edits
                            .read()
                            .get(scrap.wire_name())
                            .cloned()
                            .unwrap_or_default();
                        rsx! {
                            div { class: "rate-card",
                                key: "{scrap.wire_name()}",
                                span { class: "scrap-icon", "{scrap.icon()}" }
                                span { class: "scrap-label", "{scrap.label()}" }
                                span { class: "rate-current", "{current}" }
                                input {
                                    r#type: "number",
                                    min: "0",
                                    placeholder: "New rate (₹/kg)",
                                    value: "{edit_value}",
                                    oninput: move |evt| {
                                        rate_edits
                                            .write()
                                            .insert(scrap.wire_name().to_string(), evt.value());
                                    },
                                }
                                button {
                                    class: "secondary",
                                    onclick: move |_| save_rate(scrap),
                                    "Save"
                                }
                            }
                        }
                    })}
                }
            }

            div { class: "feedback-board",
                h2 { "Customer Feedback" }
                if feedback.is_empty() {
                    div { class: "empty-state", p { "No feedback yet." } }
                } else {
                    div { class: "feedback-summary",
                        if let Some(avg) = average_stars(&feedback) {
                            span { class: "feedback-average", "★ {avg:.1}" }
                        }
                        span { class: "feedback-total", "{feedback.len()} reviews" }
                        if let Some(share) = positive_share(&feedback) {
                            span { class: "feedback-positive", "{share}% positive" }
                        }
                    }
                    div { class: "feedback-list",
                        {feedback.iter().map(|rating| {
                            let when = rating.created_at.format("%d %b %Y").to_string();
                            let star_row = "★".repeat(usize::from(rating.stars));
                            let caption = stars_label(rating.stars);
                            rsx! {
                                div { class: "feedback-card",
                                    key: "{rating.id}",
                                    div { class: "feedback-top",
                                        span { class: "feedback-order", "#{rating.order_id.short()}" }
                                        span { class: "feedback-stars", "{star_row} {caption}" }
                                        span { class: "feedback-when", "{when}" }
                                    }
                                    if let Some(text) = rating.comment.as_ref() {
                                        p { class: "feedback-comment", "{text}" }
                                    }
                                }
                            }
                        })}
                    }
                }
            }
        }
    }
}

async fn load(
    mut orders: Signal<Vec<Order>>,
    mut partners: Signal<Vec<PartnerProfile>>,
    mut rates: Signal<RateCard>,
    mut ratings: Signal<Vec<OrderRating>>,
    mut notice: Signal<Option<String>>,
    mut loading: Signal<bool>,
) {
    let client = StoreClient::new();
    match client.fetch_all_orders().await {
        Ok(rows) => orders.set(rows),
        Err(e) => {
            tracing::error!("admin order fetch failed: {e}");
            notice.set(Some("Could not load pickup requests".into()));
        }
    }
    match client.fetch_partners().await {
        Ok(rows) => partners.set(rows),
        Err(e) => tracing::warn!("partner list fetch failed: {e}"),
    }
    match client.fetch_rates().await {
        Ok(rows) => rates.write().replace_all(rows),
        Err(e) => tracing::warn!("rate fetch failed: {e}"),
    }
    match client.fetch_ratings().await {
        Ok(rows) => ratings.set(rows),
        Err(e) => tracing::warn!("feedback fetch failed: {e}"),
    }
    loading.set(false);
}
