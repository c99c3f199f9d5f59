use dioxus::prelude::*;

use scraplink_common::assignment::{OrderAssignment, PartnerProfile};
use scraplink_common::feedback::{stars_label, OrderRating, RatingDraft};
use scraplink_common::lifecycle::{StepState, TrackingDisplay};
use scraplink_common::money::format_inr;
use scraplink_common::order::{Order, OrderId, OrderStatus};
use scraplink_common::sync::ChangeEvent;

use super::auth_state::use_auth_state;
use super::realtime::{RealtimeChannel, Scope};
use super::status_badge::StatusBadge;
use super::store_client::{StoreClient, StoreError};

/// Live tracking for one order: a fetched snapshot kept current by a
/// realtime channel scoped to this order's row. The channel handle lives in
/// component state so unmounting drops it and closes the socket.
#[component]
pub fn OrderTracking(order_id: String) -> Element {
    let id = OrderId(order_id.clone());
    let mut order = use_signal(|| None::<Result<Order, StoreError>>);
    let mut partner = use_signal(|| None::<(OrderAssignment, PartnerProfile)>);
    let mut channel = use_signal(|| None::<RealtimeChannel>);
    // True while the channel is joined; cleared when the socket drops so
    // the indicator never outlives the connection.
    let mut live = use_signal(|| false);
    // Bumped by the channel callback on every (re)connect. The channel has
    // no replay, so each bump re-fetches the snapshot from the effect
    // below, in scope, covering events missed while disconnected.
    let mut resync = use_signal(|| 0u32);

    {
        let id = id.clone();
        use_hook(move || {
            let event_id = id.clone();
            let opened = RealtimeChannel::open(
                Scope::Order(id),
                move |event| match event {
                    ChangeEvent::Insert(row) | ChangeEvent::Update(row) => {
                        if row.id == event_id {
                            order.set(Some(Ok(row)));
                        }
                    }
                    ChangeEvent::Delete(deleted) => {
                        if deleted == event_id {
                            order.set(Some(Err(StoreError::NotFound)));
                        }
                    }
                },
                move || {
                    live.set(true);
                    resync += 1;
                },
                move || {
                    live.set(false);
                },
            );
            channel.set(opened);
        });
    }

    {
        let id = id.clone();
        use_effect(move || {
            resync();
            spawn(load(id.clone(), order, partner));
        });
    }

    // The partner card appears once an assignment exists; an update event
    // only carries the order row, so re-check on every status change.
    // Completed orders still get the lookup: the card names who fulfilled
    // the pickup.
    {
        let id = id.clone();
        use_effect(move || {
            let assigned = order
                .read()
                .as_ref()
                .is_some_and(|r| r.as_ref().is_ok_and(|o| o.status.expects_assignment()));
            if assigned && partner.read().is_none() {
                let id = id.clone();
                spawn(async move {
                    match StoreClient::new().fetch_assignment(&id).await {
                        Ok(Some(found)) => partner.set(Some(found)),
                        Ok(None) => {}
                        Err(e) => tracing::warn!("assignment lookup failed: {e}"),
                    }
                });
            }
        });
    }

    let live = *live.read();
    let snapshot = order.read().clone();

    match snapshot {
        None => rsx! {
            div { class: "order-tracking",
                div { class: "loading", "Loading order..." }
            }
        },
        Some(Err(StoreError::NotFound)) => rsx! {
            div { class: "order-tracking",
                div { class: "not-found",
                    h2 { "Order not found" }
                    p { "This pickup request does not exist or was removed." }
                }
            }
        },
        Some(Err(e)) => {
            let retry_id = id.clone();
            rsx! {
                div { class: "order-tracking",
                    div { class: "load-error",
                        p { "Could not load this order: {e}" }
                        button {
                            onclick: move |_| {
                                order.set(None);
                                spawn(load(retry_id.clone(), order, partner));
                            },
                            "Retry"
                        }
                    }
                }
            }
        }
        Some(Ok(current)) => rsx! {
            OrderDetails { order: current, partner: partner.read().clone(), live }
        },
    }
}

#[component]
fn OrderDetails(
    order: Order,
    partner: Option<(OrderAssignment, PartnerProfile)>,
    live: bool,
) -> Element {
    rsx! {
        div { class: "order-tracking",
            div { class: "tracking-header",
                h2 { "Order #{order.id.short()}" }
                StatusBadge { status: order.status }
                if live {
                    span { class: "live-dot", "Live" }
                }
            }

            match TrackingDisplay::for_status(order.status) {
                TrackingDisplay::Terminal { label } => rsx! {
                    div { class: "tracking-terminal", "{label}" }
                },
                TrackingDisplay::Progress(steps) => rsx! {
                    div { class: "tracking-steps",
                        {steps.into_iter().map(|step| {
                            let state = match step.state {
                                StepState::Completed => "completed",
                                StepState::Current => "current",
                                StepState::Upcoming => "upcoming",
                            };
                            rsx! {
                                div { class: "tracking-step tracking-step-{state}",
                                    key: "{step.label}",
                                    span { class: "step-icon", "{step.icon}" }
                                    span { class: "step-label", "{step.label}" }
                                }
                            }
                        })}
                    }
                },
            }

            div { class: "order-details",
                h3 { "Pickup Details" }
                div { class: "detail-row",
                    span { "Scrap Type" }
                    span { "{order.scrap_type.icon()} {order.scrap_type.label()}" }
                }
                if let Some(weight) = order.weight {
                    div { class: "detail-row",
                        span { "Weight" }
                        span { "{weight.label()}" }
                    }
                }
                div { class: "detail-row",
                    span { "Scheduled" }
                    span { "{order.pickup_date}, {order.pickup_time}" }
                }
                div { class: "detail-row",
                    span { "Address" }
                    span { "{order.address}" }
                }
                if let Some(notes) = order.notes.as_ref() {
                    div { class: "detail-row",
                        span { "Notes" }
                        span { "{notes}" }
                    }
                }
                if let Some(amount) = order.estimated_amount {
                    div { class: "detail-row",
                        span { "Estimated Amount" }
                        span { class: "amount", "{format_inr(amount)}" }
                    }
                }
                if let Some(amount) = order.final_amount {
                    div { class: "detail-row",
                        span { "Final Amount" }
                        span { class: "amount amount-final", "{format_inr(amount)}" }
                    }
                }
            }

            if !order.images.is_empty() {
                div { class: "order-images",
                    h3 { "Images" }
                    div { class: "image-strip",
                        {order.images.iter().map(|url| rsx! {
                            img { key: "{url}", src: "{url}" }
                        })}
                    }
                }
            }

            if order.status == OrderStatus::Completed {
                RatingPanel { order_id: order.id.clone() }
            }

            if let Some((assignment, profile)) = partner {
                {
                    let since = assignment
                        .accepted_at
                        .map(|t| t.format("%d %b, %H:%M").to_string());
                    rsx! {
                        div { class: "partner-card",
                            h3 { "Your Pickup Partner" }
                            div { class: "partner-name", "{profile.name}" }
                            div { class: "partner-phone", "{profile.phone}" }
                            if let Some(rating) = profile.rating {
                                div { class: "partner-rating", "★ {rating:.1}" }
                            }
                            if let Some(since) = since {
                                div { class: "partner-since", "On the job since {since}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Post-pickup feedback: one star rating with an optional comment, written
/// once. Mounted only on completed orders; shows the stored rating back if
/// one already exists.
#[component]
fn RatingPanel(order_id: OrderId) -> Element {
    let auth = use_auth_state();
    // Outer None = still fetching, inner None = not yet rated.
    let mut existing = use_signal(|| None::<Option<OrderRating>>);
    let mut stars = use_signal(|| 0u8);
    let mut comment = use_signal(String::new);
    let mut submitting = use_signal(|| false);
    let mut notice = use_signal(|| None::<String>);

    {
        let order_id = order_id.clone();
        use_hook(move || {
            spawn(async move {
                match StoreClient::new().fetch_rating(&order_id).await {
                    Ok(found) => existing.set(Some(found)),
                    Err(e) => {
                        tracing::warn!("rating lookup failed: {e}");
                        existing.set(Some(None));
                    }
                }
            });
        });
    }

    let submit = {
        let order_id = order_id.clone();
        move |_| {
            if *submitting.read() {
                return;
            }
            let Some(user_id) = auth.read().session.as_ref().map(|s| s.user_id.clone()) else {
                return;
            };
            let draft = match RatingDraft::new(
                order_id.clone(),
                user_id,
                *stars.read(),
                comment.read().as_str(),
            ) {
                Ok(draft) => draft,
                Err(e) => {
                    notice.set(Some(e.to_string()));
                    return;
                }
            };

            submitting.set(true);
            notice.set(None);
            spawn(async move {
                match StoreClient::new().submit_rating(&draft).await {
                    Ok(stored) => existing.set(Some(Some(stored))),
                    Err(e) => {
                        tracing::error!("rating submit failed: {e}");
                        notice.set(Some("Could not submit your rating".into()));
                    }
                }
                submitting.set(false);
            });
        }
    };

    let picked = *stars.read();
    let busy = *submitting.read();

    match existing.read().clone() {
        None => rsx! {
            div { class: "rating-panel",
                div { class: "loading", "Loading..." }
            }
        },
        Some(Some(rating)) => rsx! {
            div { class: "rating-panel",
                h3 { "Your Rating" }
                div { class: "rating-stars",
                    {(1..=5u8).map(|n| rsx! {
                        span {
                            key: "{n}",
                            class: if n <= rating.stars { "star filled" } else { "star" },
                            "★"
                        }
                    })}
                    span { class: "rating-caption", "{stars_label(rating.stars)}" }
                }
                if let Some(text) = rating.comment.as_ref() {
                    p { class: "rating-comment", "{text}" }
                }
            }
        },
        Some(None) => rsx! {
            div { class: "rating-panel",
                h3 { "Rate this Pickup" }

                if let Some(msg) = notice.read().as_ref() {
                    div { class: "toast toast-error", "{msg}" }
                }

                div { class: "rating-stars",
                    {(1..=5u8).map(|n| rsx! {
                        button {
                            key: "{n}",
                            class: if n <= picked { "star filled" } else { "star" },
                            onclick: move |_| stars.set(n),
                            "★"
                        }
                    })}
                    if picked > 0 {
                        span { class: "rating-caption", "{stars_label(picked)}" }
                    }
                }

                textarea {
                    placeholder: "Tell us how it went (optional)",
                    value: "{comment.read()}",
                    oninput: move |evt| comment.set(evt.value()),
                }

                button {
                    disabled: busy || picked == 0,
                    onclick: submit,
                    if busy { "Submitting..." } else { "Submit Rating" }
                }
            }
        },
    }
}

async fn load(
    id: OrderId,
    mut order: Signal<Option<Result<Order, StoreError>>>,
    mut partner: Signal<Option<(OrderAssignment, PartnerProfile)>>,
) {
    let client = StoreClient::new();
    match client.fetch_order(&id).await {
        Ok(row) => order.set(Some(Ok(row))),
        Err(e) => {
            if !matches!(e, StoreError::NotFound) {
                tracing::error!("order fetch failed: {e}");
            }
            order.set(Some(Err(e)));
            return;
        }
    }
    match client.fetch_assignment(&id).await {
        Ok(Some(found)) => partner.set(Some(found)),
        Ok(None) => {}
        Err(e) => tracing::warn!("assignment lookup failed: {e}"),
    }
}
