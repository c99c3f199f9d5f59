use dioxus::prelude::*;

use scraplink_common::pricing::RateCard;
use scraplink_common::scrap::{ScrapType, WeightBracket, TIME_SLOTS};
use scraplink_common::wizard::{Advance, Retreat, WizardController, WizardStep};

use super::app::Route;
use super::auth_state::use_auth_state;
use super::geo;
use super::progress_steps::ProgressSteps;
use super::store_client::StoreClient;

/// Three-step pickup creation flow. All sequencing and validation lives in
/// [`WizardController`]; this component renders the current step and wires
/// browser facilities (file picker, geolocation) into the form state.
#[component]
pub fn PickupWizard() -> Element {
    let auth = use_auth_state();
    let nav = use_navigator();
    let mut wizard = use_signal(WizardController::new);
    let mut notice = use_signal(|| None::<String>);
    let mut getting_location = use_signal(|| false);
    let mut rates = use_signal(RateCard::new);

    // Current buy rates for the selection cards; the static hints cover
    // the gap until (or if) the fetch lands.
    use_hook(move || {
        spawn(async move {
            match StoreClient::new().fetch_rates().await {
                Ok(rows) => rates.write().replace_all(rows),
                Err(e) => tracing::warn!("rate fetch failed: {e}"),
            }
        });
    });

    let Some(session) = auth.read().session.clone() else {
        return rsx! {};
    };
    let user_id = session.user_id.clone();

    let step = wizard.read().step();
    let submitting = wizard.read().is_submitting();
    let uploading = wizard.read().form.images.uploading();
    let failed_uploads = wizard.read().form.images.failed_count();

    let advance = {
        let user_id = user_id.clone();
        move |_| {
            let outcome = wizard.write().next(&user_id);
            match outcome {
                Advance::Moved(_) => notice.set(None),
                Advance::Rejected(e) => notice.set(Some(e.to_string())),
                Advance::Busy => {}
                Advance::Submit(draft) => {
                    notice.set(None);
                    spawn(async move {
                        match StoreClient::new().insert_order(&draft).await {
                            Ok(order) => {
                                nav.push(Route::Tracking { id: order.id.0 });
                            }
                            Err(e) => {
                                tracing::error!("create order failed: {e}");
                                wizard.write().submission_failed();
                                notice.set(Some("Failed to create pickup request".into()));
                            }
                        }
                    });
                }
            }
        }
    };

    let retreat = move |_| {
        if wizard.write().back() == Retreat::Leave {
            nav.push(Route::Home {});
        }
    };

    let upload_images = {
        let user_id = user_id.clone();
        move |evt: FormEvent| {
            for file in evt.files() {
                // Reserve the slot at selection time so display order
                // matches selection order whatever order uploads finish in.
                let slot = wizard.write().form.images.reserve();
                let user_id = user_id.clone();
                spawn(async move {
                    let name = file.name();
                    match file.read_bytes().await {
                        Ok(bytes) => {
                            match StoreClient::new()
                                .upload_image(&user_id, &name, bytes.to_vec())
                                .await
                            {
                                Ok(url) => wizard.write().form.images.fulfill(slot, url),
                                Err(e) => {
                                    tracing::error!("image upload failed: {e}");
                                    wizard.write().form.images.fail(slot);
                                }
                            }
                        }
                        Err(e) => {
                            tracing::error!("could not read selected file: {e:?}");
                            wizard.write().form.images.fail(slot);
                        }
                    }
                });
            }
        }
    };

    let detect_location = move |_| {
        if *getting_location.read() {
            return;
        }
        getting_location.set(true);
        spawn(async move {
            match geo::current_position().await {
                Ok(location) => {
                    {
                        let mut w = wizard.write();
                        w.form.latitude = Some(location.latitude);
                        w.form.longitude = Some(location.longitude);
                    }
                    if let Some(address) = geo::reverse_geocode(&location).await {
                        wizard.write().form.address = address;
                    }
                    notice.set(Some("Location detected".into()));
                }
                Err(e) => {
                    tracing::warn!("geolocation failed: {e}");
                    // Address stays manually editable as the fallback.
                    notice.set(Some(e.to_string()));
                }
            }
            getting_location.set(false);
        });
    };

    rsx! {
        div { class: "pickup-wizard",
            h2 { "Create Pickup Request" }
            ProgressSteps { current: step }

            if let Some(msg) = notice.read().as_ref() {
                div { class: "toast", "{msg}" }
            }
            if failed_uploads > 0 {
                div { class: "toast toast-error",
                    "{failed_uploads} image(s) failed to upload"
                }
            }

            match step {
                WizardStep::ScrapDetails => rsx! {
                    ScrapDetailsStep {
                        wizard,
                        rates: rates.read().clone(),
                        upload_busy: uploading,
                        on_files: upload_images,
                    }
                },
                WizardStep::Schedule => rsx! {
                    ScheduleStep { wizard }
                },
                WizardStep::Location => rsx! {
                    LocationStep { wizard, getting_location: *getting_location.read(), on_detect: detect_location }
                },
            }

            div { class: "wizard-nav",
                button {
                    class: "secondary",
                    onclick: retreat,
                    "Back"
                }
                button {
                    // Submission snapshots the image URLs, so it stays
                    // locked until every upload has settled.
                    disabled: submitting || (step == WizardStep::Location && uploading),
                    onclick: advance,
                    if submitting {
                        "Submitting..."
                    } else if step == WizardStep::Location && uploading {
                        "Uploading images..."
                    } else if step == WizardStep::Location {
                        "Submit Request"
                    } else {
                        "Continue"
                    }
                }
            }
        }
    }
}

#[component]
fn ScrapDetailsStep(
    wizard: Signal<WizardController>,
    rates: RateCard,
    upload_busy: bool,
    on_files: EventHandler<FormEvent>,
) -> Element {
    let selected_type = wizard.read().form.scrap_type;
    let selected_weight = wizard.read().form.weight;
    let previews = wizard.read().form.images.uploaded();

    rsx! {
        div { class: "wizard-step",
            div { class: "form-group",
                label { "Select Scrap Type" }
                div { class: "scrap-grid",
                    {ScrapType::all().iter().map(|&scrap| {
                        let active = selected_type == Some(scrap);
                        let rate = rates.display_rate(scrap);
                        rsx! {
                            button {
                                key: "{scrap.label()}",
                                class: if active { "scrap-card selected" } else { "scrap-card" },
                                onclick: move |_| wizard.write().form.scrap_type = Some(scrap),
                                span { class: "scrap-icon", "{scrap.icon()}" }
                                span { class: "scrap-label", "{scrap.label()}" }
                                span { class: "scrap-rate", "{rate}" }
                            }
                        }
                    })}
                }
            }

            div { class: "form-group",
                label { "Approximate Weight" }
                {WeightBracket::all().iter().map(|&bracket| {
                    let active = selected_weight == Some(bracket);
                    rsx! {
                        button {
                            key: "{bracket.label()}",
                            class: if active { "weight-option selected" } else { "weight-option" },
                            onclick: move |_| wizard.write().form.weight = Some(bracket),
                            "{bracket.label()}"
                            if active { span { class: "check", "✓" } }
                        }
                    }
                })}
            }

            div { class: "form-group",
                label { "Upload Scrap Images (Optional)" }
                div { class: "image-strip",
                    {previews.into_iter().map(|(slot, url)| {
                        rsx! {
                            div { class: "image-preview",
                                key: "{slot}",
                                img { src: "{url}" }
                                button {
                                    class: "remove-image",
                                    onclick: move |_| wizard.write().form.images.remove(slot),
                                    "×"
                                }
                            }
                        }
                    })}
                    label { class: "image-add",
                        if upload_busy { "Uploading..." } else { "+ Add" }
                        input {
                            r#type: "file",
                            accept: "image/*",
                            multiple: true,
                            disabled: upload_busy,
                            onchange: move |evt| on_files.call(evt),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ScheduleStep(wizard: Signal<WizardController>) -> Element {
    let pickup_date = wizard.read().form.pickup_date.clone();
    let pickup_time = wizard.read().form.pickup_time.clone();
    // Earliest selectable pickup is tomorrow.
    let min_date = (chrono::Utc::now() + chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();

    rsx! {
        div { class: "wizard-step",
            div { class: "form-group",
                label { "Select Pickup Date" }
                input {
                    r#type: "date",
                    min: "{min_date}",
                    value: "{pickup_date}",
                    oninput: move |evt| wizard.write().form.pickup_date = evt.value(),
                }
            }

            div { class: "form-group",
                label { "Select Time Slot" }
                div { class: "slot-grid",
                    {TIME_SLOTS.iter().map(|&slot| {
                        let active = pickup_time == slot;
                        rsx! {
                            button {
                                key: "{slot}",
                                class: if active { "time-slot selected" } else { "time-slot" },
                                onclick: move |_| wizard.write().form.pickup_time = slot.to_string(),
                                "{slot}"
                            }
                        }
                    })}
                }
            }
        }
    }
}

#[component]
fn LocationStep(
    wizard: Signal<WizardController>,
    getting_location: bool,
    on_detect: EventHandler<MouseEvent>,
) -> Element {
    let address = wizard.read().form.address.clone();
    let notes = wizard.read().form.notes.clone();
    let summary = summary_lines(&wizard.read());

    rsx! {
        div { class: "wizard-step",
            button {
                class: "detect-location",
                disabled: getting_location,
                onclick: move |evt| on_detect.call(evt),
                if getting_location { "Detecting..." } else { "Use Current Location" }
            }

            div { class: "form-group",
                label { "Pickup Address" }
                textarea {
                    placeholder: "Enter your complete pickup address...",
                    value: "{address}",
                    oninput: move |evt| wizard.write().form.address = evt.value(),
                }
            }

            div { class: "form-group",
                label { "Additional Notes (Optional)" }
                textarea {
                    placeholder: "Any special instructions...",
                    value: "{notes}",
                    oninput: move |evt| wizard.write().form.notes = evt.value(),
                }
            }

            div { class: "order-summary",
                h3 { "Order Summary" }
                {summary.into_iter().map(|(name, value)| rsx! {
                    div { class: "summary-row",
                        key: "{name}",
                        span { class: "summary-label", "{name}" }
                        span { class: "summary-value", "{value}" }
                    }
                })}
            }
        }
    }
}

fn summary_lines(wizard: &WizardController) -> Vec<(&'static str, String)> {
    let form = &wizard.form;
    let mut lines = Vec::new();
    if let Some(scrap) = form.scrap_type {
        lines.push(("Scrap Type", scrap.label().to_string()));
    }
    if let Some(weight) = form.weight {
        lines.push(("Weight", weight.label().to_string()));
    }
    if !form.pickup_date.is_empty() {
        lines.push(("Date", form.pickup_date.clone()));
    }
    if !form.pickup_time.is_empty() {
        lines.push(("Time", form.pickup_time.clone()));
    }
    lines
}
