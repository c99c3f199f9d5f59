use dioxus::prelude::*;

use scraplink_common::identity::Role;

use super::app::Route;
use super::auth_state::use_auth_state;
use super::store_client::StoreClient;

/// Phone sign-in populating the auth context. Session issuance itself is
/// the backend's job; this screen only exchanges a phone number for the
/// authenticated identity.
#[component]
pub fn SignInScreen() -> Element {
    let mut auth = use_auth_state();
    let nav = use_navigator();
    let mut phone_input = use_signal(String::new);
    let mut role_input = use_signal(|| Role::Customer);
    let mut error_msg = use_signal(|| None::<String>);
    let mut pending = use_signal(|| false);

    let can_submit = use_memo(move || {
        let digits = phone_input.read().chars().filter(|c| c.is_ascii_digit()).count();
        digits >= 10 && !*pending.read()
    });

    let submit = move |_| {
        let phone = phone_input.read().trim().to_string();
        let role = *role_input.read();
        if phone.is_empty() || *pending.read() {
            return;
        }
        pending.set(true);
        error_msg.set(None);

        spawn(async move {
            match StoreClient::new().sign_in(&phone, role).await {
                Ok(session) => {
                    auth.write().sign_in(session);
                    nav.replace(Route::Home {});
                }
                Err(e) => {
                    tracing::error!("sign-in failed: {e}");
                    error_msg.set(Some("Sign-in failed, please try again".into()));
                }
            }
            pending.set(false);
        });
    };

    rsx! {
        div { class: "scraplink-app",
            div { class: "sign-in",
                h1 { "ScrapLink" }
                p { "Doorstep scrap pickups, tracked live" }

                div { class: "form-group",
                    label { "Phone number:" }
                    input {
                        r#type: "tel",
                        placeholder: "e.g. 98765 43210",
                        value: "{phone_input}",
                        oninput: move |evt| phone_input.set(evt.value()),
                    }
                }

                div { class: "form-group",
                    label { "I am a:" }
                    select {
                        onchange: move |evt| {
                            let role = match evt.value().as_str() {
                                "partner" => Role::Partner,
                                "admin" => Role::Admin,
                                _ => Role::Customer,
                            };
                            role_input.set(role);
                        },
                        option { value: "customer", "Customer" }
                        option { value: "partner", "Pickup Partner" }
                        option { value: "admin", "Admin" }
                    }
                }

                if let Some(err) = error_msg.read().as_ref() {
                    span { class: "field-error", "{err}" }
                }

                button {
                    disabled: !can_submit(),
                    onclick: submit,
                    if *pending.read() { "Signing in..." } else { "Continue" }
                }
            }
        }
    }
}
