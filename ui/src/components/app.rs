use dioxus::prelude::*;

use scraplink_common::identity::Role;

use super::admin_dashboard::AdminDashboard;
use super::auth_state::{use_auth_state, AuthState};
use super::my_orders::MyOrders;
use super::order_tracking::OrderTracking;
use super::orders_state::{use_orders_state, OrdersState};
use super::partner_dashboard::PartnerDashboard;
use super::pickup_wizard::PickupWizard;
use super::sign_in::SignInScreen;

#[derive(Clone, Debug, PartialEq, Routable)]
pub enum Route {
    #[layout(AppLayout)]
    #[route("/")]
    Home {},
    #[route("/pickup/new")]
    NewPickup {},
    #[route("/orders")]
    Orders {},
    #[route("/orders/:id")]
    Tracking { id: String },
    #[route("/partner")]
    Partner {},
    #[route("/admin")]
    Admin {},
    #[end_layout]
    #[route("/signin")]
    SignIn {},
}

#[component]
pub fn App() -> Element {
    use_context_provider(|| Signal::new(AuthState::new()));
    use_context_provider(|| Signal::new(OrdersState::new()));

    rsx! { Router::<Route> {} }
}

#[component]
fn AppLayout() -> Element {
    let mut auth = use_auth_state();
    let mut orders = use_orders_state();
    let nav = use_navigator();

    // Every routed view requires a session.
    let Some(session) = auth.read().session.clone() else {
        nav.replace(Route::SignIn {});
        return rsx! {};
    };

    let role = session.role;
    let who = session
        .display_name
        .clone()
        .unwrap_or_else(|| session.phone.clone());

    rsx! {
        div { class: "scraplink-app",
            header { class: "app-header",
                div { class: "header-top",
                    h1 { "ScrapLink" }
                    div { class: "user-info",
                        span { class: "user-name", "{who}" }
                        span { class: "user-role", " - {role.label()}" }
                    }
                }
                nav {
                    if role == Role::Customer {
                        button {
                            onclick: move |_| { nav.push(Route::NewPickup {}); },
                            "Schedule Pickup"
                        }
                        button {
                            onclick: move |_| { nav.push(Route::Orders {}); },
                            "My Orders"
                        }
                    }
                    if role == Role::Partner {
                        button {
                            onclick: move |_| { nav.push(Route::Partner {}); },
                            "My Pickups"
                        }
                    }
                    if role == Role::Admin {
                        button {
                            onclick: move |_| { nav.push(Route::Admin {}); },
                            "All Requests"
                        }
                    }
                    button {
                        class: "sign-out",
                        onclick: move |_| {
                            auth.write().sign_out();
                            // The shared book belongs to the old identity;
                            // the next sign-in starts empty.
                            orders.write().clear();
                            nav.replace(Route::SignIn {});
                        },
                        "Sign Out"
                    }
                }
            }
            main {
                Outlet::<Route> {}
            }
        }
    }
}

/// Route component: role-appropriate landing view.
#[component]
fn Home() -> Element {
    let auth = use_auth_state();
    let role = auth.read().session.as_ref().map(|s| s.role);

    match role {
        Some(Role::Partner) => rsx! { PartnerDashboard {} },
        Some(Role::Admin) => rsx! { AdminDashboard {} },
        _ => rsx! { MyOrders {} },
    }
}

/// Route component: the three-step pickup creation wizard.
#[component]
fn NewPickup() -> Element {
    rsx! { PickupWizard {} }
}

/// Route component: the customer's order list.
#[component]
fn Orders() -> Element {
    rsx! { MyOrders {} }
}

/// Route component: live tracking for one order.
#[component]
fn Tracking(id: String) -> Element {
    rsx! { OrderTracking { order_id: id } }
}

/// Route component: partner pickups, gated on role.
#[component]
fn Partner() -> Element {
    let auth = use_auth_state();
    let is_partner = auth
        .read()
        .session
        .as_ref()
        .is_some_and(|s| s.is_partner());

    if is_partner {
        rsx! { PartnerDashboard {} }
    } else {
        rsx! { MyOrders {} }
    }
}

/// Route component: admin listing, gated on role.
#[component]
fn Admin() -> Element {
    let auth = use_auth_state();
    let is_admin = auth.read().session.as_ref().is_some_and(|s| s.is_admin());

    if is_admin {
        rsx! { AdminDashboard {} }
    } else {
        rsx! { MyOrders {} }
    }
}

#[component]
fn SignIn() -> Element {
    rsx! { SignInScreen {} }
}
