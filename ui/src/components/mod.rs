pub mod admin_dashboard;
pub mod app;
pub mod auth_state;
pub mod geo;
pub mod my_orders;
pub mod order_tracking;
pub mod orders_state;
pub mod partner_dashboard;
pub mod pickup_wizard;
pub mod progress_steps;
pub mod realtime;
pub mod sign_in;
pub mod status_badge;
pub mod store_client;
