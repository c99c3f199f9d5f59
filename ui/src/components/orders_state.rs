use dioxus::prelude::*;

use scraplink_common::sync::OrderBook;

/// Store-sourced order state shared across views.
///
/// Fetches replace the book wholesale; realtime change events upsert by id
/// so an event for one order never discards the others.
#[derive(Clone, Debug, Default)]
pub struct OrdersState {
    pub book: OrderBook,
    /// Whether a realtime channel is currently joined.
    pub connected: bool,
    /// Last store/channel error, surfaced as a notice bar.
    pub last_error: Option<String>,
}

impl OrdersState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything tied to the signed-in identity. Called on sign-out
    /// so the next session starts from an empty book.
    pub fn clear(&mut self) {
        self.book = OrderBook::new();
        self.connected = false;
        self.last_error = None;
    }
}

pub fn use_orders_state() -> Signal<OrdersState> {
    use_context::<Signal<OrdersState>>()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use scraplink_common::identity::UserId;
    use scraplink_common::order::{Order, OrderId, OrderStatus};
    use scraplink_common::scrap::ScrapType;

    use super::*;

    fn order(id: &str) -> Order {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        Order {
            id: OrderId(id.into()),
            user_id: UserId("user-1".into()),
            scrap_type: ScrapType::Paper,
            weight: None,
            pickup_date: "2025-03-02".into(),
            pickup_time: "9:00 AM - 11:00 AM".into(),
            address: "12 MG Road".into(),
            latitude: None,
            longitude: None,
            notes: None,
            images: vec![],
            status: OrderStatus::Pending,
            estimated_amount: None,
            final_amount: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn clear_leaves_no_trace_of_the_previous_session() {
        let mut state = OrdersState::new();
        state.book.replace_all(vec![order("a"), order("b")]);
        state.connected = true;
        state.last_error = Some("channel dropped".into());

        state.clear();

        assert!(state.book.is_empty());
        assert!(!state.connected);
        assert!(state.last_error.is_none());
    }
}
