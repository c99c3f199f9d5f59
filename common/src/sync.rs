//! Local mirror of store rows fed by fetches and realtime change events.
//!
//! The channel gives no replay guarantee: a view that reconnects must
//! re-fetch and replace its rows. Events carry the whole changed record,
//! so application is a keyed upsert, never a field-level merge.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::order::{Order, OrderId};

/// One change notification for the `orders` table, decoded from the
/// realtime channel envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    Insert(Order),
    Update(Order),
    Delete(OrderId),
}

#[derive(Deserialize)]
struct ChangePayload {
    #[serde(rename = "eventType")]
    event_type: String,
    #[serde(rename = "new")]
    new_record: Option<Order>,
    #[serde(rename = "old")]
    old_record: Option<DeletedRow>,
}

#[derive(Deserialize)]
struct DeletedRow {
    id: OrderId,
}

impl ChangeEvent {
    /// Decode one channel payload. Unknown event kinds and malformed
    /// records yield None; the subscriber logs and skips them.
    pub fn parse(payload: &str) -> Option<ChangeEvent> {
        let payload: ChangePayload = serde_json::from_str(payload).ok()?;
        match payload.event_type.as_str() {
            "INSERT" => payload.new_record.map(ChangeEvent::Insert),
            "UPDATE" => payload.new_record.map(ChangeEvent::Update),
            "DELETE" => payload.old_record.map(|row| ChangeEvent::Delete(row.id)),
            _ => None,
        }
    }

    pub fn order_id(&self) -> &OrderId {
        match self {
            ChangeEvent::Insert(o) | ChangeEvent::Update(o) => &o.id,
            ChangeEvent::Delete(id) => id,
        }
    }
}

/// Orders keyed by id with creation-time-descending iteration.
///
/// Events upsert by id instead of replacing the whole list, so an event
/// for one order never discards local state for the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBook {
    orders: BTreeMap<OrderId, Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Replace the whole book with a fetched snapshot. Used on initial
    /// load and after a reconnect, when missed events cannot be replayed.
    pub fn replace_all(&mut self, orders: impl IntoIterator<Item = Order>) {
        self.orders = orders.into_iter().map(|o| (o.id.clone(), o)).collect();
    }

    /// Insert or wholesale-replace one record.
    pub fn upsert(&mut self, order: Order) {
        self.orders.insert(order.id.clone(), order);
    }

    pub fn remove(&mut self, id: &OrderId) -> Option<Order> {
        self.orders.remove(id)
    }

    /// Apply one realtime change event.
    pub fn apply(&mut self, event: ChangeEvent) {
        match event {
            ChangeEvent::Insert(order) | ChangeEvent::Update(order) => self.upsert(order),
            ChangeEvent::Delete(id) => {
                self.orders.remove(&id);
            }
        }
    }

    /// Orders newest-first, matching the store's fetch ordering.
    pub fn newest_first(&self) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.values().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::identity::UserId;
    use crate::order::OrderStatus;
    use crate::scrap::ScrapType;

    fn order(id: &str, day: u32, status: OrderStatus) -> Order {
        let created = Utc.with_ymd_and_hms(2025, 3, day, 10, 0, 0).unwrap();
        Order {
            id: OrderId(id.into()),
            user_id: UserId("user-1".into()),
            scrap_type: ScrapType::Paper,
            weight: None,
            pickup_date: "2025-03-10".into(),
            pickup_time: "9:00 AM - 11:00 AM".into(),
            address: "12 Example Rd".into(),
            latitude: None,
            longitude: None,
            notes: None,
            images: Vec::new(),
            status,
            estimated_amount: None,
            final_amount: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn upsert_replaces_record_wholesale() {
        let mut book = OrderBook::new();
        book.upsert(order("a", 1, OrderStatus::Pending));
        book.upsert(order("a", 1, OrderStatus::Accepted));
        assert_eq!(book.len(), 1);
        assert_eq!(
            book.get(&OrderId("a".into())).unwrap().status,
            OrderStatus::Accepted
        );
    }

    #[test]
    fn event_for_one_order_keeps_the_others() {
        let mut book = OrderBook::new();
        book.replace_all([order("a", 1, OrderStatus::Pending), order("b", 2, OrderStatus::Pending)]);
        book.apply(ChangeEvent::Update(order("b", 2, OrderStatus::OnTheWay)));
        assert_eq!(book.len(), 2);
        assert_eq!(
            book.get(&OrderId("a".into())).unwrap().status,
            OrderStatus::Pending
        );
    }

    #[test]
    fn iteration_is_newest_first() {
        let mut book = OrderBook::new();
        book.replace_all([
            order("old", 1, OrderStatus::Pending),
            order("new", 9, OrderStatus::Pending),
            order("mid", 5, OrderStatus::Pending),
        ]);
        let ids: Vec<&str> = book.newest_first().iter().map(|o| o.id.0.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn replace_all_drops_stale_rows() {
        let mut book = OrderBook::new();
        book.upsert(order("stale", 1, OrderStatus::Pending));
        book.replace_all([order("fresh", 2, OrderStatus::Pending)]);
        assert!(book.get(&OrderId("stale".into())).is_none());
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn parses_update_event() {
        let payload = serde_json::json!({
            "eventType": "UPDATE",
            "new": serde_json::to_value(order("a", 1, OrderStatus::OnTheWay)).unwrap(),
        })
        .to_string();
        let event = ChangeEvent::parse(&payload).expect("parse");
        assert!(matches!(
            event,
            ChangeEvent::Update(ref o) if o.status == OrderStatus::OnTheWay
        ));
    }

    #[test]
    fn parses_delete_event_from_old_row() {
        let payload = r#"{"eventType":"DELETE","old":{"id":"gone"}}"#;
        assert_eq!(
            ChangeEvent::parse(payload),
            Some(ChangeEvent::Delete(OrderId("gone".into())))
        );
    }

    #[test]
    fn unknown_event_kind_is_skipped() {
        assert_eq!(ChangeEvent::parse(r#"{"eventType":"TRUNCATE"}"#), None);
        assert_eq!(ChangeEvent::parse("not json"), None);
    }
}
