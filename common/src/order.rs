use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::scrap::{ScrapType, WeightBracket};

/// Unique order identifier, assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    /// Short uppercase form for display, e.g. "Order #3F9A21B0".
    pub fn short(&self) -> String {
        self.0.chars().take(8).collect::<String>().to_uppercase()
    }
}

/// Order lifecycle status as written by the backend.
///
/// The wire vocabulary is closed, but the store column is a plain string;
/// anything outside the known set deserializes as `Unknown` so a stray
/// value can never fail a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Assigned,
    OnTheWay,
    AtLocation,
    PickedUp,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Human-readable badge label. Total over all variants.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::Assigned => "Assigned",
            OrderStatus::OnTheWay => "On the Way",
            OrderStatus::AtLocation => "At Location",
            OrderStatus::PickedUp => "Picked Up",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
            // Unknown degrades to the pending presentation.
            OrderStatus::Unknown => "Pending",
        }
    }

    /// CSS class for the status badge. Total over all variants.
    pub fn css_class(self) -> &'static str {
        match self {
            OrderStatus::Pending | OrderStatus::Unknown => "badge badge-warning",
            OrderStatus::Accepted | OrderStatus::Assigned => "badge badge-accent",
            OrderStatus::OnTheWay | OrderStatus::AtLocation => "badge badge-primary",
            OrderStatus::PickedUp | OrderStatus::Completed => "badge badge-success",
            OrderStatus::Cancelled => "badge badge-destructive",
        }
    }

    /// Terminal states never progress further.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// An order still counts as active for list filters until it completes
    /// or is cancelled.
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// Statuses from manual assignment onward, where an assignment row
    /// (and its partner contact card) exists for the order. Includes
    /// `completed`: a finished pickup still shows who fulfilled it.
    pub fn expects_assignment(self) -> bool {
        matches!(
            self,
            OrderStatus::Assigned
                | OrderStatus::OnTheWay
                | OrderStatus::AtLocation
                | OrderStatus::PickedUp
                | OrderStatus::Completed
        )
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

/// One scrap-pickup request as stored in the `orders` table.
///
/// All mutation happens in the backend; this layer only inserts new orders
/// and re-reads rows. `images` preserves upload order as display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub scrap_type: ScrapType,
    pub weight: Option<WeightBracket>,
    pub pickup_date: String,
    pub pickup_time: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: OrderStatus,
    pub estimated_amount: Option<f64>,
    pub final_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new order. The store assigns id and timestamps;
/// status is always written as the initial `pending` state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub user_id: UserId,
    pub scrap_type: ScrapType,
    pub weight: Option<WeightBracket>,
    pub pickup_date: String,
    pub pickup_time: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    pub images: Vec<String>,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_metadata_is_total() {
        let all = [
            OrderStatus::Pending,
            OrderStatus::Accepted,
            OrderStatus::Assigned,
            OrderStatus::OnTheWay,
            OrderStatus::AtLocation,
            OrderStatus::PickedUp,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
            OrderStatus::Unknown,
        ];
        for status in all {
            assert!(!status.label().is_empty());
            assert!(status.css_class().starts_with("badge "));
        }
    }

    #[test]
    fn unknown_status_degrades_to_pending_presentation() {
        assert_eq!(OrderStatus::Unknown.label(), OrderStatus::Pending.label());
        assert_eq!(
            OrderStatus::Unknown.css_class(),
            OrderStatus::Pending.css_class()
        );
    }

    #[test]
    fn out_of_vocabulary_string_deserializes_as_unknown() {
        let status: OrderStatus = serde_json::from_str("\"paused_for_weather\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown);
    }

    #[test]
    fn wire_names_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OnTheWay).unwrap(),
            "\"on_the_way\""
        );
        let status: OrderStatus = serde_json::from_str("\"picked_up\"").unwrap();
        assert_eq!(status, OrderStatus::PickedUp);
    }

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::OnTheWay.is_terminal());
        assert!(OrderStatus::Pending.is_active());
    }

    #[test]
    fn assignment_expected_from_assigned_through_completed() {
        assert!(OrderStatus::Assigned.expects_assignment());
        assert!(OrderStatus::OnTheWay.expects_assignment());
        assert!(OrderStatus::Completed.expects_assignment());
        assert!(!OrderStatus::Pending.expects_assignment());
        assert!(!OrderStatus::Cancelled.expects_assignment());
        assert!(!OrderStatus::Unknown.expects_assignment());
    }

    #[test]
    fn short_id_is_uppercased_prefix() {
        let id = OrderId("3f9a21b0-dead-beef".into());
        assert_eq!(id.short(), "3F9A21B0");
    }
}
