use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::OrderId;

/// Opaque pickup-partner identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartnerId(pub String);

/// Row in the `order_assignments` table linking an order to the partner
/// fulfilling it. Read-only joined display data in this layer; assignment
/// itself is a manual admin action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAssignment {
    pub id: String,
    pub order_id: OrderId,
    pub partner_id: PartnerId,
    pub accepted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Partner contact card shown alongside an assigned order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerProfile {
    pub id: PartnerId,
    pub name: String,
    pub phone: String,
    /// Average feedback rating, 0.0 - 5.0.
    pub rating: Option<f64>,
}

/// Insert payload for a manual admin assignment.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentDraft {
    pub order_id: OrderId,
    pub partner_id: PartnerId,
}
