//! Customer feedback on completed pickups.
//!
//! A rating is one star value 1..=5 with an optional comment, written
//! once per order after completion. Admins read the full list; the
//! average feeds the partner contact card.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::order::OrderId;

/// Stored rating row for one completed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRating {
    pub id: String,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub stars: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingError {
    OutOfRange,
}

impl fmt::Display for RatingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingError::OutOfRange => f.write_str("Please select a rating"),
        }
    }
}

impl std::error::Error for RatingError {}

/// Insert payload for a new rating. Only constructible through
/// [`RatingDraft::new`], which enforces the star range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingDraft {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub stars: u8,
    pub comment: Option<String>,
}

impl RatingDraft {
    pub fn new(
        order_id: OrderId,
        user_id: UserId,
        stars: u8,
        comment: &str,
    ) -> Result<RatingDraft, RatingError> {
        if !(1..=5).contains(&stars) {
            return Err(RatingError::OutOfRange);
        }
        let comment = comment.trim();
        Ok(RatingDraft {
            order_id,
            user_id,
            stars,
            comment: if comment.is_empty() {
                None
            } else {
                Some(comment.to_string())
            },
        })
    }
}

/// One-word caption shown next to the star picker.
pub fn stars_label(stars: u8) -> &'static str {
    match stars {
        1 => "Poor",
        2 => "Fair",
        3 => "Good",
        4 => "Very Good",
        5 => "Excellent",
        _ => "",
    }
}

/// Mean star value across all feedback, for the admin summary header.
pub fn average_stars(ratings: &[OrderRating]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let total: u32 = ratings.iter().map(|r| u32::from(r.stars)).sum();
    Some(f64::from(total) / ratings.len() as f64)
}

/// Share of feedback at 4 stars or more, as a whole percentage.
pub fn positive_share(ratings: &[OrderRating]) -> Option<u32> {
    if ratings.is_empty() {
        return None;
    }
    let positive = ratings.iter().filter(|r| r.stars >= 4).count();
    Some((positive * 100 / ratings.len()) as u32)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ids() -> (OrderId, UserId) {
        (OrderId("order-1".into()), UserId("user-1".into()))
    }

    fn stored(stars: u8) -> OrderRating {
        let (order_id, user_id) = ids();
        OrderRating {
            id: format!("r-{stars}"),
            order_id,
            user_id,
            stars,
            comment: None,
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn stars_outside_one_to_five_are_refused() {
        let (order_id, user_id) = ids();
        assert_eq!(
            RatingDraft::new(order_id.clone(), user_id.clone(), 0, ""),
            Err(RatingError::OutOfRange)
        );
        assert_eq!(
            RatingDraft::new(order_id, user_id, 6, ""),
            Err(RatingError::OutOfRange)
        );
    }

    #[test]
    fn comment_is_trimmed_and_empty_becomes_none() {
        let (order_id, user_id) = ids();
        let draft =
            RatingDraft::new(order_id.clone(), user_id.clone(), 5, "  great service  ")
                .expect("valid draft");
        assert_eq!(draft.comment.as_deref(), Some("great service"));

        let draft = RatingDraft::new(order_id, user_id, 4, "   ").expect("valid draft");
        assert!(draft.comment.is_none());
    }

    #[test]
    fn every_valid_star_count_has_a_caption() {
        for stars in 1..=5 {
            assert!(!stars_label(stars).is_empty());
        }
        assert!(stars_label(0).is_empty());
    }

    #[test]
    fn average_over_all_feedback() {
        assert_eq!(average_stars(&[]), None);
        let avg = average_stars(&[stored(5), stored(4), stored(3)]).expect("non-empty");
        assert!((avg - 4.0).abs() < 1e-9);
    }

    #[test]
    fn positive_share_counts_four_stars_and_up() {
        assert_eq!(positive_share(&[]), None);
        assert_eq!(
            positive_share(&[stored(5), stored(4), stored(2), stored(1)]),
            Some(50)
        );
    }
}
