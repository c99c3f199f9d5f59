//! Maps an order's current status onto the fixed linear pickup track.
//!
//! The track is the happy path only. Statuses that do not appear on it
//! (cancelled, the intermediate partner statuses, unknown values) leave
//! every step upcoming; the tracking view renders terminal states through
//! a separate branch instead of the index comparison.

use serde::{Deserialize, Serialize};

use crate::order::OrderStatus;

/// The canonical linear progression shown by the tracking view.
pub const CANONICAL_TRACK: [OrderStatus; 4] = [
    OrderStatus::Pending,
    OrderStatus::Accepted,
    OrderStatus::OnTheWay,
    OrderStatus::Completed,
];

/// Display state of one step on the progress tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepState {
    Completed,
    Current,
    Upcoming,
}

/// One rendered entry of the progress tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleStep {
    pub status: OrderStatus,
    pub label: &'static str,
    pub icon: &'static str,
    pub state: StepState,
}

fn step_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Request Placed",
        OrderStatus::Accepted => "Accepted",
        OrderStatus::OnTheWay => "On the Way",
        OrderStatus::Completed => "Completed",
        other => other.label(),
    }
}

fn step_icon(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "package",
        OrderStatus::Accepted => "check-circle",
        OrderStatus::OnTheWay => "truck",
        OrderStatus::Completed => "check-circle",
        _ => "circle",
    }
}

/// Position of `status` on the canonical track, if it lies on it.
pub fn track_index(status: OrderStatus) -> Option<usize> {
    CANONICAL_TRACK.iter().position(|s| *s == status)
}

/// Classify every canonical step against the current status.
///
/// Steps strictly before the current index are completed, the current
/// index is current, everything after is upcoming. A status off the track
/// yields all steps upcoming rather than an error.
pub fn lifecycle_steps(current: OrderStatus) -> Vec<LifecycleStep> {
    let current_index = track_index(current);
    CANONICAL_TRACK
        .iter()
        .enumerate()
        .map(|(i, &status)| {
            let state = match current_index {
                Some(c) if i < c => StepState::Completed,
                Some(c) if i == c => StepState::Current,
                _ => StepState::Upcoming,
            };
            LifecycleStep {
                status,
                label: step_label(status),
                icon: step_icon(status),
                state,
            }
        })
        .collect()
}

/// What the tracking view should render for a given status.
///
/// Cancellation does not fit the linear tracker; it short-circuits into a
/// terminal notice instead of showing four upcoming steps.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingDisplay {
    /// Render the linear progress tracker.
    Progress(Vec<LifecycleStep>),
    /// Render a terminal notice (currently only cancellation).
    Terminal { label: &'static str },
}

impl TrackingDisplay {
    pub fn for_status(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Cancelled => TrackingDisplay::Terminal {
                label: "This pickup was cancelled",
            },
            other => TrackingDisplay::Progress(lifecycle_steps(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(current: OrderStatus) -> Vec<StepState> {
        lifecycle_steps(current).into_iter().map(|s| s.state).collect()
    }

    #[test]
    fn on_the_way_splits_track() {
        assert_eq!(
            states(OrderStatus::OnTheWay),
            vec![
                StepState::Completed,
                StepState::Completed,
                StepState::Current,
                StepState::Upcoming,
            ]
        );
    }

    #[test]
    fn pending_is_first_current() {
        assert_eq!(
            states(OrderStatus::Pending),
            vec![
                StepState::Current,
                StepState::Upcoming,
                StepState::Upcoming,
                StepState::Upcoming,
            ]
        );
    }

    #[test]
    fn completed_finishes_track() {
        assert_eq!(
            states(OrderStatus::Completed),
            vec![
                StepState::Completed,
                StepState::Completed,
                StepState::Completed,
                StepState::Current,
            ]
        );
    }

    #[test]
    fn off_track_status_leaves_every_step_upcoming() {
        for status in [
            OrderStatus::Cancelled,
            OrderStatus::Assigned,
            OrderStatus::AtLocation,
            OrderStatus::PickedUp,
            OrderStatus::Unknown,
        ] {
            assert_eq!(states(status), vec![StepState::Upcoming; 4], "{status:?}");
        }
    }

    #[test]
    fn classification_is_strict_index_comparison() {
        for (i, &current) in CANONICAL_TRACK.iter().enumerate() {
            for (j, step) in lifecycle_steps(current).into_iter().enumerate() {
                let expected = if j < i {
                    StepState::Completed
                } else if j == i {
                    StepState::Current
                } else {
                    StepState::Upcoming
                };
                assert_eq!(step.state, expected);
            }
        }
    }

    #[test]
    fn cancelled_renders_terminal_branch() {
        match TrackingDisplay::for_status(OrderStatus::Cancelled) {
            TrackingDisplay::Terminal { label } => {
                assert!(label.contains("cancelled"));
            }
            other => panic!("expected terminal branch, got {other:?}"),
        }
    }

    #[test]
    fn active_statuses_render_progress_branch() {
        assert!(matches!(
            TrackingDisplay::for_status(OrderStatus::Accepted),
            TrackingDisplay::Progress(_)
        ));
    }

    #[test]
    fn steps_carry_labels_and_icons() {
        for step in lifecycle_steps(OrderStatus::Pending) {
            assert!(!step.label.is_empty());
            assert!(!step.icon.is_empty());
        }
    }
}
