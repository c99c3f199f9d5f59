//! State machine for the three-step pickup creation flow.
//!
//! The controller owns the aggregated form state and a strictly sequential
//! step cursor. It never talks to the store itself: on the final step it
//! hands the caller a single `OrderDraft` to insert, and refuses to produce
//! another one until the caller reports the attempt failed.

use std::fmt;

use crate::identity::UserId;
use crate::order::{OrderDraft, OrderStatus};
use crate::scrap::{ScrapType, WeightBracket};

/// The three wizard screens, in order. No skip-ahead, no jump-to-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    ScrapDetails,
    Schedule,
    Location,
}

impl WizardStep {
    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::ScrapDetails,
            WizardStep::Schedule,
            WizardStep::Location,
        ]
    }

    /// 1-based position for the progress header.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::ScrapDetails => 1,
            WizardStep::Schedule => 2,
            WizardStep::Location => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::ScrapDetails => "Scrap Details",
            WizardStep::Schedule => "Schedule",
            WizardStep::Location => "Location",
        }
    }
}

/// Required-field failure for the current step, surfaced as a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingScrapType,
    MissingWeight,
    MissingPickupDate,
    MissingTimeSlot,
    MissingAddress,
    UploadsInProgress,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ValidationError::MissingScrapType => "Please select a scrap type",
            ValidationError::MissingWeight => "Please select approximate weight",
            ValidationError::MissingPickupDate => "Please select a pickup date",
            ValidationError::MissingTimeSlot => "Please select a time slot",
            ValidationError::MissingAddress => "Please enter your address",
            ValidationError::UploadsInProgress => {
                "Please wait for image uploads to finish"
            }
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ValidationError {}

/// State of one image slot, reserved at selection time.
#[derive(Debug, Clone, PartialEq)]
enum SlotState {
    Uploading,
    Uploaded(String),
    Failed,
    Removed,
}

/// Slot-indexed image uploads.
///
/// A slot is reserved per selected file before its upload starts, and
/// filled when the upload completes, so display order always matches
/// selection order even though uploads finish in any order. A failed slot
/// is skipped; it never blocks the other uploads or the submission.
///
/// Slot indices are stable for the lifetime of the form: removal leaves a
/// tombstone instead of shifting, so a completion arriving after an
/// unrelated removal still lands in its own slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSlots {
    slots: Vec<SlotState>,
}

impl ImageSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next slot for a just-selected file.
    pub fn reserve(&mut self) -> usize {
        self.slots.push(SlotState::Uploading);
        self.slots.len() - 1
    }

    /// Record a completed upload. Out-of-range slots are ignored, and a
    /// slot removed while its upload was in flight stays removed.
    pub fn fulfill(&mut self, slot: usize, url: String) {
        if let Some(s) = self.slots.get_mut(slot) {
            if *s == SlotState::Uploading {
                *s = SlotState::Uploaded(url);
            }
        }
    }

    /// Record a failed upload.
    pub fn fail(&mut self, slot: usize) {
        if let Some(s) = self.slots.get_mut(slot) {
            if *s == SlotState::Uploading {
                *s = SlotState::Failed;
            }
        }
    }

    /// Remove a slot (user dropped the image from the preview strip).
    /// Leaves a tombstone so other slots keep their indices.
    pub fn remove(&mut self, slot: usize) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = SlotState::Removed;
        }
    }

    /// Uploaded reference URLs in selection order; failed and removed
    /// slots are skipped.
    pub fn urls(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter_map(|s| match s {
                SlotState::Uploaded(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    /// (slot, url) pairs for the preview strip.
    pub fn uploaded(&self) -> Vec<(usize, String)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match s {
                SlotState::Uploaded(url) => Some((i, url.clone())),
                _ => None,
            })
            .collect()
    }

    /// True while any slot is still uploading.
    pub fn uploading(&self) -> bool {
        self.slots.iter().any(|s| *s == SlotState::Uploading)
    }

    /// Number of uploads that failed in this batch.
    pub fn failed_count(&self) -> usize {
        self.slots.iter().filter(|s| **s == SlotState::Failed).count()
    }
}

/// Aggregated form state for the creation flow. Transient: discarded once
/// submission succeeds, never persisted locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardForm {
    pub scrap_type: Option<ScrapType>,
    pub weight: Option<WeightBracket>,
    pub pickup_date: String,
    pub pickup_time: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: String,
    pub images: ImageSlots,
}

impl WizardForm {
    /// Presence checks for one step's required fields.
    fn validate(&self, step: WizardStep) -> Result<(), ValidationError> {
        match step {
            WizardStep::ScrapDetails => {
                if self.scrap_type.is_none() {
                    return Err(ValidationError::MissingScrapType);
                }
                if self.weight.is_none() {
                    return Err(ValidationError::MissingWeight);
                }
                Ok(())
            }
            WizardStep::Schedule => {
                if self.pickup_date.trim().is_empty() {
                    return Err(ValidationError::MissingPickupDate);
                }
                if self.pickup_time.trim().is_empty() {
                    return Err(ValidationError::MissingTimeSlot);
                }
                Ok(())
            }
            WizardStep::Location => {
                if self.address.trim().is_empty() {
                    return Err(ValidationError::MissingAddress);
                }
                Ok(())
            }
        }
    }

    /// Package everything collected so far into the single insert payload.
    fn draft(&self, user_id: &UserId, scrap_type: ScrapType) -> OrderDraft {
        OrderDraft {
            user_id: user_id.clone(),
            scrap_type,
            weight: self.weight,
            pickup_date: self.pickup_date.clone(),
            pickup_time: self.pickup_time.clone(),
            address: self.address.trim().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
            notes: if self.notes.trim().is_empty() {
                None
            } else {
                Some(self.notes.trim().to_string())
            },
            images: self.images.urls(),
            status: OrderStatus::Pending,
        }
    }
}

/// Result of asking the wizard to advance.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved to the next step.
    Moved(WizardStep),
    /// Final step validated: insert exactly this draft.
    Submit(OrderDraft),
    /// Current step failed validation; cursor unchanged.
    Rejected(ValidationError),
    /// A submission is already in flight; cursor unchanged.
    Busy,
}

/// Result of asking the wizard to go back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    Moved(WizardStep),
    /// Already at the first step: the caller leaves the wizard.
    Leave,
}

/// The wizard controller: step cursor + form aggregate + in-flight flag.
#[derive(Debug, Clone)]
pub struct WizardController {
    step: WizardStep,
    pub form: WizardForm,
    submitting: bool,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self {
            step: WizardStep::ScrapDetails,
            form: WizardForm::default(),
            submitting: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate the current step and advance, or produce the submission
    /// draft on the last step. Never moves past the last step and never
    /// yields a second draft while one attempt is pending.
    pub fn next(&mut self, user_id: &UserId) -> Advance {
        if self.submitting {
            return Advance::Busy;
        }
        let step = self.step();
        if let Err(e) = self.form.validate(step) {
            return Advance::Rejected(e);
        }
        match step {
            WizardStep::ScrapDetails => {
                self.step = WizardStep::Schedule;
                Advance::Moved(WizardStep::Schedule)
            }
            WizardStep::Schedule => {
                self.step = WizardStep::Location;
                Advance::Moved(WizardStep::Location)
            }
            WizardStep::Location => {
                // A draft snapshots the slot URLs, so an upload still in
                // flight would be silently dropped from it.
                if self.form.images.uploading() {
                    return Advance::Rejected(ValidationError::UploadsInProgress);
                }
                // validate() guarantees scrap_type is set by step 1.
                let Some(scrap_type) = self.form.scrap_type else {
                    return Advance::Rejected(ValidationError::MissingScrapType);
                };
                self.submitting = true;
                Advance::Submit(self.form.draft(user_id, scrap_type))
            }
        }
    }

    /// Retreat one step, or signal the caller to leave at the first step.
    pub fn back(&mut self) -> Retreat {
        match self.step() {
            WizardStep::ScrapDetails => Retreat::Leave,
            WizardStep::Schedule => {
                self.step = WizardStep::ScrapDetails;
                Retreat::Moved(WizardStep::ScrapDetails)
            }
            WizardStep::Location => {
                self.step = WizardStep::Schedule;
                Retreat::Moved(WizardStep::Schedule)
            }
        }
    }

    /// Re-arm after a failed insert so the user can retry manually.
    /// There is no retry queue: exactly one attempt per user action.
    pub fn submission_failed(&mut self) {
        self.submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid() -> UserId {
        UserId("user-1".into())
    }

    fn filled_controller() -> WizardController {
        let mut w = WizardController::new();
        w.form.scrap_type = Some(ScrapType::Electronics);
        w.form.weight = Some(WeightBracket::FiveToTenKg);
        w.form.pickup_date = "2025-03-01".into();
        w.form.pickup_time = "11:00 AM - 1:00 PM".into();
        w.form.address = "12 Example Rd".into();
        w
    }

    #[test]
    fn starts_at_scrap_details() {
        assert_eq!(WizardController::new().step(), WizardStep::ScrapDetails);
    }

    #[test]
    fn refuses_to_advance_on_missing_fields() {
        let mut w = WizardController::new();
        assert_eq!(
            w.next(&uid()),
            Advance::Rejected(ValidationError::MissingScrapType)
        );
        assert_eq!(w.step(), WizardStep::ScrapDetails);

        w.form.scrap_type = Some(ScrapType::Paper);
        assert_eq!(
            w.next(&uid()),
            Advance::Rejected(ValidationError::MissingWeight)
        );
        assert_eq!(w.step(), WizardStep::ScrapDetails);
    }

    #[test]
    fn validates_each_step_before_advancing() {
        let mut w = filled_controller();
        w.form.pickup_time.clear();

        assert_eq!(w.next(&uid()), Advance::Moved(WizardStep::Schedule));
        assert_eq!(
            w.next(&uid()),
            Advance::Rejected(ValidationError::MissingTimeSlot)
        );
        assert_eq!(w.step(), WizardStep::Schedule);

        w.form.pickup_time = "2:00 PM - 4:00 PM".into();
        assert_eq!(w.next(&uid()), Advance::Moved(WizardStep::Location));

        w.form.address = "   ".into();
        assert_eq!(
            w.next(&uid()),
            Advance::Rejected(ValidationError::MissingAddress)
        );
    }

    #[test]
    fn back_retreats_and_leaves_at_first_step() {
        let mut w = filled_controller();
        assert_eq!(w.back(), Retreat::Leave);
        w.next(&uid());
        w.next(&uid());
        assert_eq!(w.step(), WizardStep::Location);
        assert_eq!(w.back(), Retreat::Moved(WizardStep::Schedule));
        assert_eq!(w.back(), Retreat::Moved(WizardStep::ScrapDetails));
        assert_eq!(w.back(), Retreat::Leave);
    }

    #[test]
    fn full_flow_produces_exactly_the_collected_payload() {
        let mut w = filled_controller();
        assert_eq!(w.next(&uid()), Advance::Moved(WizardStep::Schedule));
        assert_eq!(w.next(&uid()), Advance::Moved(WizardStep::Location));

        let Advance::Submit(draft) = w.next(&uid()) else {
            panic!("expected submission on final step");
        };
        assert_eq!(draft.user_id, uid());
        assert_eq!(draft.scrap_type, ScrapType::Electronics);
        assert_eq!(draft.weight, Some(WeightBracket::FiveToTenKg));
        assert_eq!(draft.pickup_date, "2025-03-01");
        assert_eq!(draft.pickup_time, "11:00 AM - 1:00 PM");
        assert_eq!(draft.address, "12 Example Rd");
        assert_eq!(draft.status, OrderStatus::Pending);
        assert!(draft.notes.is_none());
        assert!(draft.images.is_empty());
    }

    #[test]
    fn no_second_draft_while_submission_pending() {
        let mut w = filled_controller();
        w.next(&uid());
        w.next(&uid());
        assert!(matches!(w.next(&uid()), Advance::Submit(_)));
        assert_eq!(w.next(&uid()), Advance::Busy);
        assert_eq!(w.next(&uid()), Advance::Busy);

        w.submission_failed();
        assert!(matches!(w.next(&uid()), Advance::Submit(_)));
    }

    #[test]
    fn cursor_never_leaves_the_three_steps() {
        let mut w = filled_controller();
        for _ in 0..10 {
            w.next(&uid());
            assert!(w.step().number() >= 1 && w.step().number() <= 3);
        }
        w.submission_failed();
        for _ in 0..10 {
            w.back();
            assert!(w.step().number() >= 1 && w.step().number() <= 3);
        }
    }

    #[test]
    fn image_slots_preserve_selection_order() {
        let mut slots = ImageSlots::new();
        let a = slots.reserve();
        let b = slots.reserve();
        let c = slots.reserve();
        assert!(slots.uploading());

        // Uploads complete out of order.
        slots.fulfill(c, "https://img/3.jpg".into());
        slots.fulfill(a, "https://img/1.jpg".into());
        slots.fulfill(b, "https://img/2.jpg".into());

        assert!(!slots.uploading());
        assert_eq!(
            slots.urls(),
            vec!["https://img/1.jpg", "https://img/2.jpg", "https://img/3.jpg"]
        );
    }

    #[test]
    fn failed_slot_is_skipped_without_blocking_others() {
        let mut slots = ImageSlots::new();
        let a = slots.reserve();
        let b = slots.reserve();
        slots.fail(a);
        slots.fulfill(b, "https://img/b.jpg".into());

        assert_eq!(slots.failed_count(), 1);
        assert_eq!(slots.urls(), vec!["https://img/b.jpg"]);
    }

    #[test]
    fn removal_keeps_in_flight_slot_indices_stable() {
        let mut slots = ImageSlots::new();
        let a = slots.reserve();
        slots.fulfill(a, "https://img/a.jpg".into());
        let b = slots.reserve();

        // Removing a finished image must not shift the slot still in
        // flight; its completion lands in its own slot.
        slots.remove(a);
        slots.fulfill(b, "https://img/b.jpg".into());

        assert_eq!(slots.urls(), vec!["https://img/b.jpg"]);
        assert!(!slots.uploading());
    }

    #[test]
    fn slot_removed_mid_upload_stays_removed() {
        let mut slots = ImageSlots::new();
        let a = slots.reserve();
        slots.remove(a);
        slots.fulfill(a, "https://img/a.jpg".into());

        assert!(slots.urls().is_empty());
        assert!(!slots.uploading());
        assert_eq!(slots.failed_count(), 0);
    }

    #[test]
    fn submission_refused_while_uploads_pending() {
        let mut w = filled_controller();
        let slot = w.form.images.reserve();
        w.next(&uid());
        w.next(&uid());
        assert_eq!(w.step(), WizardStep::Location);

        assert_eq!(
            w.next(&uid()),
            Advance::Rejected(ValidationError::UploadsInProgress)
        );

        w.form.images.fulfill(slot, "https://img/a.jpg".into());
        let Advance::Submit(draft) = w.next(&uid()) else {
            panic!("expected submission once uploads settle");
        };
        assert_eq!(draft.images, vec!["https://img/a.jpg"]);
    }

    #[test]
    fn removed_image_leaves_draft() {
        let mut w = filled_controller();
        let a = w.form.images.reserve();
        let b = w.form.images.reserve();
        w.form.images.fulfill(a, "https://img/a.jpg".into());
        w.form.images.fulfill(b, "https://img/b.jpg".into());
        w.form.images.remove(0);

        w.next(&uid());
        w.next(&uid());
        let Advance::Submit(draft) = w.next(&uid()) else {
            panic!("expected submission");
        };
        assert_eq!(draft.images, vec!["https://img/b.jpg"]);
    }
}
