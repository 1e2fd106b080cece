use tracing::{debug, warn};

use crate::models::{ScheduleError, SlotStatus};

/// Staff- and booking-initiated operations that move a slot between
/// statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    Block,
    Unblock,
    Book,
    Release,
}

impl SlotAction {
    pub fn name(&self) -> &'static str {
        match self {
            SlotAction::Block => "block",
            SlotAction::Unblock => "unblock",
            SlotAction::Book => "book",
            SlotAction::Release => "release",
        }
    }
}

/// Encodes the slot status machine: which action applies to which status,
/// and which slots may be removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotLifecycleService;

impl SlotLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the status an action leads to, rejecting actions the
    /// current status does not permit.
    pub fn apply(&self, current: SlotStatus, action: SlotAction) -> Result<SlotStatus, ScheduleError> {
        debug!("Applying {} to a {} slot", action.name(), current);

        match (current, action) {
            (SlotStatus::Available, SlotAction::Block) => Ok(SlotStatus::Blocked),
            (SlotStatus::Blocked, SlotAction::Unblock) => Ok(SlotStatus::Available),
            (SlotStatus::Available, SlotAction::Book) => Ok(SlotStatus::Booked),
            (SlotStatus::Booked, SlotAction::Release) => Ok(SlotStatus::Available),
            (status, action) => {
                warn!("Rejected {} on a {} slot", action.name(), status);
                Err(ScheduleError::InvalidStatus {
                    status,
                    action: action.name(),
                })
            }
        }
    }

    /// All statuses a slot may move to from `current`.
    pub fn valid_transitions(&self, current: SlotStatus) -> Vec<SlotStatus> {
        match current {
            SlotStatus::Available => vec![SlotStatus::Booked, SlotStatus::Blocked],
            SlotStatus::Blocked => vec![SlotStatus::Available],
            SlotStatus::Booked => vec![SlotStatus::Available],
        }
    }

    /// Booked slots must be released through the booking flow first.
    pub fn can_delete(&self, status: SlotStatus) -> bool {
        status != SlotStatus::Booked
    }
}
