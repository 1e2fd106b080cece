use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveTime};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::DuplicateSlotPolicy;

use crate::calendar;
use crate::models::{
    BulkPlan, DayBulkPlan, DayCounts, DayView, MonthCell, MonthRef, MonthView, NewSlot,
    ScheduleError, Slot, SlotChanges, SlotOccupant, SlotStatus,
};
use crate::services::lifecycle::{SlotAction, SlotLifecycleService};

fn slot_key_label(date: NaiveDate, time: NaiveTime) -> String {
    format!("{} {}", calendar::date_key(date), calendar::time_key(time))
}

/// In-memory slot collection for all doctors. Cheap to clone; clones
/// share the same underlying collection. Every mutation returns a typed
/// result so a persistent repository can replace this store without
/// changing the HTTP surface.
#[derive(Clone)]
pub struct SlotStore {
    slots: Arc<RwLock<Vec<Slot>>>,
    policy: DuplicateSlotPolicy,
    lifecycle: SlotLifecycleService,
}

impl SlotStore {
    pub fn new(policy: DuplicateSlotPolicy) -> Self {
        Self {
            slots: Arc::new(RwLock::new(Vec::new())),
            policy,
            lifecycle: SlotLifecycleService::new(),
        }
    }

    // ------------------------------------------------------------------
    // Read models
    // ------------------------------------------------------------------

    /// Slots for one doctor on one day, ordered by start time.
    pub async fn list_for_doctor_and_date(&self, doctor_id: Uuid, date: NaiveDate) -> Vec<Slot> {
        let guard = self.slots.read().await;
        let mut slots: Vec<Slot> = guard
            .iter()
            .filter(|s| s.doctor_id == doctor_id && s.date == date)
            .cloned()
            .collect();
        slots.sort_by(|a, b| a.time.cmp(&b.time));
        slots
    }

    pub async fn day_counts(&self, doctor_id: Uuid, date: NaiveDate) -> DayCounts {
        let guard = self.slots.read().await;
        DayCounts::tally(
            guard
                .iter()
                .filter(|s| s.doctor_id == doctor_id && s.date == date),
        )
    }

    pub async fn day_view(&self, doctor_id: Uuid, date: NaiveDate) -> DayView {
        let slots = self.list_for_doctor_and_date(doctor_id, date).await;
        DayView {
            doctor_id,
            date,
            counts: DayCounts::tally(&slots),
            slots,
        }
    }

    /// The Monday-first month grid with per-day counts: the read model a
    /// calendar surface renders from.
    pub async fn month_view(&self, doctor_id: Uuid, year: i32, month0: i32) -> MonthView {
        let (year, month0) = calendar::resolve_month(year, month0);
        let matrix = calendar::month_matrix(year, month0 as i32);

        let guard = self.slots.read().await;
        let mut by_day: HashMap<NaiveDate, DayCounts> = HashMap::new();
        for slot in guard.iter().filter(|s| s.doctor_id == doctor_id) {
            by_day.entry(slot.date).or_default().add(slot.status);
        }
        drop(guard);

        let weeks = matrix
            .iter()
            .map(|week| {
                week.iter()
                    .map(|cell| MonthCell {
                        date: *cell,
                        counts: cell.map(|d| by_day.get(&d).copied().unwrap_or_default()),
                    })
                    .collect()
            })
            .collect();

        let (prev_year, prev_month0) = calendar::prev_month(year, month0 as i32);
        let (next_year, next_month0) = calendar::next_month(year, month0 as i32);

        MonthView {
            doctor_id,
            year,
            month0,
            prev: MonthRef {
                year: prev_year,
                month0: prev_month0,
            },
            next: MonthRef {
                year: next_year,
                month0: next_month0,
            },
            weeks,
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Slot, ScheduleError> {
        let guard = self.slots.read().await;
        guard
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(ScheduleError::SlotNotFound)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub async fn create(
        &self,
        new_slot: NewSlot,
        on_duplicate: Option<DuplicateSlotPolicy>,
    ) -> Result<Slot, ScheduleError> {
        let policy = on_duplicate.unwrap_or(self.policy);
        debug!(
            "Creating slot for doctor {} at {}",
            new_slot.doctor_id,
            slot_key_label(new_slot.date, new_slot.time)
        );

        let mut guard = self.slots.write().await;
        let existing = guard
            .iter()
            .find(|s| {
                s.doctor_id == new_slot.doctor_id
                    && s.date == new_slot.date
                    && s.time == new_slot.time
            })
            .cloned();

        if let Some(existing) = existing {
            match policy {
                DuplicateSlotPolicy::Allow => {}
                DuplicateSlotPolicy::Merge => {
                    debug!("Merge policy keeps existing slot {}", existing.id);
                    return Ok(existing);
                }
                DuplicateSlotPolicy::Reject => {
                    return Err(ScheduleError::DuplicateSlots(vec![slot_key_label(
                        new_slot.date,
                        new_slot.time,
                    )]));
                }
            }
        }

        let slot = Slot {
            id: Uuid::new_v4(),
            doctor_id: new_slot.doctor_id,
            date: new_slot.date,
            time: new_slot.time,
            duration_minutes: new_slot.duration_minutes,
            status: SlotStatus::Available,
            patient: None,
            notes: new_slot.notes,
        };
        guard.push(slot.clone());
        info!("Slot {} created", slot.id);
        Ok(slot)
    }

    /// Materialize one slot per selected day per generated start time
    /// over a date range.
    pub async fn bulk_create(&self, plan: BulkPlan) -> Result<Vec<Slot>, ScheduleError> {
        let times = calendar::generate_times(
            plan.start_time,
            plan.end_time,
            plan.slot_duration_minutes,
            plan.break_minutes,
        );
        if times.is_empty() {
            debug!(
                "Bulk window {}..{} produced no start times",
                calendar::time_key(plan.start_time),
                calendar::time_key(plan.end_time)
            );
        }

        let mut candidates = Vec::new();
        let mut day = plan.start_date;
        while day <= plan.end_date {
            let weekday = day.weekday().number_from_monday() as u8;
            if plan.weekdays.contains(&weekday) {
                candidates.extend(times.iter().map(|&t| (day, t)));
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        self.insert_candidates(
            plan.doctor_id,
            plan.slot_duration_minutes,
            candidates,
            plan.on_duplicate.unwrap_or(self.policy),
        )
        .await
    }

    pub async fn bulk_create_day(&self, plan: DayBulkPlan) -> Result<Vec<Slot>, ScheduleError> {
        let times = calendar::generate_times(
            plan.start_time,
            plan.end_time,
            plan.slot_duration_minutes,
            plan.break_minutes,
        );
        if times.is_empty() {
            debug!(
                "Bulk window {}..{} produced no start times",
                calendar::time_key(plan.start_time),
                calendar::time_key(plan.end_time)
            );
        }

        let candidates = times.into_iter().map(|t| (plan.date, t)).collect();
        self.insert_candidates(
            plan.doctor_id,
            plan.slot_duration_minutes,
            candidates,
            plan.on_duplicate.unwrap_or(self.policy),
        )
        .await
    }

    async fn insert_candidates(
        &self,
        doctor_id: Uuid,
        duration_minutes: i32,
        candidates: Vec<(NaiveDate, NaiveTime)>,
        policy: DuplicateSlotPolicy,
    ) -> Result<Vec<Slot>, ScheduleError> {
        let mut guard = self.slots.write().await;
        let mut occupied: HashSet<(NaiveDate, NaiveTime)> = guard
            .iter()
            .filter(|s| s.doctor_id == doctor_id)
            .map(|s| (s.date, s.time))
            .collect();

        let kept: Vec<(NaiveDate, NaiveTime)> = match policy {
            DuplicateSlotPolicy::Allow => candidates,
            // insert() doubles as in-batch dedup.
            DuplicateSlotPolicy::Merge => candidates
                .into_iter()
                .filter(|key| occupied.insert(*key))
                .collect(),
            DuplicateSlotPolicy::Reject => {
                let conflicts: Vec<String> = candidates
                    .iter()
                    .filter(|key| occupied.contains(key))
                    .map(|(date, time)| slot_key_label(*date, *time))
                    .collect();
                if !conflicts.is_empty() {
                    return Err(ScheduleError::DuplicateSlots(conflicts));
                }
                candidates
            }
        };

        let created: Vec<Slot> = kept
            .into_iter()
            .map(|(date, time)| Slot {
                id: Uuid::new_v4(),
                doctor_id,
                date,
                time,
                duration_minutes,
                status: SlotStatus::Available,
                patient: None,
                notes: String::new(),
            })
            .collect();

        guard.extend(created.iter().cloned());
        info!("Bulk add created {} slots for doctor {}", created.len(), doctor_id);
        Ok(created)
    }

    /// Edit date/time/duration/notes in place. Status and occupant are
    /// preserved whatever the slot's state.
    pub async fn update(&self, id: Uuid, changes: SlotChanges) -> Result<Slot, ScheduleError> {
        let mut guard = self.slots.write().await;
        let slot = guard
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ScheduleError::SlotNotFound)?;

        if let Some(date) = changes.date {
            slot.date = date;
        }
        if let Some(time) = changes.time {
            slot.time = time;
        }
        if let Some(duration) = changes.duration_minutes {
            slot.duration_minutes = duration;
        }
        if let Some(notes) = changes.notes {
            slot.notes = notes;
        }

        debug!("Slot {} updated", slot.id);
        Ok(slot.clone())
    }

    pub async fn block(&self, id: Uuid) -> Result<Slot, ScheduleError> {
        self.transition(id, SlotAction::Block).await
    }

    pub async fn unblock(&self, id: Uuid) -> Result<Slot, ScheduleError> {
        self.transition(id, SlotAction::Unblock).await
    }

    /// Attach an occupant to an available slot. This is the seam the
    /// booking flow calls through.
    pub async fn book(&self, id: Uuid, occupant: SlotOccupant) -> Result<Slot, ScheduleError> {
        let mut guard = self.slots.write().await;
        let slot = guard
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ScheduleError::SlotNotFound)?;

        slot.status = self.lifecycle.apply(slot.status, SlotAction::Book)?;
        slot.patient = Some(occupant);
        info!("Slot {} booked", slot.id);
        Ok(slot.clone())
    }

    /// Return a booked slot to availability, clearing the occupant.
    pub async fn release(&self, id: Uuid) -> Result<Slot, ScheduleError> {
        self.transition(id, SlotAction::Release).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<Slot, ScheduleError> {
        let mut guard = self.slots.write().await;
        let index = guard
            .iter()
            .position(|s| s.id == id)
            .ok_or(ScheduleError::SlotNotFound)?;

        if !self.lifecycle.can_delete(guard[index].status) {
            return Err(ScheduleError::SlotBooked);
        }

        let slot = guard.remove(index);
        info!("Slot {} deleted", slot.id);
        Ok(slot)
    }

    async fn transition(&self, id: Uuid, action: SlotAction) -> Result<Slot, ScheduleError> {
        let mut guard = self.slots.write().await;
        let slot = guard
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ScheduleError::SlotNotFound)?;

        slot.status = self.lifecycle.apply(slot.status, action)?;
        if matches!(action, SlotAction::Block | SlotAction::Release) {
            slot.patient = None;
        }

        info!("Slot {} is now {}", slot.id, slot.status);
        Ok(slot.clone())
    }
}
