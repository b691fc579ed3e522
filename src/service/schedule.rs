use crate::models::appointment::Appointment;
use crate::models::block_period::BlockPeriod;
use crate::models::calendar::{Slot, SlotState};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

pub const START_WORK_HOUR: i32 = 9;
pub const END_WORK_HOUR: i32 = 17;

/// Wall-clock instant at `hour:00` on `date`.
pub fn slot_start(date: NaiveDate, hour: i32) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + TimeDelta::hours(i64::from(hour))
}

/// Computes the state of every working hour of `date`.
///
/// A slot covered by any blocker is blocked even when an appointment also
/// sits on it. Otherwise an appointment at exactly `hour:00` books it.
/// Blockers and appointments from other days are ignored naturally since
/// none of their instants match.
pub fn compute_day_schedule(date: NaiveDate, blockers: &[BlockPeriod], appointments: &[Appointment]) -> Vec<Slot> {
    (START_WORK_HOUR..=END_WORK_HOUR)
        .map(|hour| {
            let reference = slot_start(date, hour);
            let state = if blockers.iter().any(|blocker| blocker.covers(reference)) {
                SlotState::Blocked
            } else if let Some(appointment) = appointments.iter().find(|appointment| appointment.date == reference) {
                SlotState::Booked {
                    patient_id: appointment.patient_id,
                }
            } else {
                SlotState::Available
            };
            Slot { hour, state }
        })
        .collect()
}
