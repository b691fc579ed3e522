use crate::models::patient::PatientResponse;
use rocket::serde::Serialize;
use schemars::JsonSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Available,
    Blocked,
    Booked { patient_id: i64 },
}

/// One working hour of a doctor's day as computed by the schedule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub hour: i32,
    pub state: SlotState,
}

impl Slot {
    pub fn is_available(&self) -> bool {
        self.state == SlotState::Available
    }
}

/// Public shape of a calendar hour.
#[derive(Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct Entry {
    pub hour: i32,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientResponse>,
}
