use chrono::{NaiveDate, NaiveDateTime};
use rocket::serde::Deserialize;
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub uuid: Uuid,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub uuid: Uuid,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub date: NaiveDateTime,
}

/// Body of `POST /calendar/{doctor}/{year}/{month}/{day}`.
#[derive(Deserialize, Debug, Default, JsonSchema)]
pub struct AppointmentPayload {
    #[serde(default)]
    pub hour: i32,
}

#[derive(Debug, Clone, Validate)]
pub struct AppointmentRequest {
    #[validate(range(min = 9, max = 17, message = "out of working hours"))]
    pub hour: i32,
    pub doctor_uuid: Uuid,
    pub date: NaiveDate,
}

impl AppointmentRequest {
    pub fn new(payload: &AppointmentPayload, doctor_uuid: Uuid, date: NaiveDate) -> Self {
        Self {
            hour: payload.hour,
            doctor_uuid,
            date,
        }
    }
}
