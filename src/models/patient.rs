use rocket::serde::Serialize;
use schemars::JsonSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Patient {
    pub id: i64,
    pub user_id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub mobile_phone: String,
}

/// Patient details shown to the doctor who owns the booked slot.
#[derive(Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct PatientResponse {
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub mobile_phone: String,
}

impl From<&Patient> for PatientResponse {
    fn from(patient: &Patient) -> Self {
        Self {
            uuid: patient.uuid,
            name: patient.name.clone(),
            email: patient.email.clone(),
            mobile_phone: patient.mobile_phone.clone(),
        }
    }
}
