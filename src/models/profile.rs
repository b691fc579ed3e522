use crate::models::doctor::Doctor;
use crate::models::patient::Patient;

/// The profile record a user's role maps to.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Doctor(Doctor),
    Patient(Patient),
}

impl Profile {
    pub fn into_doctor(self) -> Option<Doctor> {
        match self {
            Profile::Doctor(doctor) => Some(doctor),
            Profile::Patient(_) => None,
        }
    }

    pub fn into_patient(self) -> Option<Patient> {
        match self {
            Profile::Patient(patient) => Some(patient),
            Profile::Doctor(_) => None,
        }
    }
}
