use crate::database::CalendarStore;
use crate::database::appointment::SLOT_TAKEN;
use crate::error::app_error::AppError;
use crate::models::appointment::{AppointmentRequest, NewAppointment};
use crate::models::block_period::{BlockPeriodRequest, NewBlockPeriod, truncate_to_hour};
use crate::models::calendar::{Entry, Slot, SlotState};
use crate::models::doctor::Doctor;
use crate::models::patient::PatientResponse;
use crate::models::profile::Profile;
use crate::models::user::{Role, User};
use crate::service::schedule::{compute_day_schedule, slot_start};
use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

pub const DOCTOR_NOT_FOUND: &str = "doctor not found";
pub const ONLY_DOCTOR_CAN_BLOCK: &str = "only a doctor can create a blocker";
pub const ONLY_PATIENT_CAN_BOOK: &str = "only a patient can create an appointment";
pub const ONLY_DOCTOR_CAN_CHECK: &str = "only a doctor can check its appointments";

pub struct CalendarService<'a, R: CalendarStore> {
    repository: &'a R,
}

impl<'a, R: CalendarStore> CalendarService<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        CalendarService { repository }
    }

    /// Looks up the profile row matching the user's role.
    pub async fn resolve_profile(&self, user: &User) -> Result<Option<Profile>, AppError> {
        let profile = match user.role {
            Role::Doctor => self.repository.find_doctor_by_user_id(user.id).await?.map(Profile::Doctor),
            Role::Patient => self.repository.find_patient_by_user_id(user.id).await?.map(Profile::Patient),
        };
        Ok(profile)
    }

    async fn day_schedule(&self, doctor: &Doctor, date: NaiveDate) -> Result<Vec<Slot>, AppError> {
        let appointments = self.repository.list_appointments(doctor.id, date).await?;
        let blockers = self.repository.list_blockers(doctor.id, date).await?;
        Ok(compute_day_schedule(date, &blockers, &appointments))
    }

    /// Open hours of a doctor's day, as shown to patients.
    pub async fn doctor_calendar(&self, doctor_uuid: &Uuid, date: NaiveDate) -> Result<Vec<Entry>, AppError> {
        let doctor = self
            .repository
            .find_doctor_by_uuid(doctor_uuid)
            .await?
            .ok_or_else(|| AppError::NotFound(DOCTOR_NOT_FOUND.to_string()))?;

        let slots = self.day_schedule(&doctor, date).await?;
        Ok(slots
            .into_iter()
            .filter(Slot::is_available)
            .map(|slot| Entry {
                hour: slot.hour,
                available: true,
                patient: None,
            })
            .collect())
    }

    /// Every working hour of the calling doctor's day, with the patient on booked hours.
    pub async fn doctor_appointments(&self, user: &User, date: NaiveDate) -> Result<Vec<Entry>, AppError> {
        let doctor = self
            .resolve_profile(user)
            .await?
            .and_then(Profile::into_doctor)
            .ok_or_else(|| AppError::Forbidden(ONLY_DOCTOR_CAN_CHECK.to_string()))?;

        let slots = self.day_schedule(&doctor, date).await?;
        let mut entries = Vec::with_capacity(slots.len());
        for slot in slots {
            let patient = match slot.state {
                SlotState::Booked { patient_id } => self.repository.find_patient_by_id(patient_id).await?.as_ref().map(PatientResponse::from),
                SlotState::Available | SlotState::Blocked => None,
            };
            entries.push(Entry {
                hour: slot.hour,
                available: slot.is_available(),
                patient,
            });
        }
        Ok(entries)
    }

    pub async fn insert_appointment(&self, user: &User, request: &AppointmentRequest) -> Result<(), AppError> {
        request.validate()?;

        let patient = self
            .resolve_profile(user)
            .await?
            .and_then(Profile::into_patient)
            .ok_or_else(|| AppError::Forbidden(ONLY_PATIENT_CAN_BOOK.to_string()))?;

        let doctor = self
            .repository
            .find_doctor_by_uuid(&request.doctor_uuid)
            .await?
            .ok_or_else(|| AppError::NotFound(DOCTOR_NOT_FOUND.to_string()))?;

        let slots = self.day_schedule(&doctor, request.date).await?;
        let available = slots.iter().any(|slot| slot.hour == request.hour && slot.is_available());
        if !available {
            debug!(doctor_id = %doctor.uuid, date = %request.date, hour = request.hour, "slot not available");
            return Err(AppError::BadRequest(SLOT_TAKEN.to_string()));
        }

        let appointment = NewAppointment {
            uuid: Uuid::new_v4(),
            doctor_id: doctor.id,
            patient_id: patient.id,
            date: slot_start(request.date, request.hour),
        };
        self.repository.insert_appointment(&appointment).await?;

        info!(
            appointment_id = %appointment.uuid,
            doctor_id = %doctor.uuid,
            patient_id = %patient.uuid,
            date = %appointment.date,
            "appointment booked"
        );
        Ok(())
    }

    pub async fn insert_blocker(&self, user: &User, request: &BlockPeriodRequest) -> Result<(), AppError> {
        let doctor = self
            .resolve_profile(user)
            .await?
            .and_then(Profile::into_doctor)
            .ok_or_else(|| AppError::Forbidden(ONLY_DOCTOR_CAN_BLOCK.to_string()))?;

        request.validate()?;
        let (start, end) = request
            .period()
            .ok_or_else(|| AppError::Internal("validated blocker without period".to_string()))?;

        let blocker = NewBlockPeriod {
            uuid: Uuid::new_v4(),
            doctor_id: doctor.id,
            start_date: truncate_to_hour(start),
            end_date: truncate_to_hour(end),
            description: request.description.clone(),
        };
        self.repository.insert_blocker(&blocker).await?;

        info!(
            blocker_id = %blocker.uuid,
            doctor_id = %doctor.uuid,
            start = %blocker.start_date,
            end = %blocker.end_date,
            "blocker created"
        );
        Ok(())
    }
}
