pub mod appointment;
pub mod block_period;
pub mod doctor;
pub mod patient;
pub mod postgres_repository;
pub mod user;

use crate::database::appointment::AppointmentRepository;
use crate::database::block_period::BlockPeriodRepository;
use crate::database::doctor::DoctorRepository;
use crate::database::patient::PatientRepository;

/// Everything the calendar needs from storage.
pub trait CalendarStore: DoctorRepository + PatientRepository + BlockPeriodRepository + AppointmentRepository {}

impl<T> CalendarStore for T where T: DoctorRepository + PatientRepository + BlockPeriodRepository + AppointmentRepository {}
