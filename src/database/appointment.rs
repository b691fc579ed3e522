use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::appointment::{Appointment, NewAppointment};
use chrono::{NaiveDate, NaiveTime};
use sqlx::Row;
use sqlx::postgres::PgRow;

pub const SLOT_TAKEN: &str = "chosen slot is not available";

#[async_trait::async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn insert_appointment(&self, appointment: &NewAppointment) -> Result<(), AppError>;
    async fn list_appointments(&self, doctor_id: i64, date: NaiveDate) -> Result<Vec<Appointment>, AppError>;
}

#[async_trait::async_trait]
impl AppointmentRepository for PostgresRepository {
    async fn insert_appointment(&self, appointment: &NewAppointment) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO tb_appointment (uuid, doctor_id, patient_id, date)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(appointment.uuid)
        .bind(appointment.doctor_id)
        .bind(appointment.patient_id)
        .bind(appointment.date)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            // A concurrent booking won the slot.
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::BadRequest(SLOT_TAKEN.to_string()),
            other => AppError::db("Failed to insert appointment", other),
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::Internal("appointment not inserted".to_string()));
        }

        Ok(())
    }

    async fn list_appointments(&self, doctor_id: i64, date: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, uuid, doctor_id, patient_id, date
            FROM tb_appointment
            WHERE doctor_id = $1
              AND $2 = date_trunc('day', date)
            "#,
        )
        .bind(doctor_id)
        .bind(date.and_time(NaiveTime::MIN))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to list appointments", e))?;

        rows.iter()
            .map(map_row_to_appointment)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::db("Failed to map appointment", e))
    }
}

fn map_row_to_appointment(row: &PgRow) -> Result<Appointment, sqlx::Error> {
    Ok(Appointment {
        id: row.try_get("id")?,
        uuid: row.try_get("uuid")?,
        doctor_id: row.try_get("doctor_id")?,
        patient_id: row.try_get("patient_id")?,
        date: row.try_get("date")?,
    })
}
