use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::patient::Patient;
use sqlx::Row;
use sqlx::postgres::PgRow;

#[async_trait::async_trait]
pub trait PatientRepository: Send + Sync {
    async fn find_patient_by_id(&self, id: i64) -> Result<Option<Patient>, AppError>;
    async fn find_patient_by_user_id(&self, user_id: i64) -> Result<Option<Patient>, AppError>;
}

const SELECT_PATIENT: &str = "SELECT id, uuid, user_id, name, email, mobile_phone FROM tb_patient";

#[async_trait::async_trait]
impl PatientRepository for PostgresRepository {
    async fn find_patient_by_id(&self, id: i64) -> Result<Option<Patient>, AppError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_PATIENT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::db("Failed to find patient", e))?;

        row.as_ref().map(map_row_to_patient).transpose().map_err(|e| AppError::db("Failed to map patient", e))
    }

    async fn find_patient_by_user_id(&self, user_id: i64) -> Result<Option<Patient>, AppError> {
        let row = sqlx::query(&format!("{} WHERE user_id = $1", SELECT_PATIENT))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::db("Failed to find patient by user", e))?;

        row.as_ref().map(map_row_to_patient).transpose().map_err(|e| AppError::db("Failed to map patient", e))
    }
}

fn map_row_to_patient(row: &PgRow) -> Result<Patient, sqlx::Error> {
    Ok(Patient {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        uuid: row.try_get("uuid")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        mobile_phone: row.try_get("mobile_phone")?,
    })
}
