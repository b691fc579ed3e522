use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::doctor::Doctor;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

#[async_trait::async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn find_doctor_by_uuid(&self, uuid: &Uuid) -> Result<Option<Doctor>, AppError>;
    async fn find_doctor_by_user_id(&self, user_id: i64) -> Result<Option<Doctor>, AppError>;
}

#[async_trait::async_trait]
impl DoctorRepository for PostgresRepository {
    async fn find_doctor_by_uuid(&self, uuid: &Uuid) -> Result<Option<Doctor>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, uuid, user_id, name, email, mobile_phone, specialty
            FROM tb_doctor
            WHERE uuid = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to find doctor", e))?;

        row.as_ref().map(map_row_to_doctor).transpose().map_err(|e| AppError::db("Failed to map doctor", e))
    }

    async fn find_doctor_by_user_id(&self, user_id: i64) -> Result<Option<Doctor>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, uuid, user_id, name, email, mobile_phone, specialty
            FROM tb_doctor
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to find doctor by user", e))?;

        row.as_ref().map(map_row_to_doctor).transpose().map_err(|e| AppError::db("Failed to map doctor", e))
    }
}

fn map_row_to_doctor(row: &PgRow) -> Result<Doctor, sqlx::Error> {
    Ok(Doctor {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        uuid: row.try_get("uuid")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        mobile_phone: row.try_get("mobile_phone")?,
        specialty: row.try_get("specialty")?,
    })
}
