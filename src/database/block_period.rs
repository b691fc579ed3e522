use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::block_period::{BlockPeriod, NewBlockPeriod};
use chrono::{NaiveDate, NaiveTime};
use sqlx::Row;
use sqlx::postgres::PgRow;

#[async_trait::async_trait]
pub trait BlockPeriodRepository: Send + Sync {
    async fn insert_blocker(&self, blocker: &NewBlockPeriod) -> Result<(), AppError>;
    /// Blockers whose day-truncated range contains `date`.
    async fn list_blockers(&self, doctor_id: i64, date: NaiveDate) -> Result<Vec<BlockPeriod>, AppError>;
}

#[async_trait::async_trait]
impl BlockPeriodRepository for PostgresRepository {
    async fn insert_blocker(&self, blocker: &NewBlockPeriod) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO tb_block_period (uuid, doctor_id, start_date, end_date, description)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(blocker.uuid)
        .bind(blocker.doctor_id)
        .bind(blocker.start_date)
        .bind(blocker.end_date)
        .bind(&blocker.description)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to insert blocker", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::Internal("blocker not inserted".to_string()));
        }

        Ok(())
    }

    async fn list_blockers(&self, doctor_id: i64, date: NaiveDate) -> Result<Vec<BlockPeriod>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, uuid, doctor_id, start_date, end_date, description
            FROM tb_block_period
            WHERE doctor_id = $1
              AND $2 BETWEEN date_trunc('day', start_date) AND date_trunc('day', end_date)
            "#,
        )
        .bind(doctor_id)
        .bind(date.and_time(NaiveTime::MIN))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to list blockers", e))?;

        rows.iter()
            .map(map_row_to_block_period)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::db("Failed to map blocker", e))
    }
}

fn map_row_to_block_period(row: &PgRow) -> Result<BlockPeriod, sqlx::Error> {
    Ok(BlockPeriod {
        id: row.try_get("id")?,
        uuid: row.try_get("uuid")?,
        doctor_id: row.try_get("doctor_id")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        description: row.try_get("description")?,
    })
}
