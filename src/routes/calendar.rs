use crate::auth::{AllowedRole, DoctorOnly, PatientOnly};
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::appointment::{AppointmentPayload, AppointmentRequest};
use crate::models::block_period::BlockPeriodRequest;
use crate::models::calendar::Entry;
use crate::service::calendar::CalendarService;
use chrono::NaiveDate;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use uuid::Uuid;

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Parses the `/<year>/<month>/<day>` path segments into a calendar date.
pub(crate) fn parse_date_parameters(year: &str, month: &str, day: &str) -> Result<NaiveDate, AppError> {
    if year.len() != 4 || !all_digits(year) {
        return Err(AppError::BadRequest("invalid year reference - e.g. 2021".to_string()));
    }
    if month.len() > 2 || !all_digits(month) {
        return Err(AppError::BadRequest("invalid month reference - e.g. 08".to_string()));
    }
    if day.len() > 2 || !all_digits(day) {
        return Err(AppError::BadRequest("invalid day reference - e.g. 10".to_string()));
    }

    let invalid = || AppError::BadRequest("invalid date reference".to_string());
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn parse_doctor_uuid(value: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value).map_err(|_| AppError::BadRequest("invalid identifier".to_string()))
}

/// Open hours of a doctor's day
#[openapi(tag = "Calendar")]
#[get("/<doctor_uuid>/<year>/<month>/<day>")]
pub async fn get_doctor_calendar(
    pool: &State<PgPool>,
    _patient: AllowedRole<PatientOnly>,
    doctor_uuid: &str,
    year: &str,
    month: &str,
    day: &str,
) -> Result<Json<Vec<Entry>>, AppError> {
    let date = parse_date_parameters(year, month, day)?;
    let doctor_uuid = parse_doctor_uuid(doctor_uuid)?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let entries = CalendarService::new(&repo).doctor_calendar(&doctor_uuid, date).await?;
    Ok(Json(entries))
}

/// Book an hour on a doctor's day
#[openapi(tag = "Calendar")]
#[post("/<doctor_uuid>/<year>/<month>/<day>", data = "<payload>")]
pub async fn post_appointment(
    pool: &State<PgPool>,
    patient: AllowedRole<PatientOnly>,
    doctor_uuid: &str,
    year: &str,
    month: &str,
    day: &str,
    payload: JsonBody<AppointmentPayload>,
) -> Result<Status, AppError> {
    let date = parse_date_parameters(year, month, day)?;
    let doctor_uuid = parse_doctor_uuid(doctor_uuid)?;
    let request = AppointmentRequest::new(&payload, doctor_uuid, date);

    let repo = PostgresRepository { pool: pool.inner().clone() };
    CalendarService::new(&repo).insert_appointment(&patient.user, &request).await?;
    Ok(Status::Created)
}

/// The calling doctor's full day, including booked patients
#[openapi(tag = "Calendar")]
#[get("/<year>/<month>/<day>")]
pub async fn get_appointments(pool: &State<PgPool>, doctor: AllowedRole<DoctorOnly>, year: &str, month: &str, day: &str) -> Result<Json<Vec<Entry>>, AppError> {
    let date = parse_date_parameters(year, month, day)?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let entries = CalendarService::new(&repo).doctor_appointments(&doctor.user, date).await?;
    Ok(Json(entries))
}

/// Block a period of the calling doctor's calendar
#[openapi(tag = "Calendar")]
#[post("/blockers", data = "<payload>")]
pub async fn post_blocker(pool: &State<PgPool>, doctor: AllowedRole<DoctorOnly>, payload: JsonBody<BlockPeriodRequest>) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    CalendarService::new(&repo).insert_blocker(&doctor.user, &payload).await?;
    Ok(Status::Created)
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![get_doctor_calendar, post_appointment, get_appointments, post_blocker]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockRepository, bearer_for, route_client, route_client_with_users, sample_doctor_user, sample_patient_user};
    use rocket::http::{ContentType, Header};

    const DOCTOR_DAY: &str = "/api/v1/calendar/7e9b1e0a-8f4c-4d3f-9a57-3f1f2b6a8c10/2021/08/10";

    fn both_users() -> MockRepository {
        MockRepository::default().with_user(sample_doctor_user()).with_user(sample_patient_user())
    }

    #[test]
    fn date_parameters_accept_short_month_and_day() {
        assert_eq!(parse_date_parameters("2021", "8", "1").unwrap(), NaiveDate::from_ymd_opt(2021, 8, 1).unwrap());
        assert_eq!(parse_date_parameters("2021", "08", "10").unwrap(), NaiveDate::from_ymd_opt(2021, 8, 10).unwrap());
    }

    #[test]
    fn date_parameters_report_the_offending_part() {
        let message = |result: Result<NaiveDate, AppError>| match result {
            Err(AppError::BadRequest(message)) => message,
            other => panic!("unexpected {:?}", other),
        };

        assert_eq!(message(parse_date_parameters("21", "08", "10")), "invalid year reference - e.g. 2021");
        assert_eq!(message(parse_date_parameters("20x1", "08", "10")), "invalid year reference - e.g. 2021");
        assert_eq!(message(parse_date_parameters("2021", "008", "10")), "invalid month reference - e.g. 08");
        assert_eq!(message(parse_date_parameters("2021", "ab", "10")), "invalid month reference - e.g. 08");
        assert_eq!(message(parse_date_parameters("2021", "08", "100")), "invalid day reference - e.g. 10");
        assert_eq!(message(parse_date_parameters("2021", "08", "")), "invalid day reference - e.g. 10");
        assert_eq!(message(parse_date_parameters("2021", "02", "30")), "invalid date reference");
        assert_eq!(message(parse_date_parameters("2021", "00", "10")), "invalid date reference");
    }

    #[test]
    fn doctor_uuid_must_parse() {
        assert!(matches!(parse_doctor_uuid("nope"), Err(AppError::BadRequest(ref m)) if m == "invalid identifier"));
        assert!(parse_doctor_uuid("7e9b1e0a-8f4c-4d3f-9a57-3f1f2b6a8c10").is_ok());
    }

    #[rocket::async_test]
    async fn calendar_requires_a_token() {
        let client = route_client().await;

        let response = client.get("/api/v1/calendar/2021/08/10").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);

        let response = client
            .get("/api/v1/calendar/7e9b1e0a-8f4c-4d3f-9a57-3f1f2b6a8c10/2021/08/10")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);

        let response = client
            .post("/api/v1/calendar/blockers")
            .header(ContentType::JSON)
            .header(Header::new("Authorization", "Bearer garbage"))
            .body("{}")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn patient_token_is_forbidden_on_doctor_routes() {
        let client = route_client_with_users(both_users()).await;

        let response = client.get("/api/v1/calendar/2021/08/10").header(bearer_for(&sample_patient_user())).dispatch().await;
        assert_eq!(response.status(), Status::Forbidden);

        let response = client
            .post("/api/v1/calendar/blockers")
            .header(ContentType::JSON)
            .header(bearer_for(&sample_patient_user()))
            .body("{")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Forbidden);
    }

    #[rocket::async_test]
    async fn doctor_token_is_forbidden_on_patient_routes() {
        let client = route_client_with_users(both_users()).await;

        let response = client.get(DOCTOR_DAY).header(bearer_for(&sample_doctor_user())).dispatch().await;
        assert_eq!(response.status(), Status::Forbidden);

        let response = client
            .post(DOCTOR_DAY)
            .header(ContentType::JSON)
            .header(bearer_for(&sample_doctor_user()))
            .body("{")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Forbidden);
    }

    // A malformed body is only inspected once the role guard has let the request through.
    #[rocket::async_test]
    async fn matching_role_passes_the_guard() {
        let client = route_client_with_users(both_users()).await;

        let response = client
            .post("/api/v1/calendar/blockers")
            .header(ContentType::JSON)
            .header(bearer_for(&sample_doctor_user()))
            .body("{")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client
            .post(DOCTOR_DAY)
            .header(ContentType::JSON)
            .header(bearer_for(&sample_patient_user()))
            .body("{")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }
}
