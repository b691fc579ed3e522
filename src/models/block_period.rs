use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use rocket::serde::Deserialize;
use schemars::JsonSchema;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// A stored range during which a doctor takes no appointments.
/// Both ends are inclusive and already truncated to the hour.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockPeriod {
    pub id: i64,
    pub uuid: Uuid,
    pub doctor_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub description: Option<String>,
}

impl BlockPeriod {
    pub fn covers(&self, reference: NaiveDateTime) -> bool {
        self.start_date <= reference && reference <= self.end_date
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBlockPeriod {
    pub uuid: Uuid,
    pub doctor_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub description: Option<String>,
}

/// Request body for `POST /calendar/blockers`. Dates are RFC 3339 timestamps;
/// the wall-clock part is what gets stored.
#[derive(Deserialize, Debug, Default, Clone, JsonSchema)]
pub struct BlockPeriodRequest {
    pub start_date: Option<DateTime<FixedOffset>>,
    pub end_date: Option<DateTime<FixedOffset>>,
    pub description: Option<String>,
}

impl BlockPeriodRequest {
    pub fn period(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.start_date?.naive_local(), self.end_date?.naive_local()))
    }
}

impl Validate for BlockPeriodRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.start_date.is_none() {
            errors.add("start_date", validation_error("required", "required"));
        }
        if self.end_date.is_none() {
            errors.add("end_date", validation_error("required", "required"));
        }
        if let Some((start, end)) = self.period()
            && end < start
        {
            errors.add("end_date", validation_error("invalid_period", "invalid period"));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn truncate_to_hour(moment: NaiveDateTime) -> NaiveDateTime {
    moment.date().and_time(NaiveTime::MIN) + TimeDelta::hours(i64::from(moment.hour()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).expect("valid timestamp")
    }

    #[test]
    fn missing_dates_are_reported_per_field() {
        let errors = BlockPeriodRequest::default().validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("start_date"));
        assert!(fields.contains_key("end_date"));
    }

    #[test]
    fn end_before_start_is_invalid() {
        let request = BlockPeriodRequest {
            start_date: Some(at("2021-08-10T16:00:00-03:00")),
            end_date: Some(at("2021-08-10T15:00:00-03:00")),
            description: None,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        let end_errors = fields.get("end_date").expect("end_date error");
        assert_eq!(end_errors[0].message.as_deref(), Some("invalid period"));
    }

    #[test]
    fn equal_start_and_end_is_valid() {
        let request = BlockPeriodRequest {
            start_date: Some(at("2021-08-10T15:00:00Z")),
            end_date: Some(at("2021-08-10T15:00:00Z")),
            description: Some("surgery".to_string()),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn period_keeps_wall_clock_time() {
        let request = BlockPeriodRequest {
            start_date: Some(at("2021-08-10T15:30:00-03:00")),
            end_date: Some(at("2021-08-10T16:10:00-03:00")),
            description: None,
        };
        let (start, _) = request.period().expect("period");
        assert_eq!(start, NaiveDate::from_ymd_opt(2021, 8, 10).unwrap().and_hms_opt(15, 30, 0).unwrap());
    }

    #[test]
    fn truncation_drops_minutes_and_seconds() {
        let moment = NaiveDate::from_ymd_opt(2021, 8, 10).unwrap().and_hms_milli_opt(15, 42, 17, 250).unwrap();
        let expected = NaiveDate::from_ymd_opt(2021, 8, 10).unwrap().and_hms_opt(15, 0, 0).unwrap();
        assert_eq!(truncate_to_hour(moment), expected);
    }

    #[test]
    fn covers_is_inclusive_on_both_ends() {
        let day = NaiveDate::from_ymd_opt(2021, 8, 10).unwrap();
        let blocker = BlockPeriod {
            id: 1,
            uuid: Uuid::new_v4(),
            doctor_id: 1,
            start_date: day.and_hms_opt(15, 0, 0).unwrap(),
            end_date: day.and_hms_opt(16, 0, 0).unwrap(),
            description: None,
        };
        assert!(blocker.covers(day.and_hms_opt(15, 0, 0).unwrap()));
        assert!(blocker.covers(day.and_hms_opt(16, 0, 0).unwrap()));
        assert!(!blocker.covers(day.and_hms_opt(14, 0, 0).unwrap()));
        assert!(!blocker.covers(day.and_hms_opt(17, 0, 0).unwrap()));
    }
}
