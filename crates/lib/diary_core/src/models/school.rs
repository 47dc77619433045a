//! School resource models, as served by the `/teacher/*` and `/student/*`
//! endpoints.
//!
//! Read models (`Lesson`, `Schedule`, ...) deserialize server responses;
//! `*Input` types are request bodies and carry their own validation.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

/// A foreign key that the server returns either as a bare primary key or as
/// the expanded object, depending on the serializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Related<T> {
    Id(i64),
    Expanded(T),
}

/// Minimal user reference (`{id, username}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<UserRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonInput {
    pub name: String,
}

impl LessonInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::require_text("name", &self.name)?;
        validation::max_chars("name", &self.name, validation::LESSON_NAME_MAX_CHARS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: i64,
    pub number: u32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,
    pub lesson: Lesson,
    pub date: NaiveDate,
    pub period: Period,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub lesson_id: i64,
    pub date: NaiveDate,
    pub period_id: i64,
}

impl ScheduleInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::positive_id("lesson", self.lesson_id)?;
        validation::positive_id("period", self.period_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub profile: Option<StudentProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudentInput {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Required when creating, optional when updating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub profile: StudentProfile,
}

impl StudentInput {
    /// `creating` selects the create-time rules (password required).
    pub fn validate(&self, creating: bool) -> Result<(), ValidationError> {
        if creating && self.password.as_deref().is_none_or(|p| p.is_empty()) {
            return Err(ValidationError::Required("password"));
        }
        validation::username("username", &self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub id: i64,
    pub student: Related<UserRef>,
    pub schedule: Related<Schedule>,
    pub mark: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkInput {
    pub student: i64,
    pub schedule: i64,
    pub mark: i64,
}

impl MarkInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::positive_id("student", self.student)?;
        validation::positive_id("schedule", self.schedule)?;
        validation::mark(self.mark).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeTask {
    pub id: i64,
    pub schedule: Related<Schedule>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeTaskInput {
    pub schedule: i64,
    pub description: String,
}

impl HomeTaskInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::positive_id("schedule", self.schedule)?;
        validation::require_text("description", &self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schedule_json() -> serde_json::Value {
        json!({
            "id": 3,
            "lesson": { "id": 1, "name": "Algebra", "teacher": { "id": 9, "username": "mr_t" } },
            "date": "2024-09-02",
            "period": { "id": 2, "number": 2, "start_time": "09:00:00", "end_time": "09:45:00" }
        })
    }

    #[test]
    fn schedule_parses_nested_lesson_and_period() {
        let schedule: Schedule = serde_json::from_value(schedule_json()).unwrap();
        assert_eq!(schedule.lesson.name, "Algebra");
        assert_eq!(schedule.period.number, 2);
        assert_eq!(schedule.date, NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
    }

    #[test]
    fn mark_accepts_ids_or_expanded_relations() {
        let flat: Mark =
            serde_json::from_value(json!({ "id": 1, "student": 5, "schedule": 3, "mark": 10 }))
                .unwrap();
        assert_eq!(flat.student, Related::Id(5));
        assert_eq!(flat.schedule, Related::Id(3));

        let nested: Mark = serde_json::from_value(json!({
            "id": 2,
            "student": { "id": 5, "username": "kid" },
            "schedule": schedule_json(),
            "mark": null
        }))
        .unwrap();
        assert!(matches!(&nested.student, Related::Expanded(user) if user.username == "kid"));
        assert!(matches!(
            &nested.schedule,
            Related::Expanded(schedule) if schedule.lesson.name == "Algebra"
        ));
        assert_eq!(nested.mark, None);
    }

    #[test]
    fn student_input_requires_password_only_on_create() {
        let input = StudentInput {
            username: "new.kid".into(),
            ..Default::default()
        };
        assert_eq!(input.validate(true), Err(ValidationError::Required("password")));
        assert_eq!(input.validate(false), Ok(()));
    }

    #[test]
    fn student_input_omits_missing_password() {
        let input = StudentInput {
            username: "kid".into(),
            ..Default::default()
        };
        let body = serde_json::to_value(&input).unwrap();
        assert!(body.get("password").is_none());
        assert_eq!(body["profile"]["date_of_birth"], json!(null));
    }

    #[test]
    fn mark_input_rejects_out_of_range() {
        let input = MarkInput {
            student: 1,
            schedule: 1,
            mark: 13,
        };
        assert!(matches!(
            input.validate(),
            Err(ValidationError::OutOfRange { field: "mark", .. })
        ));
    }

    #[test]
    fn blank_lesson_name_is_rejected() {
        let input = LessonInput { name: "   ".into() };
        assert_eq!(input.validate(), Err(ValidationError::Required("name")));
    }
}
