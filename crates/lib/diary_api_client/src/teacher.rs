//! Teacher resources: lessons, schedules, students, marks, periods and home
//! tasks.
//!
//! Every create/update validates its input before the gateway is touched.

use diary_core::models::school::{
    HomeTask, HomeTaskInput, Lesson, LessonInput, Mark, MarkInput, Period, Schedule,
    ScheduleInput, Student, StudentInput,
};

use crate::error::ClientResult;
use crate::gateway::ApiGateway;

const LESSONS: &str = "/teacher/lessons/";
const SCHEDULES: &str = "/teacher/schedules/";
const STUDENTS: &str = "/teacher/students/";
const MARKS: &str = "/teacher/marks/";
const PERIODS: &str = "/teacher/periods/";
const HOMETASKS: &str = "/teacher/hometasks/";

fn item(collection: &str, id: i64) -> String {
    format!("{collection}{id}/")
}

/// Typed `/teacher/*` client.
pub struct TeacherApi<'a> {
    gateway: &'a ApiGateway,
}

impl<'a> TeacherApi<'a> {
    pub fn new(gateway: &'a ApiGateway) -> Self {
        Self { gateway }
    }

    // Lessons

    pub async fn lessons(&self) -> ClientResult<Vec<Lesson>> {
        self.gateway.get(LESSONS).await
    }

    pub async fn lesson(&self, id: i64) -> ClientResult<Lesson> {
        self.gateway.get(&item(LESSONS, id)).await
    }

    pub async fn create_lesson(&self, input: &LessonInput) -> ClientResult<Lesson> {
        input.validate()?;
        self.gateway.post(LESSONS, input).await
    }

    pub async fn update_lesson(&self, id: i64, input: &LessonInput) -> ClientResult<Lesson> {
        input.validate()?;
        self.gateway.put(&item(LESSONS, id), input).await
    }

    pub async fn delete_lesson(&self, id: i64) -> ClientResult<()> {
        self.gateway.delete(&item(LESSONS, id)).await
    }

    // Schedules

    pub async fn schedules(&self) -> ClientResult<Vec<Schedule>> {
        self.gateway.get(SCHEDULES).await
    }

    pub async fn schedule(&self, id: i64) -> ClientResult<Schedule> {
        self.gateway.get(&item(SCHEDULES, id)).await
    }

    /// The write serializer echoes ids rather than nested objects, so the
    /// response is returned as raw JSON.
    pub async fn create_schedule(&self, input: &ScheduleInput) -> ClientResult<serde_json::Value> {
        input.validate()?;
        self.gateway.post(SCHEDULES, input).await
    }

    pub async fn update_schedule(
        &self,
        id: i64,
        input: &ScheduleInput,
    ) -> ClientResult<serde_json::Value> {
        input.validate()?;
        self.gateway.put(&item(SCHEDULES, id), input).await
    }

    pub async fn delete_schedule(&self, id: i64) -> ClientResult<()> {
        self.gateway.delete(&item(SCHEDULES, id)).await
    }

    // Students

    pub async fn students(&self) -> ClientResult<Vec<Student>> {
        self.gateway.get(STUDENTS).await
    }

    pub async fn create_student(&self, input: &StudentInput) -> ClientResult<Student> {
        input.validate(true)?;
        self.gateway.post(STUDENTS, input).await
    }

    pub async fn update_student(&self, id: i64, input: &StudentInput) -> ClientResult<Student> {
        input.validate(false)?;
        self.gateway.put(&item(STUDENTS, id), input).await
    }

    pub async fn delete_student(&self, id: i64) -> ClientResult<()> {
        self.gateway.delete(&item(STUDENTS, id)).await
    }

    /// Marks of one student (`/teacher/students/{id}/marks/`).
    pub async fn student_marks(&self, student_id: i64) -> ClientResult<Vec<Mark>> {
        self.gateway
            .get(&format!("{STUDENTS}{student_id}/marks/"))
            .await
    }

    // Marks

    pub async fn marks(&self) -> ClientResult<Vec<Mark>> {
        self.gateway.get(MARKS).await
    }

    pub async fn create_mark(&self, input: &MarkInput) -> ClientResult<Mark> {
        input.validate()?;
        self.gateway.post(MARKS, input).await
    }

    pub async fn update_mark(&self, id: i64, input: &MarkInput) -> ClientResult<Mark> {
        input.validate()?;
        self.gateway.put(&item(MARKS, id), input).await
    }

    pub async fn delete_mark(&self, id: i64) -> ClientResult<()> {
        self.gateway.delete(&item(MARKS, id)).await
    }

    // Periods (read-only)

    pub async fn periods(&self) -> ClientResult<Vec<Period>> {
        self.gateway.get(PERIODS).await
    }

    // Home tasks

    pub async fn hometasks(&self) -> ClientResult<Vec<HomeTask>> {
        self.gateway.get(HOMETASKS).await
    }

    pub async fn create_hometask(&self, input: &HomeTaskInput) -> ClientResult<HomeTask> {
        input.validate()?;
        self.gateway.post(HOMETASKS, input).await
    }

    pub async fn update_hometask(&self, id: i64, input: &HomeTaskInput) -> ClientResult<HomeTask> {
        input.validate()?;
        self.gateway.put(&item(HOMETASKS, id), input).await
    }

    pub async fn delete_hometask(&self, id: i64) -> ClientResult<()> {
        self.gateway.delete(&item(HOMETASKS, id)).await
    }
}
