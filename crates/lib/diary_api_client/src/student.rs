//! Student resources: own schedule, marks and home tasks.

use chrono::NaiveDate;
use diary_core::models::school::{HomeTask, Mark, Schedule};
use serde::Serialize;

use crate::error::ClientResult;
use crate::gateway::ApiGateway;

/// `?date=YYYY-MM-DD` filter; omitted entirely when `None`.
#[derive(Debug, Serialize)]
struct DateQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
}

/// Typed `/student/*` client.
pub struct StudentApi<'a> {
    gateway: &'a ApiGateway,
}

impl<'a> StudentApi<'a> {
    pub fn new(gateway: &'a ApiGateway) -> Self {
        Self { gateway }
    }

    /// Lessons for one day, ordered by period by the server.
    pub async fn schedule(&self, date: Option<NaiveDate>) -> ClientResult<Vec<Schedule>> {
        self.gateway
            .get_with_query("/student/schedule/", &DateQuery { date })
            .await
    }

    pub async fn schedules(&self, date: Option<NaiveDate>) -> ClientResult<Vec<Schedule>> {
        self.gateway
            .get_with_query("/student/schedules/", &DateQuery { date })
            .await
    }

    pub async fn marks(&self) -> ClientResult<Vec<Mark>> {
        self.gateway.get("/student/marks/").await
    }

    /// Home tasks for lessons on or after `date`.
    pub async fn hometasks(&self, date: Option<NaiveDate>) -> ClientResult<Vec<HomeTask>> {
        self.gateway
            .get_with_query("/student/hometasks/", &DateQuery { date })
            .await
    }
}
