//! Gateway behaviour against a mock diary API: bearer attachment, refresh on
//! expiry, refresh coalescing and failure surfacing.

mod common;

use std::sync::Arc;

use common::{NOW, RefreshOnlyStore, harness, harness_with, token};
use diary_api_client::{ClientError, StudentApi, TeacherApi};
use diary_core::models::auth::Role;
use diary_core::models::school::MarkInput;
use serde_json::json;
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn lessons_body() -> serde_json::Value {
    json!([{ "id": 1, "name": "Algebra", "teacher": { "id": 11, "username": "mr_t" } }])
}

#[tokio::test]
async fn valid_token_is_attached_without_refresh() {
    let h = harness().await;
    let access = token(Role::Teacher, NOW + 300);
    h.store.save(&access, "refresh-1").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/teacher/lessons/"))
        .and(header("authorization", format!("Bearer {access}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(lessons_body()))
        .expect(1)
        .mount(&h.server)
        .await;

    let lessons = TeacherApi::new(&h.gateway).lessons().await.unwrap();
    assert_eq!(lessons[0].name, "Algebra");
}

#[tokio::test]
async fn expired_token_refreshes_exactly_once() {
    let h = harness().await;
    h.store
        .save(&token(Role::Teacher, NOW - 1), "refresh-1")
        .unwrap();
    let fresh = token(Role::Teacher, NOW + 300);

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .and(body_json(json!({ "refresh": "refresh-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": fresh })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/teacher/lessons/"))
        .and(header("authorization", format!("Bearer {fresh}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(lessons_body()))
        .expect(2)
        .mount(&h.server)
        .await;

    let api = TeacherApi::new(&h.gateway);
    api.lessons().await.unwrap();
    assert_eq!(h.store.access().as_deref(), Some(fresh.as_str()));
    assert_eq!(h.store.refresh().as_deref(), Some("refresh-1"));

    // Still inside the new token's validity window: no second refresh.
    h.clock.advance(120);
    api.lessons().await.unwrap();
}

#[tokio::test]
async fn token_at_exact_expiry_is_refreshed() {
    let h = harness().await;
    h.store.save(&token(Role::Teacher, NOW), "r").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": token(Role::Teacher, NOW + 60) })),
        )
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/teacher/periods/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&h.server)
        .await;

    let periods = TeacherApi::new(&h.gateway).periods().await.unwrap();
    assert!(periods.is_empty());
}

#[tokio::test]
async fn concurrent_requests_share_one_refresh() {
    let h = harness().await;
    h.store.save(&token(Role::Teacher, NOW - 10), "r").unwrap();
    let fresh = token(Role::Teacher, NOW + 300);

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": fresh }))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(header("authorization", format!("Bearer {fresh}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(3)
        .mount(&h.server)
        .await;

    let api = TeacherApi::new(&h.gateway);
    let (marks, students, periods) = tokio::join!(api.marks(), api.students(), api.periods());
    assert!(marks.unwrap().is_empty());
    assert!(students.unwrap().is_empty());
    assert!(periods.unwrap().is_empty());
}

#[tokio::test]
async fn rotated_refresh_token_is_persisted() {
    let h = harness().await;
    h.store.save(&token(Role::Student, NOW - 1), "old").unwrap();
    let fresh = token(Role::Student, NOW + 300);

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access": fresh, "refresh": "new" })),
        )
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/student/marks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&h.server)
        .await;

    StudentApi::new(&h.gateway).marks().await.unwrap();
    assert_eq!(h.store.refresh().as_deref(), Some("new"));
    assert_eq!(h.store.access().as_deref(), Some(fresh.as_str()));
}

#[tokio::test]
async fn failed_refresh_surfaces_session_expired_and_sends_nothing() {
    let h = harness().await;
    let stale = token(Role::Teacher, NOW - 1);
    h.store.save(&stale, "revoked").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "invalid" })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/teacher/lessons/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = TeacherApi::new(&h.gateway).lessons().await.unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired));
    assert!(err.requires_login());
    // The stale token is left alone; the UI decides whether to log out.
    assert_eq!(h.store.access().as_deref(), Some(stale.as_str()));
}

#[tokio::test]
async fn expired_token_without_refresh_token_is_session_expired() {
    let h = harness().await;
    h.store.set_access(&token(Role::Teacher, NOW - 1)).unwrap();

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = TeacherApi::new(&h.gateway).lessons().await.unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired));
}

#[tokio::test]
async fn undecodable_token_is_refreshed() {
    let h = harness().await;
    h.store.save("garbage", "r").unwrap();
    let fresh = token(Role::Teacher, NOW + 300);

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": fresh })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/teacher/lessons/"))
        .and(header("authorization", format!("Bearer {fresh}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&h.server)
        .await;

    TeacherApi::new(&h.gateway).lessons().await.unwrap();
}

#[tokio::test]
async fn refresh_token_only_sends_unauthenticated_without_refreshing() {
    let h = harness_with(Arc::new(RefreshOnlyStore::new("r")), |_| {}).await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/student/marks/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "no creds" })))
        .expect(1)
        .mount(&h.server)
        .await;

    assert!(!h.gateway.session().is_authenticated());
    let err = StudentApi::new(&h.gateway).marks().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));

    let requests = h.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn refresh_token_only_refreshes_when_opted_in() {
    let h = harness_with(Arc::new(RefreshOnlyStore::new("r")), |config| {
        config.refresh_on_missing_access = true;
    })
    .await;
    let fresh = token(Role::Student, NOW + 300);

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": fresh })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/student/marks/"))
        .and(header("authorization", format!("Bearer {fresh}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&h.server)
        .await;

    StudentApi::new(&h.gateway).marks().await.unwrap();
}

#[tokio::test]
async fn api_401_is_unauthorized_even_with_locally_valid_token() {
    let h = harness().await;
    h.store.save(&token(Role::Teacher, NOW + 300), "r").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/teacher/marks/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token revoked"))
        .mount(&h.server)
        .await;

    assert!(h.gateway.session().is_authenticated());
    let err = TeacherApi::new(&h.gateway).marks().await.unwrap_err();
    match err {
        ClientError::Unauthorized(body) => assert_eq!(body, "token revoked"),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_keep_status_and_body() {
    let h = harness().await;
    h.store.save(&token(Role::Teacher, NOW + 300), "r").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/teacher/schedules/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "non_field_errors": ["A schedule already exists for this date and period."]
        })))
        .mount(&h.server)
        .await;

    let input = diary_core::models::school::ScheduleInput {
        lesson_id: 1,
        date: chrono::NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
        period_id: 2,
    };
    let err = TeacherApi::new(&h.gateway)
        .create_schedule(&input)
        .await
        .unwrap_err();
    match err {
        ClientError::Http { status, body } => {
            assert_eq!(status.as_u16(), 400);
            assert!(body.contains("already exists"));
        }
        other => panic!("expected Http, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_mark_never_reaches_the_network() {
    let h = harness().await;
    h.store.save(&token(Role::Teacher, NOW - 1), "r").unwrap();

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let api = TeacherApi::new(&h.gateway);
    for mark in [0, 13, -1] {
        let err = api
            .create_mark(&MarkInput {
                student: 1,
                schedule: 1,
                mark,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)), "mark {mark}");
    }
}

#[tokio::test]
async fn valid_mark_is_posted() {
    let h = harness().await;
    h.store.save(&token(Role::Teacher, NOW + 300), "r").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/teacher/marks/"))
        .and(body_json(json!({ "student": 5, "schedule": 3, "mark": 12 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 9, "student": 5, "schedule": 3, "mark": 12
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mark = TeacherApi::new(&h.gateway)
        .create_mark(&MarkInput {
            student: 5,
            schedule: 3,
            mark: 12,
        })
        .await
        .unwrap();
    assert_eq!(mark.id, 9);
    assert_eq!(mark.mark, Some(12));
}

#[tokio::test]
async fn student_schedule_sends_date_filter() {
    let h = harness().await;
    h.store.save(&token(Role::Student, NOW + 300), "r").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/student/schedule/"))
        .and(query_param("date", "2024-09-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 3,
            "lesson": { "id": 1, "name": "Algebra" },
            "date": "2024-09-02",
            "period": { "id": 1, "number": 1, "start_time": "08:30:00", "end_time": "09:15:00" }
        }])))
        .expect(1)
        .mount(&h.server)
        .await;

    let schedule = StudentApi::new(&h.gateway)
        .schedule(chrono::NaiveDate::from_ymd_opt(2024, 9, 2))
        .await
        .unwrap();
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].period.number, 1);
}

#[tokio::test]
async fn delete_accepts_empty_body() {
    let h = harness().await;
    h.store.save(&token(Role::Teacher, NOW + 300), "r").unwrap();

    Mock::given(method("DELETE"))
        .and(path("/api/teacher/lessons/4/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    TeacherApi::new(&h.gateway).delete_lesson(4).await.unwrap();
}
