#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;

use chrono::NaiveDate;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rollsync_api::{
    ApiClient, Error, EventPayload, LoginRequest, PersonPayload, RecordId, Role, StaticBearer,
    StatsQuery, Status,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let bearer = Arc::new(StaticBearer(SecretString::from("tok-123".to_string())));
    // Trailing slash must not produce `//api`.
    let base = format!("{}/", server.uri());
    let client = ApiClient::from_reqwest(&base, reqwest::Client::new(), bearer).unwrap();
    (server, client)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_people_sends_bearer() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/people"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "id": 1, "identifier": "P1", "name": "Ann" },
                { "id": 2, "studentId": "P2", "name": "Bo", "semester": 2 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let people = client.list_people().await.unwrap();

    assert_eq!(people.len(), 2);
    assert_eq!(people[0].name, "Ann");
    assert_eq!(people[1].identifier, "P2");
    assert_eq!(people[1].level, Some(2));
}

#[tokio::test]
async fn test_list_subjects_missing_data_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/subjects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    assert!(client.list_subjects().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_person_serializes_canonical_fields() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/people"))
        .and(body_json(json!({
            "identifier": "P9",
            "name": "Cy",
            "level": 1
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": { "id": 9, "identifier": "P9", "name": "Cy" }
        })))
        .mount(&server)
        .await;

    let payload = PersonPayload {
        identifier: Some("P9".into()),
        name: Some("Cy".into()),
        level: Some(1),
        ..PersonPayload::default()
    };
    let created = client.create_person(&payload).await.unwrap().unwrap();
    assert_eq!(created.id, Some(RecordId::Number(9)));
}

#[tokio::test]
async fn test_bulk_events_is_one_ordered_request() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/events/bulk"))
        .and(body_json(json!({
            "records": [
                { "personId": 1, "subjectId": 5, "date": "2024-03-01", "status": "present", "recordedBy": 7 },
                { "personId": 2, "subjectId": 5, "date": "2024-03-01", "status": "absent", "recordedBy": 7 }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let records = vec![
        EventPayload {
            person_id: RecordId::Number(1),
            subject_id: RecordId::Number(5),
            date: day(2024, 3, 1),
            status: Status::Present,
            recorded_by: Some(RecordId::Number(7)),
        },
        EventPayload {
            person_id: RecordId::Number(2),
            subject_id: RecordId::Number(5),
            date: day(2024, 3, 1),
            status: Status::Absent,
            recorded_by: Some(RecordId::Number(7)),
        },
    ];
    client.bulk_create_events(&records).await.unwrap();
}

#[tokio::test]
async fn test_create_event_reads_top_level_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/events"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "attendanceId": 42 })),
        )
        .mount(&server)
        .await;

    let payload = EventPayload {
        person_id: RecordId::Number(1),
        subject_id: RecordId::Text("S1".into()),
        date: day(2024, 1, 2),
        status: Status::Late,
        recorded_by: None,
    };
    let id = client.create_event(&payload).await.unwrap();
    assert_eq!(id, Some(RecordId::Number(42)));
}

#[tokio::test]
async fn test_event_lookups_by_date_and_stats_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/events/date/2024-03-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "personId": 1, "subjectId": 2, "date": "2024-03-01", "status": "present" }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/events/stats"))
        .and(query_param("personId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "total": 4, "present": 3, "absent": 1, "percentage": 75.0 }
        })))
        .mount(&server)
        .await;

    let events = client.events_on(day(2024, 3, 1)).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].status, Status::Present);

    let stats = client
        .event_stats(&StatsQuery {
            person_id: Some(RecordId::Number(1)),
            subject_id: None,
        })
        .await
        .unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.present, 3);
}

#[tokio::test]
async fn test_login_posts_to_role_path() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/student/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "fresh",
            "user": { "id": 3, "email": "d@example.com", "role": "student" }
        })))
        .mount(&server)
        .await;

    let resp = client
        .login(
            Role::Secondary,
            &LoginRequest {
                identifier: Some("P3".into()),
                email: "d@example.com".into(),
                password: SecretString::from("pw".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.token.as_deref(), Some("fresh"));
    assert_eq!(resp.user.unwrap().email.as_deref(), Some("d@example.com"));
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_401_is_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/people"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "expired" })))
        .mount(&server)
        .await;

    let err = client.list_people().await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized), "got: {err:?}");
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_success_false_is_rejected_with_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/subjects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "duplicate identifier"
        })))
        .mount(&server)
        .await;

    let err = client
        .create_subject(&rollsync_api::SubjectPayload::default())
        .await
        .unwrap_err();
    assert_eq!(err.service_message(), Some("duplicate identifier"));
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn test_conflict_status_is_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/people/5"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "message": "in use"
        })))
        .mount(&server)
        .await;

    let err = client.delete_person(&RecordId::Number(5)).await.unwrap_err();
    match err {
        Error::Rejected { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message.as_deref(), Some("in use"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/subjects"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = client.list_subjects().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_login_failure_is_rejected_not_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/teacher/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let err = client
        .login(
            Role::Primary,
            &LoginRequest {
                identifier: None,
                email: "t@example.com".into(),
                password: SecretString::from("nope".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.service_message(), Some("Invalid credentials"));
}

#[tokio::test]
async fn test_person_history_reads_nested_resource() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/people/3/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "id": 8, "studentId": 3, "subjectId": 5, "date": "2024-03-01", "status": "late" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let history = client.person_history(&RecordId::Number(3)).await.unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, Status::Late);
    assert_eq!(history[0].date, day(2024, 3, 1));
}

// ── Path construction ───────────────────────────────────────────────

#[tokio::test]
async fn test_text_id_stays_inside_its_resource() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .delete_person(&RecordId::Text("../subjects/5".into()))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent = requests[0].url.path();
    assert!(sent.starts_with("/api/people/"), "sent to {sent}");
    assert!(!sent.contains("/subjects/"), "sent to {sent}");
}

#[tokio::test]
async fn test_dot_segment_id_is_refused_before_sending() {
    let (server, client) = setup().await;

    for id in ["..", ".", ""] {
        let err = client
            .delete_event(&RecordId::Text(id.into()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidId { .. }), "{id:?}: {err:?}");
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_status_skips_only_that_event() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/events/person/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "id": 1, "personId": 3, "subjectId": 5, "date": "2024-03-01", "status": "present" },
                { "id": 2, "personId": 3, "subjectId": 5, "date": "2024-03-02", "status": "excused" },
                { "id": 3, "personId": 3, "subjectId": 5, "date": "2024-03-03", "status": "late" }
            ]
        })))
        .mount(&server)
        .await;

    let events = client.events_for_person(&RecordId::Number(3)).await.unwrap();

    let statuses: Vec<Status> = events.iter().map(|e| e.status).collect();
    assert_eq!(statuses, vec![Status::Present, Status::Late]);
    assert_eq!(events[1].date, day(2024, 3, 3));
}
