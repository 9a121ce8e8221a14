use calbot_core::error::CalbotError;
use calbot_core::scheduling::{
    BookingFilter, BookingStatus, Cancellation, NewBooking, Reschedule, SchedulingService,
    SlotQuery,
};
use calbot_infrastructure::CalApiClient;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> CalApiClient {
    CalApiClient::new("cal_test_key").with_base_url(server.uri())
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn event_types_are_trimmed_to_allow_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/event-types"))
        .and(header("cal-api-version", "2024-06-14"))
        .and(header("authorization", "Bearer cal_test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{
                "id": 7,
                "title": "30 min",
                "lengthInMinutes": 30,
                "description": "Quick chat",
                "slug": "30min",
                "locations": [{ "type": "integration" }],
                "bookingFields": []
            }]
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).list_event_types().await.unwrap();

    assert_eq!(
        result,
        json!({
            "status": "success",
            "data": [{ "id": 7, "title": "30 min", "lengthInMinutes": 30, "description": "Quick chat" }]
        })
    );
}

#[tokio::test]
async fn slots_use_widened_window_and_compact_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slots"))
        .and(header("cal-api-version", "2024-09-04"))
        .and(query_param("eventTypeId", "7"))
        .and(query_param("start", "2026-03-02"))
        .and(query_param("end", "2026-03-03"))
        .and(query_param("timeZone", "America/Los_Angeles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "2026-03-01": [{ "start": "2026-03-01T23:30:00.000-08:00" }],
                "2026-03-02": [{ "start": "2026-03-02T15:00:00.000-08:00" }]
            }
        })))
        .mount(&server)
        .await;

    let query = SlotQuery {
        event_type_id: 7,
        start_time: date("2026-03-02"),
        end_time: date("2026-03-02"),
        time_zone: Some("America/Los_Angeles".to_string()),
    };
    let slots = client_for(&server).get_available_slots(&query).await.unwrap();

    assert_eq!(slots.timezone, "America/Los_Angeles");
    assert_eq!(slots.data.len(), 1);
    let day = &slots.data["2026-03-02"];
    assert_eq!(day[0].local_time, "15:00");
    assert_eq!(day[0].utc, "2026-03-02T23:00:00Z");
}

#[tokio::test]
async fn create_booking_sends_attendee_and_notes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bookings"))
        .and(header("cal-api-version", "2024-08-13"))
        .and(body_json(json!({
            "eventTypeId": 7,
            "start": "2026-03-02T23:00:00Z",
            "attendee": {
                "name": "Jane Doe",
                "email": "jane@example.com",
                "timeZone": "America/Los_Angeles"
            },
            "bookingFieldsResponses": { "notes": "Quarterly review" }
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "status": "success", "data": { "uid": "bk_123" } })),
        )
        .mount(&server)
        .await;

    let booking = NewBooking {
        event_type_id: 7,
        start: "2026-03-02T23:00:00Z".to_string(),
        attendee_name: "Jane Doe".to_string(),
        attendee_email: "jane@example.com".to_string(),
        attendee_timezone: "America/Los_Angeles".to_string(),
        notes: Some("Quarterly review".to_string()),
    };
    let result = client_for(&server).create_booking(&booking).await.unwrap();

    assert_eq!(result["data"]["uid"], "bk_123");
}

#[tokio::test]
async fn list_bookings_strips_verbose_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bookings"))
        .and(query_param("attendeeEmail", "jane@example.com"))
        .and(query_param("status", "upcoming"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{
                "uid": "bk_123",
                "title": "30 min",
                "start": "2026-03-02T23:00:00.000Z",
                "meetingUrl": "https://meet.example.com/x",
                "hosts": [{ "id": 1 }],
                "metadata": {},
                "icsUid": "ics"
            }]
        })))
        .mount(&server)
        .await;

    let filter = BookingFilter {
        attendee_email: Some("jane@example.com".to_string()),
        status: Some(BookingStatus::Upcoming),
    };
    let result = client_for(&server).list_bookings(&filter).await.unwrap();

    assert_eq!(
        result["data"][0],
        json!({ "uid": "bk_123", "title": "30 min", "start": "2026-03-02T23:00:00.000Z" })
    );
}

#[tokio::test]
async fn cancel_and_reschedule_post_to_booking_paths() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bookings/bk_123/cancel"))
        .and(body_json(json!({ "cancellationReason": "Conflict" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bookings/bk_456/reschedule"))
        .and(body_json(json!({ "start": "2026-03-04T17:00:00Z" })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "status": "success", "data": { "uid": "bk_789" } })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cancelled = client
        .cancel_booking(&Cancellation {
            booking_uid: "bk_123".to_string(),
            cancellation_reason: Some("Conflict".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(cancelled["status"], "success");

    let moved = client
        .reschedule_booking(&Reschedule {
            booking_uid: "bk_456".to_string(),
            new_start: "2026-03-04T17:00:00Z".to_string(),
            rescheduled_by: None,
        })
        .await
        .unwrap();
    assert_eq!(moved["data"]["uid"], "bk_789");
}

#[tokio::test]
async fn non_success_status_becomes_provider_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(400).set_body_raw(
            r#"{"status":"error","error":{"message":"start must be in the future"}}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let booking = NewBooking {
        event_type_id: 7,
        start: "2020-01-01T00:00:00Z".to_string(),
        attendee_name: "Jane Doe".to_string(),
        attendee_email: "jane@example.com".to_string(),
        attendee_timezone: "UTC".to_string(),
        notes: None,
    };
    let err = client_for(&server).create_booking(&booking).await.unwrap_err();

    match &err {
        CalbotError::ProviderHttp { status, body } => {
            assert_eq!(*status, 400);
            assert!(body.contains("start must be in the future"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let tool_result = err.to_tool_result();
    assert_eq!(
        tool_result["error"]["error"]["message"],
        "start must be in the future"
    );
}
