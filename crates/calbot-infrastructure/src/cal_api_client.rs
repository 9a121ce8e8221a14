//! CalApiClient - REST client for the Cal.com v2 API.
//!
//! Each endpoint family pins its own `cal-api-version` header. Non-2xx
//! answers surface as [`CalbotError::ProviderHttp`] with the raw body so the
//! model can read the provider's own explanation.

use async_trait::async_trait;
use calbot_core::config::{CalConfig, DEFAULT_CAL_BASE_URL};
use calbot_core::error::{CalbotError, Result};
use calbot_core::scheduling::{
    AvailableSlots, BookingFilter, Cancellation, NewBooking, Reschedule, SchedulingService,
    SlotQuery, compact_slots,
};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value, json};

const VERSION_EVENT_TYPES: &str = "2024-06-14";
const VERSION_SLOTS: &str = "2024-09-04";
const VERSION_BOOKINGS: &str = "2024-08-13";

const EVENT_TYPE_KEEP: &[&str] = &["id", "title", "lengthInMinutes", "description"];
const BOOKING_STRIP: &[&str] = &[
    "meetingUrl",
    "location",
    "metadata",
    "icsUid",
    "bookingFieldsResponses",
    "absentHost",
    "rating",
    "description",
    "cancelledByEmail",
    "rescheduledByEmail",
    "hosts",
];

/// Scheduling provider backed by the Cal.com HTTP API.
#[derive(Clone)]
pub struct CalApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CalApiClient {
    /// Creates a client against the public Cal.com endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_CAL_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &CalConfig) -> Self {
        Self::new(config.api_key.clone()).with_base_url(config.base_url())
    }

    /// Overrides the API root (e.g. a mock server in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder, api_version: &str) -> RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("cal-api-version", api_version)
            .header("content-type", "application/json")
    }

    async fn send(&self, builder: RequestBuilder, operation: &str) -> Result<Value> {
        let response = builder.send().await.map_err(|err| {
            CalbotError::tool_execution(format!("Cal.com {operation} request failed: {err}"))
        })?;
        read_json(response, operation).await
    }
}

async fn read_json(response: Response, operation: &str) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read Cal.com error body".to_string());
        tracing::warn!(status = status.as_u16(), "Cal.com {} failed", operation);
        return Err(CalbotError::provider_http(status.as_u16(), body));
    }

    response.json::<Value>().await.map_err(|err| {
        CalbotError::tool_execution(format!("Failed to parse Cal.com {operation} response: {err}"))
    })
}

/// Keeps only the keys accepted by `keep` in each object of `payload["data"]`.
fn retain_in_data(mut payload: Value, keep: impl Fn(&str) -> bool) -> Value {
    if let Some(items) = payload.get_mut("data").and_then(Value::as_array_mut) {
        for item in items.iter_mut() {
            if let Some(object) = item.as_object_mut() {
                object.retain(|key, _| keep(key));
            }
        }
    }
    payload
}

#[async_trait]
impl SchedulingService for CalApiClient {
    async fn list_event_types(&self) -> Result<Value> {
        let request = self.authorized(
            self.client.get(self.url("/event-types")),
            VERSION_EVENT_TYPES,
        );
        let payload = self.send(request, "list_event_types").await?;
        Ok(retain_in_data(payload, |key| EVENT_TYPE_KEEP.contains(&key)))
    }

    async fn get_available_slots(&self, query: &SlotQuery) -> Result<AvailableSlots> {
        let (start, end) = query.effective_window();
        let mut params = vec![
            ("eventTypeId", query.event_type_id.to_string()),
            ("start", start.format("%Y-%m-%d").to_string()),
            ("end", end.format("%Y-%m-%d").to_string()),
        ];
        if let Some(tz) = query.time_zone.as_deref().filter(|tz| !tz.is_empty()) {
            params.push(("timeZone", tz.to_string()));
        }

        let request = self.authorized(
            self.client.get(self.url("/slots")).query(&params),
            VERSION_SLOTS,
        );
        let raw = self.send(request, "get_available_slots").await?;
        Ok(compact_slots(&raw, query))
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Value> {
        let mut payload = json!({
            "eventTypeId": booking.event_type_id,
            "start": booking.start,
            "attendee": {
                "name": booking.attendee_name,
                "email": booking.attendee_email,
                "timeZone": booking.attendee_timezone,
            },
        });
        if let Some(notes) = booking.notes.as_deref().filter(|n| !n.is_empty()) {
            payload["bookingFieldsResponses"] = json!({ "notes": notes });
        }

        let request = self.authorized(self.client.post(self.url("/bookings")), VERSION_BOOKINGS);
        self.send(request.json(&payload), "create_booking").await
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Value> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(email) = filter.attendee_email.as_deref().filter(|e| !e.is_empty()) {
            params.push(("attendeeEmail", email.to_string()));
        }
        if let Some(status) = filter.status {
            params.push(("status", status.to_string()));
        }

        let request = self.authorized(
            self.client.get(self.url("/bookings")).query(&params),
            VERSION_BOOKINGS,
        );
        let payload = self.send(request, "list_bookings").await?;
        Ok(retain_in_data(payload, |key| !BOOKING_STRIP.contains(&key)))
    }

    async fn cancel_booking(&self, cancellation: &Cancellation) -> Result<Value> {
        let mut payload = Map::new();
        if let Some(reason) = cancellation
            .cancellation_reason
            .as_deref()
            .filter(|r| !r.is_empty())
        {
            payload.insert("cancellationReason".into(), json!(reason));
        }

        let path = format!("/bookings/{}/cancel", cancellation.booking_uid);
        let request = self.authorized(self.client.post(self.url(&path)), VERSION_BOOKINGS);
        self.send(request.json(&payload), "cancel_booking").await
    }

    async fn reschedule_booking(&self, reschedule: &Reschedule) -> Result<Value> {
        let mut payload = json!({ "start": reschedule.new_start });
        if let Some(by) = reschedule.rescheduled_by.as_deref().filter(|b| !b.is_empty()) {
            payload["rescheduledBy"] = json!(by);
        }

        let path = format!("/bookings/{}/reschedule", reschedule.booking_uid);
        let request = self.authorized(self.client.post(self.url(&path)), VERSION_BOOKINGS);
        self.send(request.json(&payload), "reschedule_booking").await
    }
}
