//! Dispatch of tool invocations to the time resolver and the scheduling service.

use std::str::FromStr;
use std::sync::Arc;

use calbot_core::error::{CalbotError, Result};
use calbot_core::scheduling::{
    BookingFilter, Cancellation, NewBooking, Reschedule, SchedulingService, SlotQuery,
};
use calbot_core::session::ToolDefinition;
use calbot_core::time;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::catalog::{ToolName, all_definitions};

#[derive(Deserialize)]
struct LocalToUtcArgs {
    date: String,
    time: String,
    timezone: String,
}

#[derive(Deserialize)]
struct UtcToLocalArgs {
    utc_iso: String,
    timezone: String,
}

#[derive(Deserialize)]
struct ResolveDateArgs {
    offset_days: i64,
    timezone: String,
}

/// Immutable catalogue of callable tools.
///
/// Schemas and dispatch are both keyed by [`ToolName`], so a tool cannot be
/// advertised without also being executable.
pub struct ToolRegistry {
    scheduling: Arc<dyn SchedulingService>,
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new(scheduling: Arc<dyn SchedulingService>) -> Self {
        Self {
            scheduling,
            definitions: all_definitions(),
        }
    }

    /// Tool schemas in the shape the completion provider expects.
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Executes the tool `name` with the decoded `arguments` object.
    ///
    /// # Errors
    ///
    /// - `UnknownTool` when `name` is not registered
    /// - `ToolExecution` when `arguments` do not match the tool's parameters
    /// - whatever the resolver or the scheduling service reports
    pub async fn invoke(&self, name: &str, arguments: &Value) -> Result<Value> {
        let tool =
            ToolName::from_str(name).map_err(|_| CalbotError::UnknownTool(name.to_string()))?;
        tracing::debug!(tool = %tool, "Dispatching tool call");

        match tool {
            ToolName::ListEventTypes => self.scheduling.list_event_types().await,
            ToolName::GetAvailableSlots => {
                let query: SlotQuery = decode(tool, arguments)?;
                to_value(self.scheduling.get_available_slots(&query).await?)
            }
            ToolName::CreateBooking => {
                let booking: NewBooking = decode(tool, arguments)?;
                self.scheduling.create_booking(&booking).await
            }
            ToolName::ListBookings => {
                let filter: BookingFilter = decode(tool, arguments)?;
                self.scheduling.list_bookings(&filter).await
            }
            ToolName::CancelBooking => {
                let cancellation: Cancellation = decode(tool, arguments)?;
                self.scheduling.cancel_booking(&cancellation).await
            }
            ToolName::RescheduleBooking => {
                let reschedule: Reschedule = decode(tool, arguments)?;
                self.scheduling.reschedule_booking(&reschedule).await
            }
            ToolName::LocalToUtc => {
                let args: LocalToUtcArgs = decode(tool, arguments)?;
                to_value(time::local_to_utc(&args.date, &args.time, &args.timezone)?)
            }
            ToolName::UtcToLocal => {
                let args: UtcToLocalArgs = decode(tool, arguments)?;
                to_value(time::utc_to_local(&args.utc_iso, &args.timezone)?)
            }
            ToolName::ResolveDate => {
                let args: ResolveDateArgs = decode(tool, arguments)?;
                to_value(time::resolve_date(args.offset_days, &args.timezone)?)
            }
        }
    }
}

fn decode<T: DeserializeOwned>(tool: ToolName, arguments: &Value) -> Result<T> {
    // Tools without parameters may be called with `null`.
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments.clone()
    };
    serde_json::from_value(arguments)
        .map_err(|e| CalbotError::tool_execution(format!("Invalid arguments for {tool}: {e}")))
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| CalbotError::internal(format!("Failed to encode tool result: {e}")))
}
