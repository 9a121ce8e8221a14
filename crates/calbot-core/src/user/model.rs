//! UserProfile domain model.
//!
//! Best-effort facts about the user, gathered from free text and from the
//! arguments of executed tool calls.

use serde::{Deserialize, Serialize};

/// Timezone assumed for a user until one is observed.
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// User profile domain model.
///
/// Every field is write-once: a value is only recorded when the field is
/// still empty, so the first observation wins for the rest of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Timezone actually observed for this user (not the fallback).
    pub timezone: Option<String>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` unless a name is already known. Returns whether it was recorded.
    pub fn remember_name(&mut self, name: &str) -> bool {
        fill_once(&mut self.name, name)
    }

    /// Records `email` unless an email is already known.
    pub fn remember_email(&mut self, email: &str) -> bool {
        fill_once(&mut self.email, email)
    }

    /// Records `timezone` unless a timezone is already known.
    pub fn remember_timezone(&mut self, timezone: &str) -> bool {
        fill_once(&mut self.timezone, timezone)
    }

    /// Fills every empty field of `self` from `other`.
    pub fn merge(&mut self, other: &UserProfile) {
        if let Some(name) = &other.name {
            self.remember_name(name);
        }
        if let Some(email) = &other.email {
            self.remember_email(email);
        }
        if let Some(timezone) = &other.timezone {
            self.remember_timezone(timezone);
        }
    }

    /// The observed timezone, or `fallback` when none has been seen yet.
    pub fn timezone_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.timezone.as_deref().unwrap_or(fallback)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.timezone.is_none()
    }
}

fn fill_once(slot: &mut Option<String>, value: &str) -> bool {
    let value = value.trim();
    if slot.is_some() || value.is_empty() {
        return false;
    }
    *slot = Some(value.to_string());
    true
}
