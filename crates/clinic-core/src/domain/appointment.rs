//! Appointment domain entity.
//!
//! Appointments are owned by the server.  The client reads them for the admin
//! dashboard, mutates their status, or deletes them, and never keeps a copy
//! beyond the render pass that displays them: every mutation is followed by a
//! full reload.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server-assigned appointment identifier.
pub type AppointmentId = i64;

/// Lifecycle status of an appointment.
///
/// Serialized exactly as the backend enum (`"PENDING"`, `"CONFIRMED"`,
/// `"CANCELLED"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Error returned when a string does not name an [`AppointmentStatus`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid status '{0}': use PENDING, CONFIRMED, or CANCELLED")]
pub struct StatusParseError(pub String);

impl AppointmentStatus {
    /// All statuses in dashboard display order.
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
    ];

    /// The wire name, e.g. `"CONFIRMED"`.
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Lower-case name used for badge styling (`badge-confirmed`).
    pub fn css_name(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = StatusParseError;

    /// Parses a status name case-insensitively, the way the backend does.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(AppointmentStatus::Pending),
            "CONFIRMED" => Ok(AppointmentStatus::Confirmed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

/// A booked appointment as returned by `GET /api/appointments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_name: String,
    pub phone: String,
    #[serde(default)]
    pub patient_email: Option<String>,
    #[serde(default)]
    pub appointment_datetime: Option<NaiveDateTime>,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Appointment {
    /// Whether the row for this appointment offers a "Confirm" action.
    pub fn can_confirm(&self) -> bool {
        self.status != AppointmentStatus::Confirmed
    }

    /// Whether the row for this appointment offers a "Cancel" action.
    pub fn can_cancel(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }

    /// The DOM identifier of the table row rendering this appointment.
    pub fn row_id(&self) -> String {
        row_id(self.id)
    }
}

/// The DOM identifier of the table row for appointment `id` (`row-{id}`).
pub fn row_id(id: AppointmentId) -> String {
    format!("row-{id}")
}

/// Sorts appointments newest first by `created_at`.
///
/// Appointments without a creation timestamp sort after all others.  The sort
/// is stable, so equal timestamps keep their server order.
pub fn sort_newest_first(appointments: &mut [Appointment]) {
    appointments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Keeps only the appointments whose status equals `status`.
///
/// `None` keeps everything.
pub fn filter_by_status(
    appointments: Vec<Appointment>,
    status: Option<AppointmentStatus>,
) -> Vec<Appointment> {
    match status {
        None => appointments,
        Some(wanted) => appointments
            .into_iter()
            .filter(|a| a.status == wanted)
            .collect(),
    }
}

/// Aggregate counts shown in the dashboard stat cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AppointmentStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
}

impl AppointmentStats {
    /// Counts appointments in total and per status.
    pub fn from_appointments(appointments: &[Appointment]) -> Self {
        appointments
            .iter()
            .fold(Self::default(), |mut stats, appointment| {
                stats.total += 1;
                match appointment.status {
                    AppointmentStatus::Pending => stats.pending += 1,
                    AppointmentStatus::Confirmed => stats.confirmed += 1,
                    AppointmentStatus::Cancelled => stats.cancelled += 1,
                }
                stats
            })
    }

    /// Count for a single status.
    pub fn count(&self, status: AppointmentStatus) -> usize {
        match status {
            AppointmentStatus::Pending => self.pending,
            AppointmentStatus::Confirmed => self.confirmed,
            AppointmentStatus::Cancelled => self.cancelled,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
