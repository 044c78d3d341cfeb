//! Domain entities for the clinic booking client.
//!
//! This module contains pure types with no I/O.  Everything here is either
//! deserialized from an API response or serialized into an API request body,
//! so field names follow the backend's camelCase JSON.
//!
//! # What belongs in the domain layer?
//!
//! - The response [`envelope::Envelope`] every endpoint returns
//! - Appointments, their status lifecycle and the aggregate counts shown on
//!   the dashboard
//! - Request payloads for the booking and contact forms
//! - The read-only doctor and service catalogue
//!
//! # What does NOT belong here?
//!
//! - HTTP requests, timers or anything async
//! - Rendering to a page or terminal

pub mod appointment;
pub mod clinic;
pub mod envelope;
pub mod forms;
