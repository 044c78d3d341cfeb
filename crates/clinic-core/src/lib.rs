//! # clinic-core
//!
//! Shared library for the clinic booking client containing the API response
//! envelope, the appointment domain entities, form validation rules, and the
//! HTML escaping used by every renderer.
//!
//! This crate has zero dependencies on HTTP clients, async runtimes or UI
//! surfaces.  The `clinic-desk` crate builds the request gateway, the
//! notification surface and the page controllers on top of it.
//!
//! # Architecture overview
//!
//! - **`domain`** – Types exchanged with the backend API: the `{ success,
//!   data, message }` [`Envelope`], [`Appointment`] and its status lifecycle,
//!   aggregate [`AppointmentStats`], plus the doctor and service catalogue.
//!
//! - **`validation`** – Field-level rules for the booking and contact forms.
//!   A form that fails validation never reaches the network.
//!
//! - **`markup`** – HTML escaping for user-supplied text, so a patient name such
//!   as `<script>` is rendered as text rather than executed.

pub mod domain;
pub mod markup;
pub mod validation;

// Re-export the most-used types at the crate root so callers can write
// `clinic_core::Appointment` instead of `clinic_core::domain::appointment::Appointment`.
pub use domain::appointment::{
    filter_by_status, row_id, sort_newest_first, Appointment, AppointmentId, AppointmentStats,
    AppointmentStatus, StatusParseError,
};
pub use domain::clinic::{Doctor, MedicalService};
pub use domain::envelope::{Envelope, FALLBACK_ERROR_MESSAGE};
pub use domain::forms::{BookingRequest, ContactMessage};
pub use markup::escape_html;
pub use validation::{
    earliest_booking_slot, min_booking_datetime, validate_booking, validate_contact, BookingForm,
    ContactForm, FieldError, ValidationErrors,
};
