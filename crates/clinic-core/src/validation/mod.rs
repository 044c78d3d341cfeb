//! Field-level validation for the booking and contact forms.
//!
//! Validation runs entirely on the client: a form with any [`FieldError`] is
//! never submitted.  Each failing field carries the exact message shown next
//! to the input, and at most one message per field is reported.
//!
//! # Rules
//!
//! | Form    | Field                 | Rule                                   |
//! |---------|-----------------------|----------------------------------------|
//! | booking | `patientName`         | required                               |
//! | booking | `phone`               | required, `^[0-9+\-\s]{7,15}$`         |
//! | booking | `appointmentDatetime` | required, `YYYY-MM-DDTHH:MM`, not before the input minimum |
//! | booking | `patientEmail`        | optional, `local@domain.tld` shape     |
//! | contact | `contactName`         | required                               |
//! | contact | `contactEmail`        | required, `local@domain.tld` shape     |
//! | contact | `contactMessage`      | required                               |

use std::sync::OnceLock;

use chrono::{Duration, NaiveDateTime, Timelike};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::domain::forms::{BookingRequest, ContactMessage};

/// `strftime` format of a `datetime-local` input value.
pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// How far ahead of "now" the earliest bookable slot is.
pub const MIN_BOOKING_LEAD_MINUTES: i64 = 30;

/// Form field identifiers, matching the input element ids.
pub mod field {
    pub const PATIENT_NAME: &str = "patientName";
    pub const PHONE: &str = "phone";
    pub const PATIENT_EMAIL: &str = "patientEmail";
    pub const APPOINTMENT_DATETIME: &str = "appointmentDatetime";
    pub const REASON: &str = "reason";
    pub const CONTACT_NAME: &str = "contactName";
    pub const CONTACT_EMAIL: &str = "contactEmail";
    pub const CONTACT_PHONE: &str = "contactPhone";
    pub const CONTACT_MESSAGE: &str = "contactMessage";
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Id of the offending input.
    pub field: &'static str,
    /// Message shown next to the input.
    pub message: &'static str,
}

/// Every field error found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} form field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// Records `message` for `field`, replacing an earlier message for the
    /// same field.
    fn set(&mut self, field: &'static str, message: &'static str) {
        match self.0.iter_mut().find(|e| e.field == field) {
            Some(existing) => existing.message = message,
            None => self.0.push(FieldError { field, message }),
        }
    }

    /// Returns `true` when no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The message for `field`, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    /// Iterates over the failed fields.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            debug!(failed = self.0.len(), "form validation failed");
            Err(self)
        }
    }
}

/// Raw values of the booking form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub patient_name: String,
    pub phone: String,
    pub patient_email: String,
    pub appointment_datetime: String,
    pub reason: String,
}

/// Raw values of the contact form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // The pattern is a compile-time constant, so building it cannot fail.
    PATTERN.get_or_init(|| Regex::new(r"^[0-9+\-\s]{7,15}$").expect("valid phone pattern"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

/// Returns `true` if `phone` is 7–15 characters of digits, `+`, `-` or whitespace.
pub fn is_valid_phone(phone: &str) -> bool {
    phone_pattern().is_match(phone)
}

/// Returns `true` if `email` has a basic `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// The earliest bookable slot for a clock reading of `now`, truncated to the
/// minute like a `datetime-local` input value.
pub fn earliest_booking_slot(now: NaiveDateTime) -> NaiveDateTime {
    let slot = now + Duration::minutes(MIN_BOOKING_LEAD_MINUTES);
    slot.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(slot)
}

/// [`earliest_booking_slot`] formatted as a `datetime-local` minimum
/// (`YYYY-MM-DDTHH:MM`).
pub fn min_booking_datetime(now: NaiveDateTime) -> String {
    earliest_booking_slot(now)
        .format(DATETIME_INPUT_FORMAT)
        .to_string()
}

/// Validates the booking form and builds the request body.
///
/// `earliest` is the minimum the date-time input accepts (see
/// [`earliest_booking_slot`]); a value before it is rejected the same way the
/// input widget would refuse it.
///
/// # Errors
///
/// Returns every failing field in a [`ValidationErrors`].
pub fn validate_booking(
    form: &BookingForm,
    earliest: NaiveDateTime,
) -> Result<BookingRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = form.patient_name.trim();
    let phone = form.phone.trim();
    let email = form.patient_email.trim();
    let datetime = form.appointment_datetime.trim();

    if name.is_empty() {
        errors.set(field::PATIENT_NAME, "Please enter your full name.");
    }

    if phone.is_empty() {
        errors.set(field::PHONE, "Please enter a valid phone number.");
    } else if !is_valid_phone(phone) {
        errors.set(field::PHONE, "Invalid phone number format.");
    }

    if datetime.is_empty() {
        errors.set(field::APPOINTMENT_DATETIME, "Please select a date and time.");
    } else {
        match NaiveDateTime::parse_from_str(datetime, DATETIME_INPUT_FORMAT) {
            Ok(when) if when < earliest => errors.set(
                field::APPOINTMENT_DATETIME,
                "Please choose a time at least 30 minutes from now.",
            ),
            Ok(_) => {}
            Err(_) => errors.set(field::APPOINTMENT_DATETIME, "Please select a date and time."),
        }
    }

    if !email.is_empty() && !is_valid_email(email) {
        errors.set(field::PATIENT_EMAIL, "Invalid email address.");
    }

    errors.into_result(BookingRequest {
        patient_name: name.to_string(),
        phone: phone.to_string(),
        patient_email: email.to_string(),
        appointment_datetime: datetime.to_string(),
        reason: form.reason.trim().to_string(),
    })
}

/// Validates the contact form and builds the request body.
///
/// # Errors
///
/// Returns every failing field in a [`ValidationErrors`].
pub fn validate_contact(form: &ContactForm) -> Result<ContactMessage, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = form.name.trim();
    let email = form.email.trim();
    let message = form.message.trim();

    if name.is_empty() {
        errors.set(field::CONTACT_NAME, "Please enter your name.");
    }
    if email.is_empty() {
        errors.set(field::CONTACT_EMAIL, "Please enter a valid email.");
    } else if !is_valid_email(email) {
        errors.set(field::CONTACT_EMAIL, "Invalid email address.");
    }
    if message.is_empty() {
        errors.set(field::CONTACT_MESSAGE, "Please enter your message.");
    }

    errors.into_result(ContactMessage {
        name: name.to_string(),
        email: email.to_string(),
        phone: form.phone.trim().to_string(),
        message: message.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-01-05T10:00", DATETIME_INPUT_FORMAT).unwrap()
    }

    fn earliest() -> NaiveDateTime {
        earliest_booking_slot(now())
    }

    fn valid_booking() -> BookingForm {
        BookingForm {
            patient_name: "  Ayesha Rahman ".into(),
            phone: "+880 1711-000000".into(),
            patient_email: "ayesha@example.com".into(),
            appointment_datetime: "2025-01-06T09:30".into(),
            reason: " Checkup ".into(),
        }
    }

    #[test]
    fn test_valid_booking_builds_trimmed_request() {
        // Act
        let req = validate_booking(&valid_booking(), earliest()).unwrap();

        // Assert
        assert_eq!(req.patient_name, "Ayesha Rahman");
        assert_eq!(req.reason, "Checkup");
        assert_eq!(req.appointment_datetime, "2025-01-06T09:30");
    }

    #[test]
    fn test_empty_phone_reports_required_message() {
        let form = BookingForm { phone: String::new(), ..valid_booking() };
        let errors = validate_booking(&form, earliest()).unwrap_err();
        assert_eq!(errors.message_for(field::PHONE), Some("Please enter a valid phone number."));
        assert_eq!(errors.0.len(), 1);
    }

    #[test]
    fn test_malformed_phone_reports_format_message() {
        let form = BookingForm { phone: "12ab".into(), ..valid_booking() };
        let errors = validate_booking(&form, earliest()).unwrap_err();
        assert_eq!(errors.message_for(field::PHONE), Some("Invalid phone number format."));
    }

    #[test]
    fn test_phone_length_bounds() {
        assert!(!is_valid_phone("123456"));
        assert!(is_valid_phone("1234567"));
        assert!(is_valid_phone("123456789012345"));
        assert!(!is_valid_phone("1234567890123456"));
    }

    #[test]
    fn test_optional_email_may_be_blank() {
        let form = BookingForm { patient_email: "   ".into(), ..valid_booking() };
        let req = validate_booking(&form, earliest()).unwrap();
        assert_eq!(req.patient_email, "");
    }

    #[test]
    fn test_malformed_optional_email_is_rejected() {
        let form = BookingForm { patient_email: "no-at-sign.com".into(), ..valid_booking() };
        let errors = validate_booking(&form, earliest()).unwrap_err();
        assert_eq!(errors.message_for(field::PATIENT_EMAIL), Some("Invalid email address."));
    }

    #[test]
    fn test_all_required_booking_fields_reported_together() {
        let errors = validate_booking(&BookingForm::default(), earliest()).unwrap_err();
        assert_eq!(errors.0.len(), 3);
        assert!(errors.message_for(field::PATIENT_NAME).is_some());
        assert!(errors.message_for(field::APPOINTMENT_DATETIME).is_some());
    }

    #[test]
    fn test_booking_before_minimum_is_rejected() {
        let form = BookingForm { appointment_datetime: "2025-01-05T10:15".into(), ..valid_booking() };
        let errors = validate_booking(&form, earliest()).unwrap_err();
        assert!(errors.message_for(field::APPOINTMENT_DATETIME).is_some());
    }

    #[test]
    fn test_booking_at_exact_minimum_is_accepted() {
        let form = BookingForm { appointment_datetime: "2025-01-05T10:30".into(), ..valid_booking() };
        assert!(validate_booking(&form, earliest()).is_ok());
    }

    #[test]
    fn test_min_booking_datetime_is_thirty_minutes_ahead() {
        assert_eq!(min_booking_datetime(now()), "2025-01-05T10:30");
    }

    #[test]
    fn test_earliest_slot_drops_seconds() {
        let now = NaiveDateTime::parse_from_str("2025-01-05T10:00:45", "%Y-%m-%dT%H:%M:%S").unwrap();
        assert_eq!(min_booking_datetime(now), "2025-01-05T10:30");
        assert_eq!(earliest_booking_slot(now).second(), 0);
    }

    #[test]
    fn test_contact_requires_name_email_and_message() {
        let errors = validate_contact(&ContactForm::default()).unwrap_err();
        assert_eq!(errors.message_for(field::CONTACT_NAME), Some("Please enter your name."));
        assert_eq!(errors.message_for(field::CONTACT_EMAIL), Some("Please enter a valid email."));
        assert_eq!(errors.message_for(field::CONTACT_MESSAGE), Some("Please enter your message."));
    }

    #[test]
    fn test_contact_rejects_malformed_email() {
        let form = ContactForm {
            name: "Karim".into(),
            email: "karim@localhost".into(),
            phone: String::new(),
            message: "Hello".into(),
        };
        let errors = validate_contact(&form).unwrap_err();
        assert_eq!(errors.message_for(field::CONTACT_EMAIL), Some("Invalid email address."));
    }

    #[test]
    fn test_contact_phone_is_optional_and_unchecked() {
        let form = ContactForm {
            name: "Karim".into(),
            email: "karim@example.com".into(),
            phone: "call me".into(),
            message: " Hello ".into(),
        };
        let msg = validate_contact(&form).unwrap();
        assert_eq!(msg.message, "Hello");
        assert_eq!(msg.phone, "call me");
    }
}
