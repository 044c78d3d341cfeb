//! Request bodies produced by the public booking and contact forms.
//!
//! Values are built by [`crate::validation`] from trimmed form input, so an
//! optional field the visitor left blank is sent as an empty string, the same
//! as the page scripts send it.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/appointments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub patient_name: String,
    pub phone: String,
    pub patient_email: String,
    /// Local date-time in the `YYYY-MM-DDTHH:MM` format of a datetime-local input.
    pub appointment_datetime: String,
    pub reason: String,
}

/// Body of `POST /api/contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_request_uses_camel_case_keys() {
        let req = BookingRequest {
            patient_name: "A".into(),
            phone: "0123456".into(),
            patient_email: String::new(),
            appointment_datetime: "2025-01-05T10:30".into(),
            reason: String::new(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["patientName"], "A");
        assert_eq!(value["appointmentDatetime"], "2025-01-05T10:30");
        assert_eq!(value["patientEmail"], "");
    }
}
