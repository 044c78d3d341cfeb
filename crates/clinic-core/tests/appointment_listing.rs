//! Integration tests for the clinic-core listing pipeline.
//!
//! These tests decode a list response exactly as the backend sends it and run
//! it through the public API the dashboard uses: envelope decoding, stats,
//! newest-first ordering, status filtering and markup escaping.

use clinic_core::{
    escape_html, filter_by_status, sort_newest_first, Appointment, AppointmentStats,
    AppointmentStatus, Envelope,
};
use serde_json::json;

fn list_response() -> Envelope {
    serde_json::from_value(json!({
        "success": true,
        "message": "Appointments retrieved",
        "data": [
            {
                "id": 1, "patientName": "First", "phone": "0123456789",
                "appointmentDatetime": "2025-02-01T09:00:00", "status": "PENDING",
                "createdAt": "2025-01-01T09:00:00"
            },
            {
                "id": 3, "patientName": "<script>", "phone": "0123456789",
                "patientEmail": "x@y.z", "reason": "Fever & cough",
                "appointmentDatetime": "2025-02-03T09:00:00", "status": "CONFIRMED",
                "createdAt": "2025-01-03T09:00:00"
            },
            {
                "id": 2, "patientName": "Second", "phone": "0123456789",
                "appointmentDatetime": "2025-02-02T09:00:00", "status": "CANCELLED",
                "createdAt": "2025-01-02T09:00:00"
            }
        ]
    }))
    .expect("list response must decode")
}

#[test]
fn test_list_response_decodes_into_appointments() {
    let list: Vec<Appointment> = list_response().data_or_default().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[1].reason.as_deref(), Some("Fever & cough"));
}

#[test]
fn test_stats_then_sort_then_filter() {
    // Arrange
    let mut list: Vec<Appointment> = list_response().data_or_default().unwrap();

    // Act
    let stats = AppointmentStats::from_appointments(&list);
    sort_newest_first(&mut list);
    let confirmed = filter_by_status(list.clone(), Some(AppointmentStatus::Confirmed));

    // Assert
    assert_eq!(stats.total, 3);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.confirmed, 1);
    assert_eq!(stats.cancelled, 1);
    assert_eq!(list.iter().map(|a| a.id).collect::<Vec<_>>(), vec![3, 2, 1]);
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].id, 3);
}

#[test]
fn test_user_text_from_the_wire_escapes_cleanly() {
    let list: Vec<Appointment> = list_response().data_or_default().unwrap();
    let hostile = list.iter().find(|a| a.id == 3).unwrap();
    assert_eq!(escape_html(&hostile.patient_name), "&lt;script&gt;");
    assert_eq!(
        escape_html(hostile.reason.as_deref().unwrap_or_default()),
        "Fever &amp; cough"
    );
}

#[test]
fn test_failed_envelope_without_data_yields_empty_list() {
    let env: Envelope = serde_json::from_value(json!({ "success": false })).unwrap();
    let list: Vec<Appointment> = env.data_or_default().unwrap();
    assert!(list.is_empty());
}
