//! Read-only clinic catalogue: doctor profiles and offered services.
//!
//! Both are served by public endpoints (`/api/doctors`, `/api/services`) and
//! need no credential.

use serde::{Deserialize, Serialize};

/// A doctor profile as returned by `GET /api/doctors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub clinic_timing: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub clinic_name: Option<String>,
    #[serde(default)]
    pub consultation_fee: Option<f64>,
}

/// A medical service offered by the clinic (`GET /api/services`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalService {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Icon class such as `fa-heart`.
    #[serde(default)]
    pub icon_class: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_doctor_tolerates_missing_optional_fields() {
        let d: Doctor = serde_json::from_value(json!({ "id": 1, "name": "Dr. Karim" })).unwrap();
        assert_eq!(d.name, "Dr. Karim");
        assert!(d.consultation_fee.is_none());
    }

    #[test]
    fn test_service_defaults_to_active() {
        let s: MedicalService =
            serde_json::from_value(json!({ "id": 3, "name": "ECG", "iconClass": "fa-heart" }))
                .unwrap();
        assert!(s.active);
        assert_eq!(s.display_order, 0);
        assert_eq!(s.icon_class.as_deref(), Some("fa-heart"));
    }
}
