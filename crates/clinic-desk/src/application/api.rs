//! Typed clinic API built on the [`Gateway`].
//!
//! Each method maps to one backend endpoint, builds its URL from the base URL
//! (percent-encoding the `adminPassword` query value), sends it through the
//! gateway and decodes the envelope `data` into domain types.
//!
//! | Method                 | HTTP                                          |
//! |------------------------|-----------------------------------------------|
//! | `list_appointments`    | `GET /api/appointments?adminPassword=…`        |
//! | `get_appointment`      | `GET /api/appointments/{id}?adminPassword=…`   |
//! | `update_status`        | `PUT /api/appointments/{id}/status?adminPassword=…` |
//! | `delete_appointment`   | `DELETE /api/appointments/{id}?adminPassword=…` |
//! | `book_appointment`     | `POST /api/appointments`                       |
//! | `send_contact_message` | `POST /api/contact`                            |
//! | `doctors` / `doctor`   | `GET /api/doctors[/{id}]`                      |
//! | `services` / `service` | `GET /api/services[/{id}]`                     |

use std::fmt;

use clinic_core::{
    Appointment, AppointmentId, AppointmentStatus, BookingRequest, ContactMessage, Doctor,
    Envelope, MedicalService,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use super::gateway::{AbortHandle, ApiError, ApiRequest, Gateway, Method};

/// API origin used when the page is served locally.
pub const LOCAL_API_URL: &str = "http://localhost:8080";

/// API origin used everywhere else.
pub const PRODUCTION_API_URL: &str = "https://doctor-website-api.onrender.com";

/// Query parameter that carries the admin credential.
pub const ADMIN_PASSWORD_PARAM: &str = "adminPassword";

/// The admin password held for one dashboard session.
///
/// The value is never logged: `Debug` prints a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredential(String);

impl AdminCredential {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// The raw password, for building the query string.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminCredential(***)")
    }
}

/// Picks the API origin for a page served from `page_origin`.
///
/// `localhost`, `127.0.0.1` and `file:` pages talk to `local`; everything
/// else talks to `production`.
///
/// # Errors
///
/// Returns [`ApiError::InvalidUrl`] if the chosen origin does not parse.
pub fn resolve_base_url(page_origin: &Url, local: &str, production: &str) -> Result<Url, ApiError> {
    let is_local = page_origin.scheme() == "file"
        || matches!(page_origin.host_str(), Some("localhost") | Some("127.0.0.1"));
    let chosen = if is_local { local } else { production };
    Url::parse(chosen).map_err(|e| ApiError::InvalidUrl(format!("{chosen}: {e}")))
}

/// Typed access to the clinic backend.
#[derive(Clone)]
pub struct ClinicApi {
    gateway: Gateway,
    base_url: Url,
}

impl ClinicApi {
    pub fn new(gateway: Gateway, base_url: Url) -> Self {
        Self { gateway, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `{base}{path}`, keeping any path prefix of the base URL.
    fn endpoint(&self, path: &str, credential: Option<&AdminCredential>) -> Result<Url, ApiError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{path}"))
            .map_err(|e| ApiError::InvalidUrl(format!("{base}{path}: {e}")))?;
        if let Some(credential) = credential {
            url.query_pairs_mut()
                .append_pair(ADMIN_PASSWORD_PARAM, credential.expose());
        }
        Ok(url)
    }

    async fn send(&self, request: ApiRequest, abort: &AbortHandle) -> Result<Envelope, ApiError> {
        self.gateway.fetch_abortable(request, abort).await
    }

    // ── Admin endpoints ──────────────────────────────────────────────────────

    /// Lists every appointment in server order.
    ///
    /// # Errors
    ///
    /// Returns the gateway error, or [`ApiError::Decode`] if `data` is not a
    /// list of appointments.
    pub async fn list_appointments(
        &self,
        credential: &AdminCredential,
        abort: &AbortHandle,
    ) -> Result<Vec<Appointment>, ApiError> {
        let url = self.endpoint("/api/appointments", Some(credential))?;
        let envelope = self.send(ApiRequest::get(url), abort).await?;
        decode_or_default(&envelope)
    }

    /// Fetches one appointment.
    ///
    /// # Errors
    ///
    /// Returns the gateway error, or [`ApiError::Decode`] if `data` is missing
    /// or malformed.
    pub async fn get_appointment(
        &self,
        id: AppointmentId,
        credential: &AdminCredential,
        abort: &AbortHandle,
    ) -> Result<Appointment, ApiError> {
        let url = self.endpoint(&format!("/api/appointments/{id}"), Some(credential))?;
        let envelope = self.send(ApiRequest::get(url), abort).await?;
        decode(&envelope)
    }

    /// Sets the status of appointment `id`.
    ///
    /// # Errors
    ///
    /// Returns the gateway error.
    pub async fn update_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
        credential: &AdminCredential,
        abort: &AbortHandle,
    ) -> Result<Envelope, ApiError> {
        let url = self.endpoint(&format!("/api/appointments/{id}/status"), Some(credential))?;
        let request = ApiRequest::new(Method::Put, url).with_json(&json!({ "status": status }))?;
        self.send(request, abort).await
    }

    /// Deletes appointment `id`.
    ///
    /// # Errors
    ///
    /// Returns the gateway error.
    pub async fn delete_appointment(
        &self,
        id: AppointmentId,
        credential: &AdminCredential,
        abort: &AbortHandle,
    ) -> Result<Envelope, ApiError> {
        let url = self.endpoint(&format!("/api/appointments/{id}"), Some(credential))?;
        self.send(ApiRequest::new(Method::Delete, url), abort).await
    }

    // ── Public endpoints ─────────────────────────────────────────────────────

    /// Submits a booking from the public form.
    ///
    /// # Errors
    ///
    /// Returns the gateway error.
    pub async fn book_appointment(
        &self,
        booking: &BookingRequest,
        abort: &AbortHandle,
    ) -> Result<Envelope, ApiError> {
        let url = self.endpoint("/api/appointments", None)?;
        let request = ApiRequest::new(Method::Post, url).with_json(booking)?;
        self.send(request, abort).await
    }

    /// Submits a contact-form message.
    ///
    /// # Errors
    ///
    /// Returns the gateway error.
    pub async fn send_contact_message(
        &self,
        message: &ContactMessage,
        abort: &AbortHandle,
    ) -> Result<Envelope, ApiError> {
        let url = self.endpoint("/api/contact", None)?;
        let request = ApiRequest::new(Method::Post, url).with_json(message)?;
        self.send(request, abort).await
    }

    /// Lists the clinic's doctors.
    ///
    /// # Errors
    ///
    /// Returns the gateway error or [`ApiError::Decode`].
    pub async fn doctors(&self, abort: &AbortHandle) -> Result<Vec<Doctor>, ApiError> {
        let url = self.endpoint("/api/doctors", None)?;
        decode_or_default(&self.send(ApiRequest::get(url), abort).await?)
    }

    /// Fetches one doctor.
    ///
    /// # Errors
    ///
    /// Returns the gateway error or [`ApiError::Decode`].
    pub async fn doctor(&self, id: i64, abort: &AbortHandle) -> Result<Doctor, ApiError> {
        let url = self.endpoint(&format!("/api/doctors/{id}"), None)?;
        decode(&self.send(ApiRequest::get(url), abort).await?)
    }

    /// Lists the active medical services, ordered by `displayOrder`.
    ///
    /// # Errors
    ///
    /// Returns the gateway error or [`ApiError::Decode`].
    pub async fn services(&self, abort: &AbortHandle) -> Result<Vec<MedicalService>, ApiError> {
        let url = self.endpoint("/api/services", None)?;
        let mut services: Vec<MedicalService> =
            decode_or_default(&self.send(ApiRequest::get(url), abort).await?)?;
        services.sort_by_key(|s| s.display_order);
        Ok(services)
    }

    /// Fetches one medical service.
    ///
    /// # Errors
    ///
    /// Returns the gateway error or [`ApiError::Decode`].
    pub async fn service(&self, id: i64, abort: &AbortHandle) -> Result<MedicalService, ApiError> {
        let url = self.endpoint(&format!("/api/services/{id}"), None)?;
        decode(&self.send(ApiRequest::get(url), abort).await?)
    }
}

fn decode_or_default<U: DeserializeOwned + Default>(envelope: &Envelope) -> Result<U, ApiError> {
    envelope
        .data_or_default()
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<U: DeserializeOwned>(envelope: &Envelope) -> Result<U, ApiError> {
    envelope
        .data_as()
        .map_err(|e| ApiError::Decode(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::gateway::HttpTransport;
    use crate::infrastructure::mock::ScriptedTransport;
    use std::sync::Arc;

    fn api(transport: &Arc<ScriptedTransport>, base: &str) -> ClinicApi {
        let gateway = Gateway::new(Arc::clone(transport) as Arc<dyn HttpTransport>);
        ClinicApi::new(gateway, Url::parse(base).unwrap())
    }

    fn page(origin: &str) -> Url {
        Url::parse(origin).unwrap()
    }

    #[test]
    fn test_local_origins_use_local_api() {
        for origin in [
            "http://localhost:5500/admin.html",
            "http://127.0.0.1:3000/",
            "file:///home/me/site/index.html",
        ] {
            let base = resolve_base_url(&page(origin), LOCAL_API_URL, PRODUCTION_API_URL).unwrap();
            assert_eq!(base.as_str(), "http://localhost:8080/", "origin {origin}");
        }
    }

    #[test]
    fn test_public_origin_uses_production_api() {
        let base = resolve_base_url(
            &page("https://clinic.example.com/"),
            LOCAL_API_URL,
            PRODUCTION_API_URL,
        )
        .unwrap();
        assert_eq!(base.host_str(), Some("doctor-website-api.onrender.com"));
    }

    #[test]
    fn test_unparseable_origin_is_reported() {
        let err = resolve_base_url(&page("http://localhost/"), "not a url", PRODUCTION_API_URL)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_credential_debug_hides_password() {
        let credential = AdminCredential::new("hunter2");
        assert_eq!(format!("{credential:?}"), "AdminCredential(***)");
    }

    #[tokio::test]
    async fn test_admin_password_is_percent_encoded() {
        // Arrange
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, serde_json::json!({ "success": true, "data": [] }));
        let api = api(&transport, "http://localhost:8080");

        // Act
        let list = api
            .list_appointments(&AdminCredential::new("p&ss word"), &AbortHandle::new())
            .await
            .unwrap();

        // Assert
        assert!(list.is_empty());
        let sent = transport.requests();
        assert_eq!(
            sent[0].url.as_str(),
            "http://localhost:8080/api/appointments?adminPassword=p%26ss+word"
        );
    }

    #[tokio::test]
    async fn test_update_status_sends_put_with_status_body() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, serde_json::json!({ "success": true }));
        let api = api(&transport, "http://localhost:8080/");

        api.update_status(
            9,
            AppointmentStatus::Cancelled,
            &AdminCredential::new("pw"),
            &AbortHandle::new(),
        )
        .await
        .unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Put);
        assert_eq!(sent[0].url.path(), "/api/appointments/9/status");
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"status":"CANCELLED"}"#));
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, serde_json::json!({ "success": true, "data": [] }));
        let api = api(&transport, "https://api.example.com/clinic/");

        api.doctors(&AbortHandle::new()).await.unwrap();

        assert_eq!(
            transport.requests()[0].url.as_str(),
            "https://api.example.com/clinic/api/doctors"
        );
    }

    #[tokio::test]
    async fn test_booking_is_posted_without_credential() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(201, serde_json::json!({ "success": true, "data": { "id": 1 } }));
        let api = api(&transport, LOCAL_API_URL);
        let booking = BookingRequest {
            patient_name: "Rahim".into(),
            phone: "01711000000".into(),
            patient_email: String::new(),
            appointment_datetime: "2030-01-01T10:00".into(),
            reason: String::new(),
        };

        api.book_appointment(&booking, &AbortHandle::new()).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.url.query(), None);
        assert!(sent.body.as_deref().unwrap().contains(r#""patientName":"Rahim""#));
    }

    #[tokio::test]
    async fn test_services_are_ordered_by_display_order() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(
            200,
            serde_json::json!({ "success": true, "data": [
                { "id": 1, "name": "Surgery", "displayOrder": 3 },
                { "id": 2, "name": "Checkup", "displayOrder": 1 }
            ]}),
        );

        let services = api(&transport, LOCAL_API_URL)
            .services(&AbortHandle::new())
            .await
            .unwrap();

        assert_eq!(services[0].name, "Checkup");
    }

    #[tokio::test]
    async fn test_missing_single_item_is_decode_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, serde_json::json!({ "success": true }));

        let err = api(&transport, LOCAL_API_URL)
            .doctor(4, &AbortHandle::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_get_appointment_decodes_one_record() {
        // Arrange
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(
            200,
            serde_json::json!({ "success": true, "data": {
                "id": 42, "patientName": "Karim", "phone": "01711000000",
                "appointmentDatetime": "2025-03-01T11:00:00", "status": "CONFIRMED"
            }}),
        );
        let api = api(&transport, LOCAL_API_URL);

        // Act
        let appointment = api
            .get_appointment(42, &AdminCredential::new("pw"), &AbortHandle::new())
            .await
            .unwrap();

        // Assert
        assert_eq!(appointment.id, 42);
        assert_eq!(appointment.patient_name, "Karim");
        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Get);
        assert_eq!(sent.url.path(), "/api/appointments/42");
        assert_eq!(sent.url.query(), Some("adminPassword=pw"));
    }

    #[tokio::test]
    async fn test_service_fetches_by_id_without_credential() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(
            200,
            serde_json::json!({ "success": true, "data": {
                "id": 5, "name": "Cardiology", "iconClass": "fa-heart", "displayOrder": 2
            }}),
        );

        let service = api(&transport, LOCAL_API_URL)
            .service(5, &AbortHandle::new())
            .await
            .unwrap();

        assert_eq!(service.name, "Cardiology");
        assert_eq!(service.icon_class.as_deref(), Some("fa-heart"));
        assert!(service.active);
        let sent = &transport.requests()[0];
        assert_eq!(sent.url.path(), "/api/services/5");
        assert_eq!(sent.url.query(), None);
    }
}
