//! End-to-end tests of the page controllers through the public API.
//!
//! Each test wires the controllers to a [`ScriptedTransport`] and the
//! in-memory document views, then checks what reached the "server" and what
//! the page ended up showing.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use clinic_core::validation::field;
use clinic_desk::application::admin::{
    AdminDashboard, Confirmer, DashboardError, DashboardView, SessionState,
};
use clinic_desk::application::api::ClinicApi;
use clinic_desk::application::forms::{
    BookingFormController, ContactFormController, FormError, FormView, CONTACT_SENT_MESSAGE,
};
use clinic_desk::application::gateway::{ApiError, Gateway, HttpTransport, Method};
use clinic_desk::application::notify::{Notifier, ToastSurface};
use clinic_desk::infrastructure::document::{DashboardPage, FormPage, ToastLayer};
use clinic_desk::infrastructure::mock::{FixedConfirmer, ScriptedTransport};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use url::Url;

// ── Fixtures ─────────────────────────────────────────────────────────────────

struct Harness {
    transport: Arc<ScriptedTransport>,
    toasts: Arc<ToastLayer>,
    api: ClinicApi,
    notifier: Arc<Notifier>,
}

impl Harness {
    fn new() -> Self {
        let transport = Arc::new(ScriptedTransport::new());
        let gateway = Gateway::new(Arc::clone(&transport) as Arc<dyn HttpTransport>)
            .with_timeout(Duration::from_secs(2));
        let base = Url::parse("http://localhost:8080").unwrap();
        let toasts = Arc::new(ToastLayer::new());
        let notifier = Arc::new(Notifier::new(Arc::clone(&toasts) as Arc<dyn ToastSurface>));
        Self {
            transport,
            toasts,
            api: ClinicApi::new(gateway, base),
            notifier,
        }
    }

    fn dashboard(&self, confirmer: Arc<FixedConfirmer>) -> (AdminDashboard, Arc<DashboardPage>) {
        let page = Arc::new(DashboardPage::new());
        let dashboard = AdminDashboard::new(
            self.api.clone(),
            Arc::clone(&self.notifier),
            Arc::clone(&page) as Arc<dyn DashboardView>,
            confirmer as Arc<dyn Confirmer>,
        );
        (dashboard, page)
    }

    fn push_list(&self, appointments: Value) {
        self.transport
            .push_json(200, json!({ "success": true, "data": appointments }));
    }

    fn push_ok(&self) {
        self.transport.push_json(200, json!({ "success": true }));
    }

    fn paths(&self) -> Vec<(Method, String)> {
        self.transport
            .requests()
            .iter()
            .map(|r| (r.method, r.url.path().to_string()))
            .collect()
    }
}

fn appointments() -> Value {
    json!([
        {
            "id": 1, "patientName": "Older", "phone": "0123456789",
            "appointmentDatetime": "2025-02-01T09:00:00", "status": "PENDING",
            "createdAt": "2025-01-01T09:00:00"
        },
        {
            "id": 2, "patientName": "<b>Newer</b>", "phone": "0123456789",
            "appointmentDatetime": "2025-02-02T09:00:00", "status": "CONFIRMED",
            "createdAt": "2025-01-02T09:00:00"
        }
    ])
}

fn fixed_now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2025-01-05T10:00", "%Y-%m-%dT%H:%M").unwrap()
}

async fn signed_in(
    h: &Harness,
    confirmer: Arc<FixedConfirmer>,
) -> (AdminDashboard, Arc<DashboardPage>) {
    let (dashboard, page) = h.dashboard(confirmer);
    h.push_list(appointments());
    h.push_list(appointments());
    assert_ok!(dashboard.login("letmein").await);
    (dashboard, page)
}

// ── Admin dashboard ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_loads_table_newest_first_with_escaped_rows() {
    // Arrange
    let h = Harness::new();

    // Act
    let (dashboard, page) = signed_in(&h, Arc::new(FixedConfirmer::declining())).await;

    // Assert
    assert_eq!(dashboard.state(), SessionState::Authenticated);
    let snapshot = page.snapshot();
    assert!(!snapshot.overlay_visible);
    assert!(snapshot.panel_visible);
    assert!(!snapshot.login_button.disabled);
    assert_eq!(snapshot.stats.total, 2);
    assert_eq!(snapshot.stats.pending, 1);
    assert_eq!(page.row_ids(), vec![2, 1]);
    assert!(page.table_body_html().contains("&lt;b&gt;Newer&lt;/b&gt;"));

    for request in h.transport.requests() {
        let query = request.url.query().unwrap_or_default();
        assert_eq!(query, "adminPassword=letmein");
    }
}

#[tokio::test]
async fn test_rejected_password_keeps_login_overlay_and_toasts() {
    // Arrange
    let h = Harness::new();
    let (dashboard, page) = h.dashboard(Arc::new(FixedConfirmer::declining()));
    h.transport
        .push_json(401, json!({ "success": false, "message": "Invalid admin password" }));

    // Act
    let result = dashboard.login("wrong").await;

    // Assert
    assert_err!(&result);
    assert_eq!(dashboard.state(), SessionState::Unauthenticated);
    assert!(page.snapshot().overlay_visible);
    assert!(!page.snapshot().login_button.disabled);
    assert_eq!(
        h.toasts.current_message().as_deref(),
        Some("Invalid admin password. Please try again.")
    );
    assert_eq!(h.transport.requests().len(), 1);
}

#[tokio::test]
async fn test_confirm_click_updates_status_then_reloads() {
    // Arrange
    let h = Harness::new();
    let (dashboard, _page) = signed_in(&h, Arc::new(FixedConfirmer::declining())).await;
    h.push_ok();
    h.push_list(appointments());

    // Act
    assert_ok!(dashboard.handle_row_click("confirm", "1").await);

    // Assert
    let paths = h.paths();
    assert_eq!(paths.len(), 4);
    assert_eq!(paths[2], (Method::Put, "/api/appointments/1/status".to_string()));
    assert_eq!(paths[3], (Method::Get, "/api/appointments".to_string()));
    let body: Value = serde_json::from_str(h.transport.requests()[2].body.as_deref().unwrap())
        .unwrap();
    assert_eq!(body, json!({ "status": "CONFIRMED" }));
    assert_eq!(
        h.toasts.current_message().as_deref(),
        Some("Appointment #1 marked as CONFIRMED.")
    );
}

#[tokio::test]
async fn test_delete_asks_first_and_removes_row() {
    // Arrange
    let h = Harness::new();
    let confirmer = Arc::new(FixedConfirmer::accepting());
    let (dashboard, page) = signed_in(&h, Arc::clone(&confirmer)).await;
    h.push_ok();
    h.push_list(json!([]));

    // Act
    let deleted = dashboard.delete(2).await;

    // Assert
    assert!(matches!(deleted, Ok(true)));
    assert_eq!(
        confirmer.prompts.lock().unwrap().as_slice(),
        ["Delete appointment #2? This cannot be undone."]
    );
    assert_eq!(page.removed_rows(), vec![2]);
    assert!(page.snapshot().empty_visible);
    assert_eq!(h.paths()[2], (Method::Delete, "/api/appointments/2".to_string()));
    assert_eq!(h.toasts.current_message().as_deref(), Some("Appointment #2 deleted."));
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let h = Harness::new();
    let (dashboard, _page) = signed_in(&h, Arc::new(FixedConfirmer::declining())).await;

    assert!(matches!(dashboard.delete(1).await, Ok(false)));
    assert_eq!(h.transport.requests().len(), 2);
}

#[tokio::test]
async fn test_logout_aborts_in_flight_load_without_toast() {
    // Arrange
    let h = Harness::new();
    let (dashboard, page) = signed_in(&h, Arc::new(FixedConfirmer::declining())).await;
    let toasts_before = h.toasts.current_message();
    h.transport.push_hang();

    // Act
    let (load, ()) = tokio::join!(dashboard.load(), async {
        tokio::task::yield_now().await;
        dashboard.logout();
    });

    // Assert
    assert!(matches!(load, Err(DashboardError::Api(ApiError::Aborted))));
    assert_eq!(dashboard.state(), SessionState::Unauthenticated);
    assert!(page.snapshot().overlay_visible);
    assert_eq!(h.toasts.current_message(), toasts_before);
}

#[tokio::test]
async fn test_operations_require_sign_in() {
    let h = Harness::new();
    let (dashboard, _page) = h.dashboard(Arc::new(FixedConfirmer::accepting()));

    assert!(matches!(dashboard.load().await, Err(DashboardError::NotAuthenticated)));
    assert!(matches!(dashboard.delete(1).await, Err(DashboardError::NotAuthenticated)));
    assert!(h.transport.requests().is_empty());
}

// ── Public forms ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_booking_form_rejects_then_books() {
    // Arrange
    let h = Harness::new();
    let page = Arc::new(FormPage::with_values([
        (field::PATIENT_NAME, "Ayesha"),
        (field::PHONE, "12"),
        (field::APPOINTMENT_DATETIME, "2025-01-06T09:30"),
    ]));
    let controller = BookingFormController::with_clock(
        h.api.clone(),
        Arc::clone(&h.notifier),
        Arc::clone(&page) as Arc<dyn FormView>,
        fixed_now,
    );

    // Act: invalid phone never reaches the server.
    let first = controller.submit().await;

    // Assert
    assert!(matches!(first, Err(FormError::Invalid(_))));
    assert_eq!(
        page.field_error(field::PHONE).as_deref(),
        Some("Invalid phone number format.")
    );
    assert!(h.transport.requests().is_empty());
    assert_eq!(page.datetime_min().as_deref(), Some("2025-01-05T10:30"));

    // Act: fix the field and resubmit.
    controller.field_edited(field::PHONE);
    page.type_value(field::PHONE, "01711000000");
    h.transport
        .push_json(201, json!({ "success": true, "data": { "id": 7 } }));
    assert_ok!(controller.submit().await);

    // Assert
    assert!(page.field_error(field::PHONE).is_none());
    assert!(page.confirmation_visible());
    assert!(!page.submit_disabled());
    let sent = h.transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::Post);
    let body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["patientName"], "Ayesha");
    assert_eq!(body["appointmentDatetime"], "2025-01-06T09:30");
}

#[tokio::test]
async fn test_contact_form_server_failure_shows_server_message() {
    // Arrange
    let h = Harness::new();
    let page = Arc::new(FormPage::with_values([
        (field::CONTACT_NAME, "Rafiq"),
        (field::CONTACT_EMAIL, "rafiq@example.com"),
        (field::CONTACT_MESSAGE, "Are you open on Friday?"),
    ]));
    let controller = ContactFormController::new(
        h.api.clone(),
        Arc::clone(&h.notifier),
        Arc::clone(&page) as Arc<dyn FormView>,
    );
    h.transport
        .push_json(500, json!({ "success": false, "message": "Mail server down" }));
    h.push_ok();

    // Act
    let failed = controller.submit().await;

    // Assert
    assert_err!(failed);
    assert_eq!(h.toasts.current_message().as_deref(), Some("Mail server down"));
    assert_eq!(page.value(field::CONTACT_NAME), "Rafiq");

    // Act: retry succeeds and clears the form.
    assert_ok!(controller.submit().await);

    // Assert
    assert_eq!(h.toasts.current_message().as_deref(), Some(CONTACT_SENT_MESSAGE));
    assert_eq!(page.value(field::CONTACT_NAME), "");
    assert_eq!(h.toasts.mounted_count(), 1);
}
