//! Admin dashboard: password gate, appointment table and status changes.
//!
//! # Session lifecycle
//!
//! ```text
//!  Unauthenticated ──login()──▶ Authenticating ──list ok──▶ Authenticated
//!        ▲                           │                          │
//!        └──────── list failed ──────┘                          │
//!        └──────────────────────── logout() ────────────────────┘
//! ```
//!
//! The credential is only stored once the server has accepted it by answering
//! a list call.  Every other operation needs an authenticated session and
//! returns [`DashboardError::NotAuthenticated`] without touching the network
//! otherwise.
//!
//! # Synchronization model
//!
//! The dashboard never patches its table in place: every successful mutation
//! is followed by a full reload from the server.  The one exception is delete,
//! which removes the row immediately and then reloads, so the row disappears
//! even if the reload fails.
//!
//! Concurrent operations are not coordinated.  Two overlapping reloads both
//! render, and the one that finishes last wins: rows are replaced in one view
//! update once the list has arrived, so the table never holds two rows for
//! the same appointment.
//!
//! # Errors
//!
//! Every operation converts its failure into an error toast before returning
//! it, so callers may ignore the `Err` value when the toast is all the user
//! needs.  An aborted request (see [`AdminDashboard::logout`]) is returned
//! silently.

use std::sync::{Arc, Mutex, MutexGuard};

use clinic_core::{
    filter_by_status, sort_newest_first, Appointment, AppointmentId, AppointmentStats,
    AppointmentStatus, StatusParseError,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::api::{AdminCredential, ClinicApi};
use super::gateway::{AbortHandle, ApiError};
use super::notify::Notifier;

/// Label of the login button while a password is being checked.
pub const LOGIN_PENDING_LABEL: &str = "Verifying...";

/// Error type for dashboard operations.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The operation needs a signed-in session.
    #[error("not signed in to the admin dashboard")]
    NotAuthenticated,

    /// A login attempt is already waiting for the server.
    #[error("a sign-in attempt is already in progress")]
    LoginInProgress,

    /// The session is already signed in; log out before signing in again.
    #[error("already signed in to the admin dashboard")]
    AlreadyAuthenticated,

    /// A row control carried an action or id the dashboard does not know.
    #[error("unknown row action '{action}' for id '{id}'")]
    UnknownRowAction { action: String, id: String },

    /// The status filter value is not a known status.
    #[error(transparent)]
    InvalidStatus(#[from] StatusParseError),

    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Authentication state of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// The DOM regions the dashboard drives.
pub trait DashboardView: Send + Sync {
    /// Disables the login button and shows [`LOGIN_PENDING_LABEL`], or
    /// restores it.
    fn set_login_pending(&self, pending: bool);

    /// Shows the login overlay and hides the dashboard panel.
    fn show_login(&self);

    /// Hides the login overlay and shows the dashboard panel.
    fn show_panel(&self);

    fn clear_password_input(&self);

    fn set_loading(&self, loading: bool);

    fn set_empty(&self, empty: bool);

    fn clear_rows(&self);

    /// Replaces every table row with one row per appointment, in order, as
    /// a single update.
    fn replace_rows(&self, appointments: &[Appointment]);

    /// Removes the row `row-{id}`, if present.
    fn remove_row(&self, id: AppointmentId);

    fn set_stats(&self, stats: &AppointmentStats);
}

/// Asks the operator a yes/no question.
#[cfg_attr(test, mockall::automock)]
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// A decoded click on a row action control (`data-action` + `data-id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Confirm(AppointmentId),
    Cancel(AppointmentId),
    Delete(AppointmentId),
}

impl RowAction {
    /// Decodes the `data-action` and `data-id` attributes of a control.
    pub fn from_data_attributes(action: &str, id: &str) -> Option<Self> {
        let id: AppointmentId = id.trim().parse().ok()?;
        match action {
            "confirm" => Some(Self::Confirm(id)),
            "cancel" => Some(Self::Cancel(id)),
            "delete" => Some(Self::Delete(id)),
            _ => None,
        }
    }

    /// Value of the `data-action` attribute.
    pub fn data_action(self) -> &'static str {
        match self {
            Self::Confirm(_) => "confirm",
            Self::Cancel(_) => "cancel",
            Self::Delete(_) => "delete",
        }
    }

    pub fn id(self) -> AppointmentId {
        match self {
            Self::Confirm(id) | Self::Cancel(id) | Self::Delete(id) => id,
        }
    }
}

/// Parses the value of the status filter control; an empty value means
/// "all statuses".
///
/// # Errors
///
/// Returns [`StatusParseError`] for an unknown status.
pub fn parse_status_filter(value: &str) -> Result<Option<AppointmentStatus>, StatusParseError> {
    let value = value.trim();
    if value.is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

struct Session {
    state: SessionState,
    credential: Option<AdminCredential>,
    abort: AbortHandle,
}

impl Session {
    fn new() -> Self {
        Self {
            state: SessionState::Unauthenticated,
            credential: None,
            abort: AbortHandle::new(),
        }
    }
}

/// Controller for the admin dashboard page.
pub struct AdminDashboard {
    api: ClinicApi,
    notifier: Arc<Notifier>,
    view: Arc<dyn DashboardView>,
    confirmer: Arc<dyn Confirmer>,
    session: Mutex<Session>,
}

impl AdminDashboard {
    /// Creates the controller and shows the login overlay.
    pub fn new(
        api: ClinicApi,
        notifier: Arc<Notifier>,
        view: Arc<dyn DashboardView>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        view.show_login();
        Self {
            api,
            notifier,
            view,
            confirmer,
            session: Mutex::new(Session::new()),
        }
    }

    /// Creates the controller only when the page has a dashboard.
    pub fn attach(
        view: Option<Arc<dyn DashboardView>>,
        api: ClinicApi,
        notifier: Arc<Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Option<Self> {
        view.map(|view| Self::new(api, notifier, view, confirmer))
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        // A poisoned lock only means another thread panicked mid-update; the
        // session fields are still individually valid.
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> SessionState {
        self.session().state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Credential and abort handle of the signed-in session.
    fn authenticated(&self) -> Result<(AdminCredential, AbortHandle), DashboardError> {
        let session = self.session();
        match (&session.state, &session.credential) {
            (SessionState::Authenticated, Some(credential)) => {
                Ok((credential.clone(), session.abort.clone()))
            }
            _ => Err(DashboardError::NotAuthenticated),
        }
    }

    // ── Login / logout ───────────────────────────────────────────────────────

    /// Checks `password` against the server and, if accepted, opens the
    /// dashboard and loads the table.
    ///
    /// # Errors
    ///
    /// - [`DashboardError::LoginInProgress`] if a login is already pending.
    /// - [`DashboardError::AlreadyAuthenticated`] if the session is signed
    ///   in; the existing session is kept and no request is sent.
    /// - [`DashboardError::Api`] if the server rejected the password or could
    ///   not be reached.
    pub async fn login(&self, password: &str) -> Result<(), DashboardError> {
        let credential = AdminCredential::new(password);
        let abort = {
            let mut session = self.session();
            match session.state {
                SessionState::Authenticating => return Err(DashboardError::LoginInProgress),
                SessionState::Authenticated => {
                    return Err(DashboardError::AlreadyAuthenticated)
                }
                SessionState::Unauthenticated => {}
            }
            session.state = SessionState::Authenticating;
            session.abort.clone()
        };
        self.view.set_login_pending(true);

        let outcome = match self.api.list_appointments(&credential, &abort).await {
            Ok(_) => {
                {
                    let mut session = self.session();
                    session.state = SessionState::Authenticated;
                    session.credential = Some(credential);
                }
                info!("admin signed in");
                self.view.show_panel();
                if let Err(e) = self.load().await {
                    debug!(error = %e, "initial load after sign-in failed");
                }
                Ok(())
            }
            Err(e) => {
                {
                    let mut session = self.session();
                    session.state = SessionState::Unauthenticated;
                    session.credential = None;
                }
                if e != ApiError::Aborted {
                    warn!(error = %e, "admin sign-in rejected");
                    self.notifier.error("Invalid admin password. Please try again.");
                }
                Err(e.into())
            }
        };

        self.view.set_login_pending(false);
        outcome
    }

    /// Forgets the credential, cancels in-flight requests and returns to the
    /// login overlay.
    pub fn logout(&self) {
        {
            let mut session = self.session();
            session.abort.abort();
            session.abort = AbortHandle::new();
            session.credential = None;
            session.state = SessionState::Unauthenticated;
        }
        self.view.show_login();
        self.view.clear_password_input();
        info!("admin signed out");
    }

    // ── Table ────────────────────────────────────────────────────────────────

    /// Reloads the table and stats from the server, newest bookings first.
    ///
    /// # Errors
    ///
    /// [`DashboardError::NotAuthenticated`] or [`DashboardError::Api`].
    pub async fn load(&self) -> Result<(), DashboardError> {
        let (credential, abort) = self.authenticated()?;

        self.view.set_loading(true);
        self.view.set_empty(false);
        self.view.clear_rows();

        let result = self.api.list_appointments(&credential, &abort).await;
        self.view.set_loading(false);

        match result {
            Ok(mut appointments) => {
                let stats = AppointmentStats::from_appointments(&appointments);
                self.view.set_stats(&stats);
                sort_newest_first(&mut appointments);
                self.view.set_empty(appointments.is_empty());
                self.view.replace_rows(&appointments);
                debug!(total = stats.total, "appointments loaded");
                Ok(())
            }
            Err(e) => Err(self.report(e, "Failed to load appointments")),
        }
    }

    /// Same as [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub async fn refresh(&self) -> Result<(), DashboardError> {
        self.load().await
    }

    /// Shows only appointments with `status` (all when `None`), in server
    /// order.  The stat cards are left untouched.
    ///
    /// # Errors
    ///
    /// [`DashboardError::NotAuthenticated`] or [`DashboardError::Api`].
    pub async fn filter_by_status(
        &self,
        status: Option<AppointmentStatus>,
    ) -> Result<(), DashboardError> {
        let (credential, abort) = self.authenticated()?;

        match self.api.list_appointments(&credential, &abort).await {
            Ok(appointments) => {
                let shown = filter_by_status(appointments, status);
                self.view.replace_rows(&shown);
                debug!(?status, shown = shown.len(), "appointments filtered");
                Ok(())
            }
            Err(e) => Err(self.report(e, "Filter failed")),
        }
    }

    // ── Mutations ────────────────────────────────────────────────────────────

    /// Sets the status of appointment `id`, then reloads.
    ///
    /// Repeating the call is never blocked; each one issues its own request.
    ///
    /// # Errors
    ///
    /// [`DashboardError::NotAuthenticated`] or [`DashboardError::Api`] for
    /// the update itself.  A failed reload is reported by toast only.
    pub async fn update_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), DashboardError> {
        let (credential, abort) = self.authenticated()?;

        match self.api.update_status(id, status, &credential, &abort).await {
            Ok(_) => {
                info!(id, %status, "appointment status updated");
                self.notifier
                    .success(format!("Appointment #{id} marked as {status}."));
                self.reload_after_mutation().await;
                Ok(())
            }
            Err(e) => Err(self.report(e, "Failed to update")),
        }
    }

    /// Deletes appointment `id` after confirmation.
    ///
    /// Returns `Ok(false)` when the operator declined.  On success the row is
    /// removed immediately, before the reload.
    ///
    /// # Errors
    ///
    /// [`DashboardError::NotAuthenticated`] or [`DashboardError::Api`] for
    /// the delete itself.
    pub async fn delete(&self, id: AppointmentId) -> Result<bool, DashboardError> {
        let (credential, abort) = self.authenticated()?;

        let prompt = format!("Delete appointment #{id}? This cannot be undone.");
        if !self.confirmer.confirm(&prompt) {
            debug!(id, "delete declined");
            return Ok(false);
        }

        match self.api.delete_appointment(id, &credential, &abort).await {
            Ok(_) => {
                info!(id, "appointment deleted");
                self.notifier.success(format!("Appointment #{id} deleted."));
                self.view.remove_row(id);
                self.reload_after_mutation().await;
                Ok(true)
            }
            Err(e) => Err(self.report(e, "Failed to delete")),
        }
    }

    /// Dispatches a click on a row control by its `data-action`/`data-id`.
    ///
    /// # Errors
    ///
    /// [`DashboardError::UnknownRowAction`] for an undecodable control, else
    /// the error of the dispatched operation.
    pub async fn handle_row_click(&self, action: &str, id: &str) -> Result<(), DashboardError> {
        let row_action = RowAction::from_data_attributes(action, id).ok_or_else(|| {
            DashboardError::UnknownRowAction {
                action: action.to_string(),
                id: id.to_string(),
            }
        })?;

        match row_action {
            RowAction::Confirm(id) => self.update_status(id, AppointmentStatus::Confirmed).await,
            RowAction::Cancel(id) => self.update_status(id, AppointmentStatus::Cancelled).await,
            RowAction::Delete(id) => self.delete(id).await.map(|_| ()),
        }
    }

    async fn reload_after_mutation(&self) {
        if let Err(e) = self.load().await {
            debug!(error = %e, "reload after mutation failed");
        }
    }

    /// Turns an API failure into an error toast prefixed with `context`.
    fn report(&self, error: ApiError, context: &str) -> DashboardError {
        if error != ApiError::Aborted {
            warn!(error = %error, "{context}");
            self.notifier.error(format!("{context}: {error}"));
        }
        error.into()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
