//! In-memory admin dashboard page.

use std::sync::Mutex;

use clinic_core::{Appointment, AppointmentId, AppointmentStats};

use super::render;
use crate::application::admin::{DashboardView, LOGIN_PENDING_LABEL};

/// Label of the idle login button.
pub const LOGIN_LABEL: &str = "Login";

/// State of a button element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub disabled: bool,
    pub label: String,
}

/// Everything on the dashboard page except the table rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub overlay_visible: bool,
    pub panel_visible: bool,
    pub login_button: ButtonState,
    pub password_input: String,
    pub loading_visible: bool,
    pub empty_visible: bool,
    pub stats: AppointmentStats,
}

struct Row {
    id: AppointmentId,
    html: String,
}

struct PageState {
    snapshot: DashboardSnapshot,
    rows: Vec<Row>,
    removed: Vec<AppointmentId>,
}

/// The admin page held in memory: overlay, panel, stat cards and the
/// appointments table body as rendered HTML rows.
pub struct DashboardPage {
    state: Mutex<PageState>,
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardPage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PageState {
                snapshot: DashboardSnapshot {
                    overlay_visible: true,
                    panel_visible: false,
                    login_button: ButtonState {
                        disabled: false,
                        label: LOGIN_LABEL.to_string(),
                    },
                    password_input: String::new(),
                    loading_visible: false,
                    empty_visible: false,
                    stats: AppointmentStats::default(),
                },
                rows: Vec::new(),
                removed: Vec::new(),
            }),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut PageState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.with_state(|s| s.snapshot.clone())
    }

    /// Ids of the rendered rows, top to bottom.
    pub fn row_ids(&self) -> Vec<AppointmentId> {
        self.with_state(|s| s.rows.iter().map(|r| r.id).collect())
    }

    /// Markup of row `row-{id}`.
    pub fn row_html(&self, id: AppointmentId) -> Option<String> {
        self.with_state(|s| s.rows.iter().find(|r| r.id == id).map(|r| r.html.clone()))
    }

    /// Markup of the whole table body.
    pub fn table_body_html(&self) -> String {
        self.with_state(|s| s.rows.iter().map(|r| r.html.as_str()).collect())
    }

    /// Ids passed to `remove_row`, in call order.
    pub fn removed_rows(&self) -> Vec<AppointmentId> {
        self.with_state(|s| s.removed.clone())
    }

    /// Simulates typing into the password input.
    pub fn type_password(&self, text: &str) {
        self.with_state(|s| s.snapshot.password_input = text.to_string());
    }
}

impl DashboardView for DashboardPage {
    fn set_login_pending(&self, pending: bool) {
        self.with_state(|s| {
            s.snapshot.login_button = ButtonState {
                disabled: pending,
                label: if pending { LOGIN_PENDING_LABEL } else { LOGIN_LABEL }.to_string(),
            };
        });
    }

    fn show_login(&self) {
        self.with_state(|s| {
            s.snapshot.overlay_visible = true;
            s.snapshot.panel_visible = false;
        });
    }

    fn show_panel(&self) {
        self.with_state(|s| {
            s.snapshot.overlay_visible = false;
            s.snapshot.panel_visible = true;
        });
    }

    fn clear_password_input(&self) {
        self.with_state(|s| s.snapshot.password_input.clear());
    }

    fn set_loading(&self, loading: bool) {
        self.with_state(|s| s.snapshot.loading_visible = loading);
    }

    fn set_empty(&self, empty: bool) {
        self.with_state(|s| s.snapshot.empty_visible = empty);
    }

    fn clear_rows(&self) {
        self.with_state(|s| s.rows.clear());
    }

    fn replace_rows(&self, appointments: &[Appointment]) {
        let rows: Vec<Row> = appointments
            .iter()
            .map(|a| Row {
                id: a.id,
                html: render::appointment_row(a),
            })
            .collect();
        self.with_state(|s| s.rows = rows);
    }

    fn remove_row(&self, id: AppointmentId) {
        self.with_state(|s| {
            s.rows.retain(|r| r.id != id);
            s.removed.push(id);
        });
    }

    fn set_stats(&self, stats: &AppointmentStats) {
        self.with_state(|s| s.snapshot.stats = *stats);
    }
}
