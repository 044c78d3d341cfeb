//! Terminal implementations of the view traits.
//!
//! The `clinic-desk` binary drives the same controllers as a web page, with
//! these views standing in for the DOM: table rows become text lines, toasts
//! become status lines on stderr, and `window.confirm` becomes a `[y/N]`
//! prompt.
//!
//! Text from the server is passed through [`sanitize`] before printing, the
//! terminal counterpart of HTML escaping: control characters could otherwise
//! rewrite the operator's terminal.

use std::collections::HashMap;
use std::io::{self, BufRead, Stderr, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use clinic_core::{Appointment, AppointmentId, AppointmentStats, Doctor, MedicalService};
use tracing::{debug, warn};

use crate::application::admin::{Confirmer, DashboardView};
use crate::application::forms::FormView;
use crate::application::notify::{Toast, ToastId, ToastKind, ToastSurface};
use crate::infrastructure::document::render::{format_date, format_datetime};

/// Replaces control characters with spaces.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn optional(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => sanitize(v),
        None => "-".to_string(),
    }
}

fn write_line<W: Write>(out: &Mutex<W>, line: &str) {
    let mut out = out.lock().unwrap_or_else(|e| e.into_inner());
    if let Err(e) = writeln!(out, "{line}") {
        debug!(error = %e, "console write failed");
    }
}

/// One appointment as a line of text.
pub fn appointment_line(appointment: &Appointment) -> String {
    format!(
        "#{:<5} {:<10} {:<24} {} | {} | {} | {}",
        appointment.id,
        appointment.status.as_str(),
        format_datetime(appointment.appointment_datetime),
        sanitize(&appointment.patient_name),
        sanitize(&appointment.phone),
        optional(appointment.patient_email.as_deref()),
        optional(appointment.reason.as_deref()),
    )
}

pub fn doctor_line(doctor: &Doctor) -> String {
    let mut line = format!("#{:<4} {}", doctor.id, sanitize(&doctor.name));
    if let Some(degree) = doctor.degree.as_deref() {
        line.push_str(&format!(", {}", sanitize(degree)));
    }
    if let Some(specialization) = doctor.specialization.as_deref() {
        line.push_str(&format!(" – {}", sanitize(specialization)));
    }
    if let Some(timing) = doctor.clinic_timing.as_deref() {
        line.push_str(&format!(" ({})", sanitize(timing)));
    }
    line
}

pub fn service_line(service: &MedicalService) -> String {
    format!(
        "#{:<4} {} – {}",
        service.id,
        sanitize(&service.name),
        optional(service.description.as_deref())
    )
}

// ── Dashboard ────────────────────────────────────────────────────────────────

/// Prints the appointment table as text.
///
/// A quiet dashboard prints nothing; the CLI keeps it quiet while signing in
/// so that a filtered listing is the only table on stdout.
pub struct ConsoleDashboard<W: Write + Send = Stdout> {
    out: Mutex<W>,
    quiet: AtomicBool,
}

impl ConsoleDashboard<Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write + Send> ConsoleDashboard<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            quiet: AtomicBool::new(false),
        }
    }

    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::SeqCst);
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn print(&self, text: &str) {
        if !self.quiet.load(Ordering::SeqCst) {
            write_line(&self.out, text);
        }
    }
}

impl<W: Write + Send> DashboardView for ConsoleDashboard<W> {
    fn set_login_pending(&self, pending: bool) {
        if pending {
            debug!("verifying admin password");
        }
    }

    fn show_login(&self) {}

    fn show_panel(&self) {}

    fn clear_password_input(&self) {}

    fn set_loading(&self, loading: bool) {
        if loading {
            debug!("loading appointments");
        }
    }

    fn set_empty(&self, empty: bool) {
        if empty {
            self.print("No appointments found.");
        }
    }

    fn clear_rows(&self) {}

    fn replace_rows(&self, appointments: &[Appointment]) {
        if appointments.is_empty() {
            return;
        }
        let table: Vec<String> = appointments.iter().map(appointment_line).collect();
        self.print(&table.join("\n"));
    }

    fn remove_row(&self, id: AppointmentId) {
        debug!(id, "row removed");
    }

    fn set_stats(&self, stats: &AppointmentStats) {
        self.print(&format!(
            "Total: {} | Pending: {} | Confirmed: {} | Cancelled: {}",
            stats.total, stats.pending, stats.confirmed, stats.cancelled
        ));
    }
}

// ── Toasts ───────────────────────────────────────────────────────────────────

/// Prints each toast once, when it is mounted.
pub struct ConsoleToasts<W: Write + Send = Stderr> {
    out: Mutex<W>,
    current: Mutex<Option<ToastId>>,
}

impl ConsoleToasts<Stderr> {
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }
}

impl<W: Write + Send> ConsoleToasts<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            current: Mutex::new(None),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn current_slot(&self) -> std::sync::MutexGuard<'_, Option<ToastId>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Id of the toast printed last, until it is removed.
    pub fn current(&self) -> Option<ToastId> {
        *self.current_slot()
    }
}

impl<W: Write + Send> ToastSurface for ConsoleToasts<W> {
    fn replace(&self, toast: &Toast) -> Option<ToastId> {
        let marker = match toast.kind {
            ToastKind::Success => "✔",
            ToastKind::Error => "✖",
        };
        // The slot stays locked while printing so lines and ids stay paired.
        let mut current = self.current_slot();
        write_line(&self.out, &format!("{marker} {}", sanitize(&toast.message)));
        current.replace(toast.id)
    }

    fn show(&self, _id: ToastId) {}

    fn hide(&self, _id: ToastId) {}

    fn remove(&self, id: ToastId) {
        let mut current = self.current_slot();
        if *current == Some(id) {
            *current = None;
        }
    }
}

// ── Confirmation prompt ──────────────────────────────────────────────────────

/// Asks on stderr and reads the answer from stdin.
pub struct StdinConfirmer {
    assume_yes: bool,
}

impl StdinConfirmer {
    /// `assume_yes` answers every prompt with "yes" without asking.
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

/// Returns `true` for `y` or `yes` in any case.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Prints `prompt` on stderr and reads one line from stdin.
///
/// # Errors
///
/// Returns the I/O error from stdin or stderr.
pub fn prompt_line(prompt: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{prompt}")?;
    stderr.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim_end_matches(['\r', '\n']).to_string())
}

impl Confirmer for StdinConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            debug!(prompt, "confirmation assumed");
            return true;
        }
        match prompt_line(&format!("{prompt} [y/N] ")) {
            Ok(answer) => is_affirmative(&answer),
            Err(e) => {
                warn!(error = %e, "could not read confirmation; treating as no");
                false
            }
        }
    }
}

// ── Forms ────────────────────────────────────────────────────────────────────

/// A form whose inputs were filled from command-line arguments.
pub struct ConsoleForm<W: Write + Send = Stderr> {
    values: Mutex<HashMap<String, String>>,
    confirmation: String,
    out: Mutex<W>,
}

impl ConsoleForm<Stderr> {
    /// `confirmation` is printed when the booking confirmation would be shown.
    pub fn new<'a>(
        values: impl IntoIterator<Item = (&'a str, String)>,
        confirmation: &str,
    ) -> Self {
        Self::with_writer(values, confirmation, io::stderr())
    }
}

impl<W: Write + Send> ConsoleForm<W> {
    pub fn with_writer<'a>(
        values: impl IntoIterator<Item = (&'a str, String)>,
        confirmation: &str,
        out: W,
    ) -> Self {
        Self {
            values: Mutex::new(
                values
                    .into_iter()
                    .map(|(field, value)| (field.to_string(), value))
                    .collect(),
            ),
            confirmation: confirmation.to_string(),
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> FormView for ConsoleForm<W> {
    fn value(&self, field: &str) -> String {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(field)
            .cloned()
            .unwrap_or_default()
    }

    fn show_field_error(&self, field: &str, message: &str) {
        write_line(&self.out, &format!("{field}: {message}"));
    }

    fn clear_field_error(&self, _field: &str) {}

    fn set_submit_state(&self, disabled: bool, label: &str) {
        if disabled {
            write_line(&self.out, label);
        }
    }

    fn show_confirmation(&self) {
        write_line(&self.out, &self.confirmation);
    }

    fn reset(&self) {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
