//! HTML fragments for the dashboard table and the toast.
//!
//! Every piece of user-supplied text goes through [`escape_html`].  Action
//! buttons carry `data-action` and `data-id` attributes instead of inline
//! handlers; the page routes clicks on them to
//! `AdminDashboard::handle_row_click`.

use chrono::NaiveDateTime;
use clinic_core::{escape_html, Appointment};

use crate::application::admin::RowAction;
use crate::application::notify::Toast;

/// Shown in a cell whose value is missing.
pub const PLACEHOLDER: &str = "—";

/// Appointment date and time, e.g. `Jan 5, 2025, 10:30 AM`.
pub fn format_datetime(value: Option<NaiveDateTime>) -> String {
    value
        .map(|dt| dt.format("%b %-d, %Y, %-I:%M %p").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Creation date, e.g. `Jan 5, 2025`.
pub fn format_date(value: Option<NaiveDateTime>) -> String {
    value
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn optional_cell(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(text) => escape_html(text),
        None => format!(r#"<span class="muted">{PLACEHOLDER}</span>"#),
    }
}

fn action_button(action: RowAction, class: &str, icon: &str, label: &str) -> String {
    let label = if label.is_empty() {
        String::new()
    } else {
        format!(" {label}")
    };
    format!(
        r#"<button class="{class}" data-action="{}" data-id="{}"><i class="fas {icon}"></i>{label}</button>"#,
        action.data_action(),
        action.id(),
    )
}

/// One `<tr id="row-{id}">` of the appointments table.
pub fn appointment_row(appointment: &Appointment) -> String {
    let id = appointment.id;
    let status = appointment.status;

    let mut actions = String::new();
    if appointment.can_confirm() {
        let confirm = RowAction::Confirm(id);
        actions.push_str(&action_button(confirm, "btn-confirm", "fa-check", "Confirm"));
    }
    if appointment.can_cancel() {
        actions.push_str(&action_button(RowAction::Cancel(id), "btn-cancel", "fa-times", "Cancel"));
    }
    actions.push_str(&action_button(RowAction::Delete(id), "btn-delete", "fa-trash", ""));

    format!(
        concat!(
            r#"<tr id="{row_id}">"#,
            "<td><strong>#{id}</strong></td>",
            "<td>{name}</td>",
            "<td>{phone}</td>",
            "<td>{email}</td>",
            "<td>{when}</td>",
            "<td>{reason}</td>",
            r#"<td><span class="badge-status badge-{status_class}">{status}</span></td>"#,
            "<td>{created}</td>",
            r#"<td><div class="action-btns">{actions}</div></td>"#,
            "</tr>"
        ),
        row_id = appointment.row_id(),
        id = id,
        name = escape_html(&appointment.patient_name),
        phone = escape_html(&appointment.phone),
        email = optional_cell(appointment.patient_email.as_deref()),
        when = format_datetime(appointment.appointment_datetime),
        reason = optional_cell(appointment.reason.as_deref()),
        status_class = status.css_name(),
        status = status,
        created = format_date(appointment.created_at),
        actions = actions,
    )
}

/// The toast element.  `visible` adds the `show` class.
pub fn toast(toast: &Toast, visible: bool) -> String {
    let show = if visible { " show" } else { "" };
    format!(
        r#"<div class="toast {kind}{show}"><i class="fas {icon}"></i><span>{message}</span></div>"#,
        kind = toast.kind.css_class(),
        icon = toast.kind.icon(),
        message = escape_html(&toast.message),
    )
}
