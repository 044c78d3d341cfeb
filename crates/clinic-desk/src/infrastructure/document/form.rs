//! In-memory form: inputs, inline error nodes and the submit button.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::application::forms::FormView;

#[derive(Default)]
struct FormState {
    values: HashMap<String, String>,
    errors: HashMap<String, String>,
    submit_disabled: bool,
    submit_history: Vec<(bool, String)>,
    datetime_min: Option<String>,
    confirmation_visible: bool,
}

/// A form page held in memory.
#[derive(Default)]
pub struct FormPage {
    state: Mutex<FormState>,
}

impl FormPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a form with inputs pre-filled from `values`.
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let page = Self::new();
        for (field, value) in values {
            page.type_value(field, value);
        }
        page
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// Simulates typing into input `field`.
    pub fn type_value(&self, field: &str, value: &str) {
        self.with_state(|s| {
            s.values.insert(field.to_string(), value.to_string());
        });
    }

    /// Inline error shown under `field`.
    pub fn field_error(&self, field: &str) -> Option<String> {
        self.with_state(|s| s.errors.get(field).cloned())
    }

    pub fn datetime_min(&self) -> Option<String> {
        self.with_state(|s| s.datetime_min.clone())
    }

    pub fn confirmation_visible(&self) -> bool {
        self.with_state(|s| s.confirmation_visible)
    }

    pub fn submit_disabled(&self) -> bool {
        self.with_state(|s| s.submit_disabled)
    }

    /// Every `(disabled, label)` the submit button went through.
    pub fn submit_history(&self) -> Vec<(bool, String)> {
        self.with_state(|s| s.submit_history.clone())
    }
}

impl FormView for FormPage {
    fn value(&self, field: &str) -> String {
        self.with_state(|s| s.values.get(field).cloned().unwrap_or_default())
    }

    fn show_field_error(&self, field: &str, message: &str) {
        self.with_state(|s| {
            s.errors.insert(field.to_string(), message.to_string());
        });
    }

    fn clear_field_error(&self, field: &str) {
        self.with_state(|s| {
            s.errors.remove(field);
        });
    }

    fn set_submit_state(&self, disabled: bool, label: &str) {
        self.with_state(|s| {
            s.submit_disabled = disabled;
            s.submit_history.push((disabled, label.to_string()));
        });
    }

    fn set_datetime_min(&self, min: &str) {
        self.with_state(|s| s.datetime_min = Some(min.to_string()));
    }

    fn show_confirmation(&self) {
        self.with_state(|s| s.confirmation_visible = true);
    }

    fn reset(&self) {
        self.with_state(|s| {
            s.values.clear();
            s.errors.clear();
        });
    }
}
