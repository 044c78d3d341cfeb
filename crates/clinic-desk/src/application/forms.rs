//! Booking and contact form controllers.
//!
//! Both follow the same submit sequence:
//!
//! 1. Read the raw input values from the [`FormView`].
//! 2. Validate them with `clinic_core::validation`.  Failing fields get an
//!    inline message and the submission stops there; the gateway is never
//!    called.
//! 3. Disable the submit button and swap its label ("Booking..." /
//!    "Sending...").
//! 4. Send the request.  Success shows the confirmation (booking) or resets
//!    the form with a success toast (contact); failure shows an error toast
//!    with the server's message.
//! 5. Restore the submit button, whatever the outcome.

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDateTime};
use clinic_core::validation::field;
use clinic_core::{
    earliest_booking_slot, min_booking_datetime, validate_booking, validate_contact, BookingForm,
    ContactForm, ValidationErrors,
};
use thiserror::Error;
use tracing::{info, warn};

use super::api::ClinicApi;
use super::gateway::{AbortHandle, ApiError};
use super::notify::Notifier;

pub const BOOKING_SUBMIT_LABEL: &str = "Book Appointment";
pub const BOOKING_PENDING_LABEL: &str = "Booking...";
pub const CONTACT_SUBMIT_LABEL: &str = "Send Message";
pub const CONTACT_PENDING_LABEL: &str = "Sending...";
pub const CONTACT_SENT_MESSAGE: &str = "Message sent! We'll get back to you within 24 hours.";

const BOOKING_FIELDS: [&str; 5] = [
    field::PATIENT_NAME,
    field::PHONE,
    field::PATIENT_EMAIL,
    field::APPOINTMENT_DATETIME,
    field::REASON,
];

const CONTACT_FIELDS: [&str; 4] = [
    field::CONTACT_NAME,
    field::CONTACT_EMAIL,
    field::CONTACT_PHONE,
    field::CONTACT_MESSAGE,
];

/// Error type for form submissions.
#[derive(Debug, Error)]
pub enum FormError {
    /// One or more fields failed validation; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The request was sent and failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The DOM of one form.
pub trait FormView: Send + Sync {
    /// Current raw value of input `field`; empty when the input is absent.
    fn value(&self, field: &str) -> String;

    fn show_field_error(&self, field: &str, message: &str);

    fn clear_field_error(&self, field: &str);

    /// Enables or disables the submit button and sets its label.
    fn set_submit_state(&self, disabled: bool, label: &str);

    /// Sets the `min` attribute of the appointment date-time input.
    fn set_datetime_min(&self, _min: &str) {}

    /// Hides the form and shows the booking confirmation.
    fn show_confirmation(&self) {}

    /// Clears every input.
    fn reset(&self) {}
}

type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Shows the inline message of every failing field in `fields` and clears
/// the rest.
fn render_errors(view: &dyn FormView, fields: &[&str], errors: Option<&ValidationErrors>) {
    for &name in fields {
        match errors.and_then(|e| e.message_for(name)) {
            Some(message) => view.show_field_error(name, message),
            None => view.clear_field_error(name),
        }
    }
}

fn current_abort(slot: &Mutex<AbortHandle>) -> AbortHandle {
    slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

fn cancel(slot: &Mutex<AbortHandle>) {
    let mut handle = slot.lock().unwrap_or_else(|e| e.into_inner());
    handle.abort();
    *handle = AbortHandle::new();
}

// ── Booking ───────────────────────────────────────────────────────────────────

/// Controller for the public appointment booking form.
pub struct BookingFormController {
    api: ClinicApi,
    notifier: Arc<Notifier>,
    view: Arc<dyn FormView>,
    clock: Clock,
    abort: Mutex<AbortHandle>,
}

impl BookingFormController {
    /// Creates the controller and sets the date-time minimum from the local
    /// clock.
    pub fn new(api: ClinicApi, notifier: Arc<Notifier>, view: Arc<dyn FormView>) -> Self {
        Self::with_clock(api, notifier, view, local_now)
    }

    /// Like [`new`](Self::new) with an explicit clock.
    pub fn with_clock(
        api: ClinicApi,
        notifier: Arc<Notifier>,
        view: Arc<dyn FormView>,
        clock: Clock,
    ) -> Self {
        view.set_datetime_min(&min_booking_datetime(clock()));
        Self {
            api,
            notifier,
            view,
            clock,
            abort: Mutex::new(AbortHandle::new()),
        }
    }

    /// Creates the controller only when the page has a booking form.
    pub fn attach(
        view: Option<Arc<dyn FormView>>,
        api: ClinicApi,
        notifier: Arc<Notifier>,
    ) -> Option<Self> {
        view.map(|view| Self::new(api, notifier, view))
    }

    /// Clears the inline error of `field` as the visitor edits it.
    pub fn field_edited(&self, field: &str) {
        self.view.clear_field_error(field);
    }

    /// Cancels a submission that is waiting for the server.
    pub fn cancel_pending(&self) {
        cancel(&self.abort);
    }

    fn read_form(&self) -> BookingForm {
        BookingForm {
            patient_name: self.view.value(field::PATIENT_NAME),
            phone: self.view.value(field::PHONE),
            patient_email: self.view.value(field::PATIENT_EMAIL),
            appointment_datetime: self.view.value(field::APPOINTMENT_DATETIME),
            reason: self.view.value(field::REASON),
        }
    }

    /// Validates and submits the form.
    ///
    /// # Errors
    ///
    /// [`FormError::Invalid`] when validation fails (nothing is sent), or
    /// [`FormError::Api`] when the booking request fails.
    pub async fn submit(&self) -> Result<(), FormError> {
        let earliest = earliest_booking_slot((self.clock)());
        let booking = match validate_booking(&self.read_form(), earliest) {
            Ok(booking) => {
                render_errors(self.view.as_ref(), &BOOKING_FIELDS, None);
                booking
            }
            Err(errors) => {
                render_errors(self.view.as_ref(), &BOOKING_FIELDS, Some(&errors));
                return Err(errors.into());
            }
        };

        self.view.set_submit_state(true, BOOKING_PENDING_LABEL);
        let abort = current_abort(&self.abort);
        let result = self.api.book_appointment(&booking, &abort).await;
        self.view.set_submit_state(false, BOOKING_SUBMIT_LABEL);

        match result {
            Ok(_) => {
                info!(datetime = %booking.appointment_datetime, "appointment booked");
                self.view.show_confirmation();
                Ok(())
            }
            Err(e) => {
                if e != ApiError::Aborted {
                    warn!(error = %e, "booking failed");
                    self.notifier.error(e.to_string());
                }
                Err(e.into())
            }
        }
    }
}

// ── Contact ───────────────────────────────────────────────────────────────────

/// Controller for the contact form.
pub struct ContactFormController {
    api: ClinicApi,
    notifier: Arc<Notifier>,
    view: Arc<dyn FormView>,
    abort: Mutex<AbortHandle>,
}

impl ContactFormController {
    pub fn new(api: ClinicApi, notifier: Arc<Notifier>, view: Arc<dyn FormView>) -> Self {
        Self {
            api,
            notifier,
            view,
            abort: Mutex::new(AbortHandle::new()),
        }
    }

    /// Creates the controller only when the page has a contact form.
    pub fn attach(
        view: Option<Arc<dyn FormView>>,
        api: ClinicApi,
        notifier: Arc<Notifier>,
    ) -> Option<Self> {
        view.map(|view| Self::new(api, notifier, view))
    }

    pub fn field_edited(&self, field: &str) {
        self.view.clear_field_error(field);
    }

    pub fn cancel_pending(&self) {
        cancel(&self.abort);
    }

    fn read_form(&self) -> ContactForm {
        ContactForm {
            name: self.view.value(field::CONTACT_NAME),
            email: self.view.value(field::CONTACT_EMAIL),
            phone: self.view.value(field::CONTACT_PHONE),
            message: self.view.value(field::CONTACT_MESSAGE),
        }
    }

    /// Validates and submits the form.
    ///
    /// # Errors
    ///
    /// [`FormError::Invalid`] when validation fails (nothing is sent), or
    /// [`FormError::Api`] when the request fails.
    pub async fn submit(&self) -> Result<(), FormError> {
        let message = match validate_contact(&self.read_form()) {
            Ok(message) => {
                render_errors(self.view.as_ref(), &CONTACT_FIELDS, None);
                message
            }
            Err(errors) => {
                render_errors(self.view.as_ref(), &CONTACT_FIELDS, Some(&errors));
                return Err(errors.into());
            }
        };

        self.view.set_submit_state(true, CONTACT_PENDING_LABEL);
        let abort = current_abort(&self.abort);
        let result = self.api.send_contact_message(&message, &abort).await;
        self.view.set_submit_state(false, CONTACT_SUBMIT_LABEL);

        match result {
            Ok(_) => {
                info!("contact message sent");
                self.view.reset();
                self.notifier.success(CONTACT_SENT_MESSAGE);
                Ok(())
            }
            Err(e) => {
                if e != ApiError::Aborted {
                    warn!(error = %e, "contact message failed");
                    self.notifier.error(e.to_string());
                }
                Err(e.into())
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
