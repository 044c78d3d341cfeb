//! In-memory page document.
//!
//! These views implement the application view traits by keeping the page
//! state in memory and rendering rows and toasts as HTML strings.  They are
//! what the controllers drive in tests, and they produce the same markup a
//! browser page would show.
//!
//! - **`DashboardPage`** – overlay, panel, stat cards and table body.
//! - **`ToastLayer`** – the toast container.
//! - **`FormPage`** – inputs, inline errors and the submit button.

mod dashboard;
mod form;
pub mod render;
mod toast;

pub use dashboard::{ButtonState, DashboardPage, DashboardSnapshot, LOGIN_LABEL};
pub use form::FormPage;
pub use toast::ToastLayer;
