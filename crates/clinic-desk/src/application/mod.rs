//! Application layer of the clinic booking client.
//!
//! # What lives here?
//!
//! - **`gateway`** – Sends every API request through an [`HttpTransport`]
//!   and turns the `{ success, data, message }` envelope into `Ok`/`Err`.
//!   Adds a per-call timeout and an abort handle.
//!
//! - **`api`** – One typed method per backend endpoint on top of the gateway,
//!   plus the choice of local or production API origin.
//!
//! - **`notify`** – The single transient toast used for every success and
//!   error message.
//!
//! - **`admin`** – The password-gated dashboard: login, table load, status
//!   updates, delete, filter and row-click dispatch.
//!
//! - **`forms`** – The public booking and contact form controllers.
//!
//! Controllers talk to the page only through the view traits declared here
//! ([`admin::DashboardView`], [`forms::FormView`], [`notify::ToastSurface`],
//! [`admin::Confirmer`]).  Concrete views live in the infrastructure layer.
//!
//! [`HttpTransport`]: gateway::HttpTransport

pub mod admin;
pub mod api;
pub mod forms;
pub mod gateway;
pub mod notify;
