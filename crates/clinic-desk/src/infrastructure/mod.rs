//! Infrastructure layer for the clinic desk client.
//!
//! Contains the adapters behind the application traits.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `clinic_core`, but MUST NOT be imported by the `application` layer outside
//! of tests.
//!
//! # Sub-modules
//!
//! - **`http`** – `reqwest` implementation of `HttpTransport`.
//!
//! - **`document`** – In-memory page: the dashboard, toast container and
//!   forms, rendering rows and toasts as escaped HTML.
//!
//! - **`console`** – Terminal implementations of the view traits used by the
//!   `clinic-desk` binary.
//!
//! - **`storage`** – TOML configuration file.
//!
//! - **`mock`** – Scripted transport and fixed-answer confirmer for tests.

pub mod console;
pub mod document;
pub mod http;
pub mod mock;
pub mod storage;
