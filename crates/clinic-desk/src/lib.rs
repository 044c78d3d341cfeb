//! clinic-desk library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does clinic-desk do?
//!
//! It is the client side of a clinic's appointment-booking site.  Visitors
//! book appointments and send messages through two public forms; clinic
//! staff sign in to an admin dashboard to confirm, cancel and delete
//! appointments.  All data lives on a remote HTTP API that answers every
//! call with the same JSON envelope.
//!
//! The crate provides:
//!
//! 1. A request gateway that sends calls to that API and turns its envelope
//!    into a `Result`.
//! 2. A notification surface that shows one transient success or error
//!    message at a time.
//! 3. Controllers for the admin dashboard and the two forms, written against
//!    view traits so they can drive an HTML document or a terminal.
//! 4. The `clinic-desk` command-line tool, which drives the same controllers
//!    from a shell.

/// Application layer: gateway, notifications and page controllers.
pub mod application;

/// Infrastructure layer: HTTP transport, views, configuration and mocks.
pub mod infrastructure;
