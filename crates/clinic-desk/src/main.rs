//! Clinic desk: command-line front end.
//!
//! Drives the same controllers as the clinic web pages from a terminal: the
//! admin dashboard (list, confirm, cancel, delete), the public booking and
//! contact forms, and the read-only doctor and service catalogue.
//!
//! # Usage
//!
//! ```text
//! clinic-desk [OPTIONS] <COMMAND>
//!
//! Commands:
//!   appointments  List appointments [--status PENDING|CONFIRMED|CANCELLED]
//!   confirm       Mark an appointment CONFIRMED
//!   cancel        Mark an appointment CANCELLED
//!   delete        Delete an appointment [--yes]
//!   book          Book an appointment
//!   contact       Send a message to the clinic
//!   doctors       List doctors
//!   services      List medical services
//!   init-config   Write a configuration file with every default filled in
//!
//! Options:
//!   --config <PATH>   TOML configuration file
//!   --api-url <URL>   API origin (skips the local/production choice)
//!   --origin <URL>    Origin the client is treated as being served from
//! ```
//!
//! Admin commands take `--admin-password`; without it the password is read
//! from stdin.  It is kept in memory for the life of the process only.
//!
//! # Exit status
//!
//! `0` when the requested action succeeded, `1` when it failed.  Failures are
//! reported the same way the web pages report them: as a toast, printed to
//! stderr.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use clinic_core::validation::field;
use clinic_core::{AppointmentId, AppointmentStatus};
use clinic_desk::application::admin::{
    parse_status_filter, AdminDashboard, Confirmer, DashboardView,
};
use clinic_desk::application::api::ClinicApi;
use clinic_desk::application::forms::{BookingFormController, ContactFormController};
use clinic_desk::application::gateway::{AbortHandle, Gateway};
use clinic_desk::application::notify::Notifier;
use clinic_desk::infrastructure::console::{
    doctor_line, prompt_line, service_line, ConsoleDashboard, ConsoleForm, ConsoleToasts,
    StdinConfirmer,
};
use clinic_desk::infrastructure::http::ReqwestTransport;
use clinic_desk::infrastructure::storage::config::{load_config, save_config, ClientConfig};

const BOOKING_CONFIRMATION: &str =
    "Appointment requested! The clinic will call you to confirm the time.";

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Clinic appointment desk.
#[derive(Debug, Parser)]
#[command(
    name = "clinic-desk",
    about = "Manage clinic appointments and submit bookings from the terminal",
    version
)]
struct Cli {
    /// TOML configuration file.  Defaults apply when omitted or missing.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// API origin, e.g. `http://localhost:8080`.
    ///
    /// Overrides both the configured `base_url` and the local/production
    /// choice made from `--origin`.
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Origin the client is treated as being served from.
    ///
    /// `localhost`, `127.0.0.1` and `file:` origins talk to the local API;
    /// anything else talks to production.
    #[arg(long, value_name = "URL")]
    origin: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct AdminArgs {
    /// Admin password.  Read from stdin when omitted.
    #[arg(long = "admin-password", value_name = "PASSWORD")]
    admin_password: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List appointments, newest bookings first.
    Appointments {
        /// Show only appointments with this status.
        #[arg(long, value_name = "STATUS")]
        status: Option<String>,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Mark an appointment CONFIRMED.
    Confirm {
        id: AppointmentId,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Mark an appointment CANCELLED.
    Cancel {
        id: AppointmentId,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Delete an appointment.
    Delete {
        id: AppointmentId,
        /// Do not ask for confirmation.
        #[arg(long, short)]
        yes: bool,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Book an appointment through the public booking form.
    Book {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
        /// Local date and time.
        #[arg(long, default_value = "", value_name = "YYYY-MM-DDTHH:MM")]
        datetime: String,
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Send a message through the contact form.
    Contact {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// List the clinic's doctors.
    Doctors,
    /// List the clinic's medical services.
    Services,
    /// Write a configuration file with every default filled in.
    InitConfig {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

/// What an admin command does once signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminAction {
    List(Option<AppointmentStatus>),
    SetStatus(AppointmentId, AppointmentStatus),
    Delete(AppointmentId),
}

impl Cli {
    /// Loads the configuration file and applies the command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => ClientConfig::default(),
        };
        if let Some(url) = &self.api_url {
            config.api.base_url = Some(url.clone());
        }
        if let Some(origin) = &self.origin {
            config.api.page_origin = origin.clone();
        }
        Ok(config)
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

/// Shared services every command uses.
struct Desk {
    api: ClinicApi,
    notifier: Arc<Notifier>,
}

impl Desk {
    fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let base_url = config
            .api
            .resolved_base_url()
            .context("resolving the API origin")?;
        let transport = ReqwestTransport::new(Duration::from_secs(config.api.connect_timeout_secs))
            .context("creating the HTTP client")?;
        let gateway = Gateway::new(Arc::new(transport))
            .with_timeout(Duration::from_secs(config.api.timeout_secs));
        let notifier = Notifier::new(Arc::new(ConsoleToasts::stderr()))
            .with_default_duration(Duration::from_millis(config.notifications.duration_ms));

        info!(api = %base_url, "clinic desk ready");
        Ok(Self {
            api: ClinicApi::new(gateway, base_url),
            notifier: Arc::new(notifier),
        })
    }

    async fn run_admin(
        &self,
        admin: AdminArgs,
        assume_yes: bool,
        action: AdminAction,
    ) -> anyhow::Result<bool> {
        let password = match admin.admin_password {
            Some(password) => password,
            None => prompt_line("Admin password: ").context("reading the admin password")?,
        };

        Ok(run_admin_session(
            self.api.clone(),
            Arc::clone(&self.notifier),
            Arc::new(ConsoleDashboard::stdout()),
            Arc::new(StdinConfirmer::new(assume_yes)),
            &password,
            action,
        )
        .await)
    }

    async fn book(&self, values: Vec<(&'static str, String)>) -> bool {
        let form = Arc::new(ConsoleForm::new(values, BOOKING_CONFIRMATION));
        let controller =
            BookingFormController::new(self.api.clone(), Arc::clone(&self.notifier), form);
        controller.submit().await.is_ok()
    }

    async fn contact(&self, values: Vec<(&'static str, String)>) -> bool {
        let form = Arc::new(ConsoleForm::new(values, ""));
        let controller =
            ContactFormController::new(self.api.clone(), Arc::clone(&self.notifier), form);
        controller.submit().await.is_ok()
    }

    async fn doctors(&self) -> bool {
        match self.api.doctors(&AbortHandle::new()).await {
            Ok(doctors) => {
                doctors.iter().for_each(|d| println!("{}", doctor_line(d)));
                true
            }
            Err(e) => {
                self.notifier.error(format!("Failed to load doctors: {e}"));
                false
            }
        }
    }

    async fn services(&self) -> bool {
        match self.api.services(&AbortHandle::new()).await {
            Ok(services) => {
                services
                    .iter()
                    .filter(|s| s.active)
                    .for_each(|s| println!("{}", service_line(s)));
                true
            }
            Err(e) => {
                self.notifier.error(format!("Failed to load services: {e}"));
                false
            }
        }
    }
}

/// Signs in, performs `action` and signs out again.
///
/// A filtered listing keeps the dashboard quiet while signing in, so stdout
/// carries only the filtered table and not the full one loaded at sign-in.
async fn run_admin_session<W: Write + Send + 'static>(
    api: ClinicApi,
    notifier: Arc<Notifier>,
    view: Arc<ConsoleDashboard<W>>,
    confirmer: Arc<dyn Confirmer>,
    password: &str,
    action: AdminAction,
) -> bool {
    let filtered = matches!(action, AdminAction::List(Some(_)));
    let dashboard = AdminDashboard::new(
        api,
        notifier,
        Arc::clone(&view) as Arc<dyn DashboardView>,
        confirmer,
    );

    view.set_quiet(filtered);
    if let Err(e) = dashboard.login(password).await {
        debug!(error = %e, "admin sign-in failed");
    }
    view.set_quiet(false);
    if !dashboard.is_authenticated() {
        return false;
    }

    let outcome = match action {
        AdminAction::List(None) => Ok(()),
        AdminAction::List(status) => dashboard.filter_by_status(status).await,
        AdminAction::SetStatus(id, status) => dashboard.update_status(id, status).await,
        AdminAction::Delete(id) => dashboard.delete(id).await.map(|_| ()),
    };
    dashboard.logout();

    if let Err(e) = &outcome {
        debug!(error = %e, "admin command failed");
    }
    outcome.is_ok()
}

fn exit_code(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.client_config()?;

    // RUST_LOG wins over the configured level.  Logs go to stderr so stdout
    // carries only the listings.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Command::InitConfig { path } = &cli.command {
        save_config(path, &config)
            .with_context(|| format!("writing configuration to {}", path.display()))?;
        info!(path = %path.display(), "configuration written");
        return Ok(ExitCode::SUCCESS);
    }

    let desk = Desk::new(&config)?;

    let succeeded = match cli.command {
        Command::Appointments { status, admin } => {
            let status = parse_status_filter(status.as_deref().unwrap_or_default())
                .context("parsing --status")?;
            desk.run_admin(admin, false, AdminAction::List(status)).await?
        }
        Command::Confirm { id, admin } => {
            let action = AdminAction::SetStatus(id, AppointmentStatus::Confirmed);
            desk.run_admin(admin, false, action).await?
        }
        Command::Cancel { id, admin } => {
            let action = AdminAction::SetStatus(id, AppointmentStatus::Cancelled);
            desk.run_admin(admin, false, action).await?
        }
        Command::Delete { id, yes, admin } => {
            desk.run_admin(admin, yes, AdminAction::Delete(id)).await?
        }
        Command::Book {
            name,
            phone,
            email,
            datetime,
            reason,
        } => {
            desk.book(vec![
                (field::PATIENT_NAME, name),
                (field::PHONE, phone),
                (field::PATIENT_EMAIL, email),
                (field::APPOINTMENT_DATETIME, datetime),
                (field::REASON, reason),
            ])
            .await
        }
        Command::Contact {
            name,
            email,
            phone,
            message,
        } => {
            desk.contact(vec![
                (field::CONTACT_NAME, name),
                (field::CONTACT_EMAIL, email),
                (field::CONTACT_PHONE, phone),
                (field::CONTACT_MESSAGE, message),
            ])
            .await
        }
        Command::Doctors => desk.doctors().await,
        Command::Services => desk.services().await,
        Command::InitConfig { .. } => true,
    };

    Ok(exit_code(succeeded))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
