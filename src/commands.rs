//! Command surface: the clap command line and its dispatch to the services.
//!
//! Every command resolves to an [`Output`] on success or an [`ErrorPayload`]
//! on failure; printing is left to [`crate::run`].

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::error::{AccessError, ErrorPayload, ServiceError};
use crate::services::calendar::{self, CalendarView};
use crate::services::communications::{self, LogCommunicationForm};
use crate::services::companies::{self, CompanyForm};
use crate::services::dashboard::{self, DashboardView};
use crate::services::methods::{self, MethodForm};
use crate::services::notifications::{self, NotificationsView};
use crate::session::{require_role, Role, Session};
use crate::store::DocumentStore;
use crate::types::{Company, CommunicationEvent, CommunicationMethod, Config, PeriodicityUnit};

/// Environment variable carrying the signed-in user's email.
pub const USER_EMAIL_ENV: &str = "COMMTRACK_USER_EMAIL";

#[derive(Debug, Parser)]
#[command(
    name = "commtrack",
    version,
    about = "Company outreach tracking: overdue and due-today communication reminders"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Status rows for every company (user)
    Dashboard,
    /// Overdue and due-today lists
    Notifications,
    /// One company's communications as calendar entries
    Calendar { company_id: String },
    /// Configured communication methods
    Methods,
    /// The company roster (admin)
    Companies,
    /// Add a company (admin)
    AddCompany(CompanyArgs),
    /// Replace a company's profile, keeping its log (admin)
    UpdateCompany {
        id: String,
        #[command(flatten)]
        company: CompanyArgs,
    },
    /// Delete a company and its log (admin)
    DeleteCompany { id: String },
    /// Add a communication method (admin)
    AddMethod(MethodArgs),
    /// Delete a communication method (admin)
    DeleteMethod { id: String },
    /// Add the default methods when none exist (admin)
    SeedMethods,
    /// Log one communication against one or more companies (user)
    Log(LogArgs),
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct CompanyArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub location: String,
    #[arg(long)]
    pub linkedin: String,
    /// Comma separated
    #[arg(long)]
    pub emails: String,
    /// Comma separated
    #[arg(long)]
    pub phone_numbers: String,
    #[arg(long, default_value = "")]
    pub comments: String,
    #[arg(long)]
    pub periodicity: f64,
    /// days or weeks; defaults to the configured unit
    #[arg(long, value_parser = parse_unit)]
    pub unit: Option<PeriodicityUnit>,
}

impl CompanyArgs {
    fn to_form(&self, config: &Config) -> CompanyForm {
        CompanyForm {
            name: self.name.clone(),
            location: self.location.clone(),
            linkedin: self.linkedin.clone(),
            emails: self.emails.clone(),
            phone_numbers: self.phone_numbers.clone(),
            comments: self.comments.clone(),
            communication_periodicity: self.periodicity,
            periodicity_unit: self.unit.unwrap_or(config.default_periodicity_unit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct MethodArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
    /// Defaults to one past the current count
    #[arg(long)]
    pub sequence: Option<i64>,
    #[arg(long)]
    pub mandatory: bool,
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct LogArgs {
    /// Company ids, repeated or comma separated
    #[arg(long = "company", required = true, value_delimiter = ',')]
    pub company_ids: Vec<String>,
    #[arg(long = "type")]
    pub kind: String,
    #[arg(long)]
    pub date: String,
    #[arg(long, default_value = "")]
    pub notes: String,
}

fn parse_unit(raw: &str) -> Result<PeriodicityUnit, String> {
    PeriodicityUnit::parse(raw)
        .ok_or_else(|| format!("unknown unit {raw:?}, expected days or weeks"))
}

/// Session for the email in `$COMMTRACK_USER_EMAIL`, if any.
pub fn session_from_env(config: &Config) -> Option<Session> {
    std::env::var(USER_EMAIL_ENV)
        .ok()
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty())
        .map(|email| Session::for_email(&email, config))
}

/// Successful command output, serialized as the bare view.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Output {
    Dashboard(DashboardView),
    Notifications(NotificationsView),
    Calendar(CalendarView),
    Methods(Vec<CommunicationMethod>),
    Companies(Vec<Company>),
    Company(Company),
    Method(CommunicationMethod),
    Logged(CommunicationEvent),
    Deleted { deleted: String },
    Seeded { seeded: usize },
}

fn dispatch(
    command: &Command,
    store: &impl DocumentStore,
    session: Option<&Session>,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<Output, ServiceError> {
    Ok(match command {
        Command::Dashboard => Output::Dashboard(dashboard::get_dashboard(
            store,
            require_role(session, Role::User)?,
            now,
            config.recent_communication_limit,
        )?),
        Command::Notifications => {
            Output::Notifications(notifications::get_notifications(store, session, now)?)
        }
        Command::Calendar { company_id } => {
            Output::Calendar(calendar::get_calendar(store, session, company_id, now)?)
        }
        Command::Methods => {
            session.ok_or(AccessError::NotSignedIn)?;
            Output::Methods(methods::list_methods(store)?)
        }
        Command::Companies => Output::Companies(companies::list_companies(
            store,
            require_role(session, Role::Admin)?,
        )?),
        Command::AddCompany(args) => Output::Company(companies::create_company(
            store,
            require_role(session, Role::Admin)?,
            &args.to_form(config),
        )?),
        Command::UpdateCompany { id, company } => Output::Company(companies::update_company(
            store,
            require_role(session, Role::Admin)?,
            id,
            &company.to_form(config),
        )?),
        Command::DeleteCompany { id } => {
            companies::delete_company(store, require_role(session, Role::Admin)?, id)?;
            Output::Deleted { deleted: id.clone() }
        }
        Command::AddMethod(args) => {
            let session = require_role(session, Role::Admin)?;
            let sequence = match args.sequence {
                Some(s) => s,
                None => i64::from(methods::next_sequence(store)?),
            };
            let form = MethodForm {
                name: args.name.clone(),
                description: args.description.clone(),
                sequence,
                mandatory: args.mandatory,
            };
            Output::Method(methods::add_method(store, session, &form)?)
        }
        Command::DeleteMethod { id } => {
            methods::delete_method(store, require_role(session, Role::Admin)?, id)?;
            Output::Deleted { deleted: id.clone() }
        }
        Command::SeedMethods => Output::Seeded {
            seeded: methods::seed_default_methods(store, require_role(session, Role::Admin)?)?,
        },
        Command::Log(args) => {
            let form = LogCommunicationForm {
                communication_type: args.kind.clone(),
                communication_date: args.date.clone(),
                notes: args.notes.clone(),
            };
            Output::Logged(communications::log_communication(
                store,
                require_role(session, Role::User)?,
                &args.company_ids,
                &form,
            )?)
        }
    })
}

/// Run one command against a store.
pub fn execute(
    command: &Command,
    store: &impl DocumentStore,
    session: Option<&Session>,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<Output, ErrorPayload> {
    dispatch(command, store, session, config, now).map_err(|e| {
        log::warn!("{:?} failed: {}", command, e);
        ErrorPayload::from(&e)
    })
}
