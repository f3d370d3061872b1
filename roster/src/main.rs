//! `roster` command-line client for the employee service.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result, bail, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use roster::RosterSettings;
use roster::domain::ports::{AlwaysConfirm, DeletionConfirmation};
use roster::domain::{
    Employee, EmployeeField, EmployeeId, FormWorkflow, LoadOutcome, RemoveOutcome, RosterCache,
    RosterCachePorts,
};
use roster::inbound::terminal::{parse_assignment, render_roster, stdin_confirmation};
use roster::outbound::employee_api::EmployeeHttpGateway;

/// `roster` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "roster",
    about = "List, create, edit and delete employees on the remote roster service",
    version
)]
struct CliArgs {
    /// Service base URL. Falls back to `ROSTER_API_URL` when omitted.
    #[arg(long = "api-url", value_name = "url", global = true)]
    api_url: Option<String>,
    /// Reconciliation after mutations: `merge` or `refetch`.
    #[arg(long = "reconciliation", value_name = "strategy", global = true)]
    reconciliation: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print the whole roster.
    List,
    /// Print one employee.
    Show {
        /// Employee id.
        #[arg(value_name = "id")]
        employee_id: i64,
    },
    /// Create an employee.
    Add(AddArgs),
    /// Change fields of an existing employee.
    Edit {
        /// Employee id.
        #[arg(value_name = "id")]
        employee_id: i64,
        /// Field assignment such as `salary=55000`; repeatable.
        #[arg(
            long = "set",
            value_name = "field=value",
            required = true,
            value_parser = parse_assignment
        )]
        assignments: Vec<(EmployeeField, String)>,
    },
    /// Delete an employee after confirmation.
    Delete {
        /// Employee id.
        #[arg(value_name = "id")]
        employee_id: i64,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Raw field values for a new employee; validated by the form workflow.
#[derive(Debug, Clone, Args)]
struct AddArgs {
    #[arg(long = "id", value_name = "id")]
    employee_id: String,
    #[arg(long, value_name = "name")]
    name: String,
    #[arg(long, value_name = "years")]
    age: String,
    #[arg(long, value_name = "amount")]
    salary: String,
    #[arg(long = "department-id", value_name = "id")]
    department_id: String,
    #[arg(long = "manager-id", value_name = "id")]
    manager_id: Option<String>,
}

impl AddArgs {
    fn assignments(self) -> Vec<(EmployeeField, String)> {
        vec![
            (EmployeeField::EmployeeId, self.employee_id),
            (EmployeeField::Name, self.name),
            (EmployeeField::Age, self.age),
            (EmployeeField::Salary, self.salary),
            (EmployeeField::DepartmentId, self.department_id),
            (EmployeeField::ManagerId, self.manager_id.unwrap_or_default()),
        ]
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let args = CliArgs::parse();

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build roster runtime")?;
    runtime.block_on(run(args))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(error) = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let mut settings = RosterSettings::load_from_iter([OsString::from("roster")])
        .map_err(|error| eyre!("failed to load roster settings: {error}"))?;
    if args.api_url.is_some() {
        settings.api_url = args.api_url;
    }
    if args.reconciliation.is_some() {
        settings.reconciliation = args.reconciliation;
    }

    let base_url = settings.api_base_url()?;
    let timeout = settings.request_timeout()?;
    let cache_config = settings.cache_config()?;
    info!(
        api_url = %base_url,
        timeout_secs = timeout.as_secs(),
        retry_delay_ms = u64::try_from(cache_config.retry_delay.as_millis()).unwrap_or(u64::MAX),
        reconciliation = ?cache_config.reconciliation,
        "starting roster client"
    );

    let gateway = EmployeeHttpGateway::new(base_url, timeout)
        .wrap_err("failed to build employee HTTP client")?;
    let skip_prompt = matches!(args.command, Command::Delete { yes: true, .. });
    let confirmation: Arc<dyn DeletionConfirmation> = if skip_prompt {
        Arc::new(AlwaysConfirm)
    } else {
        Arc::new(stdin_confirmation())
    };
    let cache = RosterCache::new(
        RosterCachePorts::new(Arc::new(gateway), confirmation),
        cache_config,
    );

    load_roster(&cache).await?;
    let result = execute(&cache, args.command).await;
    cache.shutdown();
    result
}

async fn load_roster(cache: &RosterCache) -> Result<()> {
    let outcome = tokio::select! {
        outcome = cache.load() => outcome?,
        signal = tokio::signal::ctrl_c() => {
            signal.wrap_err("failed to listen for interrupt")?;
            cache.cancel_load();
            bail!("roster load interrupted");
        }
    };
    match outcome {
        LoadOutcome::Loaded { .. } => Ok(()),
        LoadOutcome::Cancelled { attempts } => {
            bail!("roster load cancelled after {attempts} attempts")
        }
    }
}

async fn execute(cache: &RosterCache, command: Command) -> Result<()> {
    match command {
        Command::List => writeln!(io::stdout().lock(), "{}", render_roster(&cache.employees()))?,
        Command::Show { employee_id } => {
            let employee = find(cache, employee_id)?;
            writeln!(io::stdout().lock(), "{employee}")?;
        }
        Command::Add(fields) => {
            let mut form = FormWorkflow::new();
            form.begin_create()?;
            fill(&mut form, fields.assignments())?;
            let created = form.submit(cache).await?;
            writeln!(io::stdout().lock(), "created {created}")?;
        }
        Command::Edit {
            employee_id,
            assignments,
        } => {
            let target = find(cache, employee_id)?;
            let mut form = FormWorkflow::new();
            form.begin_edit(&target)?;
            fill(&mut form, assignments)?;
            let updated = form.submit(cache).await?;
            writeln!(io::stdout().lock(), "updated {updated}")?;
        }
        Command::Delete { employee_id, .. } => {
            let target = EmployeeId::new(employee_id);
            let verb = match cache.remove(target).await? {
                RemoveOutcome::Removed => "deleted",
                RemoveOutcome::Declined => "kept",
            };
            writeln!(io::stdout().lock(), "{verb} employee {target}")?;
        }
    }
    Ok(())
}

fn find(cache: &RosterCache, employee_id: i64) -> Result<Employee> {
    cache
        .find(EmployeeId::new(employee_id))
        .ok_or_else(|| eyre!("employee {employee_id} is not in the roster"))
}

fn fill(form: &mut FormWorkflow, assignments: Vec<(EmployeeField, String)>) -> Result<()> {
    for (field, value) in assignments {
        form.set_field(field, value)?;
    }
    Ok(())
}
