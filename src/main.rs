use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::io::Read;

use compliance_actions::workflow::{
    reporting_quarter, ActionResolver, Clock, FixedClock, FormData, ModalDescriptor, ReportContext,
    Role, SystemClock, Translate, UserRoles,
};
use compliance_actions::{
    config, create_report_span, generate_correlation_id, init_config, init_telemetry, Catalog,
    InMemoryReports,
};

#[derive(Parser)]
#[command(name = "compliance-actions")]
#[command(about = "Resolve the workflow actions available on a compliance report")]
#[command(long_about = "Evaluates which workflow actions (submit, recommend, assess, return, \
                       supplemental) a user may take on a compliance report, and simulates \
                       report workflows against an in-memory store.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the actions available for a report context
    Resolve {
        /// JSON report context file, or '-' for stdin
        #[arg(long, default_value = "-")]
        context: String,
        /// Role held by the viewer (repeatable)
        #[arg(long = "role", help = "e.g. analyst, director, signing_authority")]
        roles: Vec<String>,
        /// Evaluate as of this date (YYYY-MM-DD) instead of now
        #[arg(long)]
        as_of: Option<String>,
        /// Print actions for every status, not only the current one
        #[arg(long)]
        all: bool,
    },
    /// Walk a new report through a sequence of confirmed actions
    Simulate {
        /// Compliance period of the simulated report
        #[arg(long)]
        period: String,
        /// Treat the report as an early-issuance report
        #[arg(long)]
        early_issuance: bool,
        /// Declare signing authority on the original draft
        #[arg(long)]
        declare: bool,
        /// Evaluate as of this date (YYYY-MM-DD) instead of now
        #[arg(long)]
        as_of: Option<String>,
        /// Steps as roles:button-id, e.g. signing_authority:submit-report-btn
        #[arg(long = "step", required = true)]
        steps: Vec<String>,
    },
    /// Show deadline and reporting quarter for a compliance period
    Deadline {
        #[arg(long)]
        period: String,
        #[arg(long)]
        as_of: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config()?;
    init_telemetry(&config.observability)?;
    init_config()?;

    let catalog = match &config.locale.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::english()?,
    };

    match cli.command {
        Commands::Resolve {
            context,
            roles,
            as_of,
            all,
        } => {
            let clock = clock_for(as_of.as_deref())?;
            resolve_command(&catalog, clock.as_ref(), &context, &roles, all)
        }
        Commands::Simulate {
            period,
            early_issuance,
            declare,
            as_of,
            steps,
        } => {
            let clock = clock_for(as_of.as_deref())?;
            simulate_command(&catalog, clock.as_ref(), &period, early_issuance, declare, &steps)
        }
        Commands::Deadline { period, as_of } => {
            let clock = clock_for(as_of.as_deref())?;
            deadline_command(clock.as_ref(), &period)
        }
    }
}

fn clock_for(as_of: Option<&str>) -> Result<Box<dyn Clock>> {
    match as_of {
        Some(date) => {
            let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("Invalid --as-of date: {date}"))?;
            let instant: DateTime<Utc> = day
                .and_hms_opt(12, 0, 0)
                .ok_or_else(|| anyhow!("Invalid --as-of date: {date}"))?
                .and_utc();
            Ok(Box::new(FixedClock(instant)))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

fn parse_roles<S: AsRef<str>>(roles: &[S]) -> Result<UserRoles> {
    let parsed = roles
        .iter()
        .flat_map(|entry| entry.as_ref().split(','))
        .filter(|name| !name.trim().is_empty())
        .map(|name| name.parse::<Role>().map_err(|e| anyhow!(e)))
        .collect::<Result<Vec<_>>>()?;
    Ok(UserRoles::new(parsed))
}

fn resolve_command(
    catalog: &dyn Translate,
    clock: &dyn Clock,
    context_source: &str,
    roles: &[String],
    all: bool,
) -> Result<()> {
    let correlation_id = generate_correlation_id();
    let _span = create_report_span("resolve", None, &correlation_id).entered();

    let raw = if context_source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(context_source)
            .with_context(|| format!("Failed to read context file {context_source}"))?
    };
    let report: ReportContext = serde_json::from_str(&raw).context("Invalid report context JSON")?;
    let roles = parse_roles(roles)?;

    let deadline = config()?.deadline();
    let resolver = ActionResolver::new(catalog, clock, deadline);
    let output = if all {
        serde_json::to_string_pretty(&resolver.resolve(&report, &roles)?)?
    } else {
        serde_json::to_string_pretty(&resolver.resolve_current(&report, &roles)?)?
    };
    println!("{output}");
    Ok(())
}

fn simulate_command(
    catalog: &dyn Translate,
    clock: &dyn Clock,
    period: &str,
    early_issuance: bool,
    declare: bool,
    steps: &[String],
) -> Result<()> {
    let store = InMemoryReports::new();
    let chain = store.create_report(period, early_issuance);
    if declare {
        store.declare_signing_authority(chain, 0)?;
    }

    let correlation_id = generate_correlation_id();
    let _span = create_report_span("simulate", Some(chain), &correlation_id).entered();
    let resolver = ActionResolver::new(catalog, clock, config()?.deadline());

    println!("📄 Report {chain} for compliance period {period}");
    for (index, step) in steps.iter().enumerate() {
        let (role_list, button_id) = step
            .split_once(':')
            .ok_or_else(|| anyhow!("Step '{step}' must look like roles:button-id"))?;
        let roles = parse_roles(&[role_list])?;
        let version = store
            .latest_version(chain)
            .ok_or_else(|| anyhow!("Report {chain} has no versions left"))?;
        let report = store.context(chain, version)?;

        let buttons = resolver.resolve_current(&report, &roles)?;
        let Some(button) = buttons.iter().find(|b| b.id == button_id) else {
            let available: Vec<_> = buttons.iter().map(|b| b.id).collect();
            bail!(
                "Step {}: '{button_id}' is not available on version {version} ({}); \
                 available: {:?}",
                index + 1,
                report.current_status.map_or("unknown", |s| s.as_str()),
                available
            );
        };

        let mut modal: Option<ModalDescriptor> = None;
        if !button.click(FormData::new(), &mut modal) {
            bail!("Step {}: '{button_id}' is disabled", index + 1);
        }
        let modal = modal.ok_or_else(|| anyhow!("Step {}: no confirmation opened", index + 1))?;
        println!("  {}. [{role_list}] {} → {}", index + 1, button.label, modal.title);

        modal
            .primary_button_action
            .invoke(&store.operations(chain, version))
            .with_context(|| format!("Step {} failed", index + 1))?;
    }

    println!();
    println!("📋 Final versions:");
    for version in store.versions(chain) {
        let status = store.status(chain, version)?;
        println!("  v{version}: {status}");
    }
    Ok(())
}

fn deadline_command(clock: &dyn Clock, period: &str) -> Result<()> {
    let deadline = config()?.deadline();
    let now = clock.now();

    match deadline.deadline_for(period) {
        Some(at) => {
            println!("⏳ Deadline for {period}: {}", at.format("%Y-%m-%d %H:%M UTC"));
            println!(
                "   Grace period: {} days, past deadline: {}",
                deadline.grace_period_days(),
                deadline.is_past(period, now)
            );
        }
        None => bail!("'{period}' is not a compliance period year"),
    }
    if let Some(quarter) = reporting_quarter(period, now) {
        println!("   Reporting quarter: {quarter:?}");
    }
    Ok(())
}
