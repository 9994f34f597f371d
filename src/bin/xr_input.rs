use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use xr_input::build_info;
use xr_input::config::{PROFILE_ENV, RouterConfig};
use xr_input::health;

#[derive(Parser)]
#[command(name = "xr-input", version = build_info::PKG_VERSION, about = "Input routing diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run health checks and exit with 0 (pass), 1 (fail) or 2 (warnings)
    Health {
        /// Print per-check detail lines
        #[arg(short, long)]
        verbose: bool,
    },
    /// Load, validate and summarize a configuration profile
    Profile {
        /// Profile name; defaults to $XR_INPUT_PROFILE or "release"
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Print build metadata
    Info,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Health { verbose } => {
            info!("{} starting health checks", build_info::version_string());
            let report = health::run_all_checks();
            health::print_report(&report, verbose);
            std::process::exit(report.exit_code());
        }
        Command::Profile { profile } => {
            let config = match profile {
                Some(name) => RouterConfig::load(&name),
                None => RouterConfig::load_from_env(),
            }
            .with_context(|| format!("loading configuration (see {})", PROFILE_ENV))?;
            print_profile(&config)?;
        }
        Command::Info => println!("{}", build_info::detailed_info()),
    }

    Ok(())
}

fn print_profile(config: &RouterConfig) -> anyhow::Result<()> {
    let profiles = &config.profiles;
    profiles
        .validate()
        .with_context(|| format!("profile '{}' is invalid", config.profile))?;

    println!("{} {}", "Profile:".bold(), config.profile);
    println!(
        "  log_dropped_events = {}, max_deferred_commands = {}",
        config.router.log_dropped_events, config.router.max_deferred_commands
    );

    let mut actions = Builder::default();
    actions.push_record(["Id", "Action", "Constraint", "Gesture", "Rules"]);
    for action in &profiles.input_actions.actions {
        let gestures: Vec<String> = profiles
            .gestures
            .gestures
            .iter()
            .filter(|g| g.action.id == action.id)
            .map(|g| format!("{:?}", g.gesture_type))
            .collect();
        let rules: Vec<String> = profiles
            .action_rules
            .rules_for(action)
            .map(|r| format!("{:?} -> {}", r.criterion, r.rule_action.id))
            .collect();
        actions.push_record([
            action.id.to_string(),
            action.description.clone(),
            format!("{:?}", action.axis_constraint),
            gestures.join(", "),
            rules.join(", "),
        ]);
    }

    let mut table = actions.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    println!("{}", table);

    let unmapped = profiles.gestures.unmapped_types();
    if !unmapped.is_empty() {
        println!("{} unmapped gestures: {:?}", "⚠".yellow(), unmapped);
    }
    println!("{} input profiles valid", "✓".green());

    Ok(())
}
