use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::time::Duration;
use tracing::{debug, info};

use teenmatch_cli::app::App;
use teenmatch_cli::cli::{Cli, Commands, ConfigCommands};
use teenmatch_cli::core::{ModAction, ModeratorApi};
use teenmatch_cli::screens::run_moderation_tui;
use teenmatch_cli::utils::logging::{init_logging, LogTarget};
use teenmatch_cli::utils::{format_created_at, or_dash, truncate_string, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    let interactive = cli.command.as_ref().map(Commands::is_interactive).unwrap_or(true);
    let target = if interactive { LogTarget::File } else { LogTarget::Stderr };
    let _log_guard = init_logging(&level, target)?;

    let api_url = config.resolve_api_url(cli.api_url.as_deref());
    debug!(%api_url, "moderator API endpoint resolved");

    match cli.command {
        None => {
            // No command - run the swipe screen
            let mut app = App::new();
            app.run().await?;
        }
        Some(Commands::Moderate) => {
            let api = build_api(&api_url, &config)?;
            run_moderation_tui(api).await?;
        }
        Some(Commands::Pending) => {
            handle_pending(&build_api(&api_url, &config)?).await?;
        }
        Some(Commands::Reports) => {
            handle_reports(&build_api(&api_url, &config)?).await?;
        }
        Some(Commands::Stats) => {
            handle_stats(&build_api(&api_url, &config)?).await?;
        }
        Some(Commands::Approve { id }) => {
            handle_action(&build_api(&api_url, &config)?, ModAction::Approve(id)).await?;
        }
        Some(Commands::Reject { id }) => {
            handle_action(&build_api(&api_url, &config)?, ModAction::Reject(id)).await?;
        }
        Some(Commands::Resolve { id }) => {
            handle_action(&build_api(&api_url, &config)?, ModAction::ResolveReport(id)).await?;
        }
        Some(Commands::Dismiss { id }) => {
            handle_action(&build_api(&api_url, &config)?, ModAction::DismissReport(id)).await?;
        }
        Some(Commands::Config { command }) => {
            handle_config(command, config, &api_url)?;
        }
    }

    Ok(())
}

fn build_api(api_url: &str, config: &AppConfig) -> Result<ModeratorApi> {
    ModeratorApi::new(api_url, Duration::from_secs(config.request_timeout_secs))
        .context("Failed to build HTTP client")
}

async fn handle_pending(api: &ModeratorApi) -> Result<()> {
    let profiles = api.pending_profiles().await.context("Failed to load pending profiles")?;

    println!("Pending profiles ({})\n", profiles.len());
    println!(
        "{:<8} {:<20} {:<5} {:<7} {:<20} {:<16} {:<18}",
        "ID", "Name", "Age", "Gender", "City", "Username", "Created"
    );
    println!("{}", "-".repeat(98));

    for p in profiles {
        println!(
            "{:<8} {:<20} {:<5} {:<7} {:<20} {:<16} {:<18}",
            p.id,
            truncate_string(&p.name, 20),
            p.age,
            p.gender_label(),
            truncate_string(&p.city, 20),
            or_dash(p.username.as_deref()),
            format_created_at(p.created_at.as_deref())
        );
        if let Some(bio) = p.bio.as_deref() {
            println!("         {}", truncate_string(bio, 80).as_str().dimmed());
        }
    }

    Ok(())
}

async fn handle_reports(api: &ModeratorApi) -> Result<()> {
    let reports = api.reports().await.context("Failed to load reports")?;

    println!("Open reports ({})\n", reports.len());
    println!(
        "{:<8} {:<18} {:<18} {:<18} {}",
        "ID", "Reported", "Reporter", "Created", "Reason"
    );
    println!("{}", "-".repeat(98));

    for r in reports {
        println!(
            "{:<8} {:<18} {:<18} {:<18} {}",
            r.id,
            truncate_string(or_dash(r.reported_name.as_deref()), 18),
            truncate_string(or_dash(r.reporter_name.as_deref()), 18),
            format_created_at(r.created_at.as_deref()),
            truncate_string(&r.reason, 40)
        );
    }

    Ok(())
}

async fn handle_stats(api: &ModeratorApi) -> Result<()> {
    let stats = api.stats().await.context("Failed to load statistics")?;

    println!("Moderation statistics\n");
    println!("{:<16} {}", "Total profiles", stats.total_profiles);
    println!("{:<16} {}", "Approved", stats.approved.to_string().as_str().green());
    println!("{:<16} {}", "Pending", stats.pending.to_string().as_str().yellow());
    println!("{:<16} {}", "Rejected", stats.rejected.to_string().as_str().red());
    println!("{:<16} {}", "Matches", stats.matches);
    println!("{:<16} {}", "Open reports", stats.pending_reports);
    println!("{:<16} {}", "Likes today", stats.likes_today);

    Ok(())
}

async fn handle_action(api: &ModeratorApi, action: ModAction) -> Result<()> {
    info!(action = action.name(), target = action.target_id(), "running moderation action");

    match api.perform(action).await {
        Ok(()) => {
            println!("{} {} (#{})", "✓".green(), action.success_message(), action.target_id());
            Ok(())
        }
        Err(e) => {
            println!("{} Action failed", "✗".red());
            Err(e).with_context(|| format!("{} #{} was not applied", action.name(), action.target_id()))
        }
    }
}

fn handle_config(command: ConfigCommands, mut config: AppConfig, api_url: &str) -> Result<()> {
    match command {
        ConfigCommands::View => {
            println!("Configuration:\n");
            println!("api_url: {}", or_dash(config.api_url.as_deref()));
            println!("log_level: {}", config.log_level);
            println!("request_timeout_secs: {}", config.request_timeout_secs);
            println!("\nEffective API URL: {}", api_url);
        }
        ConfigCommands::SetApiUrl { url } => {
            config.set_api_url(url.clone())?;
            println!("{} API URL set to {}", "✓".green(), url);
        }
        ConfigCommands::Path => {
            println!("{}", AppConfig::config_path()?.display());
        }
    }

    Ok(())
}
