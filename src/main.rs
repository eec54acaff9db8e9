//! Project Tracker CLI Entry Point

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use rolling_logger::LoggerConfig;
use serde::Serialize;

use project_tracker_lib::cli::{Cli, Commands, ConfigAction};
use project_tracker_lib::commands;
use project_tracker_lib::config::AppConfig;
use project_tracker_lib::domain::{DomainError, DomainResult, Project, ProjectStats, TimelineItem, TimelineRange};
use project_tracker_lib::AppState;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config, cli.verbose);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &AppConfig, verbose: bool) {
    let logger_config = LoggerConfig {
        level: if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info },
        ..Default::default()
    };
    let log_dir = config.resolved_log_dir();
    if let Err(e) = rolling_logger::init_logger_with(&log_dir, "ProjectTracker", logger_config) {
        eprintln!("Logging to {} disabled: {}", log_dir.display(), e);
    }
}

async fn run(cli: Cli, config: AppConfig) -> DomainResult<()> {
    let Cli {
        command,
        json,
        config: config_path,
        source,
        ..
    } = cli;
    // Config commands work without a backend
    let command = match command {
        Commands::Config { action } => return config_command(action, config_path, &config, json),
        other => other,
    };

    let state = match &source {
        Some(snapshot) => AppState::offline(config, snapshot)?,
        None => AppState::remote(config)?,
    };
    // Listing and writes go straight to the repository
    let needs_cache = !matches!(
        command,
        Commands::List(_) | Commands::Add(_) | Commands::Delete { .. } | Commands::Import { .. }
    );
    if needs_cache {
        commands::refresh_projects(&state).await?;
    }

    let now = Utc::now();

    match command {
        Commands::List(args) => {
            let projects = commands::list_projects(&state, args.to_filter()?).await?;
            if json {
                print_json(&projects)?;
            } else {
                print_projects(&projects);
            }
        }
        Commands::Export { format, out_dir } => {
            let dir = out_dir.unwrap_or_else(|| state.config.resolved_export_dir());
            let path = commands::export_to_dir(&state, format.into(), &dir, now.date_naive()).await?;
            println!("Exported to {}", path.display());
        }
        Commands::Import { path, format } => {
            let summary = commands::import_file(&state, &path, format.map(Into::into), now).await?;
            if json {
                print_json(&summary)?;
            } else {
                println!("Imported {} new, {} updated", summary.created, summary.updated);
            }
        }
        Commands::Timeline(args) => {
            state.store.lock().await.set_filter(args.to_filter()?);
            let (items, range) = commands::get_timeline(&state, now).await;
            if json {
                print_json(&TimelineOutput { items: &items, range: &range })?;
            } else {
                print_timeline(&items, &range);
            }
        }
        Commands::Stats => {
            let stats = commands::get_stats(&state).await;
            if json {
                print_json(&stats)?;
            } else {
                print_stats(&stats);
            }
        }
        Commands::Tags { input } => {
            for tag in commands::suggest_tags(&state, &input).await {
                println!("{}", tag);
            }
        }
        Commands::Insights(args) => {
            state.store.lock().await.set_filter(args.to_filter()?);
            let insights = commands::generate_insights(&state, now).await?;
            if let Some(error) = insights.error {
                return Err(DomainError::Network(error));
            }
            if let Some(insights) = insights.insights {
                if json {
                    print_json(&insights)?;
                } else {
                    println!("Summary\n{}\n\nSuggestions\n{}\n\nTrends\n{}", insights.summary, insights.suggestions, insights.trends);
                }
            }
        }
        Commands::Summary { id } => {
            println!("{}", commands::summarize_project(&state, &id).await?);
        }
        Commands::Add(args) => {
            let created = commands::create_project(&state, &args.to_draft()?, now).await?;
            println!("Created {} ({})", created.name, created.id);
        }
        Commands::Edit { id, changes } => {
            let project = state
                .store
                .lock()
                .await
                .find(&id)
                .cloned()
                .ok_or_else(|| DomainError::NotFound(format!("Project {}", id)))?;
            let updated = commands::update_project(&state, &id, &changes.to_draft(&project)?, now).await?;
            println!("Updated {} ({})", updated.name, updated.id);
        }
        Commands::Delete { id } => {
            commands::delete_project(&state, &id).await?;
            println!("Deleted {}", id);
        }
        Commands::Config { .. } => unreachable!("config commands return before this match"),
    }
    Ok(())
}

fn config_command(
    action: ConfigAction,
    path: Option<PathBuf>,
    config: &AppConfig,
    json: bool,
) -> DomainResult<()> {
    match action {
        ConfigAction::Init { force } => {
            let path = path
                .or_else(AppConfig::default_path)
                .ok_or_else(|| DomainError::Config("no config directory on this platform".to_string()))?;
            AppConfig::init_file(&path, force)?;
            println!("Wrote {}", path.display());
        }
        ConfigAction::Show => {
            let shown = config.redacted();
            if json {
                print_json(&shown)?;
            } else {
                println!("Backend URL:    {}", shown.backend_url);
                println!("API key:        {}", shown.api_key);
                println!("Functions URL:  {}", shown.functions_base_url().unwrap_or_default());
                println!("Projects table: {}", shown.projects_table);
                println!("Log dir:        {}", shown.resolved_log_dir().display());
                println!("Export dir:     {}", shown.resolved_export_dir().display());
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct TimelineOutput<'a> {
    items: &'a [TimelineItem],
    range: &'a TimelineRange,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> DomainResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects match the current filter");
        return;
    }
    for p in projects {
        println!(
            "{:<14} {:<32} {:<12} {:<12} {:>3}%  {}",
            p.id,
            p.name,
            p.status,
            p.project_type,
            p.progress.get(),
            p.tags.join(", ")
        );
    }
}

fn print_timeline(items: &[TimelineItem], range: &TimelineRange) {
    println!(
        "{} .. {} ({} days)",
        range.start.format("%Y-%m-%d"),
        range.end.format("%Y-%m-%d"),
        range.days()
    );
    for item in items {
        println!(
            "{:<32} {} .. {}  {:<12} {:>3}%  {}",
            item.name,
            item.start.format("%Y-%m-%d"),
            item.end.format("%Y-%m-%d"),
            item.status,
            item.progress,
            item.color
        );
    }
}

fn print_stats(stats: &ProjectStats) {
    println!("Projects:          {}", stats.total);
    println!("Monetized:         {}", stats.monetized);
    println!("Completion rate:   {:.0}%", stats.completion_rate * 100.0);
    println!("Average progress:  {:.1}%", stats.average_progress);
    println!("Avg usefulness:    {:.1}", stats.average_usefulness);
    for (status, count) in &stats.by_status {
        println!("  {:<12} {}", status, count);
    }
    if !stats.top_tags.is_empty() {
        let tags: Vec<String> = stats.top_tags.iter().map(|t| format!("{} ({})", t.tag, t.count)).collect();
        println!("Top tags:          {}", tags.join(", "));
    }
}
