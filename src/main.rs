mod api;
mod classify;
mod config;
mod due_date;
mod error;
mod export;
mod fetcher;
mod models;
mod reminder;
mod schedule;
mod telemetry;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use config::Config;
use models::{AggregationResult, ScheduleEvent};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "classroom-schedule")]
#[command(about = "Aggregate Google Classroom coursework into a status-annotated schedule", long_about = None)]
struct Cli {
    /// Write grades and events CSV files into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Add study reminders ahead of pending work
    #[arg(long)]
    reminders: bool,
    /// Print the result as JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    result: &'a AggregationResult,
    reminders: &'a [ScheduleEvent],
    study_topics: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;
    telemetry::init_tracing(&config)?;

    let client = api::ClassroomClient::new(config.classroom_token.clone(), config.api_base.clone())?;

    // One clock reading for the whole run
    let now = Local::now().naive_local();
    let outcome = fetcher::fetch_schedule(&client, now, config.max_concurrency).await;
    let result = outcome.result;

    let reminders = if cli.reminders {
        reminder::study_reminders(&result.events, now, &config.reminders)
    } else {
        Vec::new()
    };

    if cli.json {
        let output = JsonOutput {
            result: &result,
            reminders: &reminders,
            study_topics: export::study_topics(&result.grades),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&result, &reminders);
    }

    if let Some(dir) = &cli.export_dir {
        let grades_path = export::export_grades_to_csv(&result.grades, dir)?;
        let mut events = result.events.clone();
        events.extend(reminders.iter().cloned());
        let events_path = export::export_events_to_csv(&events, dir)?;
        tracing::info!(
            grades = %grades_path.display(),
            events = %events_path.display(),
            "exported CSV files"
        );
    }

    if let Some(e) = outcome.error {
        return Err(e).context("Failed to fetch classroom data");
    }

    Ok(())
}

fn print_summary(result: &AggregationResult, reminders: &[ScheduleEvent]) {
    if result.events.is_empty() {
        println!("No events to display");
    } else {
        println!("Your Assignments");
        for event in result.events.iter().chain(reminders) {
            let when = event
                .start
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "no due date".to_string());
            println!("  [{:<11}] {:<16}  {}", event.status.as_str(), when, event.title);
        }
    }

    println!();
    println!("{:.0}% Complete", result.completion_percentage().round());
    println!(
        "Completed: {} | Overdue: {} | Total: {}",
        result.completed_count,
        result.overdue_count,
        result.total_assignments()
    );

    if !result.courses.is_empty() {
        println!();
        println!("Courses:");
        for summary in result.courses.values() {
            println!("  - {} (grade: {})", summary.name, summary.grade);
        }
    }
}
