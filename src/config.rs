use crate::api::DEFAULT_API_BASE;
use crate::reminder::ReminderSettings;
use anyhow::{Context, Result};
use chrono::Duration;
use std::env;

const MAX_LEAD_HOURS: i64 = 24 * 366;
const MAX_STUDY_BLOCK_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub classroom_token: String,
    pub api_base: String,
    pub max_concurrency: usize,
    pub reminders: ReminderSettings,
    pub log_level: String,
    pub log_json: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let classroom_token = env::var("CLASSROOM_TOKEN")
            .context("CLASSROOM_TOKEN not found. Please set it in .env file or environment")?;

        if classroom_token.trim().is_empty() {
            anyhow::bail!("CLASSROOM_TOKEN is empty");
        }

        let api_base = env::var("CLASSROOM_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let max_concurrency = parse_var("CLASSROOM_MAX_CONCURRENCY", 8usize)?.max(1);
        let lead_hours = parse_var("CLASSROOM_REMINDER_LEAD_HOURS", 24i64)?;
        let block_minutes = parse_var("CLASSROOM_STUDY_BLOCK_MINUTES", 60i64)?;
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_json = parse_var("LOG_JSON", false)?;

        Ok(Config {
            classroom_token,
            api_base,
            max_concurrency,
            reminders: reminder_settings(lead_hours, block_minutes)?,
            log_level,
            log_json,
        })
    }
}

/// Lead time is capped at a year and the study block at a day.
fn reminder_settings(lead_hours: i64, block_minutes: i64) -> Result<ReminderSettings> {
    if !(0..=MAX_LEAD_HOURS).contains(&lead_hours) {
        anyhow::bail!(
            "CLASSROOM_REMINDER_LEAD_HOURS must be between 0 and {}, got {}",
            MAX_LEAD_HOURS,
            lead_hours
        );
    }
    if !(1..=MAX_STUDY_BLOCK_MINUTES).contains(&block_minutes) {
        anyhow::bail!(
            "CLASSROOM_STUDY_BLOCK_MINUTES must be between 1 and {}, got {}",
            MAX_STUDY_BLOCK_MINUTES,
            block_minutes
        );
    }

    let lead = Duration::try_hours(lead_hours)
        .with_context(|| format!("Reminder lead of {} hours is out of range", lead_hours))?;
    let study_block = Duration::try_minutes(block_minutes)
        .with_context(|| format!("Study block of {} minutes is out of range", block_minutes))?;

    Ok(ReminderSettings { lead, study_block })
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {} ({})", name, raw, e)),
        _ => Ok(default),
    }
}
