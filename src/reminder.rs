use crate::models::{ScheduleEvent, Status};
use chrono::{Duration, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSettings {
    /// How long before the due instant the study block starts.
    pub lead: Duration,
    pub study_block: Duration,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            lead: Duration::hours(24),
            study_block: Duration::minutes(60),
        }
    }
}

/// Derive a study reminder for every item still waiting on work: ungraded,
/// not turned in, and due after `now`.
///
/// The study block starts `lead` before the due instant (that is also the
/// reminder instant) and lasts `study_block`.
pub fn study_reminders(
    events: &[ScheduleEvent],
    now: NaiveDateTime,
    settings: &ReminderSettings,
) -> Vec<ScheduleEvent> {
    events
        .iter()
        .filter(|e| e.status == Status::Ungraded)
        .filter_map(|e| e.start.filter(|due| *due > now).map(|due| (e, due)))
        .filter_map(|(event, due)| {
            let Some((start, end)) = study_window(due, settings) else {
                tracing::warn!(title = %event.title, %due, "study reminder out of range, skipping");
                return None;
            };
            Some(ScheduleEvent {
                title: format!("Study: {}", event.title),
                start: Some(start),
                end: Some(end),
                status: event.status,
                color: event.color,
                remind_at: Some(start),
            })
        })
        .collect()
}

/// `(start, end)` of the study block, or `None` if either bound overflows.
fn study_window(due: NaiveDateTime, settings: &ReminderSettings) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = due.checked_sub_signed(settings.lead)?;
    let end = start.checked_add_signed(settings.study_block)?;
    Some((start, end))
}
