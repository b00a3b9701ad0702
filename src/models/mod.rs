use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

pub const NOT_GRADED: &str = "Not Graded";
pub const NOT_AVAILABLE: &str = "N/A";

// ============================================================================
// Google Classroom API Models
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Aggregate grade, when the source can supply one.
    #[serde(default)]
    pub grade: Option<f64>,
}

impl Course {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed course")
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseworkItem {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due_date: Option<DueDate>,
    #[serde(default)]
    pub due_time: Option<DueTime>,
}

impl CourseworkItem {
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => "Untitled",
        }
    }
}

/// Calendar date as sent by the API; `month` is 1-indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DueDate {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub day: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DueTime {
    #[serde(default)]
    pub hours: Option<u32>,
    #[serde(default)]
    pub minutes: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionState {
    #[default]
    Created,
    TurnedIn,
    Returned,
    ReclaimedByStudent,
    /// NEW, SUBMISSION_STATE_UNSPECIFIED and anything else we don't know.
    #[serde(other)]
    Unrecognized,
}

impl SubmissionState {
    /// RETURNED comes after TURNED_IN, so the work was handed in.
    pub fn is_turned_in(self) -> bool {
        matches!(self, SubmissionState::TurnedIn | SubmissionState::Returned)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub state: SubmissionState,
    #[serde(default)]
    pub assigned_grade: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursesResponse {
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseworkResponse {
    #[serde(default)]
    pub course_work: Vec<CourseworkItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionsResponse {
    #[serde(default)]
    pub student_submissions: Vec<Submission>,
}

// ============================================================================
// Internal Models for Processing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Overdue,
    Graded,
    Submitted,
    Ungraded,
    NoDueDate,
}

impl Status {
    pub fn color(self) -> &'static str {
        match self {
            Status::Overdue => "red",
            Status::Graded => "green",
            Status::Submitted => "blue",
            Status::Ungraded | Status::NoDueDate => "gray",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Overdue => "OVERDUE",
            Status::Graded => "GRADED",
            Status::Submitted => "SUBMITTED",
            Status::Ungraded => "UNGRADED",
            Status::NoDueDate => "NO_DUE_DATE",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Grade {
    Assigned(f64),
    NotGraded,
}

impl Grade {
    pub fn from_option(value: Option<f64>) -> Self {
        value.map(Grade::Assigned).unwrap_or(Grade::NotGraded)
    }

    pub fn is_graded(&self) -> bool {
        matches!(self, Grade::Assigned(_))
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Assigned(value) => f.write_str(&format_number(*value)),
            Grade::NotGraded => f.write_str(NOT_GRADED),
        }
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Largest magnitude that still casts to `i64` exactly.
const MAX_EXACT_INTEGER: f64 = 1e15;

/// Whole numbers print without a fractional part ("95", not "95.0").
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn serialize_instant<S: Serializer>(
    instant: &Option<NaiveDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match instant {
        Some(at) => serializer.collect_str(&at.format("%Y-%m-%dT%H:%M")),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEvent {
    pub title: String,
    #[serde(serialize_with = "serialize_instant")]
    pub start: Option<NaiveDateTime>,
    #[serde(serialize_with = "serialize_instant")]
    pub end: Option<NaiveDateTime>,
    pub status: Status,
    pub color: &'static str,
    /// Only set on study reminders.
    #[serde(
        serialize_with = "serialize_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub remind_at: Option<NaiveDateTime>,
}

impl ScheduleEvent {
    /// A point-in-time due marker: `start == end`.
    pub fn due_marker(title: impl Into<String>, due: Option<NaiveDateTime>, status: Status) -> Self {
        Self {
            title: title.into(),
            start: due,
            end: due,
            status,
            color: status.color(),
            remind_at: None,
        }
    }

    pub fn has_due_date(&self) -> bool {
        self.start.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeRow {
    pub assignment: String,
    pub student: String,
    pub grade: Grade,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseSummary {
    pub name: String,
    pub grade: String,
}

impl CourseSummary {
    pub fn from_course(course: &Course) -> Self {
        Self {
            name: course.display_name().to_string(),
            grade: course
                .grade
                .map(format_number)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationResult {
    pub events: Vec<ScheduleEvent>,
    pub grades: Vec<GradeRow>,
    pub courses: IndexMap<String, CourseSummary>,
    pub overdue_count: usize,
    pub completed_count: usize,
}

impl AggregationResult {
    pub fn total_assignments(&self) -> usize {
        self.overdue_count + self.completed_count
    }

    pub fn completion_percentage(&self) -> f64 {
        let total = self.total_assignments();
        if total > 0 {
            (self.completed_count as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_submission_states_decode_as_unrecognized() {
        let submission: Submission =
            serde_json::from_str(r#"{"userId": "s1", "state": "NEW"}"#).unwrap();
        assert_eq!(submission.state, SubmissionState::Unrecognized);
        assert!(!submission.state.is_turned_in());

        let returned: Submission =
            serde_json::from_str(r#"{"userId": "s1", "state": "RETURNED", "assignedGrade": 8.5}"#)
                .unwrap();
        assert!(returned.state.is_turned_in());
        assert_eq!(returned.assigned_grade, Some(8.5));
    }

    #[test]
    fn coursework_decodes_partial_due_time() {
        let item: CourseworkItem = serde_json::from_str(
            r#"{"id": "a1", "title": "Essay", "dueDate": {"year": 2024, "month": 1, "day": 10}, "dueTime": {"hours": 9}}"#,
        )
        .unwrap();
        assert_eq!(
            item.due_date,
            Some(DueDate { year: 2024, month: 1, day: 10 })
        );
        assert_eq!(item.due_time.unwrap().hours, Some(9));
        assert_eq!(item.due_time.unwrap().minutes, None);
    }

    #[test]
    fn missing_list_keys_decode_as_empty() {
        let response: CourseworkResponse = serde_json::from_str("{}").unwrap();
        assert!(response.course_work.is_empty());
    }

    #[test]
    fn missing_title_falls_back() {
        let item = CourseworkItem {
            id: "a1".to_string(),
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(item.display_title(), "Untitled");
    }

    #[test]
    fn grades_format_without_trailing_zero() {
        assert_eq!(Grade::Assigned(95.0).to_string(), "95");
        assert_eq!(Grade::Assigned(7.5).to_string(), "7.5");
        assert_eq!(Grade::NotGraded.to_string(), "Not Graded");
    }

    #[test]
    fn huge_grades_do_not_saturate() {
        assert_eq!(Grade::Assigned(1e19).to_string(), "10000000000000000000");
        assert_eq!(format_number(-1e19), "-10000000000000000000");
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(123456789.0), "123456789");
    }

    #[test]
    fn status_colors() {
        assert_eq!(Status::Overdue.color(), "red");
        assert_eq!(Status::Graded.color(), "green");
        assert_eq!(Status::Submitted.color(), "blue");
        assert_eq!(Status::Ungraded.color(), "gray");
        assert_eq!(Status::NoDueDate.color(), "gray");
    }

    #[test]
    fn completion_percentage_handles_empty() {
        let result = AggregationResult::default();
        assert_eq!(result.total_assignments(), 0);
        assert_eq!(result.completion_percentage(), 0.0);
    }
}
