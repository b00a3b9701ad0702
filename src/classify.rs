use crate::models::{Grade, Status, Submission};
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub status: Status,
    pub grade: Grade,
}

/// Classify one coursework item from all of its submissions.
///
/// Rules are checked in order and the first match wins:
/// no due date, overdue (past due with nothing turned in), graded,
/// submitted, ungraded.
pub fn classify(
    submissions: &[Submission],
    due: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Classification {
    let grade = first_grade(submissions);
    let turned_in = submissions.iter().any(|s| s.state.is_turned_in());

    let status = match due {
        None => Status::NoDueDate,
        Some(due) if due < now && !turned_in => Status::Overdue,
        Some(_) if grade.is_graded() => Status::Graded,
        Some(_) if turned_in => Status::Submitted,
        Some(_) => Status::Ungraded,
    };

    Classification { status, grade }
}

/// First assigned grade across the submissions, in their order.
pub fn first_grade(submissions: &[Submission]) -> Grade {
    Grade::from_option(submissions.iter().find_map(|s| s.assigned_grade))
}
