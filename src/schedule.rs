use crate::models::{
    AggregationResult, Course, CourseSummary, GradeRow, ScheduleEvent, Status,
};
use indexmap::IndexMap;

/// What one coursework item adds to a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemContribution {
    pub event: ScheduleEvent,
    pub grades: Vec<GradeRow>,
}

/// What one course adds to a run. `items` is empty when its coursework could
/// not be fetched; the summary is kept either way.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseContribution {
    pub course_id: String,
    pub summary: CourseSummary,
    pub items: Vec<ItemContribution>,
}

impl CourseContribution {
    pub fn new(course: &Course, items: Vec<ItemContribution>) -> Self {
        Self {
            course_id: course.id.clone(),
            summary: CourseSummary::from_course(course),
            items,
        }
    }

    pub fn summary_only(course: &Course) -> Self {
        Self::new(course, Vec::new())
    }
}

/// Fold per-course contributions into the final result, keeping
/// course-then-item order.
pub fn finalize(contributions: Vec<CourseContribution>) -> AggregationResult {
    let mut events = Vec::new();
    let mut grades = Vec::new();
    let mut courses = IndexMap::with_capacity(contributions.len());

    for contribution in contributions {
        for item in contribution.items {
            events.push(item.event);
            grades.extend(item.grades);
        }
        courses.insert(contribution.course_id, contribution.summary);
    }

    let (overdue_count, completed_count) = count_statuses(&events);

    AggregationResult {
        events,
        grades,
        courses,
        overdue_count,
        completed_count,
    }
}

/// Returns `(overdue, completed)` over events with a due date. Anything dated
/// that isn't overdue counts as completed.
fn count_statuses(events: &[ScheduleEvent]) -> (usize, usize) {
    events
        .iter()
        .filter(|e| e.has_due_date())
        .fold((0, 0), |(overdue, completed), event| {
            if event.status == Status::Overdue {
                (overdue + 1, completed)
            } else {
                (overdue, completed + 1)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Grade;
    use chrono::NaiveDate;

    fn item(title: &str, dated: bool, status: Status) -> ItemContribution {
        let due = dated.then(|| {
            NaiveDate::from_ymd_opt(2024, 1, 10)
                .unwrap()
                .and_hms_opt(23, 59, 0)
                .unwrap()
        });
        ItemContribution {
            event: ScheduleEvent::due_marker(title, due, status),
            grades: vec![GradeRow {
                assignment: title.to_string(),
                student: "s1".to_string(),
                grade: Grade::NotGraded,
            }],
        }
    }

    fn course(id: &str) -> Course {
        Course {
            id: id.to_string(),
            name: Some(format!("Course {}", id)),
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_gives_empty_result() {
        let result = finalize(Vec::new());
        assert_eq!(result, AggregationResult::default());
    }

    #[test]
    fn preserves_course_then_item_order() {
        let result = finalize(vec![
            CourseContribution::new(
                &course("c1"),
                vec![item("a", true, Status::Overdue), item("b", true, Status::Graded)],
            ),
            CourseContribution::summary_only(&course("c2")),
            CourseContribution::new(&course("c3"), vec![item("c", false, Status::NoDueDate)]),
        ]);

        let titles: Vec<&str> = result.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        let assignments: Vec<&str> = result.grades.iter().map(|g| g.assignment.as_str()).collect();
        assert_eq!(assignments, vec!["a", "b", "c"]);
        let ids: Vec<&str> = result.courses.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
        assert_eq!(result.courses["c2"].grade, "N/A");
    }

    #[test]
    fn counters_only_cover_dated_events() {
        let result = finalize(vec![CourseContribution::new(
            &course("c1"),
            vec![
                item("a", true, Status::Overdue),
                item("b", true, Status::Submitted),
                item("c", true, Status::Ungraded),
                item("d", false, Status::NoDueDate),
            ],
        )]);

        assert_eq!(result.overdue_count, 1);
        assert_eq!(result.completed_count, 2);
        let dated = result.events.iter().filter(|e| e.has_due_date()).count();
        assert_eq!(result.total_assignments(), dated);
    }
}
