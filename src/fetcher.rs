use crate::api::ClassroomSource;
use crate::classify::{classify, Classification};
use crate::due_date;
use crate::error::FetchError;
use crate::models::{
    AggregationResult, Course, CourseworkItem, Grade, GradeRow, ScheduleEvent, Submission,
    NOT_AVAILABLE,
};
use crate::schedule::{finalize, CourseContribution, ItemContribution};
use chrono::NaiveDateTime;
use futures::future;
use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;

/// Result of a whole run. `error` is set when the course list itself could not
/// be fetched, in which case `result` is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    pub result: AggregationResult,
    pub error: Option<FetchError>,
}

/// List the user's courses, then aggregate them.
pub async fn fetch_schedule<S>(source: &S, now: NaiveDateTime, concurrency: usize) -> RunOutcome
where
    S: ClassroomSource + ?Sized,
{
    let courses = match source.list_courses().await {
        Ok(courses) => courses,
        Err(e) => {
            if e.is_auth() {
                tracing::error!(error = %e, "access token rejected, sign in again");
            } else {
                tracing::error!(error = %e, "failed to list courses");
            }
            return RunOutcome {
                result: AggregationResult::default(),
                error: Some(e),
            };
        }
    };

    if courses.is_empty() {
        tracing::warn!("no courses found for the current account");
    }

    RunOutcome {
        result: aggregate(&courses, source, now, concurrency).await,
        error: None,
    }
}

/// Aggregate coursework and submissions for `courses` into one result.
///
/// Courses and items are fetched concurrently. One limiter is shared by both
/// levels, so at most `concurrency` source calls are in flight at once.
/// Output order always follows `courses` and then each course's
/// coursework order. A failed fetch drops only the course's items (or the one
/// item) it belongs to.
pub async fn aggregate<S>(
    courses: &[Course],
    source: &S,
    now: NaiveDateTime,
    concurrency: usize,
) -> AggregationResult
where
    S: ClassroomSource + ?Sized,
{
    let concurrency = concurrency.max(1);
    let limiter = Semaphore::new(concurrency);

    let contributions: Vec<CourseContribution> = stream::iter(courses)
        .map(|course| fetch_course(source, &limiter, course, now, concurrency))
        .buffered(concurrency)
        .collect()
        .await;

    let result = finalize(contributions);
    tracing::info!(
        courses = result.courses.len(),
        events = result.events.len(),
        overdue = result.overdue_count,
        completed = result.completed_count,
        "aggregation finished"
    );
    result
}

async fn fetch_course<S>(
    source: &S,
    limiter: &Semaphore,
    course: &Course,
    now: NaiveDateTime,
    concurrency: usize,
) -> CourseContribution
where
    S: ClassroomSource + ?Sized,
{
    let fetched = {
        let _permit = limiter.acquire().await;
        source.list_coursework(&course.id).await
    };
    let coursework = match fetched {
        Ok(coursework) => coursework,
        Err(e) => {
            tracing::warn!(course_id = %course.id, error = %e, "skipping coursework for course");
            return CourseContribution::summary_only(course);
        }
    };

    let items: Vec<ItemContribution> = stream::iter(&coursework)
        .map(|item| fetch_item(source, limiter, &course.id, item, now))
        .buffered(concurrency)
        .filter_map(future::ready)
        .collect()
        .await;

    tracing::debug!(
        course_id = %course.id,
        fetched = coursework.len(),
        kept = items.len(),
        "course aggregated"
    );

    CourseContribution::new(course, items)
}

async fn fetch_item<S>(
    source: &S,
    limiter: &Semaphore,
    course_id: &str,
    item: &CourseworkItem,
    now: NaiveDateTime,
) -> Option<ItemContribution>
where
    S: ClassroomSource + ?Sized,
{
    let due = due_date::resolve(item.due_date.as_ref(), item.due_time.as_ref()).unwrap_or_else(|e| {
        tracing::warn!(course_id, item_id = %item.id, error = %e, "malformed due date, treating as undated");
        None
    });

    let fetched = {
        let _permit = limiter.acquire().await;
        source.list_submissions(course_id, &item.id).await
    };
    let submissions = match fetched {
        Ok(submissions) => submissions,
        Err(e) => {
            tracing::warn!(course_id, item_id = %item.id, error = %e, "skipping coursework item");
            return None;
        }
    };

    let Classification { status, grade } = classify(&submissions, due, now);
    let title = item.display_title();
    tracing::debug!(course_id, item_id = %item.id, %status, %grade, "classified coursework item");

    Some(ItemContribution {
        event: ScheduleEvent::due_marker(title, due, status),
        grades: grade_rows(title, &submissions),
    })
}

/// One row per submission, or a single placeholder row when there are none.
pub fn grade_rows(title: &str, submissions: &[Submission]) -> Vec<GradeRow> {
    if submissions.is_empty() {
        return vec![GradeRow {
            assignment: title.to_string(),
            student: NOT_AVAILABLE.to_string(),
            grade: Grade::NotGraded,
        }];
    }

    submissions
        .iter()
        .map(|s| GradeRow {
            assignment: title.to_string(),
            student: if s.user_id.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                s.user_id.clone()
            },
            grade: Grade::from_option(s.assigned_grade),
        })
        .collect()
}
