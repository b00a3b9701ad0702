mod classroom;

pub use classroom::{ClassroomClient, DEFAULT_API_BASE};

use crate::error::FetchError;
use crate::models::{Course, CourseworkItem, Submission};
use async_trait::async_trait;

/// Where courses, coursework and submissions come from.
///
/// Implementations carry their own credential.
#[async_trait]
pub trait ClassroomSource: Send + Sync {
    async fn list_courses(&self) -> Result<Vec<Course>, FetchError>;

    async fn list_coursework(&self, course_id: &str) -> Result<Vec<CourseworkItem>, FetchError>;

    async fn list_submissions(
        &self,
        course_id: &str,
        item_id: &str,
    ) -> Result<Vec<Submission>, FetchError>;
}
