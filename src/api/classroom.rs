use super::ClassroomSource;
use crate::error::FetchError;
use crate::models::{
    Course, CourseworkItem, CourseworkResponse, CoursesResponse, Submission, SubmissionsResponse,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://classroom.googleapis.com/v1";

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct ClassroomClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ClassroomClient {
    pub fn new(token: String, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120)) // 2 minute timeout
            .connect_timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn build_headers(&self) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| FetchError::Auth("access token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("classroom-schedule"));
        Ok(headers)
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .headers(self.build_headers()?)
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to send request to {}: {}", url, e)))?;

        let status = response.status();

        // Get the response text for both error and success cases
        let response_text = response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to get response text: {}", e)))?;

        if let Some(error) = error_for_status(status, url, &response_text) {
            return Err(error);
        }

        decode_body(url, &response_text)
    }

    /// GET with retries on network errors only.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 1;

        loop {
            match self.get_once(&url).await {
                Ok(value) => return Ok(value),
                Err(e) if should_retry(&e, attempt) => {
                    tracing::debug!(%url, attempt, error = %e, "retrying request");
                    attempt += 1;
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Map a response status to an error. 401/403 are auth failures, any other
/// non-success status is a network error.
fn error_for_status(status: StatusCode, url: &str, body: &str) -> Option<FetchError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Some(FetchError::Auth(format!(
            "request to {} rejected with status {}",
            url, status
        )));
    }

    if !status.is_success() {
        return Some(FetchError::Network(format!(
            "API request failed with status {} for URL {}\nResponse body: {}",
            status, url, body
        )));
    }

    None
}

fn decode_body<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| {
        FetchError::Malformed(format!(
            "Failed to parse JSON response from {}: {}. Response body (first 500 chars): {}",
            url,
            e,
            &body.chars().take(500).collect::<String>()
        ))
    })
}

/// `attempt` is 1-based. Only network errors are retried.
fn should_retry(error: &FetchError, attempt: u32) -> bool {
    error.is_retryable() && attempt < MAX_ATTEMPTS
}

#[async_trait]
impl ClassroomSource for ClassroomClient {
    async fn list_courses(&self) -> Result<Vec<Course>, FetchError> {
        let response: CoursesResponse = self.get("/courses?courseStates=ACTIVE").await?;
        Ok(response.courses)
    }

    async fn list_coursework(&self, course_id: &str) -> Result<Vec<CourseworkItem>, FetchError> {
        let path = format!("/courses/{}/courseWork", course_id);
        let response: CourseworkResponse = self.get(&path).await?;
        Ok(response.course_work)
    }

    async fn list_submissions(
        &self,
        course_id: &str,
        item_id: &str,
    ) -> Result<Vec<Submission>, FetchError> {
        let path = format!(
            "/courses/{}/courseWork/{}/studentSubmissions",
            course_id, item_id
        );
        let response: SubmissionsResponse = self.get(&path).await?;
        Ok(response.student_submissions)
    }
}
