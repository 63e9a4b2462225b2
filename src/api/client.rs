//! API client for the section management REST backend.
//!
//! This module provides the `ApiClient` struct for fetching section and
//! student data and for pushing the two field edits the UI supports
//! (dropping a student, updating an attendance record).

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{sort_by_date, Attendance, Presence, RosterStudent, SectionDetails, StudentDetails};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow backend responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Header the backend checks for the CSRF token on state-changing requests.
const CSRF_HEADER: &str = "X-CSRFToken";

/// API client for the section backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client against the given backend host.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    // ===== Endpoint URLs =====

    pub fn section_details_url(&self, section_id: i64) -> String {
        format!("{}/api/sections/{}/details/", self.base_url, section_id)
    }

    pub fn section_students_url(&self, section_id: i64) -> String {
        format!("{}/api/sections/{}/students/", self.base_url, section_id)
    }

    pub fn student_details_url(&self, student_id: i64) -> String {
        format!("{}/api/students/{}/details/", self.base_url, student_id)
    }

    pub fn student_attendances_url(&self, student_id: i64) -> String {
        format!("{}/api/students/{}/attendances/", self.base_url, student_id)
    }

    pub fn student_drop_url(&self, student_id: i64) -> String {
        format!("{}/api/students/{}/drop/", self.base_url, student_id)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    // ===== Data Fetching Methods =====

    /// Fetch section metadata (mentor and course).
    pub async fn fetch_section_details(&self, section_id: i64) -> Result<SectionDetails> {
        self.get(&self.section_details_url(section_id)).await
    }

    /// Fetch the enrolled student list for a section.
    pub async fn fetch_section_students(&self, section_id: i64) -> Result<Vec<RosterStudent>> {
        self.get(&self.section_students_url(section_id)).await
    }

    /// Fetch student metadata (name, course, section mentor).
    pub async fn fetch_student_details(&self, student_id: i64) -> Result<StudentDetails> {
        self.get(&self.student_details_url(student_id)).await
    }

    /// Fetch a student's attendance history, ordered by date ascending.
    /// The backend's order is not guaranteed, so the sort happens here.
    pub async fn fetch_student_attendances(&self, student_id: i64) -> Result<Vec<Attendance>> {
        let mut attendances: Vec<Attendance> =
            self.get(&self.student_attendances_url(student_id)).await?;
        sort_by_date(&mut attendances);
        Ok(attendances)
    }

    // ===== State-Changing Methods =====

    /// Mark a student as dropped from their section. The response body is
    /// ignored; only a non-success status turns into an error.
    pub async fn drop_student(&self, student_id: i64, csrf_token: &str) -> Result<()> {
        let url = self.student_drop_url(student_id);
        debug!(student_id, "Sending drop request");

        let response = self
            .client
            .patch(&url)
            .header(CSRF_HEADER, csrf_token)
            .send()
            .await
            .with_context(|| format!("Failed to send PATCH request to {}", url))?;

        Self::check_response(response).await?;
        Ok(())
    }

    /// Update one attendance record's presence. The body identifies the
    /// record since the URL only identifies the student.
    pub async fn update_attendance(
        &self,
        student_id: i64,
        attendance_id: i64,
        presence: Presence,
        csrf_token: &str,
    ) -> Result<()> {
        let url = self.student_attendances_url(student_id);
        let body = Self::attendance_update_body(attendance_id, presence);
        debug!(student_id, attendance_id, presence = presence.code(), "Sending attendance update");

        let response = self
            .client
            .put(&url)
            .header(CSRF_HEADER, csrf_token)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to send PUT request to {}", url))?;

        Self::check_response(response).await?;
        Ok(())
    }

    fn attendance_update_body(attendance_id: i64, presence: Presence) -> serde_json::Value {
        serde_json::json!({
            "id": attendance_id,
            "presence": presence.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:8000").expect("Failed to build client")
    }

    #[test]
    fn test_roster_urls_keyed_by_section_id() {
        let api = client();
        assert_eq!(
            api.section_details_url(7),
            "http://localhost:8000/api/sections/7/details/"
        );
        assert_eq!(
            api.section_students_url(7),
            "http://localhost:8000/api/sections/7/students/"
        );
    }

    #[test]
    fn test_student_urls_keyed_by_student_id() {
        let api = client();
        assert_eq!(
            api.student_details_url(1),
            "http://localhost:8000/api/students/1/details/"
        );
        assert_eq!(
            api.student_attendances_url(1),
            "http://localhost:8000/api/students/1/attendances/"
        );
        assert_eq!(
            api.student_drop_url(1),
            "http://localhost:8000/api/students/1/drop/"
        );
    }

    #[test]
    fn test_trailing_slash_on_base_url_is_tolerated() {
        let api = ApiClient::new("http://localhost:8000/").expect("Failed to build client");
        assert_eq!(
            api.student_drop_url(2),
            "http://localhost:8000/api/students/2/drop/"
        );
    }

    #[test]
    fn test_attendance_update_body_shape() {
        let body = ApiClient::attendance_update_body(6, Presence::Excused);
        assert_eq!(body, serde_json::json!({"id": 6, "presence": "EX"}));
    }
}
