//! Self-service reads for a student under `/api/student`.

use std::sync::Arc;

use super::clear_on_unauthorized;
use crate::client::RestClient;
use crate::error::ApiError;
use crate::session::SessionContext;
use crate::types::{ExamResult, Score, Student};

#[derive(Debug)]
pub struct StudentService {
    api: RestClient,
    session: Arc<SessionContext>,
}

impl StudentService {
    pub const BASE_PATH: &'static str = "/api/student";

    pub fn new(root: &RestClient, session: Arc<SessionContext>) -> Self {
        Self {
            api: root.scoped(Self::BASE_PATH),
            session,
        }
    }

    pub async fn profile(&self, student_id: &str) -> Result<Student, ApiError> {
        let result = self.api.get_one(&format!("profile/{student_id}")).await;
        clear_on_unauthorized(&self.session, result).await
    }

    pub async fn scores(&self, student_id: &str) -> Result<Vec<Score>, ApiError> {
        let result = self.api.list_normalized(&format!("scores/{student_id}")).await;
        clear_on_unauthorized(&self.session, result).await
    }

    /// Exam summaries. This endpoint has been seen to answer with the
    /// frontend's HTML page when misrouted, and sends its numbers as strings.
    pub async fn exam_results(&self, student_id: &str) -> Result<Vec<ExamResult>, ApiError> {
        let result = self
            .api
            .get_resilient_normalized(&format!("exam_results/{student_id}"))
            .await;
        clear_on_unauthorized(&self.session, result).await
    }
}
