//! Teacher views under `/api/teacher`: own profile, classes, rosters and the
//! score book.

use std::sync::Arc;

use super::clear_on_unauthorized;
use super::resource::Resource;
use crate::client::RestClient;
use crate::error::ApiError;
use crate::session::SessionContext;
use crate::types::{Class, ScoreInput, Student, StudentScore, Teacher};

#[derive(Debug)]
pub struct TeacherService {
    api: RestClient,
    session: Arc<SessionContext>,
    scores: Resource<StudentScore, ScoreInput>,
}

impl TeacherService {
    pub const BASE_PATH: &'static str = "/api/teacher";

    pub fn new(root: &RestClient, session: Arc<SessionContext>) -> Self {
        let api = root.scoped(Self::BASE_PATH);
        Self {
            scores: Resource::new(api.clone(), "scores", Arc::clone(&session)),
            api,
            session,
        }
    }

    pub async fn profile(&self, teacher_id: i64) -> Result<Teacher, ApiError> {
        let result = self.api.get_one_normalized(&format!("profile/{teacher_id}")).await;
        clear_on_unauthorized(&self.session, result).await
    }

    /// Classes taught by `teacher_id`.
    pub async fn classes(&self, teacher_id: i64) -> Result<Vec<Class>, ApiError> {
        let result = self.api.list_normalized(&format!("classes/{teacher_id}")).await;
        clear_on_unauthorized(&self.session, result).await
    }

    /// Roster of one class.
    pub async fn class_students(&self, class_id: i64) -> Result<Vec<Student>, ApiError> {
        let result = self.api.list(&format!("students/{class_id}")).await;
        clear_on_unauthorized(&self.session, result).await
    }

    /// The score book: list, create, update and delete score rows.
    pub fn scores(&self) -> &Resource<StudentScore, ScoreInput> {
        &self.scores
    }

    /// Record a score; the server fills in the student, subject and exam names.
    pub async fn create_score(&self, input: &ScoreInput) -> Result<StudentScore, ApiError> {
        self.scores.create(input).await
    }

    pub async fn update_score(&self, score_id: i64, input: &ScoreInput) -> Result<StudentScore, ApiError> {
        self.scores.update(score_id, input).await
    }

    pub async fn delete_score(&self, score_id: i64) -> Result<(), ApiError> {
        self.scores.delete(score_id).await
    }
}
