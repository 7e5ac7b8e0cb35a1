//! School administration under `/api/admin`.

use std::sync::Arc;

use super::resource::Resource;
use crate::client::RestClient;
use crate::session::SessionContext;
use crate::types::{
    Class, ClassInput, ExamType, ExamTypeInput, Student, StudentInput, Subject, SubjectInput,
    Teacher, TeacherInput,
};

#[derive(Debug)]
pub struct AdminService {
    students: Resource<Student, StudentInput>,
    teachers: Resource<Teacher, TeacherInput>,
    classes: Resource<Class, ClassInput>,
    subjects: Resource<Subject, SubjectInput>,
    exam_types: Resource<ExamType, ExamTypeInput>,
}

impl AdminService {
    pub const BASE_PATH: &'static str = "/api/admin";

    pub fn new(root: &RestClient, session: Arc<SessionContext>) -> Self {
        let api = root.scoped(Self::BASE_PATH);
        Self {
            students: Resource::new(api.clone(), "students", Arc::clone(&session)),
            teachers: Resource::new(api.clone(), "teachers", Arc::clone(&session)),
            classes: Resource::new(api.clone(), "classes", Arc::clone(&session)),
            subjects: Resource::new(api.clone(), "subjects", Arc::clone(&session)),
            exam_types: Resource::new(api, "exam-types", session),
        }
    }

    /// Students are keyed by their school-issued id (e.g. `S001`), which the
    /// caller supplies on create.
    pub fn students(&self) -> &Resource<Student, StudentInput> {
        &self.students
    }

    pub fn teachers(&self) -> &Resource<Teacher, TeacherInput> {
        &self.teachers
    }

    pub fn classes(&self) -> &Resource<Class, ClassInput> {
        &self.classes
    }

    pub fn subjects(&self) -> &Resource<Subject, SubjectInput> {
        &self.subjects
    }

    pub fn exam_types(&self) -> &Resource<ExamType, ExamTypeInput> {
        &self.exam_types
    }
}
