//! Domain records exchanged with the school backend.
//!
//! # Design
//! Records are flat and carry no behavior. Those with numeric columns
//! implement `NumericFields` so the access layer can coerce string-encoded
//! numbers before decoding; services read them through the normalizing
//! operations whether or not a given endpoint currently sends strings.
//!
//! `*Input` types are partial records for create/update calls: every field
//! is optional and omitted from the JSON when `None`, so the server only
//! sees the fields the caller set.

use serde::{Deserialize, Serialize};

use crate::coerce::NumericFields;

/// A student as listed by the admin and student endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub student_id: String,
    pub student_name: String,
    #[serde(default)]
    pub class_name: Option<String>,
}

impl NumericFields for Student {
    const NUMERIC_FIELDS: &'static [&'static str] = &[];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Teacher {
    pub teacher_id: i64,
    pub teacher_name: String,
}

impl NumericFields for Teacher {
    const NUMERIC_FIELDS: &'static [&'static str] = &["teacher_id"];
}

/// A school class. `teacher_name` is absent until a head teacher is assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Class {
    pub class_id: i64,
    pub class_name: String,
    #[serde(default)]
    pub teacher_name: Option<String>,
}

impl NumericFields for Class {
    const NUMERIC_FIELDS: &'static [&'static str] = &["class_id"];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub subject_id: i64,
    pub subject_name: String,
}

impl NumericFields for Subject {
    const NUMERIC_FIELDS: &'static [&'static str] = &["subject_id"];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExamType {
    pub exam_type_id: i64,
    pub exam_name: String,
}

impl NumericFields for ExamType {
    const NUMERIC_FIELDS: &'static [&'static str] = &["exam_type_id"];
}

/// One score as seen by the student who earned it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Score {
    pub score_id: i64,
    pub score: f64,
    pub exam_name: String,
    pub subject_name: String,
    pub student_name: String,
}

impl NumericFields for Score {
    const NUMERIC_FIELDS: &'static [&'static str] = &["score_id", "score"];
}

/// Per-exam summary across subjects, with the student's rank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExamResult {
    pub exam_name: String,
    pub student_name: String,
    pub chinese: f64,
    pub math: f64,
    pub english: f64,
    pub physics: f64,
    pub chemistry: f64,
    pub politics: f64,
    pub total_score: f64,
    pub ranking: i64,
}

impl NumericFields for ExamResult {
    const NUMERIC_FIELDS: &'static [&'static str] = &[
        "chinese",
        "math",
        "english",
        "physics",
        "chemistry",
        "politics",
        "total_score",
        "ranking",
    ];
}

/// A score row as managed by teachers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentScore {
    pub score_id: i64,
    pub student_id: String,
    pub student_name: String,
    #[serde(default)]
    pub student_number: Option<String>,
    pub class_name: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub exam_type_id: i64,
    pub exam_name: String,
    pub score: f64,
}

impl NumericFields for StudentScore {
    const NUMERIC_FIELDS: &'static [&'static str] =
        &["score_id", "subject_id", "exam_type_id", "score"];
}

/// Role attached to a logged-in user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

/// The user returned by `login` and `me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub user_id: String,
    pub username: String,
    pub role: Role,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeacherInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamTypeInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}
