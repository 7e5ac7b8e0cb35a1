//! Typed REST access layer for the school portal backend.
//!
//! # Overview
//! Every backend endpoint answers with the envelope
//! `{ data, message, success, timestamp }`. `RestClient` unwraps it for any
//! payload type, detects HTML error pages on resilient reads, coerces
//! string-encoded numbers, and reports every failure as one of three
//! `ApiError` kinds. Role services (`AuthService`, `StudentService`,
//! `TeacherService`, `AdminService`) are thin compositions of it.
//!
//! # Design
//! - `RestClient` is stateless: a base url, a shared `Transport`, an
//!   optional timeout.
//! - Each operation has pure `build_*` / `parse_*` halves; only `Transport`
//!   performs I/O, so the parsing rules are tested without a network.
//! - The logged-in user lives in an explicit `SessionContext` shared by the
//!   services, started on login and cleared on logout or any 401.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod coerce;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod services;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_support;

pub use client::RestClient;
pub use coerce::{coerce_numeric_fields, NumericFields};
pub use config::{ClientConfig, ConfigError};
pub use envelope::Envelope;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use services::{AdminService, AuthService, Portal, Resource, StudentService, TeacherService};
pub use session::SessionContext;
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    Class, ClassInput, Credentials, ExamResult, ExamType, ExamTypeInput, Role, Score, ScoreInput,
    Student, StudentInput, StudentScore, Subject, SubjectInput, Teacher, TeacherInput, UserInfo,
};
