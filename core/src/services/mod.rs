//! Role services composed over `RestClient`.
//!
//! Each service owns a `RestClient` scoped to its role base path and a
//! handle on the shared `SessionContext`. Services contain no transport or
//! parsing logic; they only name paths and record types.

mod admin;
mod auth;
mod resource;
mod student;
mod teacher;

use std::sync::Arc;

pub use admin::AdminService;
pub use auth::AuthService;
pub use resource::Resource;
pub use student::StudentService;
pub use teacher::TeacherService;

use crate::client::RestClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionContext;
use crate::transport::ReqwestTransport;

/// Any 401 means the server no longer recognizes the session.
async fn clear_on_unauthorized<T>(
    session: &SessionContext,
    result: Result<T, ApiError>,
) -> Result<T, ApiError> {
    if let Err(error) = &result {
        if error.is_unauthorized() {
            session.clear().await;
        }
    }
    result
}

/// All role services over one transport, sharing one session.
#[derive(Debug)]
pub struct Portal {
    pub session: Arc<SessionContext>,
    pub auth: AuthService,
    pub student: StudentService,
    pub teacher: TeacherService,
    pub admin: AdminService,
}

impl Portal {
    /// Build the services from a client rooted at the backend origin.
    pub fn new(root: &RestClient) -> Self {
        let session = Arc::new(SessionContext::new());
        Self {
            auth: AuthService::new(root, Arc::clone(&session)),
            student: StudentService::new(root, Arc::clone(&session)),
            teacher: TeacherService::new(root, Arc::clone(&session)),
            admin: AdminService::new(root, Arc::clone(&session)),
            session,
        }
    }

    /// Build a reqwest-backed portal from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` when the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        let root = RestClient::new(Arc::new(transport), &config.base_url).with_timeout(config.timeout);
        Ok(Self::new(&root))
    }
}
