//! Login, current user and logout under `/api/auth`.

use std::sync::Arc;

use serde_json::{json, Value};

use super::clear_on_unauthorized;
use crate::client::RestClient;
use crate::error::ApiError;
use crate::session::SessionContext;
use crate::types::{Credentials, UserInfo};

#[derive(Debug)]
pub struct AuthService {
    api: RestClient,
    session: Arc<SessionContext>,
}

impl AuthService {
    pub const BASE_PATH: &'static str = "/api/auth";

    pub fn new(root: &RestClient, session: Arc<SessionContext>) -> Self {
        Self {
            api: root.scoped(Self::BASE_PATH),
            session,
        }
    }

    /// Authenticate and start the session with the returned user.
    pub async fn login(&self, user_id: &str, password: &str) -> Result<UserInfo, ApiError> {
        let credentials = Credentials {
            user_id: user_id.to_string(),
            password: password.to_string(),
        };
        let result = self.api.post::<UserInfo, _>("login", &credentials).await;
        let user = clear_on_unauthorized(&self.session, result).await?;
        self.session.begin(user.clone()).await;
        Ok(user)
    }

    /// Ask the server who is logged in and refresh the session from it.
    pub async fn current_user(&self) -> Result<UserInfo, ApiError> {
        let result = self.api.get_one::<UserInfo>("me").await;
        let user = clear_on_unauthorized(&self.session, result).await?;
        self.session.begin(user.clone()).await;
        Ok(user)
    }

    /// End the session. The local session is cleared even when the server
    /// call fails; the server's error is still returned.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.api.post::<Value, _>("logout", &json!({})).await;
        self.session.clear().await;
        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{envelope, refused, reply, StubTransport};
    use crate::types::Role;

    fn service(stub: Arc<StubTransport>) -> (AuthService, Arc<SessionContext>) {
        let root = RestClient::new(stub, "http://localhost:5000");
        let session = Arc::new(SessionContext::new());
        (AuthService::new(&root, Arc::clone(&session)), session)
    }

    fn teacher() -> serde_json::Value {
        json!({"user_id": "T001", "username": "王老师", "role": "teacher"})
    }

    #[tokio::test]
    async fn login_begins_session() {
        let stub = StubTransport::with_replies(vec![envelope(teacher())]);
        let (auth, session) = service(stub.clone());

        let user = auth.login("T001", "secret").await.unwrap();
        assert_eq!(user.role, Role::Teacher);
        assert_eq!(session.user_id().await.as_deref(), Some("T001"));

        let requests = stub.requests();
        let request = &requests[0];
        assert_eq!(request.url, "http://localhost:5000/api/auth/login");
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"user_id": "T001", "password": "secret"}));
    }

    #[tokio::test]
    async fn rejected_login_leaves_no_session() {
        let stub = StubTransport::with_replies(vec![
            envelope(teacher()),
            reply(401, r#"{"success":false,"message":"Invalid credentials","timestamp":"t"}"#),
        ]);
        let (auth, session) = service(stub);

        auth.login("T001", "secret").await.unwrap();
        let err = auth.login("T001", "wrong").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn current_user_refreshes_session() {
        let stub = StubTransport::with_replies(vec![envelope(teacher())]);
        let (auth, session) = service(stub);
        auth.current_user().await.unwrap();
        assert_eq!(session.role().await, Some(Role::Teacher));
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_server_unreachable() {
        let stub = StubTransport::with_replies(vec![
            envelope(teacher()),
            envelope(Value::Null),
            envelope(teacher()),
            refused(),
        ]);
        let (auth, session) = service(stub);

        auth.login("T001", "secret").await.unwrap();
        auth.logout().await.unwrap();
        assert!(!session.is_authenticated().await);

        auth.login("T001", "secret").await.unwrap();
        assert!(auth.logout().await.is_err());
        assert!(!session.is_authenticated().await);
    }
}
