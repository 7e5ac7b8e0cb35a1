//! The generic REST access layer.
//!
//! # Design
//! `RestClient` holds a base url, a shared `Transport` and an optional
//! per-call timeout, and nothing else. Every operation is split into a pure
//! `build_*` half producing an `HttpRequest` and a pure `parse_*` half
//! consuming an `HttpResponse`; the async operations glue the two halves
//! around one transport round-trip. Role services compose a `RestClient`
//! scoped to their base path instead of re-implementing any of this.
//!
//! Every async operation funnels its failure through `report`, so callers
//! only ever see the three `ApiError` kinds.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::coerce::{coerce_numeric_fields, NumericFields};
use crate::envelope::{Envelope, ErrorEnvelope};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

const HTML_MARKERS: [&str; 2] = ["<!doctype", "<html"];

/// Stateless client for one base url, e.g. `http://host/api/admin`.
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    timeout: Option<Duration>,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            timeout: None,
        }
    }

    /// Fail any call whose round-trip takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// A client for `base_path` under this client's base url, sharing the
    /// transport and timeout.
    pub fn scoped(&self, base_path: &str) -> Self {
        Self {
            base_url: self.url(base_path),
            transport: Arc::clone(&self.transport),
            timeout: self.timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    pub fn build_get(&self, path: &str) -> HttpRequest {
        self.bodiless(HttpMethod::Get, path)
    }

    pub fn build_delete(&self, path: &str) -> HttpRequest {
        self.bodiless(HttpMethod::Delete, path)
    }

    pub fn build_post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, path, body)
    }

    pub fn build_put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Put, path, body)
    }

    fn bodiless(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: self.url(path),
            headers: vec![accept_json()],
            body: None,
        }
    }

    fn with_body<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body)
            .map_err(|e| ApiError::Parse(format!("request body could not be encoded: {e}")))?;
        Ok(HttpRequest {
            method,
            url: self.url(path),
            headers: vec![
                accept_json(),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }

    // -----------------------------------------------------------------------
    // Response parsers
    // -----------------------------------------------------------------------

    /// Unwrap `data` from a 2xx envelope.
    pub fn parse_envelope<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response)?;
        decode_envelope(&response.body)
    }

    /// Like `parse_envelope`, but rejects an HTML page before attempting to
    /// decode JSON.
    pub fn parse_resilient<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response)?;
        if looks_like_html(&response.body) {
            return Err(ApiError::UnexpectedContent(
                "received an HTML page instead of JSON; check that the API server is running and the endpoint is correct"
                    .to_string(),
            ));
        }
        decode_envelope(&response.body)
    }

    /// Accept any 2xx reply; the body is ignored.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    pub async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let request = self.build_get(path);
        self.exchange(request, |r| self.parse_envelope(r)).await
    }

    pub async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.build_get(path);
        self.exchange(request, |r| self.parse_envelope(r)).await
    }

    /// POST `body` and unwrap the reply. Used for action endpoints such as
    /// `login` as well as for record creation.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .build_post(path, body)
            .map_err(|e| report(HttpMethod::Post, &self.url(path), e))?;
        self.exchange(request, |r| self.parse_envelope(r)).await
    }

    /// Create a record from a partial body; returns the server-completed record.
    pub async fn create<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.post(path, body).await
    }

    /// Update a record from a partial body; returns the updated record.
    pub async fn update<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .build_put(path, body)
            .map_err(|e| report(HttpMethod::Put, &self.url(path), e))?;
        self.exchange(request, |r| self.parse_envelope(r)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.build_delete(path);
        self.exchange(request, |r| self.parse_delete(r)).await
    }

    pub async fn get_resilient<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let request = self.build_get(path);
        self.exchange(request, |r| self.parse_resilient(r)).await
    }

    /// `list`, with each record's `NUMERIC_FIELDS` coerced before decoding.
    pub async fn list_normalized<T>(&self, path: &str) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned + NumericFields,
    {
        let request = self.build_get(path);
        self.exchange(request, |r| {
            self.parse_envelope::<Vec<Value>>(r)
                .and_then(|records| normalize_records(&records))
        })
        .await
    }

    /// `get_one`, with the record's `NUMERIC_FIELDS` coerced before decoding.
    pub async fn get_one_normalized<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + NumericFields,
    {
        let request = self.build_get(path);
        self.exchange(request, |r| {
            self.parse_envelope::<Value>(r)
                .and_then(|record| normalize_record(&record))
        })
        .await
    }

    /// `get_resilient`, with each record's `NUMERIC_FIELDS` coerced before decoding.
    pub async fn get_resilient_normalized<T>(&self, path: &str) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned + NumericFields,
    {
        let request = self.build_get(path);
        self.exchange(request, |r| {
            self.parse_resilient::<Vec<Value>>(r)
                .and_then(|records| normalize_records(&records))
        })
        .await
    }

    /// `create`, with the returned record's `NUMERIC_FIELDS` coerced before decoding.
    pub async fn create_normalized<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned + NumericFields,
        B: Serialize + ?Sized,
    {
        let request = self
            .build_post(path, body)
            .map_err(|e| report(HttpMethod::Post, &self.url(path), e))?;
        self.exchange(request, |r| {
            self.parse_envelope::<Value>(r)
                .and_then(|record| normalize_record(&record))
        })
        .await
    }

    /// `update`, with the returned record's `NUMERIC_FIELDS` coerced before decoding.
    pub async fn update_normalized<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned + NumericFields,
        B: Serialize + ?Sized,
    {
        let request = self
            .build_put(path, body)
            .map_err(|e| report(HttpMethod::Put, &self.url(path), e))?;
        self.exchange(request, |r| {
            self.parse_envelope::<Value>(r)
                .and_then(|record| normalize_record(&record))
        })
        .await
    }

    async fn exchange<T>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(HttpResponse) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let method = request.method;
        let url = request.url.clone();
        debug!(method = method.as_str(), %url, "sending request");

        let result = match self.send(request).await {
            Ok(response) => {
                debug!(method = method.as_str(), %url, status = response.status, "received response");
                parse(response)
            }
            Err(e) => Err(e),
        };
        result.map_err(|e| report(method, &url, e))
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let Some(limit) = self.timeout else {
            return self.transport.execute(request).await;
        };
        match tokio::time::timeout(limit, self.transport.execute(request)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::transport(format!(
                "request timed out after {}ms",
                limit.as_millis()
            ))),
        }
    }
}

/// The single exit point for failures: log once, hand the error back.
fn report(method: HttpMethod, url: &str, error: ApiError) -> ApiError {
    warn!(method = method.as_str(), url, error = %error, "request failed");
    error
}

fn accept_json() -> (String, String) {
    ("accept".to_string(), "application/json".to_string())
}

/// Map a non-2xx status to `ApiError::Transport`, preferring the message of
/// the backend's error envelope.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = match serde_json::from_str::<ErrorEnvelope>(&response.body) {
        Ok(envelope) => envelope.message,
        Err(_) => body_preview(&response.body),
    };
    Err(ApiError::Transport {
        status: Some(response.status),
        message,
    })
}

fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| ApiError::Parse(format!("response is not a valid envelope: {e}")))?;
    if !envelope.success {
        warn!(message = %envelope.message, "2xx envelope reports success=false");
    }
    Ok(envelope.data)
}

fn looks_like_html(body: &str) -> bool {
    let head = body.trim_start();
    HTML_MARKERS.iter().any(|marker| {
        head.get(..marker.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(marker))
    })
}

fn normalize_record<T: DeserializeOwned + NumericFields>(record: &Value) -> Result<T, ApiError> {
    let coerced = coerce_numeric_fields(record, T::NUMERIC_FIELDS);
    serde_json::from_value(coerced)
        .map_err(|e| ApiError::Parse(format!("record does not match the expected shape: {e}")))
}

fn normalize_records<T: DeserializeOwned + NumericFields>(records: &[Value]) -> Result<Vec<T>, ApiError> {
    records.iter().map(normalize_record).collect()
}

fn body_preview(body: &str) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.is_empty() {
        return "no response body".to_string();
    }
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{envelope, refused, reply, StalledTransport, StubTransport};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Subject {
        subject_id: i64,
        subject_name: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Mark {
        score_id: i64,
        score: f64,
        student_name: String,
    }

    impl NumericFields for Mark {
        const NUMERIC_FIELDS: &'static [&'static str] = &["score_id", "score"];
    }

    fn offline() -> RestClient {
        RestClient::new(StubTransport::with_replies(Vec::new()), "http://localhost:5000/api/admin")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    // --- builders ---

    #[test]
    fn build_get_produces_correct_request() {
        let req = offline().build_get("subjects");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:5000/api/admin/subjects");
        assert_eq!(req.headers, vec![accept_json()]);
        assert!(req.body.is_none());
    }

    #[test]
    fn build_post_serializes_partial_body() {
        #[derive(Serialize)]
        struct Partial {
            subject_name: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            subject_id: Option<i64>,
        }

        let req = offline()
            .build_post("subjects", &Partial { subject_name: "数学", subject_id: None })
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert!(req
            .headers
            .contains(&("content-type".to_string(), "application/json".to_string())));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"subject_name": "数学"}));
    }

    #[test]
    fn build_put_and_delete_target_the_record() {
        let client = offline();
        let put = client.build_put("students/S001", &json!({"student_name": "李四"})).unwrap();
        assert_eq!(put.method, HttpMethod::Put);
        assert_eq!(put.url, "http://localhost:5000/api/admin/students/S001");

        let delete = client.build_delete("/students/S001");
        assert_eq!(delete.method, HttpMethod::Delete);
        assert_eq!(delete.url, "http://localhost:5000/api/admin/students/S001");
        assert!(delete.body.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = RestClient::new(StubTransport::with_replies(Vec::new()), "http://localhost:5000/");
        assert_eq!(client.build_get("subjects").url, "http://localhost:5000/subjects");
        assert_eq!(client.build_get("").url, "http://localhost:5000");
    }

    #[test]
    fn scoped_client_joins_base_path() {
        let root = RestClient::new(StubTransport::with_replies(Vec::new()), "http://localhost:5000")
            .with_timeout(Duration::from_secs(3));
        let student = root.scoped("/api/student/");
        assert_eq!(student.base_url(), "http://localhost:5000/api/student");
        assert_eq!(student.build_get("profile/S001").url, "http://localhost:5000/api/student/profile/S001");
        assert_eq!(student.timeout, Some(Duration::from_secs(3)));
    }

    // --- parsers ---

    #[test]
    fn parse_envelope_returns_data() {
        let body = r#"{"data":[{"subject_id":1,"subject_name":"语文"}],"message":"ok","success":true,"timestamp":"2024-01-01T00:00:00Z"}"#;
        let subjects: Vec<Subject> = offline().parse_envelope(response(200, body)).unwrap();
        assert_eq!(
            subjects,
            vec![Subject {
                subject_id: 1,
                subject_name: "语文".to_string()
            }]
        );
    }

    #[test]
    fn parse_envelope_keeps_data_when_success_is_false() {
        let body = r#"{"data":[],"message":"nothing","success":false,"timestamp":"t"}"#;
        let subjects: Vec<Subject> = offline().parse_envelope(response(200, body)).unwrap();
        assert!(subjects.is_empty());
    }

    #[test]
    fn parse_envelope_bad_json() {
        let err = offline()
            .parse_envelope::<Vec<Subject>>(response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn parse_envelope_bare_payload_is_not_an_envelope() {
        let err = offline()
            .parse_envelope::<Vec<Subject>>(response(200, r#"[{"subject_id":1,"subject_name":"语文"}]"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn parse_envelope_html_is_a_parse_error() {
        let err = offline()
            .parse_envelope::<Vec<Subject>>(response(200, "<!doctype html><html></html>"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn non_2xx_uses_error_envelope_message() {
        let body = r#"{"success":false,"message":"Student not found","timestamp":"t"}"#;
        let err = offline()
            .parse_envelope::<Subject>(response(404, body))
            .unwrap_err();
        match err {
            ApiError::Transport { status, message } => {
                assert_eq!(status, Some(404));
                assert_eq!(message, "Student not found");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn non_2xx_without_envelope_previews_body() {
        let err = offline()
            .parse_envelope::<Subject>(response(502, "  Bad\n  Gateway  "))
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Transport { status: Some(502), ref message } if message == "Bad Gateway"
        ));

        let err = offline().parse_delete(response(500, "")).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Transport { status: Some(500), ref message } if message == "no response body"
        ));
    }

    #[test]
    fn parse_resilient_rejects_html_before_json() {
        for body in [
            "<!doctype html><html><body>Cannot GET</body></html>",
            "<html><head></head></html>",
            "<!DOCTYPE html>",
            "\n  <HTML>",
        ] {
            let err = offline()
                .parse_resilient::<Vec<Subject>>(response(200, body))
                .unwrap_err();
            assert!(matches!(err, ApiError::UnexpectedContent(_)), "body: {body}");
        }
    }

    #[test]
    fn parse_resilient_accepts_envelope() {
        let body = r#"{"data":[{"subject_id":2,"subject_name":"数学"}],"message":"ok","success":true,"timestamp":"t"}"#;
        let subjects: Vec<Subject> = offline().parse_resilient(response(200, body)).unwrap();
        assert_eq!(subjects[0].subject_name, "数学");
    }

    #[test]
    fn parse_resilient_malformed_json_is_a_parse_error() {
        let err = offline()
            .parse_resilient::<Vec<Subject>>(response(200, "{\"data\": ["))
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn parse_delete_ignores_body() {
        let client = offline();
        assert!(client.parse_delete(response(200, "")).is_ok());
        assert!(client.parse_delete(response(204, "")).is_ok());
        assert!(client.parse_delete(response(200, "<html>whatever")).is_ok());
    }

    #[test]
    fn html_detection_is_prefix_only() {
        assert!(looks_like_html("<!doctype html>"));
        assert!(!looks_like_html("{\"message\":\"<html>\"}"));
        assert!(!looks_like_html("<ht"));
        assert!(!looks_like_html("张三<html>"));
    }

    // --- operations ---

    #[tokio::test]
    async fn list_unwraps_envelope_data() {
        let stub = StubTransport::with_replies(vec![envelope(
            json!([{"subject_id": 1, "subject_name": "语文"}]),
        )]);
        let client = RestClient::new(stub.clone(), "http://localhost:5000/api/admin");

        let subjects: Vec<Subject> = client.list("subjects").await.unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].subject_name, "语文");

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, "http://localhost:5000/api/admin/subjects");
    }

    #[tokio::test]
    async fn get_one_connection_refused_is_transport_error() {
        let stub = StubTransport::with_replies(vec![refused()]);
        let client = RestClient::new(stub, "http://localhost:5000/api/admin");

        let err = client.get_one::<Value>("students/S001").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { status: None, .. }));
    }

    #[tokio::test]
    async fn create_and_update_return_server_record() {
        let stub = StubTransport::with_replies(vec![
            envelope(json!({"subject_id": 7, "subject_name": "物理"})),
            envelope(json!({"subject_id": 7, "subject_name": "化学"})),
        ]);
        let client = RestClient::new(stub.clone(), "http://localhost:5000/api/admin");

        let created: Subject = client
            .create("subjects", &json!({"subject_name": "物理"}))
            .await
            .unwrap();
        assert_eq!(created.subject_id, 7);

        let updated: Subject = client
            .update("subjects/7", &json!({"subject_name": "化学"}))
            .await
            .unwrap();
        assert_eq!(updated.subject_name, "化学");

        let requests = stub.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[1].method, HttpMethod::Put);
        assert_eq!(requests[1].url, "http://localhost:5000/api/admin/subjects/7");
    }

    #[tokio::test]
    async fn delete_with_empty_body_succeeds() {
        let stub = StubTransport::with_replies(vec![reply(200, "")]);
        let client = RestClient::new(stub, "http://localhost:5000/api/admin");
        client.delete("students/S001").await.unwrap();
    }

    #[tokio::test]
    async fn delete_propagates_transport_failure() {
        let stub = StubTransport::with_replies(vec![reply(404, r#"{"success":false,"message":"gone"}"#)]);
        let client = RestClient::new(stub, "http://localhost:5000/api/admin");
        let err = client.delete("students/S404").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn get_resilient_reports_html() {
        let stub = StubTransport::with_replies(vec![reply(200, "<!doctype html><title>proxy</title>")]);
        let client = RestClient::new(stub, "http://localhost:5000/api/student");
        let err = client.get_resilient::<Value>("exam_results/S001").await.unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedContent(_)));
    }

    #[tokio::test]
    async fn normalized_reads_coerce_numeric_strings() {
        let stub = StubTransport::with_replies(vec![
            envelope(json!([{"score_id": "12", "score": "87", "student_name": "张三"}])),
            envelope(json!({"score_id": 13, "score": "91.5", "student_name": "李四"})),
            envelope(json!([{"score_id": "14", "score": 60, "student_name": "王五"}])),
        ]);
        let client = RestClient::new(stub, "http://localhost:5000/api/student");

        let marks: Vec<Mark> = client.list_normalized("scores/S001").await.unwrap();
        assert_eq!(
            marks,
            vec![Mark {
                score_id: 12,
                score: 87.0,
                student_name: "张三".to_string()
            }]
        );

        let mark: Mark = client.get_one_normalized("scores/one").await.unwrap();
        assert_eq!(mark.score, 91.5);

        let marks: Vec<Mark> = client.get_resilient_normalized("scores/S003").await.unwrap();
        assert_eq!(marks[0].score_id, 14);
    }

    #[tokio::test]
    async fn normalized_read_rejects_unparseable_numbers() {
        let stub = StubTransport::with_replies(vec![envelope(
            json!([{"score_id": "12", "score": "absent", "student_name": "张三"}]),
        )]);
        let client = RestClient::new(stub, "http://localhost:5000/api/student");
        let err = client.list_normalized::<Mark>("scores/S001").await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn timeout_maps_to_transport_error() {
        let client = RestClient::new(Arc::new(StalledTransport), "http://localhost:5000")
            .with_timeout(Duration::from_millis(20));
        let err = client.list::<Value>("subjects").await.unwrap_err();
        match err {
            ApiError::Transport { status, message } => {
                assert_eq!(status, None);
                assert!(message.contains("timed out"), "{message}");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sibling_calls_fail_independently() {
        let stub = StubTransport::with_replies(vec![
            refused(),
            envelope(json!([{"subject_id": 1, "subject_name": "语文"}])),
        ]);
        let client = RestClient::new(stub, "http://localhost:5000/api/admin");

        let (first, second) = tokio::join!(
            client.list::<Subject>("classes"),
            client.list::<Subject>("subjects"),
        );
        assert!(first.is_err());
        assert_eq!(second.unwrap().len(), 1);
    }
}
