//! Companion backend for the school portal.
//!
//! Speaks the same envelope contract as the production backend over an
//! in-memory seeded store. Score and exam-result rows keep their numbers as
//! strings, the way the production database driver returned them, and any
//! unknown path answers with an HTML page the way a misrouted dev proxy does.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub type Db = Arc<RwLock<Store>>;

/// Cookie carrying the login session, as Flask's session cookie did.
pub const SESSION_COOKIE: &str = "session";

const INDEX_HTML: &str = "<!doctype html>\n<html lang=\"zh\">\n<head><meta charset=\"utf-8\"><title>School Portal</title></head>\n<body><app-root></app-root></body>\n</html>\n";

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Rows keyed by one field. With `auto_id` the server assigns increasing
/// integer ids; otherwise the client must supply a non-empty string key.
#[derive(Debug, Clone)]
pub struct Table {
    key: &'static str,
    auto_id: bool,
    next_id: i64,
    rows: BTreeMap<String, Value>,
}

impl Table {
    pub fn new(key: &'static str, auto_id: bool) -> Self {
        Self {
            key,
            auto_id,
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    pub fn seeded(mut self, rows: Vec<Value>) -> Self {
        for row in rows {
            if let Some(id) = key_of(&row, self.key) {
                if let Ok(n) = id.parse::<i64>() {
                    self.next_id = self.next_id.max(n + 1);
                }
                self.rows.insert(id, row);
            }
        }
        self
    }

    pub fn list(&self) -> Vec<Value> {
        self.rows.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.rows.get(id)
    }

    pub fn insert(&mut self, mut fields: Map<String, Value>) -> Result<Value, MockError> {
        let id = if self.auto_id {
            let id = self.next_id;
            self.next_id += 1;
            fields.insert(self.key.to_string(), json!(id));
            id.to_string()
        } else {
            match fields.get(self.key) {
                Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
                _ => return Err(MockError::BadRequest(format!("{} is required", self.key))),
            }
        };
        if self.rows.contains_key(&id) {
            return Err(MockError::Conflict(format!("{} {id} already exists", self.key)));
        }
        let row = Value::Object(fields);
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    /// Merge `fields` into the row; the key field itself is never changed.
    pub fn update(&mut self, id: &str, fields: Map<String, Value>) -> Option<Value> {
        let key = self.key;
        let row = self.rows.get_mut(id)?;
        if let Value::Object(existing) = row {
            for (name, value) in fields {
                if name != key {
                    existing.insert(name, value);
                }
            }
        }
        Some(row.clone())
    }

    pub fn remove(&mut self, id: &str) -> Option<Value> {
        self.rows.remove(id)
    }
}

fn key_of(row: &Value, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone)]
struct Account {
    user_id: &'static str,
    password: &'static str,
    username: &'static str,
    role: &'static str,
}

#[derive(Debug)]
pub struct Store {
    accounts: Vec<Account>,
    sessions: HashMap<String, Value>,
    next_session: u64,
    tables: HashMap<&'static str, Table>,
    scores: Table,
    exam_results: Vec<Value>,
}

impl Store {
    /// A small school: three students in two classes, two teachers, three
    /// subjects, two exams.
    pub fn seeded() -> Self {
        let accounts = vec![
            Account { user_id: "A001", password: "admin123", username: "管理员", role: "admin" },
            Account { user_id: "T001", password: "teacher123", username: "王老师", role: "teacher" },
            Account { user_id: "S001", password: "student123", username: "张三", role: "student" },
        ];

        let mut tables = HashMap::new();
        tables.insert(
            "students",
            Table::new("student_id", false).seeded(vec![
                json!({"student_id": "S001", "student_name": "张三", "class_name": "高一(1)班"}),
                json!({"student_id": "S002", "student_name": "李四", "class_name": "高一(1)班"}),
                json!({"student_id": "S003", "student_name": "王五", "class_name": "高一(2)班"}),
            ]),
        );
        tables.insert(
            "teachers",
            Table::new("teacher_id", true).seeded(vec![
                json!({"teacher_id": 1, "teacher_name": "王老师"}),
                json!({"teacher_id": 2, "teacher_name": "李老师"}),
            ]),
        );
        tables.insert(
            "classes",
            Table::new("class_id", true).seeded(vec![
                json!({"class_id": 1, "class_name": "高一(1)班", "teacher_name": "王老师"}),
                json!({"class_id": 2, "class_name": "高一(2)班", "teacher_name": "李老师"}),
            ]),
        );
        tables.insert(
            "subjects",
            Table::new("subject_id", true).seeded(vec![
                json!({"subject_id": 1, "subject_name": "语文"}),
                json!({"subject_id": 2, "subject_name": "数学"}),
                json!({"subject_id": 3, "subject_name": "英语"}),
            ]),
        );
        tables.insert(
            "exam-types",
            Table::new("exam_type_id", true).seeded(vec![
                json!({"exam_type_id": 1, "exam_name": "期中考试"}),
                json!({"exam_type_id": 2, "exam_name": "期末考试"}),
            ]),
        );

        let scores = Table::new("score_id", true).seeded(vec![
            score_row("1", "S001", "张三", "2024001", "高一(1)班", "1", "语文", "1", "期中考试", "87"),
            score_row("2", "S001", "张三", "2024001", "高一(1)班", "2", "数学", "1", "期中考试", "92.5"),
            score_row("3", "S002", "李四", "2024002", "高一(1)班", "1", "语文", "1", "期中考试", "78"),
        ]);

        let exam_results = vec![json!({
            "student_id": "S001", "exam_name": "期中考试", "student_name": "张三",
            "chinese": "87", "math": "92.5", "english": "88", "physics": "79",
            "chemistry": "83", "politics": "90", "total_score": "519.5", "ranking": "2"
        })];

        Self {
            accounts,
            sessions: HashMap::new(),
            next_session: 1,
            tables,
            scores,
            exam_results,
        }
    }

    fn open_session(&mut self, user: Value) -> String {
        let token = format!("{:016x}", self.next_session);
        self.next_session += 1;
        self.sessions.insert(token.clone(), user);
        token
    }

    fn table(&self, resource: &str) -> Result<&Table, MockError> {
        self.tables
            .get(resource)
            .ok_or_else(|| MockError::NotFound(format!("unknown resource '{resource}'")))
    }

    fn table_mut(&mut self, resource: &str) -> Result<&mut Table, MockError> {
        self.tables
            .get_mut(resource)
            .ok_or_else(|| MockError::NotFound(format!("unknown resource '{resource}'")))
    }
}

#[allow(clippy::too_many_arguments)]
fn score_row(
    score_id: &str,
    student_id: &str,
    student_name: &str,
    student_number: &str,
    class_name: &str,
    subject_id: &str,
    subject_name: &str,
    exam_type_id: &str,
    exam_name: &str,
    score: &str,
) -> Value {
    json!({
        "score_id": score_id, "student_id": student_id, "student_name": student_name,
        "student_number": student_number, "class_name": class_name,
        "subject_id": subject_id, "subject_name": subject_name,
        "exam_type_id": exam_type_id, "exam_name": exam_name, "score": score
    })
}

// ---------------------------------------------------------------------------
// Envelope replies
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum MockError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            MockError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            MockError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
            MockError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            MockError::Conflict(m) => (StatusCode::CONFLICT, m),
        };
        tracing::debug!(status = status.as_u16(), %message, "request rejected");
        let body = json!({"success": false, "message": message, "timestamp": now()});
        (status, Json(body)).into_response()
    }
}

type Reply = Result<Response, MockError>;

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn envelope(status: StatusCode, data: Value, message: &str) -> Response {
    let body = json!({"data": data, "message": message, "success": true, "timestamp": now()});
    (status, Json(body)).into_response()
}

fn ok(data: Value, message: &str) -> Response {
    envelope(StatusCode::OK, data, message)
}

fn created(data: Value) -> Response {
    envelope(StatusCode::CREATED, data, "Created")
}

fn not_found(what: &str) -> MockError {
    MockError::NotFound(format!("{what} not found"))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .route("/api/admin/{resource}", get(list_records).post(create_record))
        .route(
            "/api/admin/{resource}/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route("/api/student/profile/{student_id}", get(student_profile))
        .route("/api/student/scores/{student_id}", get(student_scores))
        .route("/api/student/exam_results/{student_id}", get(student_exam_results))
        .route("/api/teacher/profile/{teacher_id}", get(teacher_profile))
        .route("/api/teacher/classes/{teacher_id}", get(teacher_classes))
        .route("/api/teacher/students/{class_id}", get(class_roster))
        .route("/api/teacher/scores", get(list_scores).post(create_score))
        .route(
            "/api/teacher/scores/{score_id}",
            get(get_score).put(update_score).delete(delete_score),
        )
        .fallback(spa_fallback)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn spa_fallback() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// --- auth ---

#[derive(Deserialize)]
pub struct LoginBody {
    pub user_id: Option<String>,
    pub password: Option<String>,
}

async fn login(State(db): State<Db>, Json(body): Json<LoginBody>) -> Reply {
    let (Some(user_id), Some(password)) = (body.user_id, body.password) else {
        return Err(MockError::BadRequest("Missing user_id or password".to_string()));
    };
    let mut store = db.write().await;
    let user = store
        .accounts
        .iter()
        .find(|account| account.user_id == user_id && account.password == password)
        .map(|account| {
            json!({"user_id": account.user_id, "username": account.username, "role": account.role})
        })
        .ok_or_else(|| MockError::Unauthorized("Invalid credentials".to_string()))?;
    let token = store.open_session(user.clone());
    let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly");
    Ok(([(header::SET_COOKIE, cookie)], ok(user, "Login successful")).into_response())
}

/// The session token from the request's `Cookie` headers, if any.
fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
}

async fn me(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let store = db.read().await;
    session_token(&headers)
        .and_then(|token| store.sessions.get(&token).cloned())
        .map(|user| ok(user, "ok"))
        .ok_or_else(|| MockError::Unauthorized("Not logged in".to_string()))
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Reply {
    if let Some(token) = session_token(&headers) {
        db.write().await.sessions.remove(&token);
    }
    let expired = format!("{SESSION_COOKIE}=; Path=/; Max-Age=0");
    Ok(([(header::SET_COOKIE, expired)], ok(Value::Null, "Logout successful")).into_response())
}

// --- admin ---

async fn list_records(State(db): State<Db>, Path(resource): Path<String>) -> Reply {
    let store = db.read().await;
    let rows = store.table(&resource)?.list();
    Ok(ok(json!(rows), "ok"))
}

async fn get_record(State(db): State<Db>, Path((resource, id)): Path<(String, String)>) -> Reply {
    let store = db.read().await;
    let row = store.table(&resource)?.get(&id).cloned().ok_or_else(|| not_found(&resource))?;
    Ok(ok(row, "ok"))
}

async fn create_record(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Reply {
    let mut store = db.write().await;
    let row = store.table_mut(&resource)?.insert(fields)?;
    Ok(created(row))
}

async fn update_record(
    State(db): State<Db>,
    Path((resource, id)): Path<(String, String)>,
    Json(fields): Json<Map<String, Value>>,
) -> Reply {
    let mut store = db.write().await;
    let row = store
        .table_mut(&resource)?
        .update(&id, fields)
        .ok_or_else(|| not_found(&resource))?;
    Ok(ok(row, "Updated"))
}

async fn delete_record(State(db): State<Db>, Path((resource, id)): Path<(String, String)>) -> Reply {
    let mut store = db.write().await;
    store
        .table_mut(&resource)?
        .remove(&id)
        .ok_or_else(|| not_found(&resource))?;
    Ok(ok(Value::Null, "Deleted"))
}

// --- student ---

fn rows_for_student(rows: Vec<Value>, student_id: &str) -> Vec<Value> {
    rows.into_iter()
        .filter(|row| row.get("student_id").and_then(Value::as_str) == Some(student_id))
        .collect()
}

async fn student_profile(State(db): State<Db>, Path(student_id): Path<String>) -> Reply {
    let store = db.read().await;
    let student = store
        .table("students")?
        .get(&student_id)
        .cloned()
        .ok_or_else(|| not_found("Student"))?;
    Ok(ok(student, "ok"))
}

async fn student_scores(State(db): State<Db>, Path(student_id): Path<String>) -> Reply {
    let store = db.read().await;
    let rows = rows_for_student(store.scores.list(), &student_id);
    Ok(ok(json!(rows), "ok"))
}

async fn student_exam_results(State(db): State<Db>, Path(student_id): Path<String>) -> Reply {
    let store = db.read().await;
    let rows = rows_for_student(store.exam_results.clone(), &student_id);
    Ok(ok(json!(rows), "ok"))
}

// --- teacher ---

fn field_str<'a>(row: &'a Value, name: &str) -> Option<&'a str> {
    row.get(name).and_then(Value::as_str)
}

async fn teacher_profile(State(db): State<Db>, Path(teacher_id): Path<String>) -> Reply {
    let store = db.read().await;
    let teacher = store
        .table("teachers")?
        .get(&teacher_id)
        .cloned()
        .ok_or_else(|| not_found("Teacher"))?;
    Ok(ok(teacher, "ok"))
}

async fn teacher_classes(State(db): State<Db>, Path(teacher_id): Path<String>) -> Reply {
    let store = db.read().await;
    let teacher = store
        .table("teachers")?
        .get(&teacher_id)
        .ok_or_else(|| not_found("Teacher"))?;
    let name = field_str(teacher, "teacher_name");
    let classes: Vec<Value> = store
        .table("classes")?
        .list()
        .into_iter()
        .filter(|class| field_str(class, "teacher_name") == name)
        .collect();
    Ok(ok(json!(classes), "ok"))
}

async fn class_roster(State(db): State<Db>, Path(class_id): Path<String>) -> Reply {
    let store = db.read().await;
    let class = store
        .table("classes")?
        .get(&class_id)
        .ok_or_else(|| not_found("Class"))?;
    let name = field_str(class, "class_name");
    let students: Vec<Value> = store
        .table("students")?
        .list()
        .into_iter()
        .filter(|student| field_str(student, "class_name") == name)
        .collect();
    Ok(ok(json!(students), "ok"))
}

async fn list_scores(State(db): State<Db>) -> Reply {
    let store = db.read().await;
    Ok(ok(json!(store.scores.list()), "ok"))
}

async fn get_score(State(db): State<Db>, Path(score_id): Path<String>) -> Reply {
    let store = db.read().await;
    let row = store.scores.get(&score_id).cloned().ok_or_else(|| not_found("Score"))?;
    Ok(ok(row, "ok"))
}

/// Fill the display columns of a new score row from the referenced student,
/// subject and exam.
fn complete_score(store: &Store, fields: &mut Map<String, Value>) -> Result<(), MockError> {
    let reference = |name: &str| {
        fields
            .get(name)
            .and_then(|value| match value {
                Value::String(id) => Some(id.clone()),
                Value::Number(id) => Some(id.to_string()),
                _ => None,
            })
            .ok_or_else(|| MockError::BadRequest(format!("{name} is required")))
    };
    let student_id = reference("student_id")?;
    let subject_id = reference("subject_id")?;
    let exam_type_id = reference("exam_type_id")?;
    if !fields.contains_key("score") {
        return Err(MockError::BadRequest("score is required".to_string()));
    }

    let student = store.table("students")?.get(&student_id).ok_or_else(|| not_found("Student"))?;
    let subject = store.table("subjects")?.get(&subject_id).ok_or_else(|| not_found("Subject"))?;
    let exam = store.table("exam-types")?.get(&exam_type_id).ok_or_else(|| not_found("Exam type"))?;

    for (name, source) in [
        ("student_name", student),
        ("class_name", student),
        ("subject_name", subject),
        ("exam_name", exam),
    ] {
        fields.insert(name.to_string(), source.get(name).cloned().unwrap_or(Value::Null));
    }
    Ok(())
}

async fn create_score(State(db): State<Db>, Json(mut fields): Json<Map<String, Value>>) -> Reply {
    let mut store = db.write().await;
    complete_score(&store, &mut fields)?;
    let row = store.scores.insert(fields)?;
    Ok(created(row))
}

async fn update_score(
    State(db): State<Db>,
    Path(score_id): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Reply {
    let mut store = db.write().await;
    let row = store.scores.update(&score_id, fields).ok_or_else(|| not_found("Score"))?;
    Ok(ok(row, "Updated"))
}

async fn delete_score(State(db): State<Db>, Path(score_id): Path<String>) -> Result<StatusCode, MockError> {
    let mut store = db.write().await;
    store.scores.remove(&score_id).ok_or_else(|| not_found("Score"))?;
    Ok(StatusCode::NO_CONTENT)
}
