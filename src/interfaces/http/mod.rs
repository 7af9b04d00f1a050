use crate::application::use_cases::upload_slots::{SlotState, UploadSlots};
use crate::application::{UploadCheck, UploadOutcome};
use crate::domain::csv::{CsvMatch, HeaderReport, HeaderRow, TypeKey};
use crate::domain::error::AppError;
use crate::infrastructure::config::ServerConfig;
use actix_cors::Cors;
use actix_web::{
    delete, dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder, Scope,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub upload_check: UploadCheck,
    pub slots: UploadSlots,
    pub logs: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl HttpState {
    pub fn new(upload_check: UploadCheck, logs: Arc<Mutex<VecDeque<LogEntry>>>) -> Self {
        Self {
            upload_check,
            slots: UploadSlots::new(),
            logs,
        }
    }
}

#[derive(Deserialize)]
pub struct ValidateRequest {
    /// Accepted as any JSON so malformed rows degrade to `invalid`
    #[serde(default)]
    pub headers: JsonValue,
    pub type_key: String,
}

#[derive(Deserialize)]
pub struct IdentifyRequest {
    #[serde(default)]
    pub headers: JsonValue,
}

#[derive(Serialize, Deserialize)]
pub struct IdentifyResponse {
    pub detected: CsvMatch,
    pub candidates: Vec<TypeKey>,
}

#[derive(Deserialize)]
pub struct CheckQuery {
    pub type_key: Option<String>,
}

#[derive(Deserialize)]
pub struct SlotQuery {
    pub file_name: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SlotView {
    pub slot: TypeKey,
    #[serde(flatten)]
    pub state: SlotState,
}

#[derive(Serialize, Deserialize)]
pub struct SlotUploadResponse {
    pub slot: SlotView,
    /// `false` when a newer upload to the same slot finished first
    pub applied: bool,
    pub outcome: UploadOutcome,
}

fn error_response(err: &AppError) -> HttpResponse {
    match err {
        AppError::NotFound(_) => HttpResponse::NotFound().body(err.to_string()),
        AppError::ValidationError(_) | AppError::ParseError(_) => {
            HttpResponse::BadRequest().body(err.to_string())
        }
        _ => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

#[get("/csv/schemas")]
async fn list_schemas(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(data.upload_check.validator().registry())
}

#[post("/csv/validate")]
async fn validate(data: web::Data<HttpState>, req: web::Json<ValidateRequest>) -> impl Responder {
    let headers = HeaderRow::from_json(&req.headers);
    let report: HeaderReport = data
        .upload_check
        .validator()
        .validate_type(&headers, &req.type_key);

    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Validated headers against {}: {}", req.type_key, report.status),
    );

    HttpResponse::Ok().json(report)
}

#[post("/csv/identify")]
async fn identify(data: web::Data<HttpState>, req: web::Json<IdentifyRequest>) -> impl Responder {
    let headers = HeaderRow::from_json(&req.headers);
    let validator = data.upload_check.validator();
    let candidates = validator.candidates(&headers);
    let detected = CsvMatch::from(candidates.first().cloned());

    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!(
            "Identified headers as {} ({} candidates)",
            detected.type_key().map(TypeKey::as_str).unwrap_or("no match"),
            candidates.len()
        ),
    );

    HttpResponse::Ok().json(IdentifyResponse {
        detected,
        candidates,
    })
}

/// Header reads run off the async workers
async fn run_check(
    check: UploadCheck,
    body: web::Bytes,
    expected: Option<TypeKey>,
) -> Result<UploadOutcome, AppError> {
    tokio::task::spawn_blocking(move || check.check_bytes(&body, expected.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("Upload check worker failed: {}", e)))
}

#[post("/csv/check")]
async fn check_upload(
    data: web::Data<HttpState>,
    query: web::Query<CheckQuery>,
    body: web::Bytes,
) -> impl Responder {
    let expected = query.type_key.clone().map(TypeKey::from);

    match run_check(data.upload_check.clone(), body, expected).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => {
            add_log(&data.logs, "ERROR", "HttpApi", &format!("Upload check failed: {}", e));
            error_response(&e)
        }
    }
}

#[post("/uploads/{slot}")]
async fn upload_to_slot(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<SlotQuery>,
    body: web::Bytes,
) -> impl Responder {
    let slot = TypeKey::from(path.into_inner());
    if !data.upload_check.validator().registry().contains(slot.as_str()) {
        return error_response(&AppError::NotFound(format!("No upload slot for {}", slot)));
    }

    let ticket = data.slots.begin(&slot, query.into_inner().file_name);

    let outcome = match run_check(data.upload_check.clone(), body, Some(slot.clone())).await {
        Ok(outcome) => outcome,
        Err(e) => {
            add_log(&data.logs, "ERROR", "HttpApi", &format!("Slot upload failed: {}", e));
            return error_response(&e);
        }
    };

    let applied = data.slots.complete(&ticket, outcome.status);
    add_log(
        &data.logs,
        if applied { "INFO" } else { "WARN" },
        "Uploads",
        &format!(
            "{} upload {} ({})",
            slot,
            outcome.status,
            if applied { "applied" } else { "superseded" }
        ),
    );

    let state = data.slots.get(&slot);
    HttpResponse::Ok().json(SlotUploadResponse {
        slot: SlotView { slot, state },
        applied,
        outcome,
    })
}

#[get("/uploads")]
async fn list_uploads(data: web::Data<HttpState>) -> impl Responder {
    let views: Vec<SlotView> = data
        .slots
        .snapshot()
        .into_iter()
        .map(|(slot, state)| SlotView { slot, state })
        .collect();

    HttpResponse::Ok().json(views)
}

#[delete("/uploads/{slot}")]
async fn clear_upload(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let slot = TypeKey::from(path.into_inner());
    if !data.upload_check.validator().registry().contains(slot.as_str()) {
        return error_response(&AppError::NotFound(format!("No upload slot for {}", slot)));
    }

    let state = data.slots.clear(&slot);
    add_log(&data.logs, "INFO", "Uploads", &format!("Cleared {} slot", slot));

    HttpResponse::Ok().json(SlotView { slot, state })
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    match data.logs.lock() {
        Ok(logs) => HttpResponse::Ok().json(&*logs),
        Err(_) => HttpResponse::InternalServerError().body("Log buffer unavailable"),
    }
}

pub fn add_log_entry(
    logs: &Mutex<VecDeque<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    if let Ok(mut logs) = logs.lock() {
        logs.push_back(entry.clone());
        while logs.len() > MAX_LOG_ENTRIES {
            logs.pop_front();
        }
    }
    entry
}

pub fn add_log(logs: &Mutex<VecDeque<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(list_schemas)
        .service(validate)
        .service(identify)
        .service(check_upload)
        .service(upload_to_slot)
        .service(list_uploads)
        .service(clear_upload)
        .service(get_logs)
}

pub fn start_server(state: HttpState, config: &ServerConfig) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new().wrap(cors).app_data(state.clone()).service(api_scope())
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    Ok(server)
}
