use crate::application::{CodeMappingLookupUseCase, ColumnProjectorUseCase, DatasetMapperUseCase};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::{ServerConfig, DEFAULT_MAX_BODY_BYTES};
use crate::infrastructure::db::StateLookupStore;
use actix_cors::Cors;
use actix_web::{
    dev::Server, get, middleware::Logger, post, web, App, HttpResponse, HttpServer, Responder,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

pub struct HttpState {
    pub column_projector: ColumnProjectorUseCase,
    pub code_mapping_lookup: CodeMappingLookupUseCase,
    pub dataset_mapper: DatasetMapperUseCase,
    pub max_body_bytes: usize,
}

impl HttpState {
    pub fn new(store: Arc<dyn StateLookupStore + Send + Sync>) -> Self {
        Self {
            column_projector: ColumnProjectorUseCase::new(),
            code_mapping_lookup: CodeMappingLookupUseCase::new(store),
            dataset_mapper: DatasetMapperUseCase::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_body_limit(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

#[post("/process_json")]
async fn process_json(data: web::Data<HttpState>, payload: web::Payload) -> impl Responder {
    let result = read_json(payload, data.max_body_bytes)
        .await
        .and_then(|body| data.column_projector.execute(&body));

    match result {
        Ok(projected) => HttpResponse::Ok().json(projected),
        Err(e) => error_response("ProcessJson", &e),
    }
}

#[get("/state_mappings")]
async fn state_mappings(data: web::Data<HttpState>) -> impl Responder {
    match data.code_mapping_lookup.execute().await {
        Ok(mapping) => HttpResponse::Ok().json(mapping),
        Err(e) => error_response("StateMappings", &e),
    }
}

#[post("/create_mapped_dataset")]
async fn create_mapped_dataset(
    data: web::Data<HttpState>,
    payload: web::Payload,
) -> impl Responder {
    let result = read_json(payload, data.max_body_bytes)
        .await
        .and_then(|body| data.dataset_mapper.execute(&body));

    match result {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => error_response("CreateMappedDataset", &e),
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({"status": "ok"}))
}

/// Read the whole body, failing once it grows past `limit` bytes.
async fn read_json(payload: web::Payload, limit: usize) -> Result<Value> {
    let body = payload
        .to_bytes_limited(limit)
        .await
        .map_err(|_| AppError::PayloadTooLarge(limit))?
        .map_err(|e| AppError::ParseError(format!("Failed to read request body: {}", e)))?;
    parse_body(&body)
}

/// Parse a raw request body. Blank bodies read as `null`.
fn parse_body(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::ParseError(format!("Invalid JSON body: {}", e)))
}

fn error_response(source: &str, err: &AppError) -> HttpResponse {
    error!(source, error = %err, "Request failed");
    HttpResponse::InternalServerError().json(json!({"error": err.to_string()}))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(process_json)
        .service(state_mappings)
        .service(create_mapped_dataset)
        .service(health);
}

pub fn start_server(state: Arc<HttpState>, config: &ServerConfig) -> std::io::Result<Server> {
    let state = web::Data::from(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    info!(host = %config.host, port = config.port, "HTTP server listening");

    Ok(server)
}
