use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use log::info;

use crate::data::{GenerateRequest, Generated, ValidateRequest, ValidateResponse};
use crate::error::Result;
use crate::pipeline::{self, Outcome};
use crate::validator;

async fn generate_handler(
    Json(req): Json<GenerateRequest>,
) -> std::result::Result<Json<Generated>, (StatusCode, String)> {
    match pipeline::plan(&req.tables, req.start_date, req.pairing, req.seed) {
        Ok(Outcome::Valid(generated)) => Ok(Json(generated)),
        Ok(Outcome::Rejected(conflict)) => {
            Err((StatusCode::UNPROCESSABLE_ENTITY, conflict.to_string()))
        }
        Err(e) => Err((StatusCode::BAD_REQUEST, e.to_string())),
    }
}

async fn validate_handler(Json(req): Json<ValidateRequest>) -> Json<ValidateResponse> {
    let conflict = validator::validate(&req.assignments).err();
    Json(ValidateResponse {
        valid: conflict.is_none(),
        conflict: conflict.map(|c| c.to_string()),
    })
}

pub fn router() -> Router {
    Router::new()
        .route("/v1/schedule/generate", post(generate_handler))
        .route("/v1/schedule/validate", post(validate_handler))
}

pub async fn run_server(bind_addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);
    axum::serve(listener, router()).await?;
    Ok(())
}
