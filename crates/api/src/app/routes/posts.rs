use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use staffhub_core::DeptId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_post))
        .route("/department/:dept_id", get(list_by_department))
        .route("/department/:dept_id/roster", get(department_roster))
}

pub async fn create_post(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreatePostRequest>,
) -> axum::response::Response {
    if body.dept_id <= 0 {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid department id");
    }
    if body.name.trim().is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "name cannot be empty");
    }

    let created = services.create_post(DeptId::new(body.dept_id), body.name);
    (StatusCode::CREATED, Json(dto::post_to_json(&created))).into_response()
}

pub async fn list_by_department(
    Extension(services): Extension<Arc<AppServices>>,
    Path(dept_id): Path<String>,
) -> axum::response::Response {
    let dept_id: DeptId = match dept_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid department id");
        }
    };
    let items = services
        .posts_by_department(dept_id)
        .iter()
        .map(dto::post_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn department_roster(
    Extension(services): Extension<Arc<AppServices>>,
    Path(dept_id): Path<String>,
) -> axum::response::Response {
    let dept_id: DeptId = match dept_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid department id");
        }
    };
    let items = services
        .roster(dept_id)
        .iter()
        .map(dto::staff_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}
