use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use staffhub_core::{PostId, StaffId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(upsert_staff).get(list_staff))
        .route("/pending", get(list_pending))
        .route("/left", get(list_left))
        .route("/:id", get(get_staff))
        .route("/:id/join", post(join))
        .route("/:id/leave", post(leave))
}

pub async fn upsert_staff(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::UpsertStaffRequest>,
) -> axum::response::Response {
    let creating = body.id.is_none();
    match services.directory().upsert(body.into_upsert()) {
        Ok(id) => {
            let status = if creating { StatusCode::CREATED } else { StatusCode::OK };
            (status, Json(serde_json::json!({ "id": id.get() }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_staff(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let staff_id: StaffId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid staff id"),
    };
    match services.staff_with_posts(staff_id) {
        Some(staff) => (StatusCode::OK, Json(dto::staff_to_json(&staff))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "staff not found"),
    }
}

pub async fn list_staff(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let items = services
        .directory()
        .list()
        .iter()
        .map(dto::staff_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn list_pending(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let items = services
        .directory()
        .find_pendings()
        .iter()
        .map(dto::staff_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn list_left(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let items = services
        .directory()
        .find_lefts()
        .iter()
        .map(dto::staff_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn join(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::JoinRequest>,
) -> axum::response::Response {
    let staff_id: StaffId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid staff id"),
    };
    let post_ids: BTreeSet<PostId> = body.post_ids.iter().map(|&id| PostId::new(id)).collect();

    match services.join(staff_id, &post_ids).await {
        Ok(done) => (StatusCode::OK, Json(serde_json::json!({ "ok": done }))).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn leave(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let staff_id: StaffId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid staff id"),
    };

    match services.leave(staff_id).await {
        Ok(done) => (StatusCode::OK, Json(serde_json::json!({ "ok": done }))).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}
