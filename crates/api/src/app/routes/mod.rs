use axum::Router;

pub mod posts;
pub mod staff;
pub mod system;

/// Router for all domain endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/staff", staff::router())
        .nest("/posts", posts::router())
}
