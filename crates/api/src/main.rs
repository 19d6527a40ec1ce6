use staffhub_infra::AppConfig;

#[tokio::main]
async fn main() {
    staffhub_observability::init();

    let config = AppConfig::from_env();
    let app = staffhub_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.listen_addr));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
