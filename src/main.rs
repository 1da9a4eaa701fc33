use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};
use profiles_api::core::config::Config;
use profiles_api::core::logging::Logger;
use profiles_api::core::middleware;
use profiles_api::core::openapi::{ApiDoc, SwaggerInfoModifier};
use profiles_api::features::supabase::{AuthBackend, ProfileStore, SupabaseClient};
use profiles_api::features::users::{routes as users_routes, UserService};
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Configuration carries the log level, so it is loaded before the subscriber
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let logger = Arc::new(Logger::new(config.log.level));

    tracing_subscriber::registry()
        .with(logger.env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    logger.info(
        "startup",
        format!(
            "log_level={:?}, tokio_worker_threads={}, pid={}",
            logger.level(),
            worker_threads,
            std::process::id()
        ),
    );

    let client = SupabaseClient::new(config.supabase.clone(), Arc::clone(&logger));
    logger.info("startup", format!("Supabase project at {}", config.supabase.url));

    let auth: Arc<dyn AuthBackend> = Arc::new(client.clone());
    let profiles: Arc<dyn ProfileStore> = Arc::new(client);
    let user_service = Arc::new(UserService::new(auth, profiles, Arc::clone(&logger)));

    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };
    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    async fn health_check() -> StatusCode {
        StatusCode::OK
    }

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .merge(users_routes::routes(user_service))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                // Generate X-Request-Id using UUID v7 (or keep a client-provided one)
                .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(middleware::MakeSpanWithRequestId)
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::cors_layer(&config.app.cors_allowed_origins)),
        );

    let addr = config.app.server_address();
    let listener = bind(&addr)?;
    logger.info("startup", format!("Server listening on http://{}", addr));
    logger.info(
        "startup",
        format!("Swagger UI available at http://{}/swagger-ui/", addr),
    );

    axum::serve(listener, app).await?;

    Ok(())
}

fn bind(addr: &str) -> anyhow::Result<tokio::net::TcpListener> {
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    Ok(tokio::net::TcpListener::from_std(socket.into())?)
}
