mod alert_layer;
mod auth;
mod db;
mod handlers;
mod models;
mod rate_limit;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use rate_limit::{rate_limit, RateLimiter, Tier};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub admin_user_id: String,
    pub gateway_webhook_token: String,
    pub started_at: Instant,
}

/// Payment hold expiry check interval (seconds).
const HOLD_EXPIRY_INTERVAL_SECS: u64 = 60;
/// Rate limit cleanup interval (seconds).
const RATE_LIMIT_CLEANUP_SECS: u64 = 300;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // ── Env vars ──
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:fieldbook.db?mode=rwc".into());
    let admin_user_id = std::env::var("ADMIN_USER_ID").unwrap_or_default();
    let alert_webhook_url = std::env::var("ALERT_WEBHOOK_URL").unwrap_or_default();
    let gateway_webhook_token = std::env::var("GATEWAY_WEBHOOK_TOKEN").unwrap_or_default();
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());

    // ── Tracing: console + optional ops webhook alerts ──
    let env_filter = EnvFilter::from_default_env().add_directive("info".parse()?);
    let fmt_layer = tracing_subscriber::fmt::layer();
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if !alert_webhook_url.is_empty() {
        registry
            .with(alert_layer::AlertLayer::new(alert_webhook_url))
            .init();
    } else {
        registry.init();
    }

    if admin_user_id.is_empty() {
        tracing::warn!("ADMIN_USER_ID not set — admin endpoints are unreachable");
    }
    if gateway_webhook_token.is_empty() {
        tracing::warn!("GATEWAY_WEBHOOK_TOKEN not set — payment webhook is unauthenticated");
    }

    // ── Database ──
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    db::run_migrations(&pool).await?;

    let state = Arc::new(AppState {
        db: pool,
        admin_user_id,
        gateway_webhook_token,
        started_at: Instant::now(),
    });

    // ── Background task: expire unpaid bookings past their hold ──
    let expire_db = state.db.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(
            HOLD_EXPIRY_INTERVAL_SECS,
        ));
        loop {
            interval.tick().await;
            handlers::payment::expire_overdue_holds(&expire_db).await;
        }
    });

    // ── Rate limiter + cleanup task ──
    let rate_limiter = RateLimiter::new();
    let cleanup_limiter = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(RATE_LIMIT_CLEANUP_SECS));
        loop {
            interval.tick().await;
            cleanup_limiter.cleanup();
        }
    });

    // ── CORS: whitelist WEBAPP_URL when configured, otherwise allow any ──
    let webapp_url =
        std::env::var("WEBAPP_URL").unwrap_or_else(|_| "https://example.com".into());
    let cors = if webapp_url != "https://example.com" {
        let origins: Vec<axum::http::HeaderValue> = vec![
            webapp_url.parse().expect("WEBAPP_URL must be a valid URL"),
            "http://localhost:5173".parse().unwrap(), // Vite dev server
        ];
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // ── Router (5 groups with per-group rate limits) ──

    // 1. No-limit: health checks + payment webhooks
    let no_limit_routes = Router::new()
        .route("/api/health", get(handlers::health::health))
        .route(
            "/api/payments/webhook",
            post(handlers::payment::gateway_webhook),
        );

    // 2. Public: read-only endpoints (no auth, 60 req/min)
    let public_routes = Router::new()
        .route("/api/fields", get(handlers::client::list_fields))
        .route(
            "/api/policy/cancellation",
            get(handlers::client::cancellation_policy),
        )
        .route(
            "/api/bookings/recurring/preview",
            post(handlers::client::preview_recurring),
        )
        .layer(from_fn_with_state(
            (rate_limiter.clone(), Tier::Public),
            rate_limit,
        ));

    // 3. Booking creation: strictest limit (5 req/5min)
    let booking_routes = Router::new()
        .route("/api/bookings", post(handlers::client::create_booking))
        .route(
            "/api/bookings/recurring",
            post(handlers::client::create_recurring),
        )
        .layer(from_fn_with_state(
            (rate_limiter.clone(), Tier::Booking),
            rate_limit,
        ));

    // 4. Auth: authenticated client endpoints (30 req/min)
    let auth_routes = Router::new()
        .route("/api/bookings/my", get(handlers::client::my_bookings))
        .route(
            "/api/bookings/{id}",
            delete(handlers::client::cancel_booking),
        )
        .route(
            "/api/bookings/{id}/cancellation-quote",
            get(handlers::client::cancellation_quote),
        )
        .route(
            "/api/bookings/{id}/match-request",
            post(handlers::client::create_match_request),
        )
        .route(
            "/api/bookings/groups/{recurrence_id}",
            get(handlers::client::booking_group),
        )
        .route(
            "/api/notifications/my",
            get(handlers::client::my_notifications),
        )
        .layer(from_fn_with_state(
            (rate_limiter.clone(), Tier::Auth),
            rate_limit,
        ));

    // 5. Admin: all admin endpoints (120 req/min)
    let admin_routes = Router::new()
        .route("/api/admin/bookings", get(handlers::admin::list_bookings))
        .route(
            "/api/admin/bookings/{id}/cancel",
            post(handlers::admin::cancel_booking),
        )
        .layer(from_fn_with_state(
            (rate_limiter.clone(), Tier::Admin),
            rate_limit,
        ));

    let app = Router::new()
        .merge(no_limit_routes)
        .merge(public_routes)
        .merge(booking_routes)
        .merge(auth_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    tracing::info!("Fieldbook server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
