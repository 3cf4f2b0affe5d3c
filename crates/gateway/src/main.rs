use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use clap::Parser;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use ub_gateway::cli::{Cli, Command, ConfigCommand};
use ub_gateway::{api, bootstrap};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Default to serve when no subcommand is given.
        None | Some(Command::Serve) => {
            init_tracing();
            let (config, _config_path) = ub_gateway::cli::load_config()?;
            run_server(Arc::new(config)).await
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let (config, config_path) = ub_gateway::cli::load_config()?;
            // The corpus is part of a valid configuration.
            ub_faq::load_corpus(&config.faq.path).with_context(|| {
                format!("loading FAQ corpus from {}", config.faq.path.display())
            })?;
            println!("{config_path}: OK");
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let (config, _config_path) = ub_gateway::cli::load_config()?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Some(Command::Ask { question }) => {
            init_cli_tracing();
            let (config, _config_path) = ub_gateway::cli::load_config()?;
            ub_gateway::cli::ask(Arc::new(config), question).await
        }
        Some(Command::Version) => {
            println!("unibot {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Structured JSON tracing for the server.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ub_gateway=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// Compact stderr-only tracing for one-shot CLI commands, so diagnostic
/// output does not pollute stdout.
fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Start the chatbot server with the given configuration.
async fn run_server(config: Arc<ub_domain::config::Config>) -> anyhow::Result<()> {
    tracing::info!("unibot starting");

    let state = bootstrap::build_app_state(config.clone())?;

    // ── CORS layer (config-aware) ────────────────────────────────────
    let cors_layer = build_cors_layer(&config.server.cors);

    // ── Concurrency limit (backpressure protection) ─────────────────
    let max_concurrent = std::env::var("UNIBOT_MAX_CONCURRENT_REQUESTS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(256);

    // ── Rate-limit layer (per-IP token bucket via governor) ─────────
    let governor_layer = config.server.rate_limit.as_ref().map(|rl| {
        use tower_governor::governor::GovernorConfigBuilder;
        use tower_governor::GovernorLayer;

        let gov_config = GovernorConfigBuilder::default()
            .per_second(rl.requests_per_second)
            .burst_size(rl.burst_size)
            .finish()
            .expect("rate_limit: requests_per_second and burst_size must be > 0");

        tracing::info!(
            requests_per_second = rl.requests_per_second,
            burst_size = rl.burst_size,
            "per-IP rate limiting enabled"
        );

        GovernorLayer {
            config: Arc::new(gov_config),
        }
    });
    if governor_layer.is_none() {
        tracing::info!("per-IP rate limiting disabled (no [server.rate_limit] in config)");
    }

    // ── Router ───────────────────────────────────────────────────────
    let frontend_dir = config.server.frontend_dir.as_path();
    let router = if frontend_dir.exists() {
        let index_html = frontend_dir.join("index.html");
        let frontend = ServeDir::new(frontend_dir).not_found_service(ServeFile::new(index_html));
        api::router().fallback_service(frontend)
    } else {
        tracing::info!(
            dir = %frontend_dir.display(),
            "frontend dir not found — serving API and WebSocket only"
        );
        api::router()
    };
    let router = security_headers(router)
        .layer(cors_layer)
        .layer(tower::limit::ConcurrencyLimitLayer::new(max_concurrent));
    let app = if let Some(gov) = governor_layer {
        router.layer(gov).with_state(state)
    } else {
        router.with_state(state)
    };

    // ── Bind ─────────────────────────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    tracing::info!(addr = %addr, "unibot listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("axum server error")?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        tracing::info!("received SIGINT, shutting down");
    }
}

/// Hardening headers set on every response, API and static frontend
/// alike: no MIME sniffing, no framing.
fn security_headers(
    router: Router<ub_gateway::state::AppState>,
) -> Router<ub_gateway::state::AppState> {
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Build a [`CorsLayer`] from the configured allowed origins.
///
/// Origins may carry a trailing `*` wildcard for the port segment
/// (e.g. `http://localhost:*`), expanded into a predicate matching any
/// port on that host. A literal `"*"` allows all origins.
fn build_cors_layer(cors: &ub_domain::config::CorsConfig) -> CorsLayer {
    // allow_credentials is incompatible with wildcard origins.
    if cors.allowed_origins.len() == 1 && cors.allowed_origins[0] == "*" {
        tracing::warn!("CORS configured with wildcard \"*\" — all origins allowed");
        return CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);
    }

    // Partition into exact origins and wildcard-port patterns.
    let mut exact: Vec<HeaderValue> = Vec::new();
    let mut wildcard_prefixes: Vec<String> = Vec::new();

    for origin in &cors.allowed_origins {
        if origin.ends_with(":*") {
            wildcard_prefixes.push(origin.trim_end_matches('*').to_owned());
        } else if let Ok(hv) = origin.parse::<HeaderValue>() {
            exact.push(hv);
        } else {
            tracing::warn!(origin = %origin, "invalid CORS origin, skipping");
        }
    }

    let allow_origin = if wildcard_prefixes.is_empty() {
        AllowOrigin::list(exact)
    } else {
        AllowOrigin::predicate(move |origin, _| {
            let origin_str = origin.to_str().unwrap_or("");
            if exact.iter().any(|e| e.as_bytes() == origin.as_bytes()) {
                return true;
            }
            wildcard_prefixes.iter().any(|prefix| {
                origin_str
                    .strip_prefix(prefix.as_str())
                    .map(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()))
                    .unwrap_or(false)
            })
        })
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
