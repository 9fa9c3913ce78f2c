//! HTTP server initialization and runtime setup.
//!
//! Wires the counter store, oracles, channels and services from [`Config`], then
//! runs the Axum server until a shutdown signal arrives.

use crate::application::services::{
    AddressValidator, BotPolicy, BotScoreVerifier, DispatchPipeline, RateGate, RateLimiter,
    TemplateComposer, WebhookRelay,
};
use crate::config::Config;
use crate::domain::entities::{ChannelPolicy, SiteMetadata};
use crate::domain::ports::{CounterStore, WebhookTransport};
use crate::infrastructure::channels::{DiscordTransport, EmailChannel, SmtpMailer, WebhookChannel};
use crate::infrastructure::counter::{MemoryCounterStore, RedisCounterStore};
use crate::infrastructure::oracles::{
    PrimaryEmailOracle, RecaptchaOracle, SecondaryEmailOracle, http_client,
};
use crate::routes::{ThrottleSettings, app_router};
use crate::state::AppState;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;

/// Connects the counter store.
///
/// A configured but unreachable Redis aborts startup. Without Redis, counters are
/// kept in process memory.
///
/// # Errors
///
/// Returns an error if Redis is configured and the connection or PING fails.
pub async fn connect_counter_store(config: &Config) -> Result<Arc<dyn CounterStore>> {
    match &config.redis_url {
        Some(redis_url) => {
            let store = RedisCounterStore::connect(redis_url)
                .await
                .context("Failed to connect to the Redis counter store")?;
            tracing::info!("Rate limit counters: Redis (shared)");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!(
                "REDIS_URL not set: rate limit counters are process-local and not shared between instances"
            );
            Ok(Arc::new(MemoryCounterStore::new()))
        }
    }
}

/// Builds every service and the shared state from configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The counter store cannot be connected
/// - The HTTP client or SMTP transport cannot be built
pub async fn build_state(config: &Config) -> Result<AppState> {
    let store = connect_counter_store(config).await?;
    let rate_limiter = Arc::new(RateLimiter::new(store));
    let failure_mode = config.environment.failure_mode();

    let client = http_client(config.upstream_timeout()).context("Failed to build HTTP client")?;

    let bot_verifier = Arc::new(BotScoreVerifier::new(
        Arc::new(RecaptchaOracle::new(
            client.clone(),
            config.recaptcha.verify_url.clone(),
        )),
        config.recaptcha.secret_key.clone(),
    ));

    let address_validator = Arc::new(AddressValidator::new(
        Arc::new(PrimaryEmailOracle::new(
            client.clone(),
            config.primary_email_oracle.url.clone(),
            config.primary_email_oracle.api_key.clone(),
        )),
        Arc::new(SecondaryEmailOracle::new(
            client.clone(),
            config.secondary_email_oracle.url.clone(),
            config.secondary_email_oracle.api_key.clone(),
        )),
    ));

    let mailer = SmtpMailer::new(
        &config.smtp.host,
        config.smtp.port,
        config.smtp.security,
        config.smtp.credentials(),
        config.upstream_timeout(),
    )
    .context("Failed to build SMTP transport")?;

    let site = SiteMetadata::current(&config.app_name, &config.app_url);

    let mut pipeline = DispatchPipeline::new(
        RateGate::new(
            rate_limiter.clone(),
            "email",
            config.email_rate_limit.policy(),
            failure_mode,
        ),
        bot_verifier,
        BotPolicy {
            expected_action: config.recaptcha.action.clone(),
            min_score: config.recaptcha.min_score,
        },
        address_validator,
        Arc::new(TemplateComposer::public()),
        site.clone(),
    )
    .with_channel(
        "email",
        ChannelPolicy::Required,
        Arc::new(EmailChannel::new(
            Arc::new(mailer),
            config.smtp.from.clone(),
            config.smtp.to.clone(),
        )),
    );

    let webhook_transport: Option<Arc<dyn WebhookTransport>> =
        config.webhook.url.as_ref().map(|url| {
            Arc::new(DiscordTransport::new(client.clone(), url.clone())) as Arc<dyn WebhookTransport>
        });

    match &webhook_transport {
        Some(transport) => {
            pipeline = pipeline.with_channel(
                "webhook",
                config.webhook.policy,
                Arc::new(WebhookChannel::new(transport.clone())),
            );
        }
        None => tracing::warn!("DISCORD_WEBHOOK_URL not set: webhook channel and relay disabled"),
    }

    let relay = WebhookRelay::new(
        RateGate::new(
            rate_limiter.clone(),
            "webhook",
            config.webhook_rate_limit.policy(),
            failure_mode,
        ),
        webhook_transport,
        config.webhook.api_key.clone(),
    );

    Ok(AppState {
        pipeline: Arc::new(pipeline),
        relay: Arc::new(relay),
        preview_renderer: Arc::new(TemplateComposer::preview()),
        rate_limiter,
        cors: Arc::new(config.cors.clone()),
        site,
        behind_proxy: config.behind_proxy,
        debug: config.debug,
    })
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - State construction fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    let app = app_router(
        state,
        ThrottleSettings {
            per_second: config.global_rate_per_second,
            burst: config.global_burst,
        },
    );

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
