#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::Method;
use axum_test::TestServer;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use contact_gateway::application::services::{
    AddressValidator, BotPolicy, BotScoreVerifier, DispatchPipeline, FailureMode, RateGate,
    RateLimiter, TemplateComposer, WebhookRelay,
};
use contact_gateway::config::CorsConfig;
use contact_gateway::domain::entities::{
    ChannelPolicy, PrimaryReport, RateLimitPolicy, SecondaryReport, SiteMetadata,
};
use contact_gateway::domain::errors::{ChannelError, OracleError};
use contact_gateway::domain::ports::{
    BotOracle, BotOracleResponse, BotVerifyRequest, Mailer, OutgoingEmail, PrimaryAddressOracle,
    SecondaryAddressOracle, WebhookTransport,
};
use contact_gateway::infrastructure::channels::{EmailChannel, WebhookChannel};
use contact_gateway::infrastructure::counter::MemoryCounterStore;
use contact_gateway::routes::{ThrottleSettings, app_router};
use contact_gateway::state::AppState;

pub const ALLOWED_ORIGIN: &str = "https://portfolio.example.com";
pub const BOT_ACTION: &str = "contact";

/// Bot oracle answering with a fixed score.
pub struct FakeBotOracle {
    pub score: f64,
    pub calls: AtomicUsize,
}

#[async_trait]
impl BotOracle for FakeBotOracle {
    async fn site_verify(&self, _request: BotVerifyRequest) -> Result<BotOracleResponse, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(BotOracleResponse {
            success: true,
            score: self.score,
            action: BOT_ACTION.to_string(),
            hostname: Some("portfolio.example.com".to_string()),
            error_codes: vec![],
        })
    }
}

/// Primary address oracle. `None` simulates an outage.
pub struct FakePrimaryOracle {
    pub report: Option<PrimaryReport>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl PrimaryAddressOracle for FakePrimaryOracle {
    async fn lookup(&self, _address: &str) -> Result<PrimaryReport, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.report
            .ok_or_else(|| OracleError::Transport("connection refused".to_string()))
    }
}

pub struct FakeSecondaryOracle {
    pub report: Option<SecondaryReport>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl SecondaryAddressOracle for FakeSecondaryOracle {
    async fn lookup(&self, _address: &str) -> Result<SecondaryReport, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.report.ok_or(OracleError::Status(503))
    }
}

/// Mailer that records every message instead of talking SMTP.
#[derive(Default)]
pub struct RecordingMailer {
    pub fail: bool,
    pub sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), ChannelError> {
        if self.fail {
            return Err(ChannelError::Transport("relay refused connection".to_string()));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Webhook transport that records posted bodies.
#[derive(Default)]
pub struct RecordingTransport {
    pub fail: bool,
    pub posted: Mutex<Vec<Bytes>>,
}

#[async_trait]
impl WebhookTransport for RecordingTransport {
    async fn post(&self, body: Bytes) -> Result<(), ChannelError> {
        if self.fail {
            return Err(ChannelError::Rejected(500));
        }
        self.posted.lock().unwrap().push(body);
        Ok(())
    }
}

/// Knobs for [`TestApp::build`].
pub struct TestOptions {
    pub email_policy: RateLimitPolicy,
    pub webhook_policy: RateLimitPolicy,
    pub bot_score: f64,
    pub primary: Option<PrimaryReport>,
    pub secondary: Option<SecondaryReport>,
    pub mail_fails: bool,
    pub webhook_fails: bool,
    pub webhook_configured: bool,
    pub webhook_api_key: Option<String>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            email_policy: RateLimitPolicy::new(10, 60),
            webhook_policy: RateLimitPolicy::new(10, 60),
            bot_score: 0.9,
            primary: Some(PrimaryReport {
                format_valid: true,
                disposable: false,
                smtp_reachable: true,
            }),
            secondary: Some(SecondaryReport {
                is_valid: true,
                is_disposable: false,
            }),
            mail_fails: false,
            webhook_fails: false,
            webhook_configured: true,
            webhook_api_key: None,
        }
    }
}

/// Fully wired application over in-process fakes.
pub struct TestApp {
    pub server: TestServer,
    pub bot: Arc<FakeBotOracle>,
    pub primary: Arc<FakePrimaryOracle>,
    pub secondary: Arc<FakeSecondaryOracle>,
    pub mailer: Arc<RecordingMailer>,
    pub transport: Arc<RecordingTransport>,
}

impl TestApp {
    pub fn build(options: TestOptions) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(Arc::new(MemoryCounterStore::new())));

        let bot = Arc::new(FakeBotOracle {
            score: options.bot_score,
            calls: AtomicUsize::new(0),
        });
        let primary = Arc::new(FakePrimaryOracle {
            report: options.primary,
            calls: AtomicUsize::new(0),
        });
        let secondary = Arc::new(FakeSecondaryOracle {
            report: options.secondary,
            calls: AtomicUsize::new(0),
        });
        let mailer = Arc::new(RecordingMailer {
            fail: options.mail_fails,
            ..Default::default()
        });
        let transport = Arc::new(RecordingTransport {
            fail: options.webhook_fails,
            ..Default::default()
        });

        let site = SiteMetadata::new("Portfolio", "https://portfolio.example.com", 2026);

        let mut pipeline = DispatchPipeline::new(
            RateGate::new(
                rate_limiter.clone(),
                "email",
                options.email_policy,
                FailureMode::Closed,
            ),
            Arc::new(BotScoreVerifier::new(
                bot.clone(),
                Some("test-secret".to_string()),
            )),
            BotPolicy {
                expected_action: BOT_ACTION.to_string(),
                min_score: 0.5,
            },
            Arc::new(AddressValidator::new(primary.clone(), secondary.clone())),
            Arc::new(TemplateComposer::public()),
            site.clone(),
        )
        .with_channel(
            "email",
            ChannelPolicy::Required,
            Arc::new(EmailChannel::new(
                mailer.clone(),
                "noreply@portfolio.example.com",
                "owner@portfolio.example.com",
            )),
        );

        let relay_transport: Option<Arc<dyn WebhookTransport>> = if options.webhook_configured {
            pipeline = pipeline.with_channel(
                "webhook",
                ChannelPolicy::BestEffort,
                Arc::new(WebhookChannel::new(transport.clone())),
            );
            Some(transport.clone())
        } else {
            None
        };

        let relay = WebhookRelay::new(
            RateGate::new(
                rate_limiter.clone(),
                "webhook",
                options.webhook_policy,
                FailureMode::Closed,
            ),
            relay_transport,
            options.webhook_api_key,
        );

        let state = AppState {
            pipeline: Arc::new(pipeline),
            relay: Arc::new(relay),
            preview_renderer: Arc::new(TemplateComposer::preview()),
            rate_limiter,
            cors: Arc::new(CorsConfig::new(
                vec![ALLOWED_ORIGIN.to_string()],
                vec![Method::GET, Method::POST, Method::OPTIONS],
            )),
            site,
            behind_proxy: false,
            debug: false,
        };

        let app = app_router(
            state,
            ThrottleSettings {
                per_second: 1000,
                burst: 1000,
            },
        );

        Self {
            server: TestServer::new(app).unwrap(),
            bot,
            primary,
            secondary,
            mailer,
            transport,
        }
    }

    pub fn bot_calls(&self) -> usize {
        self.bot.calls.load(Ordering::SeqCst)
    }

    pub fn oracle_calls(&self) -> usize {
        self.primary.calls.load(Ordering::SeqCst) + self.secondary.calls.load(Ordering::SeqCst)
    }

    pub fn sent_emails(&self) -> Vec<OutgoingEmail> {
        self.mailer.sent.lock().unwrap().clone()
    }

    pub fn posted_webhooks(&self) -> Vec<Bytes> {
        self.transport.posted.lock().unwrap().clone()
    }
}

pub fn contact_body() -> serde_json::Value {
    serde_json::json!({
        "from": "jane@example.com",
        "subject": "Project inquiry",
        "body": "Hi! I'd like to talk about **a project**.",
        "name": "Jane",
        "recaptchaToken": "03AGdBq2-token"
    })
}
