use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::atomic::{AtomicU64, Ordering},
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use thiserror::Error;
use tokio::{sync::Mutex, time::Instant};
use tower_http::services::{ServeDir, ServeFile};
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RELAY_TIMEOUT_MS: u64 = 6_000;
const DEFAULT_RATE_LIMIT_MAX: usize = 5;
const DEFAULT_RATE_LIMIT_WINDOW_SECONDS: u64 = 15 * 60;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const RELAY_TIMEOUT_MS_BOUNDS: (u64, u64) = (100, 60_000);
const RATE_LIMIT_MAX_BOUNDS: (usize, usize) = (1, 100);
const RATE_LIMIT_WINDOW_SECONDS_BOUNDS: (u64, u64) = (1, 86_400);

const MAX_NAME_CHARS: usize = 100;
/// Bytes, not chars: the SMTP path limit counts octets.
const MAX_EMAIL_BYTES: usize = 254;
const MAX_SUBJECT_CHARS: usize = 200;
const MAX_MESSAGE_CHARS: usize = 5_000;
const RATE_LIMIT_PURGE_THRESHOLD: usize = 1_024;

const SUBJECT_PREFIX: &str = "[Portfolio] ";
const USER_AGENT: &str = "portfolio-contact/1.0";
const REQUEST_ID_HEADER: &str = "x-request-id";
const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
const SUCCESS_MESSAGE: &str = "Message sent! I'll get back to you soon.";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
        }
    }
}

#[derive(Clone, Debug)]
struct ContactRuntimeConfig {
    port: u16,
    relay_url: Option<Url>,
    relay_token: Option<String>,
    recipient: Option<String>,
    sender: Option<String>,
    relay_timeout: Duration,
    rate_limit_max: usize,
    rate_limit_window: Duration,
    log_level: LogLevel,
}

impl ContactRuntimeConfig {
    fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let relay_timeout_ms = parse_env_u64_with_bounds(
            "MAIL_RELAY_TIMEOUT_MS",
            DEFAULT_RELAY_TIMEOUT_MS,
            RELAY_TIMEOUT_MS_BOUNDS,
        );
        let rate_limit_max = parse_env_usize_with_bounds(
            "CONTACT_RATE_LIMIT_MAX",
            DEFAULT_RATE_LIMIT_MAX,
            RATE_LIMIT_MAX_BOUNDS,
        );
        let rate_limit_window_seconds = parse_env_u64_with_bounds(
            "CONTACT_RATE_LIMIT_WINDOW_SECONDS",
            DEFAULT_RATE_LIMIT_WINDOW_SECONDS,
            RATE_LIMIT_WINDOW_SECONDS_BOUNDS,
        );

        Self {
            port,
            relay_url: parse_env_http_url("MAIL_RELAY_URL"),
            relay_token: parse_env_non_empty_string("MAIL_RELAY_TOKEN"),
            recipient: parse_env_non_empty_string("CONTACT_RECIPIENT"),
            sender: parse_env_non_empty_string("CONTACT_FROM"),
            relay_timeout: Duration::from_millis(relay_timeout_ms),
            rate_limit_max,
            rate_limit_window: Duration::from_secs(rate_limit_window_seconds),
            log_level: parse_log_level("LOG_LEVEL", DEFAULT_LOG_LEVEL),
        }
    }

    fn relay(&self) -> Option<RelayTarget<'_>> {
        Some(RelayTarget {
            url: self.relay_url.as_ref()?,
            token: self.relay_token.as_deref(),
            recipient: self.recipient.as_deref()?,
            sender: self.sender.as_deref()?,
        })
    }
}

struct RelayTarget<'a> {
    url: &'a Url,
    token: Option<&'a str>,
    recipient: &'a str,
    sender: &'a str,
}

struct RateWindow {
    count: usize,
    resets_at: Instant,
}

/// Fixed-window counter per client key.
struct RateLimiter {
    max_requests: usize,
    window: Duration,
    windows: HashMap<String, RateWindow>,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: HashMap::new(),
        }
    }

    fn try_acquire(&mut self, key: &str, now: Instant) -> bool {
        if self.windows.len() >= RATE_LIMIT_PURGE_THRESHOLD {
            self.windows.retain(|_, window| window.resets_at > now);
        }

        match self.windows.get_mut(key) {
            Some(window) if now < window.resets_at => {
                if window.count >= self.max_requests {
                    return false;
                }
                window.count += 1;
                true
            }
            _ => {
                self.windows.insert(
                    key.to_string(),
                    RateWindow {
                        count: 1,
                        resets_at: now + self.window,
                    },
                );
                true
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<ContactRuntimeConfig>,
    limiter: Arc<Mutex<RateLimiter>>,
    client: reqwest::Client,
}

impl AppState {
    fn new(config: ContactRuntimeConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.relay_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        let limiter = RateLimiter::new(config.rate_limit_max, config.rate_limit_window);

        Ok(Self {
            config: Arc::new(config),
            limiter: Arc::new(Mutex::new(limiter)),
            client,
        })
    }
}

#[derive(Debug, Error)]
enum ContactError {
    #[error("invalid request body")]
    MalformedBody,
    #[error("all fields are required")]
    MissingFields,
    #[error("invalid email format")]
    InvalidEmail,
    #[error("`{field}` must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("too many messages")]
    RateLimited,
    #[error("mail relay is not configured")]
    NotConfigured,
    #[error("mail relay failed: {0}")]
    Relay(String),
}

impl ContactError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody
            | Self::MissingFields
            | Self::InvalidEmail
            | Self::FieldTooLong { .. } => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Relay(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_class(&self) -> &'static str {
        match self {
            Self::MalformedBody => "malformed_body",
            Self::MissingFields => "missing_fields",
            Self::InvalidEmail => "invalid_email",
            Self::FieldTooLong { .. } => "field_too_long",
            Self::RateLimited => "rate_limited",
            Self::NotConfigured => "config_missing",
            Self::Relay(_) => "relay_failed",
        }
    }

    /// What the visitor sees; server-side detail stays in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::MalformedBody => "Invalid request body.".to_string(),
            Self::MissingFields => "All fields are required.".to_string(),
            Self::InvalidEmail => "Invalid email format.".to_string(),
            Self::FieldTooLong { field, max } => {
                format!("The {field} field must be at most {max} characters.")
            }
            Self::RateLimited => "Too many messages. Please try again later.".to_string(),
            Self::NotConfigured => {
                "Server configuration error. Please contact the administrator.".to_string()
            }
            Self::Relay(_) => {
                "Unable to send your message right now. Please try again later.".to_string()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ContactRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, PartialEq)]
struct ContactSubmission {
    name: String,
    email: String,
    subject: String,
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContactPayload {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ContactPayload {
    fn sent() -> Self {
        Self {
            success: true,
            message: Some(SUCCESS_MESSAGE.to_string()),
            error: None,
        }
    }

    fn failed(error: &ContactError) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.public_message()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutboundEmail {
    from: String,
    to: String,
    reply_to: String,
    subject: String,
    text: String,
    html: String,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ContactRuntimeConfig::from_env();
    init_tracing(config.log_level);

    let bind_address = format!("0.0.0.0:{}", config.port);
    if config.relay().is_none() {
        tracing::warn!(
            event = "relay_unconfigured",
            "MAIL_RELAY_URL, CONTACT_RECIPIENT and CONTACT_FROM are required to deliver contact messages"
        );
    }
    let state = AppState::new(config)?;

    let static_service = ServeDir::new("dist").not_found_service(ServeFile::new("dist/index.html"));

    let app = Router::new()
        .route(
            "/api/contact",
            post(submit_contact).options(contact_preflight),
        )
        .fallback_service(static_service)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(event = "server_listening", address = %bind_address);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .try_init();
}

async fn submit_contact(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> axum::response::Response {
    let request_started_at = Instant::now();
    let request_id = resolve_request_id(&headers);
    let client = client_key(&headers, peer);

    tracing::info!(
        event = "contact_request_start",
        request_id = %request_id,
        client = %client,
    );

    match handle_contact(&state, &client, &request_id, body).await {
        Ok(()) => {
            tracing::info!(
                event = "contact_request_complete",
                request_id = %request_id,
                status = StatusCode::OK.as_u16(),
                duration_ms = request_started_at.elapsed().as_millis() as u64,
            );
            json_response(StatusCode::OK, ContactPayload::sent(), &request_id)
        }
        Err(error) => {
            let status = error.status();
            tracing::info!(
                event = "contact_request_failed",
                request_id = %request_id,
                status = status.as_u16(),
                error_class = error.error_class(),
                detail = %error,
                duration_ms = request_started_at.elapsed().as_millis() as u64,
            );
            json_response(status, ContactPayload::failed(&error), &request_id)
        }
    }
}

async fn handle_contact(
    state: &AppState,
    client: &str,
    request_id: &str,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<(), ContactError> {
    if !state
        .limiter
        .lock()
        .await
        .try_acquire(client, Instant::now())
    {
        return Err(ContactError::RateLimited);
    }

    let Json(request) = body.map_err(|_| ContactError::MalformedBody)?;
    let submission = validate_submission(request)?;
    let relay = state.config.relay().ok_or(ContactError::NotConfigured)?;

    let email = compose_email(&submission, &relay, &chrono::Utc::now().to_rfc3339(), client);
    deliver(&state.client, &relay, &email, request_id).await?;

    tracing::debug!(
        event = "contact_relayed",
        request_id = %request_id,
        subject_chars = submission.subject.chars().count(),
        message_chars = submission.message.chars().count(),
    );
    Ok(())
}

async fn contact_preflight() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    (StatusCode::OK, headers)
}

fn validate_submission(request: ContactRequest) -> Result<ContactSubmission, ContactError> {
    let submission = ContactSubmission {
        name: sanitize_line(&request.name),
        email: sanitize_line(&request.email),
        subject: sanitize_line(&request.subject),
        message: request.message.trim().to_string(),
    };

    if submission.name.is_empty()
        || submission.email.is_empty()
        || submission.subject.is_empty()
        || submission.message.is_empty()
    {
        return Err(ContactError::MissingFields);
    }

    if !is_valid_email(&submission.email) {
        return Err(ContactError::InvalidEmail);
    }

    for (field, value, max) in [
        ("name", &submission.name, MAX_NAME_CHARS),
        ("subject", &submission.subject, MAX_SUBJECT_CHARS),
        ("message", &submission.message, MAX_MESSAGE_CHARS),
    ] {
        if value.chars().count() > max {
            return Err(ContactError::FieldTooLong { field, max });
        }
    }

    Ok(submission)
}

/// Single-line fields end up in mail headers; control whitespace becomes a
/// plain space.
fn sanitize_line(value: &str) -> String {
    value
        .chars()
        .map(|ch| if matches!(ch, '\r' | '\n' | '\t') { ' ' } else { ch })
        .collect::<String>()
        .trim()
        .to_string()
}

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain.
fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_BYTES || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn compose_email(
    submission: &ContactSubmission,
    relay: &RelayTarget<'_>,
    timestamp: &str,
    client: &str,
) -> OutboundEmail {
    let text = format!(
        "New message from portfolio contact form\n\nName: {}\nEmail: {}\nSubject: {}\nTimestamp: {timestamp}\nClient: {client}\n\nMessage:\n{}",
        submission.name, submission.email, submission.subject, submission.message,
    );

    let row = |label: &str, value: &str| {
        format!(
            "<tr><td style=\"padding: 8px 0; font-weight: bold; color: #555;\">{label}:</td><td style=\"padding: 8px 0;\">{}</td></tr>",
            escape_html(value)
        )
    };
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;\">\
<h2 style=\"color: #333;\">New Portfolio Contact Form Submission</h2>\
<table style=\"width: 100%; border-collapse: collapse;\">{}{}{}{}{}</table>\
<h3 style=\"color: #333;\">Message:</h3>\
<div style=\"padding: 20px; border: 1px solid #ddd; border-radius: 8px; white-space: pre-wrap;\">{}</div>\
</div>",
        row("Name", &submission.name),
        row("Email", &submission.email),
        row("Subject", &submission.subject),
        row("Timestamp", timestamp),
        row("Client", client),
        escape_html(&submission.message),
    );

    OutboundEmail {
        from: relay.sender.to_string(),
        to: relay.recipient.to_string(),
        reply_to: format!("{} <{}>", submission.name, submission.email),
        subject: format!("{SUBJECT_PREFIX}{}", submission.subject),
        text,
        html,
    }
}

async fn deliver(
    client: &reqwest::Client,
    relay: &RelayTarget<'_>,
    email: &OutboundEmail,
    request_id: &str,
) -> Result<(), ContactError> {
    let mut request = client
        .post(relay.url.clone())
        .header(REQUEST_ID_HEADER, request_id)
        .json(email);
    if let Some(token) = relay.token {
        request = request.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = request
        .send()
        .await
        .map_err(|error| ContactError::Relay(error.to_string()))?;

    if !response.status().is_success() {
        return Err(ContactError::Relay(format!(
            "relay responded with {}",
            response.status().as_u16()
        )));
    }

    Ok(())
}

fn json_response(
    status: StatusCode,
    payload: ContactPayload,
    request_id: &str,
) -> axum::response::Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if let Ok(request_id_header) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, request_id_header);
    }
    (status, headers, Json(payload)).into_response()
}

fn client_key(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}

fn parse_env_u64_with_bounds(name: &str, default: u64, bounds: (u64, u64)) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_env_usize_with_bounds(name: &str, default: usize, bounds: (usize, usize)) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_env_non_empty_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env_http_url(name: &str) -> Option<Url> {
    let value = parse_env_non_empty_string(name)?;
    let parsed = Url::parse(&value).ok()?;

    if parsed.scheme() == "http" || parsed.scheme() == "https" {
        Some(parsed)
    } else {
        None
    }
}

fn parse_log_level(name: &str, default: LogLevel) -> LogLevel {
    match parse_env_non_empty_string(name)
        .unwrap_or_else(|| default.as_str().to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        _ => default,
    }
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    let value = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    value.unwrap_or_else(generate_request_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEER: &str = "203.0.113.9:51000";

    fn test_runtime_config() -> ContactRuntimeConfig {
        ContactRuntimeConfig {
            port: DEFAULT_PORT,
            relay_url: None,
            relay_token: None,
            recipient: None,
            sender: None,
            relay_timeout: Duration::from_millis(500),
            rate_limit_max: DEFAULT_RATE_LIMIT_MAX,
            rate_limit_window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECONDS),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }

    fn relayed_config(url: &str) -> ContactRuntimeConfig {
        ContactRuntimeConfig {
            relay_url: Some(Url::parse(url).expect("valid URL")),
            relay_token: Some("token".to_string()),
            recipient: Some("owner@example.com".to_string()),
            sender: Some("site@example.com".to_string()),
            ..test_runtime_config()
        }
    }

    fn request(name: &str, email: &str, subject: &str, message: &str) -> ContactRequest {
        ContactRequest {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        }
    }

    fn valid_request() -> ContactRequest {
        request("Ada", "ada@example.com", "Hello", "Line one\nLine two")
    }

    async fn send_contact(
        state: &AppState,
        headers: HeaderMap,
        body: ContactRequest,
    ) -> (StatusCode, HeaderMap, serde_json::Value) {
        let response = submit_contact(
            State(state.clone()),
            ConnectInfo(PEER.parse().expect("valid socket address")),
            headers,
            Ok(Json(body)),
        )
        .await;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = serde_json::from_slice(&bytes).expect("json body");
        (status, headers, json)
    }

    #[test]
    fn email_validation_matches_simple_address_shape() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada@.com"));
        assert!(!is_valid_email("ada@example."));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada lovelace@example.com"));
        assert!(!is_valid_email(&format!("{}@example.com", "a".repeat(250))));
    }

    #[test]
    fn email_length_limit_counts_bytes() {
        // 121 two-byte chars plus the domain: 253 bytes but only 132 chars.
        let near_limit = format!("{}@example.io", "é".repeat(121));
        assert_eq!(near_limit.len(), 253);
        assert!(is_valid_email(&near_limit));

        let over_limit = format!("{}@example.io", "é".repeat(122));
        assert!(over_limit.chars().count() < MAX_EMAIL_BYTES);
        assert!(!is_valid_email(&over_limit));
    }

    #[test]
    fn single_line_fields_lose_control_whitespace() {
        let submission = validate_submission(request(
            "Ada\r\nBcc: victim@example.com",
            " ada@example.com ",
            "Hi\tthere",
            "  keep\nnewlines  ",
        ))
        .expect("valid submission");

        assert_eq!(submission.name, "Ada  Bcc: victim@example.com");
        assert_eq!(submission.email, "ada@example.com");
        assert_eq!(submission.subject, "Hi there");
        assert_eq!(submission.message, "keep\nnewlines");
    }

    #[test]
    fn validation_rejects_blank_and_oversized_fields() {
        assert!(matches!(
            validate_submission(request("Ada", "ada@example.com", "   ", "hi")),
            Err(ContactError::MissingFields)
        ));
        assert!(matches!(
            validate_submission(request("Ada", "not-an-email", "Hi", "hi")),
            Err(ContactError::InvalidEmail)
        ));
        assert!(matches!(
            validate_submission(request(&"n".repeat(101), "ada@example.com", "Hi", "hi")),
            Err(ContactError::FieldTooLong { field: "name", max: 100 })
        ));
    }

    #[test]
    fn composed_email_escapes_html_and_prefixes_subject() {
        let config = relayed_config("https://relay.example.com/send");
        let relay = config.relay().expect("relay configured");
        let submission = ContactSubmission {
            name: "<b>Ada</b>".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hello & welcome".to_string(),
            message: "<script>alert(1)</script>".to_string(),
        };

        let email = compose_email(&submission, &relay, "2026-01-01T00:00:00+00:00", "203.0.113.9");

        assert_eq!(email.subject, "[Portfolio] Hello & welcome");
        assert_eq!(email.to, "owner@example.com");
        assert_eq!(email.reply_to, "<b>Ada</b> <ada@example.com>");
        assert!(email.html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(email.html.contains("Hello &amp; welcome"));
        assert!(!email.html.contains("<script>"));
        assert!(email.text.contains("Message:\n<script>alert(1)</script>"));
    }

    #[test]
    fn rate_limiter_resets_after_window() {
        let mut limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.try_acquire("client", now));
        assert!(limiter.try_acquire("client", now));
        assert!(!limiter.try_acquire("client", now + Duration::from_secs(10)));
        assert!(limiter.try_acquire("other", now));
        assert!(limiter.try_acquire("client", now + Duration::from_secs(61)));
    }

    #[test]
    fn client_key_prefers_first_forwarded_hop() {
        let peer: SocketAddr = PEER.parse().expect("valid socket address");
        let mut headers = HeaderMap::new();
        assert_eq!(client_key(&headers, peer), "203.0.113.9");

        headers.insert(
            FORWARDED_FOR_HEADER,
            HeaderValue::from_static(" 198.51.100.4 , 10.0.0.1"),
        );
        assert_eq!(client_key(&headers, peer), "198.51.100.4");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_with_request_id() {
        let state = AppState::new(test_runtime_config()).expect("client builds");
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-test-1"));

        let (status, response_headers, body) =
            send_contact(&state, headers, request("Ada", "", "Hi", "hello")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response_headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()),
            Some("req-test-1")
        );
        assert_eq!(
            response_headers.get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "All fields are required.");
    }

    #[tokio::test]
    async fn unconfigured_relay_returns_server_error() {
        let state = AppState::new(test_runtime_config()).expect("client builds");

        let (status, _, body) = send_contact(&state, HeaderMap::new(), valid_request()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn repeated_submissions_are_rate_limited() {
        let state = AppState::new(ContactRuntimeConfig {
            rate_limit_max: 2,
            ..test_runtime_config()
        })
        .expect("client builds");

        for _ in 0..2 {
            let (status, _, _) = send_contact(&state, HeaderMap::new(), valid_request()).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        }

        let (status, _, body) = send_contact(&state, HeaderMap::new(), valid_request()).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "Too many messages. Please try again later.");
    }

    #[tokio::test]
    async fn unreachable_relay_maps_to_bad_gateway() {
        let state = AppState::new(relayed_config("http://127.0.0.1:9/send")).expect("client builds");

        let (status, _, body) = send_contact(&state, HeaderMap::new(), valid_request()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            body["error"],
            "Unable to send your message right now. Please try again later."
        );
    }

    #[tokio::test]
    async fn preflight_allows_post() {
        let response = contact_preflight().await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_METHODS)
                .and_then(|v| v.to_str().ok()),
            Some("POST, OPTIONS")
        );
    }
}
