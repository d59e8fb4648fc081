#![forbid(unsafe_code)]

use std::env;
use std::time::Duration;

use woonactie_contracts::LeadForm;

/// Delivery receipt for one webhook post. Informational only; nothing in the
/// funnel branches on its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyAck {
    pub remote_ack_ref: Option<String>,
}

/// Best-effort failure. Terminal where it occurs: callers record it and move
/// on, there is no retry schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    Encode { detail: String },
    Http { status: u16, detail: String },
    Transport { detail: String },
}

impl NotifyError {
    /// Short text for the audit trail.
    pub fn summary(&self) -> String {
        match self {
            NotifyError::Encode { detail } => format!("encode: {detail}"),
            NotifyError::Http { status, detail } => format!("http {status}: {detail}"),
            NotifyError::Transport { detail } => format!("transport: {detail}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookHttpConfig {
    pub endpoint: String,
    pub bearer_token: Option<String>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl WebhookHttpConfig {
    pub fn from_env() -> Option<Self> {
        let endpoint = env::var("WOONACTIE_WEBHOOK_URL").ok()?;
        let endpoint = endpoint.trim().to_string();
        if endpoint.is_empty() {
            return None;
        }
        let bearer_token = env::var("WOONACTIE_WEBHOOK_BEARER").ok().and_then(|v| {
            let s = v.trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        });
        let connect_timeout_ms = env::var("WOONACTIE_WEBHOOK_CONNECT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| (100..=60_000).contains(v))
            .unwrap_or(3_000);
        let request_timeout_ms = env::var("WOONACTIE_WEBHOOK_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| (100..=120_000).contains(v))
            .unwrap_or(10_000);

        Some(Self {
            endpoint,
            bearer_token,
            connect_timeout_ms,
            request_timeout_ms,
        })
    }
}

/// Secondary write target. The payload is the full form snapshot with the
/// Dutch wire keys; delivery failures never propagate past the caller's
/// audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookNotifierRuntime {
    LoopbackAck,
    Http(WebhookHttpConfig),
    AlwaysFail { message: String },
}

impl Default for WebhookNotifierRuntime {
    fn default() -> Self {
        Self::from_env_or_loopback()
    }
}

impl WebhookNotifierRuntime {
    pub fn from_env_or_loopback() -> Self {
        if let Some(config) = WebhookHttpConfig::from_env() {
            return Self::Http(config);
        }
        Self::LoopbackAck
    }

    #[cfg(test)]
    pub fn always_fail_for_tests(message: &str) -> Self {
        Self::AlwaysFail {
            message: message.to_string(),
        }
    }

    pub fn notify(&self, form: &LeadForm) -> Result<NotifyAck, NotifyError> {
        match self {
            Self::LoopbackAck => Ok(NotifyAck {
                remote_ack_ref: Some("loopback_ack".to_string()),
            }),
            Self::AlwaysFail { message } => Err(NotifyError::Transport {
                detail: message.clone(),
            }),
            Self::Http(config) => post_lead_webhook(config, form),
        }
    }
}

fn post_lead_webhook(
    config: &WebhookHttpConfig,
    form: &LeadForm,
) -> Result<NotifyAck, NotifyError> {
    let payload = serde_json::to_string(form).map_err(|err| NotifyError::Encode {
        detail: format!("webhook payload encode failed: {err}"),
    })?;
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_millis(config.connect_timeout_ms))
        .timeout_read(Duration::from_millis(config.request_timeout_ms))
        .timeout_write(Duration::from_millis(config.request_timeout_ms))
        .build();
    let mut req = agent
        .post(&config.endpoint)
        .set("content-type", "application/json");
    if let Some(token) = config.bearer_token.as_ref() {
        req = req.set("authorization", &format!("Bearer {}", token));
    }
    match req.send_string(&payload) {
        Ok(resp) => {
            if (200..=299).contains(&resp.status()) {
                Ok(NotifyAck {
                    remote_ack_ref: Some(format!("http:{}", resp.status())),
                })
            } else {
                Err(NotifyError::Http {
                    status: resp.status(),
                    detail: format!("webhook failed with http status {}", resp.status()),
                })
            }
        }
        Err(ureq::Error::Status(code, _)) => Err(NotifyError::Http {
            status: code,
            detail: format!("webhook failed with http status {code}"),
        }),
        Err(ureq::Error::Transport(err)) => Err(NotifyError::Transport {
            detail: format!("webhook transport error: {err}"),
        }),
    }
}
