#![forbid(unsafe_code)]

use std::env;
use std::time::Duration;

use chrono::{DateTime, Utc};
use url::Url;
use woonactie_contracts::{SubmissionId, SubmissionInput, Validate};

use crate::store::{StoreError, SubmissionRecord, SubmissionStore, FORM_SUBMISSIONS_TABLE};

/// Managed table store client (PostgREST-style API). One logical table,
/// server-assigned ids and timestamps; inserts ask for the created row back
/// via `Prefer: return=representation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestStoreConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl RestStoreConfig {
    pub fn v1(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<RestStoreConfig, StoreError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(StoreError::Config {
                field: "rest_store.base_url",
                reason: "must not be empty",
            });
        }
        let parsed = Url::parse(&base_url).map_err(|_| StoreError::Config {
            field: "rest_store.base_url",
            reason: "must be a valid absolute url",
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(StoreError::Config {
                field: "rest_store.base_url",
                reason: "must use http or https",
            });
        }
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(StoreError::Config {
                field: "rest_store.api_key",
                reason: "must not be empty",
            });
        }
        let table = table.into().trim().to_string();
        if table.is_empty()
            || !table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(StoreError::Config {
                field: "rest_store.table",
                reason: "must be ascii alphanumeric or underscore",
            });
        }
        Ok(RestStoreConfig {
            base_url,
            api_key,
            table,
            connect_timeout_ms: 3_000,
            request_timeout_ms: 10_000,
        })
    }

    pub fn from_env() -> Option<RestStoreConfig> {
        let base_url = env::var("WOONACTIE_STORE_URL").ok()?;
        let api_key = env::var("WOONACTIE_STORE_API_KEY").ok()?;
        let table = env::var("WOONACTIE_STORE_TABLE")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| FORM_SUBMISSIONS_TABLE.to_string());
        let mut config = RestStoreConfig::v1(base_url, api_key, table).ok()?;
        config.connect_timeout_ms = env::var("WOONACTIE_STORE_CONNECT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| (100..=60_000).contains(v))
            .unwrap_or(3_000);
        config.request_timeout_ms = env::var("WOONACTIE_STORE_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| (100..=120_000).contains(v))
            .unwrap_or(10_000);
        Some(config)
    }

    fn table_endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[derive(Debug, Clone)]
pub struct RestSubmissionStore {
    config: RestStoreConfig,
}

impl RestSubmissionStore {
    pub fn new(config: RestStoreConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Option<Self> {
        RestStoreConfig::from_env().map(Self::new)
    }
}

impl SubmissionStore for RestSubmissionStore {
    fn insert(&mut self, input: &SubmissionInput) -> Result<SubmissionRecord, StoreError> {
        input.validate()?;
        let payload = serde_json::to_string(input).map_err(|err| StoreError::Decode {
            detail: format!("submission encode failed: {err}"),
        })?;
        let endpoint = self.config.table_endpoint();
        let agent = build_agent(&self.config);
        let request = agent
            .post(&endpoint)
            .set("content-type", "application/json")
            .set("prefer", "return=representation")
            .set("apikey", &self.config.api_key)
            .set("authorization", &format!("Bearer {}", self.config.api_key));
        match request.send_string(&payload) {
            Ok(resp) => {
                if (200..=299).contains(&resp.status()) {
                    let rows = decode_rows(resp)?;
                    let row = rows.into_iter().next().ok_or_else(|| StoreError::Decode {
                        detail: "insert returned no representation".to_string(),
                    })?;
                    wire_to_record(row)
                } else {
                    Err(StoreError::Http {
                        status: resp.status(),
                        detail: format!("insert failed with http status {}", resp.status()),
                    })
                }
            }
            Err(ureq::Error::Status(code, _)) => Err(StoreError::Http {
                status: code,
                detail: format!("insert failed with http status {code}"),
            }),
            Err(ureq::Error::Transport(err)) => Err(StoreError::Transport {
                detail: format!("insert transport error: {err}"),
            }),
        }
    }

    fn list_all(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        let endpoint = self.config.table_endpoint();
        let agent = build_agent(&self.config);
        let response = agent
            .get(&endpoint)
            .set("Accept", "application/json")
            .set("apikey", &self.config.api_key)
            .set("Authorization", &format!("Bearer {}", self.config.api_key))
            .query("select", "*")
            .query("order", "created_at.desc")
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, _) => StoreError::Http {
                    status: code,
                    detail: format!("list failed with http status {code}"),
                },
                ureq::Error::Transport(err) => StoreError::Transport {
                    detail: format!("list transport error: {err}"),
                },
            })?;
        let rows = decode_rows(response)?;
        rows.into_iter().map(wire_to_record).collect()
    }
}

fn build_agent(config: &RestStoreConfig) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_millis(config.connect_timeout_ms))
        .timeout_read(Duration::from_millis(config.request_timeout_ms))
        .timeout_write(Duration::from_millis(config.request_timeout_ms))
        .build()
}

fn decode_rows(response: ureq::Response) -> Result<Vec<SubmissionRowWire>, StoreError> {
    serde_json::from_reader(response.into_reader()).map_err(|err| StoreError::Decode {
        detail: format!("row decode failed: {err}"),
    })
}

/// Row as the table API returns it. `toevoeging` is a nullable column and
/// `updated_at` is absent on deployments that never update rows.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
struct SubmissionRowWire {
    id: String,
    postcode: String,
    #[serde(rename = "huisnummer")]
    house_number: String,
    #[serde(rename = "toevoeging", default)]
    house_number_suffix: Option<String>,
    #[serde(rename = "oplossing")]
    solution: String,
    #[serde(rename = "naam")]
    full_name: String,
    email: String,
    #[serde(rename = "telefoon")]
    phone: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

fn wire_to_record(row: SubmissionRowWire) -> Result<SubmissionRecord, StoreError> {
    let id = SubmissionId::new(row.id)?;
    let created_at = row.created_at;
    Ok(SubmissionRecord {
        id,
        postcode: row.postcode,
        house_number: row.house_number,
        house_number_suffix: row.house_number_suffix.unwrap_or_default(),
        solution: row.solution,
        full_name: row.full_name,
        email: row.email,
        phone: row.phone,
        created_at,
        updated_at: row.updated_at.unwrap_or(created_at),
    })
}
