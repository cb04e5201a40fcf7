//! Reward API client: eligibility check and daily boost claim.
//!
//! Both calls go through the account's own [`HttpClient`] and are wrapped in
//! [`with_retry`]. Neither call returns an error: every failure is folded
//! into [`Eligibility::Failed`] or [`ClaimOutcome::Failed`] with the HTTP
//! status and body attached when the server sent one.

use crate::config::ApiConfig;
use async_trait::async_trait;
use chrono::Utc;
use core_logic::{with_retry, AccountToken, HttpClient, NetworkError, ProxyRoute, RetryConfig};
use reqwest::header::REFERER;
use reqwest::RequestBuilder;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

const SUCCESS_STATUS: &str = "success";

// --- Wire types ---

#[derive(Debug, Clone, Deserialize)]
pub struct RewardsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Option<RewardsData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RewardsData {
    /// Kept undecoded; only the entry being looked up is parsed.
    #[serde(default)]
    pub rewards: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RewardDescriptor {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub can_claim: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub last_claim_timestamp: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub claim_reset_frequency_sec: Option<i64>,
}

impl RewardsResponse {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }

    /// Decodes the first entry whose id matches `reward_id`. Sibling
    /// entries are never decoded, so a malformed one cannot hide it.
    pub fn find(&self, reward_id: &str) -> Option<RewardDescriptor> {
        self.data
            .as_ref()?
            .rewards
            .iter()
            .filter(|entry| entry_id(entry).as_deref() == Some(reward_id))
            .find_map(|entry| RewardDescriptor::deserialize(entry).ok())
    }
}

fn entry_id(entry: &Value) -> Option<String> {
    match entry.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimRequest<'a> {
    pub claims: [&'a str; 1],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reward ids arrive as strings, but accept bare integers too.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer reward id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Strict numeric field: integers and floats only. Booleans, strings and
/// anything else decode to `None`.
fn deserialize_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_any(NumberVisitor {
        accept_strings: false,
    })
}

/// Numeric field that may also arrive as a numeric string.
fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_any(NumberVisitor {
        accept_strings: true,
    })
}

/// Never fails: values of an unexpected type become `None`.
struct NumberVisitor {
    accept_strings: bool,
}

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = Option<i64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number or null")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(i64::try_from(value).ok())
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok((value.is_finite() && value.fract() == 0.0).then_some(value as i64))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if self.accept_strings {
            Ok(value.trim().parse().ok())
        } else {
            Ok(None)
        }
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

// --- Results ---

#[derive(Debug, Clone, PartialEq)]
pub enum Eligibility {
    /// The server flags the reward as claimable right now
    Claimable,
    CoolingDown { remaining: Duration },
    /// Reward missing, fields missing, or cooldown over but not flagged
    NotAvailable,
    Failed { reason: String },
}

impl Eligibility {
    pub fn is_claimable(&self) -> bool {
        matches!(self, Eligibility::Claimable)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    Claimed,
    /// The server answered but refused the claim
    Rejected { message: String },
    Failed {
        reason: String,
        status: Option<u16>,
        body: Option<String>,
    },
}

impl ClaimOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ClaimOutcome::Claimed)
    }
}

/// Renders a wait as `Xh Ym`.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
}

/// Decides eligibility from a reward descriptor. The claimable flag is
/// authoritative; timestamps only explain how long is left.
pub fn evaluate(descriptor: Option<&RewardDescriptor>, now_ms: i64) -> Eligibility {
    let Some(reward) = descriptor else {
        return Eligibility::NotAvailable;
    };

    if reward.can_claim == Some(1) {
        return Eligibility::Claimable;
    }

    match (reward.last_claim_timestamp, reward.claim_reset_frequency_sec) {
        (Some(last), Some(frequency)) if last != 0 && frequency != 0 => {
            let next_available_ms = last.saturating_add(frequency).saturating_mul(1000);
            if next_available_ms > now_ms {
                Eligibility::CoolingDown {
                    remaining: Duration::from_millis((next_available_ms - now_ms) as u64),
                }
            } else {
                Eligibility::NotAvailable
            }
        }
        _ => Eligibility::NotAvailable,
    }
}

// --- Client ---

/// Remote reward operations for a single account.
#[async_trait]
pub trait RewardApi: Send + Sync {
    async fn check(&self, token: &AccountToken) -> Eligibility;

    async fn claim(&self, token: &AccountToken) -> ClaimOutcome;
}

pub struct RewardClient {
    http: HttpClient,
    api: ApiConfig,
    retry: RetryConfig,
}

struct Failure {
    reason: String,
    status: Option<u16>,
    body: Option<String>,
}

impl Failure {
    fn from_error(err: &anyhow::Error) -> Self {
        let network = err.downcast_ref::<NetworkError>();
        Self {
            reason: format!("{:#}", err),
            status: network.and_then(NetworkError::status_code),
            body: network.and_then(|n| n.body().map(str::to_string)),
        }
    }

    fn describe(&self) -> String {
        match (self.status, &self.body) {
            (Some(status), Some(body)) => {
                format!("{} (Status: {}, Data: {})", self.reason, status, body)
            }
            _ => self.reason.clone(),
        }
    }
}

impl RewardClient {
    pub fn new(http: HttpClient, api: ApiConfig, retry: RetryConfig) -> Self {
        Self { http, api, retry }
    }

    pub fn route(&self) -> &ProxyRoute {
        self.http.route()
    }

    /// Sends a request built by `build`, retrying transport errors and
    /// non-2xx responses. Returns the response body.
    async fn send<F>(&self, operation: &str, endpoint: &str, build: F) -> anyhow::Result<String>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder,
    {
        with_retry(self.retry, operation, || {
            let request = build(self.http.inner());
            let endpoint = endpoint.to_string();
            async move {
                let response = request
                    .send()
                    .await
                    .map_err(|e| NetworkError::from_reqwest(&endpoint, &e))?;

                let status = response.status();
                let body = response
                    .text()
                    .await
                    .map_err(|e| NetworkError::from_reqwest(&endpoint, &e))?;

                if !status.is_success() {
                    return Err(NetworkError::HttpError {
                        status_code: status.as_u16(),
                        endpoint,
                        body,
                    }
                    .into());
                }

                Ok(body)
            }
        })
        .await
    }
}

#[async_trait]
impl RewardApi for RewardClient {
    async fn check(&self, token: &AccountToken) -> Eligibility {
        let url = self.api.rewards_url.as_str();
        let body = match self
            .send("check rewards", url, |client| {
                client
                    .get(url)
                    .header("authorization", token.expose())
                    .header(REFERER, self.api.referer.as_str())
            })
            .await
        {
            Ok(body) => body,
            Err(e) => {
                return Eligibility::Failed {
                    reason: Failure::from_error(&e).describe(),
                }
            }
        };

        let response: RewardsResponse = match serde_json::from_str(&body) {
            Ok(response) => response,
            Err(e) => {
                let err = NetworkError::InvalidResponse {
                    endpoint: url.to_string(),
                    reason: e.to_string(),
                };
                return Eligibility::Failed {
                    reason: format!("{} (Data: {})", err, body),
                };
            }
        };

        if !response.is_success() {
            return Eligibility::Failed {
                reason: format!("Unexpected rewards status '{}'", response.status),
            };
        }

        evaluate(
            response.find(&self.api.daily_boost_id).as_ref(),
            Utc::now().timestamp_millis(),
        )
    }

    async fn claim(&self, token: &AccountToken) -> ClaimOutcome {
        let url = self.api.claim_url.as_str();
        let payload = ClaimRequest {
            claims: [self.api.daily_boost_id.as_str()],
        };

        let body = match self
            .send("claim daily boost", url, |client| {
                client
                    .post(url)
                    .header("authorization", token.expose())
                    .header(REFERER, self.api.referer.as_str())
                    .json(&payload)
            })
            .await
        {
            Ok(body) => body,
            Err(e) => {
                let failure = Failure::from_error(&e);
                return ClaimOutcome::Failed {
                    reason: failure.reason,
                    status: failure.status,
                    body: failure.body,
                };
            }
        };

        match serde_json::from_str::<ClaimResponse>(&body) {
            Ok(response) if response.status == SUCCESS_STATUS => ClaimOutcome::Claimed,
            Ok(response) => ClaimOutcome::Rejected {
                message: response
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Unknown error".to_string()),
            },
            Err(e) => ClaimOutcome::Failed {
                reason: NetworkError::InvalidResponse {
                    endpoint: url.to_string(),
                    reason: e.to_string(),
                }
                .to_string(),
                status: None,
                body: Some(body),
            },
        }
    }
}
