use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

/// What the messaging subsystem knows about a candidate's reply behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponsivenessSignal {
    /// Historical reply rate in [0, 1].
    Rate(f64),
    /// The candidate has never received a message.
    NoHistory,
    /// The lookup failed or timed out; scoring degrades, never fails.
    Unavailable,
}

/// Injectable source for the reply-rate signal so the scoring term can be
/// swapped (rule-based today, a learned predictor tomorrow) and mocked in
/// tests.
#[async_trait]
pub trait ResponsivenessSource: Send + Sync {
    async fn reply_rate(&self, user_id: &str) -> ResponsivenessSignal;
}

/// Live source: GET {base}/users/{id}/reply-rate on the messaging service.
pub struct HttpResponsivenessSource {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ReplyRateBody {
    reply_rate: Option<f64>,
}

impl HttpResponsivenessSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        HttpResponsivenessSource {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ResponsivenessSource for HttpResponsivenessSource {
    async fn reply_rate(&self, user_id: &str) -> ResponsivenessSignal {
        let url = format!(
            "{}/users/{}/reply-rate",
            self.base_url.trim_end_matches('/'),
            user_id
        );
        let resp = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("responsiveness lookup failed for {}: {}", user_id, e);
                return ResponsivenessSignal::Unavailable;
            }
        };
        if !resp.status().is_success() {
            warn!(
                "responsiveness lookup for {} returned {}",
                user_id,
                resp.status()
            );
            return ResponsivenessSignal::Unavailable;
        }
        match resp.json::<ReplyRateBody>().await {
            Ok(ReplyRateBody {
                reply_rate: Some(rate),
            }) => ResponsivenessSignal::Rate(rate),
            Ok(ReplyRateBody { reply_rate: None }) => ResponsivenessSignal::NoHistory,
            Err(e) => {
                warn!("undecodable responsiveness body for {}: {}", user_id, e);
                ResponsivenessSignal::Unavailable
            }
        }
    }
}

/// Fixed in-memory source for tests and for running without a messaging
/// backend; unknown users read as no-history.
#[derive(Debug, Default)]
pub struct StaticResponsivenessSource {
    rates: HashMap<String, f64>,
}

impl StaticResponsivenessSource {
    pub fn new(rates: HashMap<String, f64>) -> Self {
        StaticResponsivenessSource { rates }
    }
}

#[async_trait]
impl ResponsivenessSource for StaticResponsivenessSource {
    async fn reply_rate(&self, user_id: &str) -> ResponsivenessSignal {
        match self.rates.get(user_id) {
            Some(rate) => ResponsivenessSignal::Rate(*rate),
            None => ResponsivenessSignal::NoHistory,
        }
    }
}

/// MESSAGING_API_URL selects the live source; without it every candidate
/// scores on the no-history default.
pub fn from_env(timeout: Duration) -> Arc<dyn ResponsivenessSource> {
    match env::var("MESSAGING_API_URL") {
        Ok(url) if !url.trim().is_empty() => Arc::new(HttpResponsivenessSource::new(url, timeout)),
        _ => Arc::new(StaticResponsivenessSource::default()),
    }
}
