// SPDX-License-Identifier: MIT
//! Vehicle data lookups.
//!
//! The product needs a VIN decoder next to the maintenance planner. This
//! module is a stateless proxy in front of the NHTSA vPIC API: validate the
//! VIN, consult the TTL memo table, and only then make the upstream call
//! (with retry). The [`VinProvider`] trait is the seam — tests swap the
//! HTTP-backed [`VpicProvider`] for a stub.

pub mod cache;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::retry::RetryPolicy;
use cache::TtlCache;

/// 17 characters, alphanumeric minus I/O/Q (ambiguous glyphs are excluded
/// from the VIN alphabet).
static VIN_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-HJ-NPR-Z0-9]{17}$").expect("VIN regex is valid"));

/// Errors from the vehicle-data layer.
#[derive(Debug, Error)]
pub enum VehicleDataError {
    #[error("invalid VIN: expected 17 alphanumeric characters (no I, O, or Q)")]
    InvalidVin,
    #[error("vehicle data upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("vehicle data response had no decodable result")]
    Decode,
}

/// A decoded vehicle identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub vin: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub model_year: Option<String>,
    pub vehicle_type: Option<String>,
    /// RFC 3339 timestamp of when the upstream decode happened.
    pub decoded_at: String,
}

/// Seam between the service and the concrete upstream decoder.
#[async_trait]
pub trait VinProvider: Send + Sync {
    /// Decode a pre-validated, normalized VIN.
    async fn decode(&self, vin: &str) -> Result<VehicleProfile, VehicleDataError>;
}

// ─── vPIC provider ────────────────────────────────────────────────────────────

/// One row of the vPIC `DecodeVinValues` flat-format response. Unknown
/// fields come back as empty strings, not nulls.
#[derive(Deserialize)]
struct VpicRow {
    #[serde(rename = "Make")]
    make: Option<String>,
    #[serde(rename = "Model")]
    model: Option<String>,
    #[serde(rename = "ModelYear")]
    model_year: Option<String>,
    #[serde(rename = "VehicleType")]
    vehicle_type: Option<String>,
}

#[derive(Deserialize)]
struct VpicResponse {
    #[serde(rename = "Results")]
    results: Vec<VpicRow>,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

/// HTTP-backed provider proxying the NHTSA vPIC decoder.
pub struct VpicProvider {
    http: reqwest::Client,
    base_url: String,
}

impl VpicProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, VehicleDataError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("garaged/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl VinProvider for VpicProvider {
    async fn decode(&self, vin: &str) -> Result<VehicleProfile, VehicleDataError> {
        let request_id = Uuid::new_v4();
        let url = format!("{}/vehicles/DecodeVinValues/{vin}?format=json", self.base_url);
        debug!(%request_id, vin, "decoding VIN via vPIC");

        let start = std::time::Instant::now();
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let body: VpicResponse = response.json().await?;
        let row = body.results.into_iter().next().ok_or(VehicleDataError::Decode)?;

        info!(
            %request_id,
            vin,
            latency_ms = start.elapsed().as_millis() as u64,
            "VIN decoded"
        );
        Ok(VehicleProfile {
            vin: vin.to_string(),
            make: non_empty(row.make),
            model: non_empty(row.model),
            model_year: non_empty(row.model_year),
            vehicle_type: non_empty(row.vehicle_type),
            decoded_at: Utc::now().to_rfc3339(),
        })
    }
}

// ─── Service ──────────────────────────────────────────────────────────────────

/// Validates, memoizes, and retries VIN decodes.
pub struct VehicleDataService {
    provider: Arc<dyn VinProvider>,
    memo: Mutex<TtlCache<VehicleProfile>>,
    retry: RetryPolicy,
}

impl VehicleDataService {
    pub fn new(
        provider: Arc<dyn VinProvider>,
        cache_capacity: usize,
        cache_ttl: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            memo: Mutex::new(TtlCache::new(cache_capacity, cache_ttl)),
            retry,
        }
    }

    /// Decode a VIN, serving repeats from the memo table.
    pub async fn decode(&self, vin: &str) -> Result<VehicleProfile, VehicleDataError> {
        let vin = normalize_vin(vin)?;

        if let Some(profile) = self.memo.lock().await.get(&vin) {
            debug!(vin = %vin, "VIN served from memo table");
            return Ok(profile);
        }

        let profile = self
            .retry
            .run(|| self.provider.decode(&vin))
            .await?;
        self.memo.lock().await.insert(vin, profile.clone());
        Ok(profile)
    }

    /// Memo hit rate so far, 0.0–1.0.
    pub async fn memo_hit_rate(&self) -> f64 {
        self.memo.lock().await.hit_rate()
    }
}

/// Uppercase and validate a raw VIN string.
fn normalize_vin(raw: &str) -> Result<String, VehicleDataError> {
    let vin = raw.trim().to_ascii_uppercase();
    if VIN_FORMAT.is_match(&vin) {
        Ok(vin)
    } else {
        Err(VehicleDataError::InvalidVin)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
