use crate::{
    http::{HttpError, ReqwestHttpClient, RetryPolicy},
    model::BboxOrder,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// size of the rendered figure in inches, and its resolution.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct FigureSettings {
    pub width: f64,
    pub height: f64,
    pub dpi: f64,
}

impl Default for FigureSettings {
    fn default() -> Self {
        Self {
            width: 14.0,
            height: 11.0,
            dpi: 150.0,
        }
    }
}

/// remote service endpoints and request behavior.
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub backoff_secs: f64,
    pub user_agent: String,
    pub overpass_url: String,
    pub nominatim_url: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 180,
            max_attempts: 3,
            backoff_secs: 2.0,
            user_agent: format!("trunkmap/{}", env!("CARGO_PKG_VERSION")),
            overpass_url: String::from("https://overpass-api.de/api/interpreter"),
            nominatim_url: String::from("https://nominatim.openstreetmap.org"),
        }
    }
}

impl HttpSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_secs_f64(self.backoff_secs.max(0.0)),
        )
    }

    pub fn build_client(&self) -> Result<ReqwestHttpClient, HttpError> {
        ReqwestHttpClient::new(
            Duration::from_secs(self.timeout_secs),
            &self.user_agent,
            self.retry_policy(),
        )
    }
}

/// the external clipping tool.
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct OsmiumSettings {
    pub program: String,
    pub bbox_order: BboxOrder,
}

impl Default for OsmiumSettings {
    fn default() -> Self {
        Self {
            program: String::from("osmium"),
            bbox_order: BboxOrder::default(),
        }
    }
}
