//! Strategy selection from runtime configuration.
//!
//! [`RoutingConfig`] gathers the knobs an application exposes for routing and
//! turns them into a [`ConfiguredDistanceProvider`] and a
//! [`RouteOptimizer`]. The provider is chosen once, at construction; there is
//! no process-wide default.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use foodroute_core::{
    DEFAULT_PER_STOP_MINUTES, DEFAULT_SPEED_KMH, DistanceMatrix, DistanceProvider,
    GeodesicProvider, Location, OptimizerConfig, RouteOptimizer,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::client::{
    DEFAULT_SERVICE_URL, DEFAULT_TIMEOUT, HttpMatrixClient, HttpMatrixClientConfig,
};
use super::error::ProviderBuildError;
use super::provider::RoadDistanceProvider;

/// Where distances come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceStrategy {
    /// Local WGS84 geodesic estimate.
    #[default]
    Geodesic,
    /// External road-distance service.
    #[serde(alias = "external-service")]
    ExternalService,
}

impl DistanceStrategy {
    /// Return the strategy as its configuration string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Geodesic => "geodesic",
            Self::ExternalService => "external_service",
        }
    }
}

impl fmt::Display for DistanceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`DistanceStrategy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown distance strategy '{0}' (expected 'geodesic' or 'external_service')")]
pub struct ParseStrategyError(pub String);

impl FromStr for DistanceStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "geodesic" => Ok(Self::Geodesic),
            "external_service" | "external-service" => Ok(Self::ExternalService),
            _ => Err(ParseStrategyError(s.to_owned())),
        }
    }
}

/// Routing settings for an application.
///
/// # Examples
/// ```
/// use foodroute_data::routing::{DistanceStrategy, RoutingConfig};
///
/// // Without a key the external strategy quietly degrades to geodesic.
/// let provider = RoutingConfig::default()
///     .with_strategy(DistanceStrategy::ExternalService)
///     .build_provider();
/// assert_eq!(provider.strategy(), DistanceStrategy::Geodesic);
/// ```
#[derive(Clone, PartialEq)]
pub struct RoutingConfig {
    /// Requested distance strategy.
    pub strategy: DistanceStrategy,
    /// API key for the external service.
    pub api_key: Option<String>,
    /// Endpoint of the external service.
    pub base_url: String,
    /// Average speed for geodesic travel-time estimates, in km/h.
    pub assumed_speed_kmh: f64,
    /// Dwell time per stop, in minutes.
    pub per_stop_minutes: u32,
    /// Per-request timeout for the external service.
    pub request_timeout: Duration,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            strategy: DistanceStrategy::default(),
            api_key: None,
            base_url: DEFAULT_SERVICE_URL.to_owned(),
            assumed_speed_kmh: DEFAULT_SPEED_KMH,
            per_stop_minutes: DEFAULT_PER_STOP_MINUTES,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for RoutingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingConfig")
            .field("strategy", &self.strategy)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("assumed_speed_kmh", &self.assumed_speed_kmh)
            .field("per_stop_minutes", &self.per_stop_minutes)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl RoutingConfig {
    #[must_use]
    pub fn with_strategy(mut self, strategy: DistanceStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_assumed_speed_kmh(mut self, speed_kmh: f64) -> Self {
        self.assumed_speed_kmh = speed_kmh;
        self
    }

    #[must_use]
    pub fn with_per_stop_minutes(mut self, minutes: u32) -> Self {
        self.per_stop_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Geodesic provider at the configured speed.
    pub fn geodesic_provider(&self) -> GeodesicProvider {
        GeodesicProvider::new(self.assumed_speed_kmh)
    }

    /// Build the external-service provider without any fallback to geodesic.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError::MissingCredential`] when no key is set,
    /// or any error from [`HttpMatrixClient::with_config`].
    pub fn road_provider(&self) -> Result<RoadDistanceProvider, ProviderBuildError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ProviderBuildError::MissingCredential)?;
        let client = HttpMatrixClient::with_config(
            HttpMatrixClientConfig::new(api_key)
                .with_base_url(self.base_url.clone())
                .with_timeout(self.request_timeout),
        )?;
        Ok(RoadDistanceProvider::with_client(client).with_fallback(self.geodesic_provider()))
    }

    /// Build the provider for the configured strategy.
    ///
    /// An external strategy that cannot be built resolves to the geodesic
    /// provider with a warning.
    pub fn build_provider(&self) -> ConfiguredDistanceProvider {
        match self.strategy {
            DistanceStrategy::Geodesic => {
                ConfiguredDistanceProvider::Geodesic(self.geodesic_provider())
            }
            DistanceStrategy::ExternalService => match self.road_provider() {
                Ok(provider) => {
                    info!("using external road-distance service at {}", self.base_url);
                    ConfiguredDistanceProvider::Road(provider)
                }
                Err(err) => {
                    warn!("external distance service unavailable ({err}); using geodesic distances");
                    ConfiguredDistanceProvider::Geodesic(self.geodesic_provider())
                }
            },
        }
    }

    /// Optimizer settings derived from this configuration.
    pub fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig {
            per_stop_minutes: self.per_stop_minutes,
            fallback_speed_kmh: self.geodesic_provider().speed_kmh(),
        }
    }

    /// Build an optimizer over [`RoutingConfig::build_provider`].
    pub fn build_optimizer(&self) -> RouteOptimizer<ConfiguredDistanceProvider> {
        RouteOptimizer::with_config(self.build_provider(), self.optimizer_config())
    }
}

/// The distance provider selected by a [`RoutingConfig`].
#[derive(Debug)]
pub enum ConfiguredDistanceProvider {
    /// Local geodesic estimate.
    Geodesic(GeodesicProvider),
    /// External road-distance service with geodesic fallback.
    Road(RoadDistanceProvider),
}

impl ConfiguredDistanceProvider {
    /// Strategy actually in effect.
    pub fn strategy(&self) -> DistanceStrategy {
        match self {
            Self::Geodesic(_) => DistanceStrategy::Geodesic,
            Self::Road(_) => DistanceStrategy::ExternalService,
        }
    }
}

impl Default for ConfiguredDistanceProvider {
    fn default() -> Self {
        Self::Geodesic(GeodesicProvider::default())
    }
}

impl DistanceProvider for ConfiguredDistanceProvider {
    fn get_matrix(&self, origins: &[Location], destinations: &[Location]) -> DistanceMatrix {
        match self {
            Self::Geodesic(provider) => provider.get_matrix(origins, destinations),
            Self::Road(provider) => provider.get_matrix(origins, destinations),
        }
    }
}
