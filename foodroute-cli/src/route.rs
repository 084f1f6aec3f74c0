//! `pickup` and `deliver` command implementation for the foodroute CLI.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use foodroute_core::{DistanceProvider, RouteOptimizer, RouteResult, RouteSummary};
use foodroute_data::routing::{DistanceStrategy, RoutingConfig};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::file_is_file;
use crate::request::{
    DeliveryRequest, DeliveryResponse, PickupRequest, load_request, write_response,
};
use crate::{
    ARG_API_KEY, ARG_ASSUMED_SPEED, ARG_BASE_URL, ARG_PER_STOP_MINUTES, ARG_REQUEST,
    ARG_REQUEST_TIMEOUT, ARG_STRATEGY, CliError, ENV_REQUEST,
};

/// CLI arguments shared by the `pickup` and `deliver` subcommands.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan a route from a JSON request. Routing settings can come \
                 from CLI flags, configuration files, or FOODROUTE_* \
                 environment variables.",
    about = "Plan a route from a JSON request"
)]
#[ortho_config(prefix = "FOODROUTE")]
pub(crate) struct RouteArgs {
    /// Path to a JSON file containing the request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Distance source: `geodesic` or `external_service`.
    #[arg(long = ARG_STRATEGY, value_name = "strategy")]
    #[serde(default)]
    pub(crate) strategy: Option<DistanceStrategy>,
    /// API key for the external distance service.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Endpoint of a Google Distance Matrix-compatible service.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Average speed for straight-line travel-time estimates, in km/h.
    #[arg(long = ARG_ASSUMED_SPEED, value_name = "km/h")]
    #[serde(default)]
    pub(crate) assumed_speed_kmh: Option<f64>,
    /// Minutes spent at each stop.
    #[arg(long = ARG_PER_STOP_MINUTES, value_name = "minutes")]
    #[serde(default)]
    pub(crate) per_stop_minutes: Option<u32>,
    /// Timeout for each external service request, in seconds.
    #[arg(long = ARG_REQUEST_TIMEOUT, value_name = "seconds")]
    #[serde(default)]
    pub(crate) request_timeout_secs: Option<f64>,
}

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Which route the command plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RouteKind {
    /// Collect pickups, optionally finishing at a destination.
    Pickup,
    /// Travel to the nearest camp.
    Deliver,
}

/// Resolved route command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RouteConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Distance strategy and optimizer settings.
    pub(crate) routing: RoutingConfig,
}

impl RouteConfig {
    pub(crate) fn validate_request_path(&self) -> Result<(), CliError> {
        let path = &self.request_path;
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::RequestPathNotFile {
                path: path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingRequestFile { path: path.clone() })
            }
            Err(source) => Err(CliError::InspectRequestPath {
                path: path.clone(),
                source,
            }),
        }
    }
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_REQUEST,
        })?;

        let mut routing = RoutingConfig::default();
        if let Some(strategy) = args.strategy {
            routing = routing.with_strategy(strategy);
        }
        if let Some(api_key) = args.api_key {
            routing = routing.with_api_key(api_key);
        }
        if let Some(base_url) = args.base_url {
            routing = routing.with_base_url(base_url);
        }
        if let Some(speed) = args.assumed_speed_kmh {
            routing = routing.with_assumed_speed_kmh(speed);
        }
        if let Some(minutes) = args.per_stop_minutes {
            routing = routing.with_per_stop_minutes(minutes);
        }
        if let Some(secs) = args.request_timeout_secs {
            routing = routing.with_request_timeout(parse_timeout(secs)?);
        }

        Ok(Self {
            request_path,
            routing,
        })
    }
}

fn parse_timeout(secs: f64) -> Result<Duration, CliError> {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|timeout| !timeout.is_zero())
        .ok_or(CliError::InvalidTimeout {
            field: ARG_REQUEST_TIMEOUT,
            value: secs,
        })
}

pub(super) fn run_route(kind: RouteKind, args: RouteArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_route_with(kind, args, &mut stdout)
}

pub(super) fn run_route_with(
    kind: RouteKind,
    args: RouteArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_request_path()?;
    execute_route(kind, &config, writer)
}

/// Load the request for `kind`, plan it and write the JSON response.
pub(crate) fn execute_route(
    kind: RouteKind,
    config: &RouteConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let optimizer = config.routing.build_optimizer();
    info!(
        "planning {kind:?} route with {} distances",
        optimizer.provider().strategy()
    );
    match kind {
        RouteKind::Pickup => {
            let request: PickupRequest = load_request(&config.request_path)?;
            let summary = plan_pickup(&optimizer, &request)?;
            write_response(writer, &summary)
        }
        RouteKind::Deliver => {
            let request: DeliveryRequest = load_request(&config.request_path)?;
            let response = plan_delivery(&optimizer, &request)?;
            write_response(writer, &response)
        }
    }
}

/// Order the pickups, finishing at the destination when one is given.
pub(crate) fn plan_pickup<P: DistanceProvider>(
    optimizer: &RouteOptimizer<P>,
    request: &PickupRequest,
) -> Result<RouteSummary, CliError> {
    if !request.origin.is_valid() {
        return Err(CliError::InvalidOrigin);
    }
    let result = match &request.destination {
        Some(destination) => {
            optimizer.route_with_destination(&request.origin, &request.stops, destination)
        }
        None => optimizer.nearest_neighbor_route(&request.origin, &request.stops),
    };
    if result.route.visit_count() == 0 {
        return Err(CliError::NoValidStops);
    }
    Ok(optimizer.summarize(&result))
}

/// Route straight to the nearest camp.
pub(crate) fn plan_delivery<P: DistanceProvider>(
    optimizer: &RouteOptimizer<P>,
    request: &DeliveryRequest,
) -> Result<DeliveryResponse, CliError> {
    if !request.origin.is_valid() {
        return Err(CliError::InvalidOrigin);
    }
    let nearest = optimizer
        .find_nearest(&request.origin, &request.candidates)
        .ok_or(CliError::NoValidDestination)?;
    let result = RouteResult::direct(
        request.origin.clone(),
        nearest.location.clone(),
        nearest.leg,
    );
    Ok(DeliveryResponse {
        nearest: nearest.location,
        summary: optimizer.summarize(&result),
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RouteConfig, CliError> {
    let merged = RouteArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RouteConfig::try_from(merged)
}
