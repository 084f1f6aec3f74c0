//! JSON payloads read and written by the route commands.

use std::io::{BufReader, Write};

use camino::Utf8Path;
use foodroute_core::{Location, RouteSummary};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::CliError;
use crate::fs::open_utf8_file;

/// Input of the `pickup` command.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct PickupRequest {
    /// The volunteer's current position.
    pub(crate) origin: Location,
    /// Donations or restaurants awaiting pickup.
    #[serde(default)]
    pub(crate) stops: Vec<Location>,
    /// Where the collected food is taken, if anywhere.
    #[serde(default)]
    pub(crate) destination: Option<Location>,
}

/// Input of the `deliver` command.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct DeliveryRequest {
    /// The volunteer's current position.
    pub(crate) origin: Location,
    /// Camps that may receive the delivery.
    #[serde(default)]
    pub(crate) candidates: Vec<Location>,
}

/// Output of the `deliver` command: the chosen camp plus the route to it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct DeliveryResponse {
    pub(crate) nearest: Location,
    #[serde(flatten)]
    pub(crate) summary: RouteSummary,
}

/// Load a JSON-encoded request from disk.
pub(crate) fn load_request<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `response` as pretty-printed JSON followed by a newline.
pub(crate) fn write_response<T: Serialize>(
    writer: &mut dyn Write,
    response: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(response).map_err(CliError::SerialiseResponse)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
