//! Shared test harness modules for the foodroute CLI.

use super::*;

mod helpers;
