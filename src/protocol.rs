//! Public HTTP response structs (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::Platform;
use crate::orchestrator::BoardEntry;

/// Whole board, keyed by lowercase platform name.
pub type StatsOut = BTreeMap<Platform, BoardEntry>;

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}
