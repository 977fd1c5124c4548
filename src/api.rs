//! Wire types for the schedule request/response payloads.
//!
//! Transport is out of scope; these types only fix the JSON shape:
//! a request carries `cannot_sleep`, `target_sleep_time` and
//! `ideal_segments`, and a response is `{"schedule": [[0|1; 96]; 7]}`.

use crate::constraints::SleepConstraints;
use crate::error::Error;
use crate::planner::SleepPlanner;
use serde::{Deserialize, Serialize};

/// Incoming schedule request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepRequest {
    pub cannot_sleep: Vec<Vec<bool>>,
    pub target_sleep_time: i64,
    pub ideal_segments: i64,
}

impl SleepRequest {
    /// Validates the grid shape.
    pub fn to_constraints(&self) -> Result<SleepConstraints, Error> {
        Ok(SleepConstraints::from_rows(
            &self.cannot_sleep,
            self.target_sleep_time,
            self.ideal_segments,
        )?)
    }
}

/// Outgoing schedule, one row per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepResponse {
    pub schedule: Vec<Vec<u8>>,
}

/// Handles one request with the given planner.
pub fn handle(planner: &SleepPlanner, request: &SleepRequest) -> Result<SleepResponse, Error> {
    let constraints = request.to_constraints()?;
    let outcome = planner.plan(&constraints)?;
    Ok(SleepResponse {
        schedule: outcome.schedule.to_rows(),
    })
}
