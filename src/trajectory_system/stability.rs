//! Static stability estimate.
//!
//! Simplified Barrowman: the nose and the fin set each contribute a normal
//! force slope acting at their own center of pressure, and the airframe CP is
//! the slope-weighted average. Body-tube lift and fin-body interference are
//! ignored, so this is a quick screening number rather than a design figure.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    COMFORTABLE_STABLE_MARGIN, FINLESS_TAIL_CP, FINLESS_TAIL_NORMAL_FORCE_SLOPE,
    FIN_CP_CHORD_FRACTION, MIN_STABLE_MARGIN, NOSE_NORMAL_FORCE_SLOPE, OGIVE_CP_FRACTION,
};
use crate::errors::SimulationError;

/// Trapezoidal fin set. Lengths in meters; `position` is measured from the
/// nose tip to the root leading edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinSet {
    pub count: u32,
    pub root_chord: f64,
    pub tip_chord: f64,
    pub span: f64,
    pub position: f64,
}

impl FinSet {
    fn center_of_pressure(&self) -> f64 {
        self.position + self.root_chord * FIN_CP_CHORD_FRACTION
    }

    fn normal_force_slope(&self, body_radius: f64) -> f64 {
        4.0 * self.count as f64 * (self.span / (2.0 * body_radius)).powi(2)
    }
}

/// Geometry needed for the stability estimate. Positions are measured aft
/// from the nose tip, in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airframe {
    pub body_radius: f64,
    pub nose_length: f64,
    pub fins: Option<FinSet>,
    pub center_of_mass: f64,
}

impl Airframe {
    pub fn validate(&self) -> Result<(), SimulationError> {
        let mut lengths = vec![
            ("body radius", self.body_radius),
            ("nose length", self.nose_length),
        ];
        if let Some(fins) = &self.fins {
            if fins.count == 0 {
                return Err(SimulationError::Configuration(
                    "fin set must have at least one fin".to_string(),
                ));
            }
            lengths.push(("fin root chord", fins.root_chord));
            lengths.push(("fin span", fins.span));
        }
        for (name, value) in lengths {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimulationError::Configuration(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !self.center_of_mass.is_finite() {
            return Err(SimulationError::Configuration(format!(
                "center of mass must be finite, got {}",
                self.center_of_mass
            )));
        }
        Ok(())
    }

    pub fn caliber(&self) -> f64 {
        2.0 * self.body_radius
    }

    pub fn center_of_pressure(&self) -> f64 {
        let nose_cp = self.nose_length * OGIVE_CP_FRACTION;
        let (tail_slope, tail_cp) = match &self.fins {
            Some(fins) => (
                fins.normal_force_slope(self.body_radius),
                fins.center_of_pressure(),
            ),
            None => (FINLESS_TAIL_NORMAL_FORCE_SLOPE, FINLESS_TAIL_CP),
        };

        (NOSE_NORMAL_FORCE_SLOPE * nose_cp + tail_slope * tail_cp)
            / (NOSE_NORMAL_FORCE_SLOPE + tail_slope)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityRating {
    Stable,
    MarginallyStable,
    Unstable,
}

impl StabilityRating {
    pub fn from_margin(margin: f64) -> Self {
        if margin > COMFORTABLE_STABLE_MARGIN {
            StabilityRating::Stable
        } else if margin > MIN_STABLE_MARGIN {
            StabilityRating::MarginallyStable
        } else {
            StabilityRating::Unstable
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            StabilityRating::Stable => "Stable",
            StabilityRating::MarginallyStable => "Marginally stable",
            StabilityRating::Unstable => "Unstable - add weight to nose or move fins aft",
        }
    }
}

impl fmt::Display for StabilityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.recommendation())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityReport {
    pub center_of_pressure: f64, // m from nose tip
    pub center_of_gravity: f64,  // m from nose tip
    pub margin: f64,             // calibers
    pub stable: bool,
    pub rating: StabilityRating,
}

/// Static margin of `airframe` in calibers, positive when the CP sits aft of the CG.
pub fn analyze_stability(airframe: &Airframe) -> Result<StabilityReport, SimulationError> {
    airframe.validate()?;

    let center_of_pressure = airframe.center_of_pressure();
    let margin = (center_of_pressure - airframe.center_of_mass) / airframe.caliber();
    if !margin.is_finite() {
        return Err(SimulationError::Numerical(format!(
            "stability margin evaluated to {}",
            margin
        )));
    }

    debug!(
        center_of_pressure,
        center_of_gravity = airframe.center_of_mass,
        margin,
        "stability estimated"
    );

    Ok(StabilityReport {
        center_of_pressure,
        center_of_gravity: airframe.center_of_mass,
        margin,
        stable: margin > MIN_STABLE_MARGIN,
        rating: StabilityRating::from_margin(margin),
    })
}
