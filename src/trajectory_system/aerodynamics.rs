use std::f64::consts::PI;

use crate::constants::GRAVITY;
use crate::control::config::RocketConfig;
use crate::errors::SimulationError;

/// Drag model of the recovery parachute.
#[derive(Debug, Clone, Copy)]
pub struct Aerodynamics {
    pub drag_coefficient: f64,
    pub surface_area: f64, // m², projected canopy area
}

impl Aerodynamics {
    pub fn new(drag_coefficient: f64, surface_area: f64) -> Self {
        Aerodynamics {
            drag_coefficient,
            surface_area,
        }
    }

    pub fn for_parachute(rocket: &RocketConfig) -> Result<Self, SimulationError> {
        let aerodynamics = Aerodynamics::new(
            rocket.chute_drag_coefficient,
            circle_area(rocket.chute_diameter),
        );
        let drag_area = aerodynamics.drag_area();
        if !(drag_area.is_finite() && drag_area > 0.0) {
            return Err(SimulationError::Configuration(format!(
                "parachute drag area must be positive, got {} m²",
                drag_area
            )));
        }
        Ok(aerodynamics)
    }

    /// Cd·A, the quantity that sets the descent rate.
    pub fn drag_area(&self) -> f64 {
        self.drag_coefficient * self.surface_area
    }

    pub fn calculate_drag(&self, speed: f64, air_density: f64) -> f64 {
        self.calculate_dynamic_pressure(speed, air_density) * self.drag_area()
    }

    /// Speed at which drag balances weight.
    pub fn terminal_velocity(&self, mass: f64, air_density: f64) -> f64 {
        (2.0 * mass * GRAVITY / (air_density * self.drag_area())).sqrt()
    }

    fn calculate_dynamic_pressure(&self, speed: f64, air_density: f64) -> f64 {
        0.5 * air_density * speed.powi(2)
    }
}

pub fn circle_area(diameter: f64) -> f64 {
    PI * (diameter / 2.0).powi(2)
}
