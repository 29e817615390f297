use serde::{Deserialize, Serialize};

use super::environment::Atmosphere;
use crate::constants::{
    DEFAULT_LAUNCH_ANGLE, DEFAULT_LAUNCH_HEADING, DEFAULT_ROD_LENGTH, MAX_SIMULATION_TIME,
    TIME_STEP,
};
use crate::errors::SimulationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocketConfig {
    pub mass: f64,                     // kg, dry + loaded motor
    pub diameter: f64,                 // m
    pub chute_diameter: f64,           // m
    pub chute_drag_coefficient: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorConfig {
    pub average_thrust: f64, // N
    pub burn_time: f64,      // s
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub atmosphere: Atmosphere,
    pub wind_speed: f64,     // m/s
    pub wind_direction: f64, // degrees, "from" bearing
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        EnvironmentConfig {
            atmosphere: Atmosphere::standard(),
            wind_speed: 0.0,
            wind_direction: 0.0,
        }
    }
}

/// Launch geometry. Carried through to the result consumers; the closed-form
/// flight model does not read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub rod_length: f64, // m
    pub angle: f64,      // degrees
    pub heading: f64,    // degrees
}

impl Default for LaunchConfig {
    fn default() -> Self {
        LaunchConfig {
            rod_length: DEFAULT_ROD_LENGTH,
            angle: DEFAULT_LAUNCH_ANGLE,
            heading: DEFAULT_LAUNCH_HEADING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericControls {
    pub time_step: f64,    // s between trajectory samples
    pub max_duration: f64, // s, caps the sampled trajectory
}

impl Default for NumericControls {
    fn default() -> Self {
        NumericControls {
            time_step: TIME_STEP,
            max_duration: MAX_SIMULATION_TIME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub rocket: RocketConfig,
    pub motor: MotorConfig,
    pub environment: EnvironmentConfig,
    pub launch: LaunchConfig,
    pub controls: NumericControls,
}

impl SimulationConfig {
    /// Config with the given physical parameters and default environment,
    /// launch and numeric controls.
    pub fn new(rocket: RocketConfig, motor: MotorConfig) -> Self {
        SimulationConfig {
            rocket,
            motor,
            environment: EnvironmentConfig::default(),
            launch: LaunchConfig::default(),
            controls: NumericControls::default(),
        }
    }

    pub fn with_environment(mut self, environment: EnvironmentConfig) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_controls(mut self, controls: NumericControls) -> Self {
        self.controls = controls;
        self
    }

    /// Rejects every input the closed-form model cannot evaluate to finite numbers.
    pub fn validate(&self) -> Result<(), SimulationError> {
        require_positive("total mass", self.rocket.mass)?;
        require_positive("burn time", self.motor.burn_time)?;
        require_positive("parachute diameter", self.rocket.chute_diameter)?;
        require_positive("parachute drag coefficient", self.rocket.chute_drag_coefficient)?;
        require_positive("air density", self.environment.atmosphere.air_density())?;
        require_positive("trajectory time step", self.controls.time_step)?;
        require_positive("maximum duration", self.controls.max_duration)?;

        if !self.motor.average_thrust.is_finite() {
            return Err(SimulationError::Configuration(format!(
                "average thrust must be finite, got {}",
                self.motor.average_thrust
            )));
        }
        if !(self.environment.wind_speed.is_finite() && self.environment.wind_speed >= 0.0) {
            return Err(SimulationError::Configuration(format!(
                "wind speed must be finite and non-negative, got {} m/s",
                self.environment.wind_speed
            )));
        }
        if !self.environment.wind_direction.is_finite() {
            return Err(SimulationError::Configuration(format!(
                "wind direction must be finite, got {}°",
                self.environment.wind_direction
            )));
        }
        Ok(())
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::Configuration(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}
