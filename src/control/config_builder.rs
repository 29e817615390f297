//! Normalizes editor, catalog and weather inputs into a [`SimulationConfig`].
//!
//! Inputs arrive in the units their producers use (grams, millimeters,
//! degrees Celsius, hectopascals) and any field may be missing. The builder
//! converts to SI and fills every gap with a documented default; it never
//! rejects a value; [`SimulationConfig::validate`] does that downstream.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{
    EnvironmentConfig, LaunchConfig, MotorConfig, NumericControls, RocketConfig, SimulationConfig,
};
use super::environment::{Atmosphere, AtmosphericConditions};
use crate::constants::{
    CELSIUS_TO_KELVIN, DEFAULT_AVERAGE_THRUST, DEFAULT_BODY_DIAMETER_MM, DEFAULT_BURN_TIME,
    DEFAULT_CENTER_OF_MASS_MM, DEFAULT_CHUTE_DIAMETER_MM, DEFAULT_CHUTE_DRAG_COEFFICIENT,
    DEFAULT_DRY_MASS_G, DEFAULT_FIN_COUNT, DEFAULT_FIN_POSITION_MM, DEFAULT_FIN_ROOT_CHORD_MM,
    DEFAULT_FIN_SPAN_MM, DEFAULT_FIN_TIP_CHORD_MM, DEFAULT_LAUNCH_ANGLE, DEFAULT_LAUNCH_HEADING,
    DEFAULT_MOTOR_MASS_G, DEFAULT_NOSE_LENGTH_MM, DEFAULT_ROD_LENGTH, MAX_SIMULATION_TIME,
    TIME_STEP,
};
use crate::trajectory_system::stability::{Airframe, FinSet};

/// Rocket as produced by the design editor (grams, millimeters).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRocket {
    pub name: Option<String>,
    pub dry_mass: Option<f64>,
    pub body_diameter: Option<f64>,
    pub chute_diameter: Option<f64>,
    pub chute_drag_coefficient: Option<f64>,
    pub nose_length: Option<f64>,
    /// Measured from the nose tip.
    pub center_of_mass: Option<f64>,
    pub fins: Option<RawFins>,
}

/// Fin set as produced by the design editor (millimeters). `position` is the
/// distance from the nose tip to the root leading edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFins {
    pub count: Option<u32>,
    pub root_chord: Option<f64>,
    pub tip_chord: Option<f64>,
    pub span: Option<f64>,
    pub position: Option<f64>,
}

/// Motor as produced by the motor catalog (grams, newtons, seconds).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMotor {
    pub designation: Option<String>,
    pub total_mass: Option<f64>,
    pub average_thrust: Option<f64>,
    pub burn_time: Option<f64>,
}

/// User launch settings. Wind here is a manual entry and loses to a weather snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSettings {
    pub rod_length: Option<f64>,   // m
    pub launch_angle: Option<f64>, // degrees
    pub launch_heading: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub air_density: Option<f64>, // kg/m³, overrides any temperature/pressure
    pub time_step: Option<f64>,
    pub max_duration: Option<f64>,
}

/// Weather provider reading at the launch site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSnapshot {
    pub temperature: Option<f64>, // °C
    pub pressure: Option<f64>,    // hPa
    pub wind_speed: Option<f64>,  // m/s
    pub wind_direction: Option<f64>,
    pub elevation: Option<f64>, // m above sea level
}

/// Everything needed for one run, in the shape the CLI reads from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationInput {
    pub rocket: RawRocket,
    pub motor: RawMotor,
    pub settings: LaunchSettings,
    pub environment: Option<EnvironmentSnapshot>,
}

impl SimulationInput {
    pub fn into_builder(self) -> ConfigBuilder {
        let builder = ConfigBuilder::new(self.rocket, self.motor, self.settings);
        match self.environment {
            Some(snapshot) => builder.with_environment(snapshot),
            None => builder,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    rocket: RawRocket,
    motor: RawMotor,
    settings: LaunchSettings,
    environment: Option<EnvironmentSnapshot>,
}

impl ConfigBuilder {
    pub fn new(rocket: RawRocket, motor: RawMotor, settings: LaunchSettings) -> Self {
        ConfigBuilder {
            rocket,
            motor,
            settings,
            environment: None,
        }
    }

    pub fn with_environment(mut self, snapshot: EnvironmentSnapshot) -> Self {
        self.environment = Some(snapshot);
        self
    }

    pub fn build(&self) -> SimulationConfig {
        let dry_mass_g = or_default(self.rocket.dry_mass, DEFAULT_DRY_MASS_G, "rocket dry mass");
        let motor_mass_g = or_default(self.motor.total_mass, DEFAULT_MOTOR_MASS_G, "motor mass");

        let rocket = RocketConfig {
            mass: grams_to_kg(dry_mass_g + motor_mass_g),
            diameter: mm_to_m(or_default(
                self.rocket.body_diameter,
                DEFAULT_BODY_DIAMETER_MM,
                "body diameter",
            )),
            chute_diameter: mm_to_m(or_default(
                self.rocket.chute_diameter,
                DEFAULT_CHUTE_DIAMETER_MM,
                "parachute diameter",
            )),
            chute_drag_coefficient: or_default(
                self.rocket.chute_drag_coefficient,
                DEFAULT_CHUTE_DRAG_COEFFICIENT,
                "parachute drag coefficient",
            ),
        };

        let motor = MotorConfig {
            average_thrust: or_default(
                self.motor.average_thrust,
                DEFAULT_AVERAGE_THRUST,
                "average thrust",
            ),
            burn_time: or_default(self.motor.burn_time, DEFAULT_BURN_TIME, "burn time"),
        };

        let launch = LaunchConfig {
            rod_length: or_default(self.settings.rod_length, DEFAULT_ROD_LENGTH, "rod length"),
            angle: or_default(self.settings.launch_angle, DEFAULT_LAUNCH_ANGLE, "launch angle"),
            heading: or_default(
                self.settings.launch_heading,
                DEFAULT_LAUNCH_HEADING,
                "launch heading",
            ),
        };

        let controls = NumericControls {
            time_step: or_default(self.settings.time_step, TIME_STEP, "time step"),
            max_duration: or_default(
                self.settings.max_duration,
                MAX_SIMULATION_TIME,
                "max duration",
            ),
        };

        SimulationConfig {
            rocket,
            motor,
            environment: self.build_environment(),
            launch,
            controls,
        }
    }

    /// Stability geometry in meters. A rocket without a fin section is treated
    /// as finless; a fin section with gaps takes the default fin set values.
    pub fn build_airframe(&self) -> Airframe {
        let body_diameter = or_default(
            self.rocket.body_diameter,
            DEFAULT_BODY_DIAMETER_MM,
            "body diameter",
        );
        let fins = self.rocket.fins.as_ref().map(|fins| FinSet {
            count: fins.count.unwrap_or_else(|| {
                debug!(default = DEFAULT_FIN_COUNT, "filling missing fin count");
                DEFAULT_FIN_COUNT
            }),
            root_chord: mm_to_m(or_default(
                fins.root_chord,
                DEFAULT_FIN_ROOT_CHORD_MM,
                "fin root chord",
            )),
            tip_chord: mm_to_m(or_default(
                fins.tip_chord,
                DEFAULT_FIN_TIP_CHORD_MM,
                "fin tip chord",
            )),
            span: mm_to_m(or_default(fins.span, DEFAULT_FIN_SPAN_MM, "fin span")),
            // Editors store the offset with either sign
            position: mm_to_m(
                or_default(fins.position, DEFAULT_FIN_POSITION_MM, "fin position").abs(),
            ),
        });

        Airframe {
            body_radius: mm_to_m(body_diameter) / 2.0,
            nose_length: mm_to_m(or_default(
                self.rocket.nose_length,
                DEFAULT_NOSE_LENGTH_MM,
                "nose length",
            )),
            fins,
            center_of_mass: mm_to_m(or_default(
                self.rocket.center_of_mass,
                DEFAULT_CENTER_OF_MASS_MM,
                "center of mass",
            )),
        }
    }

    fn build_environment(&self) -> EnvironmentConfig {
        let snapshot = self.environment.clone().unwrap_or_default();

        let atmosphere = match self.settings.air_density {
            Some(density) => Atmosphere::Density { density },
            None => {
                // Missing readings come from the standard atmosphere at the site elevation
                let site = AtmosphericConditions::at_altitude(snapshot.elevation.unwrap_or(0.0));
                match (snapshot.temperature, snapshot.pressure) {
                    (None, None) => site.as_atmosphere(),
                    (temperature, pressure) => Atmosphere::Conditions {
                        temperature: temperature
                            .map_or(site.temperature, |celsius| celsius + CELSIUS_TO_KELVIN),
                        pressure: pressure.map_or(site.pressure, |hpa| hpa * 100.0),
                    },
                }
            }
        };

        EnvironmentConfig {
            atmosphere,
            wind_speed: or_default(
                snapshot.wind_speed.or(self.settings.wind_speed),
                0.0,
                "wind speed",
            ),
            wind_direction: or_default(
                snapshot.wind_direction.or(self.settings.wind_direction),
                0.0,
                "wind direction",
            ),
        }
    }
}

fn or_default(value: Option<f64>, default: f64, field: &str) -> f64 {
    match value {
        Some(value) => value,
        None => {
            debug!(field, default, "filling missing input with default");
            default
        }
    }
}

fn grams_to_kg(grams: f64) -> f64 {
    grams / 1000.0
}

fn mm_to_m(millimeters: f64) -> f64 {
    millimeters / 1000.0
}
