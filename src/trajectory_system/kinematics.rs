//! Closed-form flight model.
//!
//! A flight is four phases: constant-acceleration powered ascent, ballistic
//! coast to apogee, descent under parachute at terminal velocity, landed.
//! Every quantity has an analytic expression, so a run is a fixed amount of
//! arithmetic plus sampling; there is no integration error to control.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::aerodynamics::Aerodynamics;
use crate::constants::{CHUTE_DEPLOY_DELAY, GRAVITY, MAX_TRAJECTORY_SAMPLES};
use crate::control::config::SimulationConfig;
use crate::errors::SimulationError;
use crate::utils::vector2d::Vector2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    PoweredAscent,
    Coast,
    Descent,
    Landed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Liftoff,
    Burnout,
    Apogee,
    ChuteDeploy,
    Landing,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Liftoff => "Liftoff",
            EventKind::Burnout => "Burnout",
            EventKind::Apogee => "Apogee",
            EventKind::ChuteDeploy => "Chute Deploy",
            EventKind::Landing => "Landing",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightEvent {
    pub time: f64,
    pub kind: EventKind,
    pub altitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub time: f64,
    pub altitude: f64,
    pub vertical_velocity: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightSummary {
    pub apogee: f64,
    pub max_velocity: f64,
    pub max_acceleration: f64,
    pub time_to_apogee: f64,
    pub flight_time: f64,
    pub landing_velocity: f64,
    pub landing_x: f64,
    pub landing_y: f64,
    pub landing_distance: f64,
}

impl FlightSummary {
    fn ensure_finite(&self) -> Result<(), SimulationError> {
        let fields = [
            ("apogee", self.apogee),
            ("max velocity", self.max_velocity),
            ("max acceleration", self.max_acceleration),
            ("time to apogee", self.time_to_apogee),
            ("flight time", self.flight_time),
            ("landing velocity", self.landing_velocity),
            ("landing x", self.landing_x),
            ("landing y", self.landing_y),
            ("landing distance", self.landing_distance),
        ];
        match fields.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(SimulationError::Numerical(format!(
                "{} evaluated to {}",
                name, value
            ))),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub summary: FlightSummary,
    pub trajectory: Vec<TrajectoryPoint>,
    pub events: Vec<FlightEvent>,
}

/// Anything that turns a config into a flight. The closed-form model is the
/// built-in one; a higher-fidelity engine can stand in behind the same call.
pub trait FlightModel {
    fn simulate(&self, config: &SimulationConfig) -> Result<SimulationResult, SimulationError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedFormModel;

impl FlightModel for ClosedFormModel {
    fn simulate(&self, config: &SimulationConfig) -> Result<SimulationResult, SimulationError> {
        simulate(config)
    }
}

/// Analytic flight profile derived from one config.
#[derive(Debug, Clone, Copy)]
pub struct Kinematics {
    pub acceleration: f64,
    pub burn_time: f64,
    pub burnout_velocity: f64,
    pub burnout_altitude: f64,
    pub time_to_apogee: f64,
    pub apogee: f64,
    pub terminal_velocity: f64,
    pub descent_time: f64,
    pub flight_time: f64,
    wind_speed: f64,
    wind_bearing: f64,
}

impl Kinematics {
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let mass = config.rocket.mass;
        let thrust = config.motor.average_thrust;
        let burn_time = config.motor.burn_time;
        let gravity_force = mass * GRAVITY;
        if thrust <= gravity_force {
            return Err(SimulationError::Configuration(format!(
                "insufficient thrust to overcome gravity: thrust {:.2} N, weight {:.2} N",
                thrust, gravity_force
            )));
        }

        let aerodynamics = Aerodynamics::for_parachute(&config.rocket)?;
        let air_density = config.environment.atmosphere.air_density();

        let acceleration = thrust / mass - GRAVITY;
        let burnout_velocity = acceleration * burn_time;
        let burnout_altitude = 0.5 * acceleration * burn_time.powi(2);

        let coast_time = burnout_velocity / GRAVITY;
        let time_to_apogee = burn_time + coast_time;
        let apogee = burnout_altitude + burnout_velocity * coast_time - 0.5 * GRAVITY * coast_time.powi(2);

        let terminal_velocity = aerodynamics.terminal_velocity(mass, air_density);
        let descent_time = apogee / terminal_velocity;

        Ok(Kinematics {
            acceleration,
            burn_time,
            burnout_velocity,
            burnout_altitude,
            time_to_apogee,
            apogee,
            terminal_velocity,
            descent_time,
            flight_time: time_to_apogee + descent_time,
            wind_speed: config.environment.wind_speed,
            wind_bearing: config.environment.wind_direction.to_radians(),
        })
    }

    pub fn phase_at(&self, time: f64) -> FlightPhase {
        if time < self.burn_time {
            FlightPhase::PoweredAscent
        } else if time < self.time_to_apogee {
            FlightPhase::Coast
        } else if time < self.flight_time {
            FlightPhase::Descent
        } else {
            FlightPhase::Landed
        }
    }

    /// Altitude above the pad, never below ground.
    pub fn altitude_at(&self, time: f64) -> f64 {
        let altitude = match self.phase_at(time) {
            FlightPhase::PoweredAscent => 0.5 * self.acceleration * time.powi(2),
            FlightPhase::Coast => {
                let dt = time - self.burn_time;
                self.burnout_altitude + self.burnout_velocity * dt - 0.5 * GRAVITY * dt.powi(2)
            }
            FlightPhase::Descent => {
                self.apogee - self.terminal_velocity * (time - self.time_to_apogee)
            }
            FlightPhase::Landed => 0.0,
        };
        altitude.max(0.0)
    }

    pub fn vertical_velocity_at(&self, time: f64) -> f64 {
        match self.phase_at(time) {
            FlightPhase::PoweredAscent => self.acceleration * time,
            FlightPhase::Coast => self.burnout_velocity - GRAVITY * (time - self.burn_time),
            FlightPhase::Descent => -self.terminal_velocity,
            FlightPhase::Landed => 0.0,
        }
    }

    /// Wind drift accumulates only under the parachute.
    pub fn drift_at(&self, time: f64) -> Vector2D {
        let drifting_for = time.min(self.flight_time) - self.time_to_apogee;
        if drifting_for <= 0.0 {
            return Vector2D::default();
        }
        Vector2D::from_bearing(self.wind_speed * drifting_for, self.wind_bearing)
    }

    pub fn sample(&self, time: f64) -> TrajectoryPoint {
        let drift = self.drift_at(time);
        TrajectoryPoint {
            time,
            altitude: self.altitude_at(time),
            vertical_velocity: self.vertical_velocity_at(time),
            x: drift.x,
            y: drift.y,
        }
    }

    pub fn summary(&self) -> FlightSummary {
        let landing = self.drift_at(self.flight_time);
        FlightSummary {
            apogee: self.apogee,
            max_velocity: self.burnout_velocity,
            max_acceleration: self.acceleration,
            time_to_apogee: self.time_to_apogee,
            flight_time: self.flight_time,
            landing_velocity: self.terminal_velocity,
            landing_x: landing.x,
            landing_y: landing.y,
            landing_distance: landing.magnitude(),
        }
    }

    pub fn events(&self) -> Vec<FlightEvent> {
        // Deployment is pinned to a fixed delay after apogee, not to an altitude trigger
        let deploy_altitude = (self.apogee - self.terminal_velocity * CHUTE_DEPLOY_DELAY).max(0.0);

        vec![
            FlightEvent {
                time: 0.0,
                kind: EventKind::Liftoff,
                altitude: 0.0,
            },
            FlightEvent {
                time: self.burn_time,
                kind: EventKind::Burnout,
                altitude: self.burnout_altitude,
            },
            FlightEvent {
                time: self.time_to_apogee,
                kind: EventKind::Apogee,
                altitude: self.apogee,
            },
            FlightEvent {
                time: self.time_to_apogee + CHUTE_DEPLOY_DELAY,
                kind: EventKind::ChuteDeploy,
                altitude: deploy_altitude,
            },
            FlightEvent {
                time: self.flight_time,
                kind: EventKind::Landing,
                altitude: 0.0,
            },
        ]
    }

    /// Samples at `i * time_step` up to landing or `max_duration`, whichever is first.
    pub fn trajectory(
        &self,
        time_step: f64,
        max_duration: f64,
    ) -> Result<Vec<TrajectoryPoint>, SimulationError> {
        let end = self.flight_time.min(max_duration);
        let last_index = (end / time_step).floor();
        if last_index >= MAX_TRAJECTORY_SAMPLES as f64 {
            return Err(SimulationError::Configuration(format!(
                "time step {} s over {:.1} s exceeds {} trajectory samples",
                time_step, end, MAX_TRAJECTORY_SAMPLES
            )));
        }

        let mut trajectory = Vec::with_capacity(last_index as usize + 1);
        for i in 0..=(last_index as usize) {
            let point = self.sample(i as f64 * time_step);
            if !(point.altitude.is_finite()
                && point.vertical_velocity.is_finite()
                && Vector2D::new(point.x, point.y).is_finite())
            {
                return Err(SimulationError::Numerical(format!(
                    "non-finite trajectory sample at t = {:.3} s",
                    point.time
                )));
            }
            trajectory.push(point);
        }
        Ok(trajectory)
    }
}

/// Runs the closed-form model for one config.
pub fn simulate(config: &SimulationConfig) -> Result<SimulationResult, SimulationError> {
    let kinematics = Kinematics::from_config(config)?;

    let summary = kinematics.summary();
    summary.ensure_finite()?;

    let trajectory =
        kinematics.trajectory(config.controls.time_step, config.controls.max_duration)?;

    debug!(
        apogee = summary.apogee,
        flight_time = summary.flight_time,
        landing_distance = summary.landing_distance,
        samples = trajectory.len(),
        "flight simulated"
    );

    Ok(SimulationResult {
        summary,
        trajectory,
        events: kinematics.events(),
    })
}
