// Physical Constants
pub const GRAVITY: f64 = 9.81; // m/s²
pub const SPECIFIC_GAS_CONSTANT_AIR: f64 = 287.05; // J/(kg⋅K)
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

// Standard Atmosphere
pub const SEA_LEVEL_TEMPERATURE: f64 = 288.15; // K
pub const SEA_LEVEL_PRESSURE: f64 = 101325.0; // Pa
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.225; // kg/m³
pub const TROPOSPHERE_LAPSE_RATE: f64 = 0.0065; // K per meter
pub const TROPOSPHERE_HEIGHT: f64 = 11_000.0; // m
pub const TROPOPAUSE_TEMPERATURE: f64 = 216.65; // K
pub const MOLAR_MASS_AIR: f64 = 0.029; // kg/mol
pub const UNIVERSAL_GAS_CONSTANT: f64 = 8.314; // J/(mol⋅K)

// Rocket Defaults (builder input units)
pub const DEFAULT_DRY_MASS_G: f64 = 100.0;
pub const DEFAULT_BODY_DIAMETER_MM: f64 = 41.0;
pub const DEFAULT_CHUTE_DIAMETER_MM: f64 = 300.0;
pub const DEFAULT_CHUTE_DRAG_COEFFICIENT: f64 = 0.8;
pub const DEFAULT_NOSE_LENGTH_MM: f64 = 100.0;
pub const DEFAULT_CENTER_OF_MASS_MM: f64 = 300.0; // from nose tip
pub const DEFAULT_FIN_COUNT: u32 = 3;
pub const DEFAULT_FIN_ROOT_CHORD_MM: f64 = 80.0;
pub const DEFAULT_FIN_TIP_CHORD_MM: f64 = 30.0;
pub const DEFAULT_FIN_SPAN_MM: f64 = 60.0;
pub const DEFAULT_FIN_POSITION_MM: f64 = 100.0; // nose tip to root leading edge

// Motor Defaults
pub const DEFAULT_MOTOR_MASS_G: f64 = 80.0;
pub const DEFAULT_AVERAGE_THRUST: f64 = 50.0; // N
pub const DEFAULT_BURN_TIME: f64 = 1.5; // s

// Launch Defaults
pub const DEFAULT_ROD_LENGTH: f64 = 2.0; // m
pub const DEFAULT_LAUNCH_ANGLE: f64 = 85.0; // degrees from horizontal
pub const DEFAULT_LAUNCH_HEADING: f64 = 0.0; // degrees from north

// Simulation Parameters
pub const TIME_STEP: f64 = 0.1; // s
pub const MAX_SIMULATION_TIME: f64 = 600.0; // s
pub const CHUTE_DEPLOY_DELAY: f64 = 0.5; // s after apogee
pub const MAX_TRAJECTORY_SAMPLES: usize = 1_000_000;

// Static Stability (simplified Barrowman)
pub const OGIVE_CP_FRACTION: f64 = 0.466; // of nose length
pub const NOSE_NORMAL_FORCE_SLOPE: f64 = 2.0;
pub const FIN_CP_CHORD_FRACTION: f64 = 0.4; // of root chord, aft of leading edge
pub const FINLESS_TAIL_CP: f64 = 0.2; // m from nose tip
pub const FINLESS_TAIL_NORMAL_FORCE_SLOPE: f64 = 4.0;
pub const MIN_STABLE_MARGIN: f64 = 1.0; // calibers
pub const COMFORTABLE_STABLE_MARGIN: f64 = 1.5; // calibers

// Monte Carlo
pub const DEFAULT_TRIALS: usize = 100;
pub const MASS_VARIATION: f64 = 0.05; // fraction
pub const THRUST_VARIATION: f64 = 0.03; // fraction
pub const WIND_SPEED_VARIATION: f64 = 1.5; // m/s
pub const WIND_DIRECTION_VARIATION: f64 = 15.0; // degrees
pub const LAUNCH_ANGLE_VARIATION: f64 = 1.0; // degrees
