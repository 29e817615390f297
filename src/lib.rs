pub mod constants;
pub mod control;
pub mod dispersion_system;
pub mod errors;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;

pub use constants::*;
pub use control::config::{
    EnvironmentConfig, LaunchConfig, MotorConfig, NumericControls, RocketConfig, SimulationConfig,
};
pub use control::config_builder::{
    ConfigBuilder, EnvironmentSnapshot, LaunchSettings, RawFins, RawMotor, RawRocket,
    SimulationInput,
};
pub use control::environment::{Atmosphere, AtmosphericConditions};
pub use control::motor_catalog::{MotorCatalog, MotorSpec};
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::aerodynamics::Aerodynamics;
pub use trajectory_system::kinematics::{
    simulate, ClosedFormModel, EventKind, FlightEvent, FlightModel, FlightSummary,
    SimulationResult, TrajectoryPoint,
};
pub use trajectory_system::stability::{
    analyze_stability, Airframe, FinSet, StabilityRating, StabilityReport,
};

// Re-export commonly used items from dispersion_system
pub use dispersion_system::monte_carlo::{
    run_ensemble, run_ensemble_seeded, run_ensemble_with, CancellationToken, Ensemble,
    MonteCarloRunner, TrialOutcome,
};
pub use dispersion_system::statistics::{percentile, DispersionAnalyzer, DispersionSummary};
pub use dispersion_system::variation::{RandomSource, SeededSource, VariationSampler};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::report::Report;

// Re-export commonly used utilities
pub use utils::vector2d::Vector2D;
