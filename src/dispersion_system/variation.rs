use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{
    LAUNCH_ANGLE_VARIATION, MASS_VARIATION, THRUST_VARIATION, WIND_DIRECTION_VARIATION,
    WIND_SPEED_VARIATION,
};
use crate::control::config::SimulationConfig;

/// Source of uniform samples in [0, 1).
pub trait RandomSource {
    fn uniform(&mut self) -> f64;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }
}

/// `rand` generator behind the [`RandomSource`] interface.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

pub type SeededSource = RngSource<StdRng>;

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        RngSource::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        RngSource::new(StdRng::from_entropy())
    }

    /// Independent stream for one trial of a parallel run. The stream depends
    /// only on `(seed, trial)`, never on which thread picks the trial up.
    pub fn for_trial(seed: u64, trial: usize) -> Self {
        let stream = seed.wrapping_add((trial as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        RngSource::seeded(stream)
    }
}

/// Half-widths of the uniform perturbations applied to each input channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariationBounds {
    pub mass_fraction: f64,
    pub thrust_fraction: f64,
    pub wind_speed: f64,     // m/s
    pub wind_direction: f64, // degrees
    pub launch_angle: f64,   // degrees
}

impl Default for VariationBounds {
    fn default() -> Self {
        VariationBounds {
            mass_fraction: MASS_VARIATION,
            thrust_fraction: THRUST_VARIATION,
            wind_speed: WIND_SPEED_VARIATION,
            wind_direction: WIND_DIRECTION_VARIATION,
            launch_angle: LAUNCH_ANGLE_VARIATION,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VariationSampler {
    pub bounds: VariationBounds,
}

impl VariationSampler {
    pub fn new(bounds: VariationBounds) -> Self {
        VariationSampler { bounds }
    }

    /// Perturbed copy of `nominal`. Draws exactly five samples, in the order
    /// mass, thrust, wind speed, wind direction, launch angle.
    pub fn sample<S: RandomSource + ?Sized>(
        &self,
        nominal: &SimulationConfig,
        source: &mut S,
    ) -> SimulationConfig {
        let bounds = &self.bounds;
        let mut config = nominal.clone();

        config.rocket.mass *= 1.0 + symmetric(source, bounds.mass_fraction);
        config.motor.average_thrust *= 1.0 + symmetric(source, bounds.thrust_fraction);
        config.environment.wind_speed =
            (config.environment.wind_speed + symmetric(source, bounds.wind_speed)).max(0.0);
        config.environment.wind_direction += symmetric(source, bounds.wind_direction);
        config.launch.angle += symmetric(source, bounds.launch_angle);

        config
    }
}

/// U(-half_width, +half_width); a source returning 0.5 yields exactly zero.
fn symmetric<S: RandomSource + ?Sized>(source: &mut S, half_width: f64) -> f64 {
    -half_width + 2.0 * half_width * source.uniform()
}
