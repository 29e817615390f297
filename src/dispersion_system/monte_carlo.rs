//! Monte Carlo ensemble runs.
//!
//! Each trial perturbs the nominal config, flies it, and keeps only the
//! landing/apogee outcome; trajectories are dropped as soon as the summary is
//! read. Trials share nothing, so [`MonteCarloRunner::run_parallel`] can fan
//! them out across a thread pool. Aggregation happens only once every trial
//! has returned.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::statistics::{analyze, DispersionSummary};
use super::variation::{RandomSource, SeededSource, VariationSampler};
use crate::constants::DEFAULT_TRIALS;
use crate::control::config::SimulationConfig;
use crate::errors::SimulationError;
use crate::trajectory_system::kinematics::{ClosedFormModel, FlightModel, FlightSummary};
use crate::utils::vector2d::Vector2D;

/// What survives of one trial after aggregation-relevant fields are extracted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub apogee: f64,
    pub flight_time: f64,
    pub landing: Vector2D,
    pub landing_distance: f64,
}

impl From<&FlightSummary> for TrialOutcome {
    fn from(summary: &FlightSummary) -> Self {
        TrialOutcome {
            apogee: summary.apogee,
            flight_time: summary.flight_time,
            landing: Vector2D::new(summary.landing_x, summary.landing_y),
            landing_distance: summary.landing_distance,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ensemble {
    pub outcomes: Vec<TrialOutcome>,
}

impl Ensemble {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Shared flag a caller flips to stop a run between trials.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub struct MonteCarloRunner<M = ClosedFormModel> {
    trials: usize,
    sampler: VariationSampler,
    model: M,
    cancellation: Option<CancellationToken>,
}

impl MonteCarloRunner<ClosedFormModel> {
    pub fn new(trials: usize) -> Self {
        MonteCarloRunner {
            trials,
            sampler: VariationSampler::default(),
            model: ClosedFormModel,
            cancellation: None,
        }
    }
}

impl Default for MonteCarloRunner<ClosedFormModel> {
    fn default() -> Self {
        MonteCarloRunner::new(DEFAULT_TRIALS)
    }
}

impl<M: FlightModel> MonteCarloRunner<M> {
    pub fn with_sampler(mut self, sampler: VariationSampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_model<N: FlightModel>(self, model: N) -> MonteCarloRunner<N> {
        MonteCarloRunner {
            trials: self.trials,
            sampler: self.sampler,
            model,
            cancellation: self.cancellation,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Runs trials one after another, drawing every perturbation from `source`.
    /// `on_progress` receives `(i + 1) / N` after trial `i` completes. The
    /// first failing trial aborts the run.
    pub fn run<S, F>(
        &self,
        config: &SimulationConfig,
        source: &mut S,
        mut on_progress: F,
    ) -> Result<Ensemble, SimulationError>
    where
        S: RandomSource + ?Sized,
        F: FnMut(f64),
    {
        self.check_trials()?;
        info!(trials = self.trials, "starting Monte Carlo run");

        let mut outcomes = Vec::with_capacity(self.trials);
        for i in 0..self.trials {
            self.check_cancelled(i)?;
            let varied = self.sampler.sample(config, source);
            outcomes.push(self.fly(&varied)?);
            on_progress((i + 1) as f64 / self.trials as f64);
        }

        info!(trials = outcomes.len(), "Monte Carlo run complete");
        Ok(Ensemble { outcomes })
    }

    fn fly(&self, config: &SimulationConfig) -> Result<TrialOutcome, SimulationError> {
        let result = self.model.simulate(config)?;
        Ok(TrialOutcome::from(&result.summary))
    }

    fn check_trials(&self) -> Result<(), SimulationError> {
        if self.trials == 0 {
            return Err(SimulationError::Configuration(
                "Monte Carlo run needs at least one trial".to_string(),
            ));
        }
        Ok(())
    }

    fn check_cancelled(&self, completed: usize) -> Result<(), SimulationError> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => {
                warn!(completed, requested = self.trials, "Monte Carlo run cancelled");
                Err(SimulationError::Cancelled {
                    completed,
                    requested: self.trials,
                })
            }
            _ => Ok(()),
        }
    }
}

impl<M: FlightModel + Sync> MonteCarloRunner<M> {
    /// Runs trials on the rayon pool. Trial `i` draws from its own stream
    /// derived from `(seed, i)` and outcomes are kept in trial order, so the
    /// ensemble is the same for any thread count. `on_progress` receives the
    /// completed fraction and may be called from any worker thread.
    pub fn run_parallel<F>(
        &self,
        config: &SimulationConfig,
        seed: u64,
        on_progress: F,
    ) -> Result<Ensemble, SimulationError>
    where
        F: Fn(f64) + Sync,
    {
        self.check_trials()?;
        info!(trials = self.trials, seed, "starting parallel Monte Carlo run");

        let completed = AtomicUsize::new(0);
        let outcomes = (0..self.trials)
            .into_par_iter()
            .map(|trial| {
                self.check_cancelled(completed.load(Ordering::SeqCst))?;
                let mut source = SeededSource::for_trial(seed, trial);
                let varied = self.sampler.sample(config, &mut source);
                let outcome = self.fly(&varied)?;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                on_progress(done as f64 / self.trials as f64);
                Ok(outcome)
            })
            .collect::<Result<Vec<_>, SimulationError>>()?;

        info!(trials = outcomes.len(), "parallel Monte Carlo run complete");
        Ok(Ensemble { outcomes })
    }
}

/// Runs `trials` perturbed flights with a fresh entropy seed and aggregates them.
pub fn run_ensemble<F: FnMut(f64)>(
    config: &SimulationConfig,
    trials: usize,
    on_progress: F,
) -> Result<DispersionSummary, SimulationError> {
    run_ensemble_with(config, trials, &mut SeededSource::from_entropy(), on_progress)
}

/// Reproducible variant of [`run_ensemble`].
pub fn run_ensemble_seeded<F: FnMut(f64)>(
    config: &SimulationConfig,
    trials: usize,
    seed: u64,
    on_progress: F,
) -> Result<DispersionSummary, SimulationError> {
    run_ensemble_with(config, trials, &mut SeededSource::seeded(seed), on_progress)
}

/// Ensemble driven by a caller-supplied random source.
pub fn run_ensemble_with<S, F>(
    config: &SimulationConfig,
    trials: usize,
    source: &mut S,
    on_progress: F,
) -> Result<DispersionSummary, SimulationError>
where
    S: RandomSource + ?Sized,
    F: FnMut(f64),
{
    let ensemble = MonteCarloRunner::new(trials).run(config, source, on_progress)?;
    analyze(&ensemble)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::config::{MotorConfig, RocketConfig};
    use crate::dispersion_system::variation::VariationBounds;
    use crate::trajectory_system::kinematics::{simulate, SimulationResult};
    use std::sync::Mutex;

    struct Midpoint;

    impl RandomSource for Midpoint {
        fn uniform(&mut self) -> f64 {
            0.5
        }
    }

    /// Fails on the third call, mimicking a degenerate trial.
    struct FailingModel {
        calls: AtomicUsize,
    }

    impl FlightModel for FailingModel {
        fn simulate(&self, config: &SimulationConfig) -> Result<SimulationResult, SimulationError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 2 {
                return Err(SimulationError::Configuration("degenerate trial".to_string()));
            }
            simulate(config)
        }
    }

    fn create_test_config() -> SimulationConfig {
        let mut config = SimulationConfig::new(
            RocketConfig {
                mass: 0.6,
                diameter: 0.041,
                chute_diameter: 0.45,
                chute_drag_coefficient: 0.8,
            },
            MotorConfig {
                average_thrust: 20.0,
                burn_time: 1.5,
            },
        );
        config.environment.wind_speed = 4.0;
        config.environment.wind_direction = 45.0;
        config
    }

    #[test]
    fn test_runs_requested_number_of_trials() {
        let ensemble = MonteCarloRunner::new(25)
            .run(&create_test_config(), &mut SeededSource::seeded(1), |_| {})
            .unwrap();
        assert_eq!(ensemble.len(), 25);
    }

    #[test]
    fn test_progress_reports_each_trial() {
        let mut fractions = Vec::new();
        MonteCarloRunner::new(4)
            .run(&create_test_config(), &mut Midpoint, |f| fractions.push(f))
            .unwrap();
        assert_eq!(fractions, vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_midpoint_trials_match_nominal_flight() {
        let config = create_test_config();
        let nominal = TrialOutcome::from(&simulate(&config).unwrap().summary);
        let ensemble = MonteCarloRunner::new(5)
            .run(&config, &mut Midpoint, |_| {})
            .unwrap();
        assert!(ensemble.outcomes.iter().all(|o| *o == nominal));
    }

    #[test]
    fn test_zero_trials_rejected() {
        let result = MonteCarloRunner::new(0).run(&create_test_config(), &mut Midpoint, |_| {});
        assert!(matches!(result, Err(SimulationError::Configuration(_))));
    }

    #[test]
    fn test_failing_trial_aborts_run() {
        let runner = MonteCarloRunner::new(10).with_model(FailingModel {
            calls: AtomicUsize::new(0),
        });
        let mut progress_calls = 0;
        let result = runner.run(&create_test_config(), &mut Midpoint, |_| progress_calls += 1);

        assert_eq!(
            result,
            Err(SimulationError::Configuration("degenerate trial".to_string()))
        );
        assert_eq!(progress_calls, 2);
    }

    #[test]
    fn test_cancelled_run_stops_between_trials() {
        let token = CancellationToken::new();
        let runner = MonteCarloRunner::new(10).with_cancellation(token.clone());

        let result = runner.run(&create_test_config(), &mut Midpoint, |fraction| {
            if fraction >= 0.3 {
                token.cancel();
            }
        });

        assert_eq!(
            result,
            Err(SimulationError::Cancelled {
                completed: 3,
                requested: 10
            })
        );
    }

    #[test]
    fn test_parallel_run_is_reproducible() {
        let runner = MonteCarloRunner::new(64);
        let config = create_test_config();

        let first = runner.run_parallel(&config, 99, |_| {}).unwrap();
        let second = runner.run_parallel(&config, 99, |_| {}).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);

        let other_seed = runner.run_parallel(&config, 100, |_| {}).unwrap();
        assert_ne!(first, other_seed);
    }

    #[test]
    fn test_parallel_trial_matches_its_stream() {
        let config = create_test_config();
        let ensemble = MonteCarloRunner::new(8)
            .run_parallel(&config, 5, |_| {})
            .unwrap();

        let sampler = VariationSampler::default();
        let varied = sampler.sample(&config, &mut SeededSource::for_trial(5, 6));
        let expected = TrialOutcome::from(&simulate(&varied).unwrap().summary);
        assert_eq!(ensemble.outcomes[6], expected);
    }

    #[test]
    fn test_parallel_progress_reaches_one() {
        let seen = Mutex::new(Vec::new());
        MonteCarloRunner::new(16)
            .run_parallel(&create_test_config(), 3, |f| seen.lock().unwrap().push(f))
            .unwrap();

        let mut seen = seen.into_inner().unwrap();
        seen.sort_by(f64::total_cmp);
        assert_eq!(seen.len(), 16);
        assert_eq!(*seen.last().unwrap(), 1.0);
    }

    #[test]
    fn test_parallel_failing_trial_aborts_run() {
        let runner = MonteCarloRunner::new(8).with_model(FailingModel {
            calls: AtomicUsize::new(0),
        });
        let seen = Mutex::new(Vec::new());
        let result = runner.run_parallel(&create_test_config(), 1, |f| seen.lock().unwrap().push(f));

        assert_eq!(
            result,
            Err(SimulationError::Configuration("degenerate trial".to_string()))
        );
        assert!(seen.into_inner().unwrap().iter().all(|&f| f < 1.0));
    }

    #[test]
    fn test_parallel_run_honours_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let runner = MonteCarloRunner::new(12).with_cancellation(token);

        let progress_calls = AtomicUsize::new(0);
        let result = runner.run_parallel(&create_test_config(), 1, |_| {
            progress_calls.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(
            result,
            Err(SimulationError::Cancelled {
                completed: 0,
                requested: 12
            })
        );
        assert_eq!(progress_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_width_sampler_repeats_nominal() {
        let config = create_test_config();
        let nominal = TrialOutcome::from(&simulate(&config).unwrap().summary);
        let runner = MonteCarloRunner::new(6).with_sampler(VariationSampler::new(VariationBounds {
            mass_fraction: 0.0,
            thrust_fraction: 0.0,
            wind_speed: 0.0,
            wind_direction: 0.0,
            launch_angle: 0.0,
        }));

        let ensemble = runner
            .run(&config, &mut SeededSource::seeded(17), |_| {})
            .unwrap();
        assert_eq!(ensemble.len(), runner.trials());
        assert!(ensemble.outcomes.iter().all(|o| *o == nominal));
    }

    #[test]
    fn test_seeded_ensembles_repeat() {
        let config = create_test_config();
        let a = run_ensemble_seeded(&config, 30, 2024, |_| {}).unwrap();
        let b = run_ensemble_seeded(&config, 30, 2024, |_| {}).unwrap();
        assert_eq!(a, b);
    }
}
