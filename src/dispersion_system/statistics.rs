use serde::{Deserialize, Serialize};

use super::monte_carlo::Ensemble;
use crate::errors::SimulationError;
use crate::utils::vector2d::Vector2D;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p95: f64,
}

/// Approximate 95% landing region: two standard deviations on each axis,
/// treated as independent. Not a fitted covariance ellipse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispersionEllipse {
    pub center: Vector2D,
    pub semi_axis_x: f64,
    pub semi_axis_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingDispersion {
    pub mean_x: f64,
    pub mean_y: f64,
    pub std_dev_x: f64,
    pub std_dev_y: f64,
    pub mean_distance: f64,
    pub p95_distance: f64,
    pub ellipse: DispersionEllipse,
    pub points: Vec<Vector2D>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispersionSummary {
    pub trials: usize,
    pub apogee: MetricSummary,
    pub flight_time: MetricSummary,
    pub landing: LandingDispersion,
}

/// Arithmetic mean, accumulated as offsets from the first value so that a set
/// of identical values averages to exactly that value. NaN for no values.
pub fn mean(values: &[f64]) -> f64 {
    let Some(&origin) = values.first() else {
        return f64::NAN;
    };
    origin + values.iter().map(|v| v - origin).sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N).
pub fn std_dev(values: &[f64]) -> f64 {
    spread_about(values, mean(values))
}

fn spread_about(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Centroid of the landing points, with the same exactness as [`mean`].
pub fn mean_point(points: &[Vector2D]) -> Vector2D {
    let origin = points.first().copied().unwrap_or_default();
    origin + points.iter().map(|&p| p - origin).sum::<Vector2D>() / points.len() as f64
}

/// Nearest-rank percentile: index `floor(len * p / 100)` of the sorted values,
/// clamped into range so `p = 100` yields the maximum. `None` for no values.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (sorted.len() as f64 * p / 100.0).floor();
    let index = if rank <= 0.0 {
        0
    } else {
        (rank as usize).min(sorted.len() - 1)
    };
    Some(sorted[index])
}

fn summarize(values: &[f64]) -> Result<MetricSummary, SimulationError> {
    let (Some(p5), Some(p95)) = (percentile(values, 5.0), percentile(values, 95.0)) else {
        return Err(SimulationError::EmptyEnsemble);
    };
    Ok(MetricSummary {
        mean: mean(values),
        std_dev: std_dev(values),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        p5,
        p95,
    })
}

/// Reduces an ensemble to its dispersion statistics.
pub fn analyze(ensemble: &Ensemble) -> Result<DispersionSummary, SimulationError> {
    if ensemble.is_empty() {
        return Err(SimulationError::EmptyEnsemble);
    }

    let outcomes = &ensemble.outcomes;
    let apogees: Vec<f64> = outcomes.iter().map(|o| o.apogee).collect();
    let flight_times: Vec<f64> = outcomes.iter().map(|o| o.flight_time).collect();
    let points: Vec<Vector2D> = outcomes.iter().map(|o| o.landing).collect();
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let distances: Vec<f64> = outcomes.iter().map(|o| o.landing_distance).collect();

    let center = mean_point(&points);
    let std_dev_x = spread_about(&xs, center.x);
    let std_dev_y = spread_about(&ys, center.y);

    let landing = LandingDispersion {
        mean_x: center.x,
        mean_y: center.y,
        std_dev_x,
        std_dev_y,
        mean_distance: mean(&distances),
        p95_distance: percentile(&distances, 95.0).ok_or(SimulationError::EmptyEnsemble)?,
        ellipse: DispersionEllipse {
            center,
            semi_axis_x: 2.0 * std_dev_x,
            semi_axis_y: 2.0 * std_dev_y,
        },
        points,
    };

    Ok(DispersionSummary {
        trials: outcomes.len(),
        apogee: summarize(&apogees)?,
        flight_time: summarize(&flight_times)?,
        landing,
    })
}

/// Stateless front for [`analyze`], for callers that hold analyzers by value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispersionAnalyzer;

impl DispersionAnalyzer {
    pub fn analyze(&self, ensemble: &Ensemble) -> Result<DispersionSummary, SimulationError> {
        analyze(ensemble)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispersion_system::monte_carlo::TrialOutcome;
    use approx::assert_relative_eq;

    fn outcome(apogee: f64, x: f64, y: f64) -> TrialOutcome {
        let landing = Vector2D::new(x, y);
        TrialOutcome {
            apogee,
            flight_time: apogee / 10.0,
            landing,
            landing_distance: landing.magnitude(),
        }
    }

    #[test]
    fn test_population_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0);
        assert_relative_eq!(std_dev(&values), 2.0);
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let values: Vec<f64> = (1..=20).map(f64::from).collect();
        assert_eq!(percentile(&values, 5.0), Some(2.0));
        assert_eq!(percentile(&values, 50.0), Some(11.0));
        assert_eq!(percentile(&values, 95.0), Some(20.0));
    }

    #[test]
    fn test_percentile_boundaries() {
        let values = [3.0, 1.0, 2.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 100.0), Some(3.0));
        assert_eq!(percentile(&[42.0], 100.0), Some(42.0));
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_percentile_sorts_input() {
        let values = [9.0, -1.0, 4.0, 0.5];
        assert_eq!(percentile(&values, 0.0), Some(-1.0));
        assert_eq!(percentile(&values, 50.0), Some(4.0));
    }

    #[test]
    fn test_empty_ensemble_rejected() {
        assert_eq!(
            analyze(&Ensemble::default()),
            Err(SimulationError::EmptyEnsemble)
        );
    }

    #[test]
    fn test_landing_statistics() {
        let ensemble = Ensemble {
            outcomes: vec![
                outcome(100.0, 3.0, 4.0),
                outcome(110.0, -3.0, 4.0),
                outcome(90.0, 3.0, -4.0),
                outcome(100.0, -3.0, -4.0),
            ],
        };
        let summary = analyze(&ensemble).unwrap();

        assert_eq!(summary.trials, 4);
        assert_relative_eq!(summary.landing.mean_x, 0.0);
        assert_relative_eq!(summary.landing.mean_y, 0.0);
        assert_relative_eq!(summary.landing.std_dev_x, 3.0);
        assert_relative_eq!(summary.landing.std_dev_y, 4.0);
        assert_relative_eq!(summary.landing.ellipse.semi_axis_x, 6.0);
        assert_relative_eq!(summary.landing.ellipse.semi_axis_y, 8.0);
        assert_relative_eq!(summary.landing.mean_distance, 5.0);
        assert_relative_eq!(summary.landing.p95_distance, 5.0);
        assert_eq!(summary.landing.points.len(), 4);
        assert_eq!(summary.landing.points[1], Vector2D::new(-3.0, 4.0));

        assert_relative_eq!(summary.apogee.mean, 100.0);
        assert_eq!(summary.apogee.min, 90.0);
        assert_eq!(summary.apogee.max, 110.0);
        assert_eq!(summary.apogee.p5, 90.0);
        assert_eq!(summary.apogee.p95, 110.0);
        assert_relative_eq!(summary.apogee.std_dev, 50.0_f64.sqrt());
    }

    #[test]
    fn test_identical_values_average_exactly() {
        let apogee = 89.920_998_980_631_99;
        for n in [2, 3, 7, 100] {
            let values = vec![apogee; n];
            assert_eq!(mean(&values), apogee);
            assert_eq!(std_dev(&values), 0.0);
        }

        let point = Vector2D::new(-12.345_678_9, 7.654_321);
        assert_eq!(mean_point(&vec![point; 3]), point);
    }

    #[test]
    fn test_identical_outcomes_have_zero_spread() {
        let ensemble = Ensemble {
            outcomes: vec![outcome(101.3, 16.7, -9.9); 9],
        };
        let summary = analyze(&ensemble).unwrap();

        assert_eq!(summary.apogee.mean, 101.3);
        assert_eq!(summary.flight_time.mean, 101.3 / 10.0);
        assert_eq!(summary.landing.mean_x, 16.7);
        assert_eq!(summary.landing.mean_y, -9.9);
        assert_eq!(summary.apogee.std_dev, 0.0);
        assert_eq!(summary.flight_time.std_dev, 0.0);
        assert_eq!(summary.landing.std_dev_x, 0.0);
        assert_eq!(summary.landing.std_dev_y, 0.0);
    }

    #[test]
    fn test_empty_mean_is_nan() {
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_single_trial_has_zero_spread() {
        let summary = analyze(&Ensemble {
            outcomes: vec![outcome(95.0, 1.0, 2.0)],
        })
        .unwrap();

        assert_eq!(summary.apogee.std_dev, 0.0);
        assert_eq!(summary.apogee.p5, 95.0);
        assert_eq!(summary.apogee.p95, 95.0);
        assert_eq!(summary.landing.ellipse.semi_axis_x, 0.0);
        assert_eq!(summary.landing.ellipse.semi_axis_y, 0.0);
    }
}
