use std::fmt;

use crate::dispersion_system::statistics::{DispersionSummary, MetricSummary};
use crate::trajectory_system::kinematics::SimulationResult;
use crate::trajectory_system::stability::StabilityReport;
use crate::utils::vector2d::Vector2D;

/// Terminal rendering of a flight or a dispersion run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub sections: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Report {
            sections: Vec::new(),
        }
    }

    fn format_vector2d(vec: &Vector2D, precision: usize) -> String {
        format!(
            "x = {:.precision$} m, y = {:.precision$} m",
            vec.x,
            vec.y,
            precision = precision
        )
    }

    pub fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 3600.0 {
            let hours = (elapsed_time / 3600.0).floor();
            let minutes = ((elapsed_time % 3600.0) / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}h {:.0}m {:.2}s", hours, minutes, seconds)
        } else if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    pub fn format_altitude(altitude: f64) -> String {
        if altitude >= 1000.0 {
            format!("{:.2} km", altitude / 1000.0)
        } else {
            format!("{:.2} m", altitude)
        }
    }

    fn format_metric(name: &str, metric: &MetricSummary, unit: &str) -> String {
        format!(
            "{}: mean {:.2} {unit}, std {:.2} {unit}, range {:.2}..{:.2} {unit}, p5 {:.2} {unit}, p95 {:.2} {unit}",
            name,
            metric.mean,
            metric.std_dev,
            metric.min,
            metric.max,
            metric.p5,
            metric.p95,
            unit = unit
        )
    }

    pub fn add_flight(&mut self, result: &SimulationResult) {
        let summary = &result.summary;
        let landing = Vector2D::new(summary.landing_x, summary.landing_y);

        self.sections.push(format!(
            "--- Flight Summary ---\n\
             Apogee: {}\n\
             Max Velocity: {:.2} m/s\n\
             Max Acceleration: {:.2} m/s²\n\
             Time to Apogee: {}\n\
             Flight Time: {}\n\
             Landing Velocity: {:.2} m/s\n\
             Landing Point: {} (Distance: {:.2} m)\n\
             Trajectory Samples: {}",
            Self::format_altitude(summary.apogee),
            summary.max_velocity,
            summary.max_acceleration,
            Self::format_time(summary.time_to_apogee),
            Self::format_time(summary.flight_time),
            summary.landing_velocity,
            Self::format_vector2d(&landing, 2),
            summary.landing_distance,
            result.trajectory.len(),
        ));

        let mut events = String::from("--- Flight Events ---");
        for event in &result.events {
            events.push_str(&format!(
                "\n{} at {} ({})",
                event.kind,
                Self::format_time(event.time),
                Self::format_altitude(event.altitude)
            ));
        }
        self.sections.push(events);
    }

    pub fn add_dispersion(&mut self, summary: &DispersionSummary) {
        let landing = &summary.landing;
        let center = Vector2D::new(landing.mean_x, landing.mean_y);

        self.sections.push(format!(
            "--- Dispersion Summary ({} trials) ---\n\
             {}\n\
             {}\n\
             Mean Landing Point: {}\n\
             Landing Std Dev: x = {:.2} m, y = {:.2} m\n\
             Landing Ellipse (2σ): {:.2} m × {:.2} m\n\
             Landing Distance: mean {:.2} m, p95 {:.2} m",
            summary.trials,
            Self::format_metric("Apogee", &summary.apogee, "m"),
            Self::format_metric("Flight Time", &summary.flight_time, "s"),
            Self::format_vector2d(&center, 2),
            landing.std_dev_x,
            landing.std_dev_y,
            landing.ellipse.semi_axis_x,
            landing.ellipse.semi_axis_y,
            landing.mean_distance,
            landing.p95_distance,
        ));
    }

    pub fn add_stability(&mut self, report: &StabilityReport) {
        self.sections.push(format!(
            "--- Static Stability ---\n\
             Center of Pressure: {:.3} m from nose\n\
             Center of Gravity: {:.3} m from nose\n\
             Margin: {:.2} cal\n\
             Verdict: {}",
            report.center_of_pressure, report.center_of_gravity, report.margin, report.rating,
        ));
    }

    pub fn flight(result: &SimulationResult) -> Self {
        let mut report = Report::new();
        report.add_flight(result);
        report
    }

    pub fn dispersion(summary: &DispersionSummary) -> Self {
        let mut report = Report::new();
        report.add_dispersion(summary);
        report
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sections.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::config::{MotorConfig, RocketConfig, SimulationConfig};
    use crate::dispersion_system::monte_carlo::run_ensemble_seeded;
    use crate::trajectory_system::kinematics::simulate;
    use crate::trajectory_system::stability::{analyze_stability, Airframe};

    fn create_test_config() -> SimulationConfig {
        SimulationConfig::new(
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
        )
    }

    #[test]
    fn test_time_formatting() {
        assert_eq!(Report::format_time(12.5), "12.50s");
        assert_eq!(Report::format_time(75.5), "1m 15.50s");
        assert_eq!(Report::format_time(3725.0), "1h 2m 5.00s");
    }

    #[test]
    fn test_altitude_formatting() {
        assert_eq!(Report::format_altitude(89.92), "89.92 m");
        assert_eq!(Report::format_altitude(1500.0), "1.50 km");
    }

    #[test]
    fn test_flight_report_lists_events() {
        let result = simulate(&create_test_config()).unwrap();
        let text = Report::flight(&result).to_string();

        assert!(text.starts_with("--- Flight Summary ---"));
        assert!(text.contains("Apogee: 89.92 m"));
        for label in ["Liftoff", "Burnout", "Apogee", "Chute Deploy", "Landing"] {
            assert!(text.contains(&format!("\n{} at ", label)), "missing {}", label);
        }
    }

    #[test]
    fn test_dispersion_report() {
        let summary = run_ensemble_seeded(&create_test_config(), 10, 1, |_| {}).unwrap();
        let text = Report::dispersion(&summary).to_string();

        assert!(text.contains("(10 trials)"));
        assert!(text.contains("Landing Ellipse (2σ)"));
    }

    #[test]
    fn test_stability_section_follows_flight() {
        let airframe = Airframe {
            body_radius: 0.0205,
            nose_length: 0.1,
            fins: None,
            center_of_mass: 0.3,
        };
        let stability = analyze_stability(&airframe).unwrap();
        let mut report = Report::flight(&simulate(&create_test_config()).unwrap());
        report.add_stability(&stability);
        let text = report.to_string();

        assert_eq!(report.sections.len(), 3);
        assert!(text.contains("\n\n--- Static Stability ---"));
        assert!(text.contains("Center of Pressure: 0.149 m from nose"));
        assert!(text.contains("Verdict: Unstable - add weight to nose or move fins aft"));
    }
}
