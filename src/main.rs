use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rocket_dispersion::*;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "main")]
#[command(about = "Closed-form sounding rocket flight and landing dispersion estimates")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fly the nominal configuration once
    Simulate(FlightArgs),

    /// Estimate the landing zone from perturbed trials
    MonteCarlo {
        #[command(flatten)]
        flight: FlightArgs,

        #[arg(long, default_value_t = DEFAULT_TRIALS)]
        trials: usize,

        /// Seed for a reproducible run; entropy when omitted
        #[arg(long)]
        seed: Option<u64>,

        /// Spread trials across all cores
        #[arg(long)]
        parallel: bool,
    },

    /// Estimate the static stability margin from the rocket geometry
    Stability {
        /// JSON document with a rocket section
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Center of mass in mm from the nose tip, replacing the input value
        #[arg(long)]
        center_of_mass: Option<f64>,
    },

    /// List the built-in motor catalog
    Motors {
        /// Impulse class letter, e.g. "C"
        #[arg(long)]
        class: Option<char>,

        #[arg(long)]
        manufacturer: Option<String>,
    },
}

#[derive(Args, Debug)]
struct FlightArgs {
    /// JSON document with rocket, motor, settings and environment sections
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Catalog motor id, replacing the motor section of the input
    #[arg(long)]
    motor: Option<String>,

    // ── Overrides ─────────────────────────────────────────────
    #[arg(long)]
    wind_speed: Option<f64>,

    #[arg(long)]
    wind_direction: Option<f64>,

    #[arg(long)]
    time_step: Option<f64>,
}

fn load_input(path: Option<&PathBuf>) -> Result<SimulationInput> {
    match path {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<SimulationInput>(&text)
                .with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(SimulationInput::default()),
    }
}

impl FlightArgs {
    fn load_config(&self) -> Result<SimulationConfig> {
        let mut input = load_input(self.input.as_ref())?;

        if let Some(id) = &self.motor {
            let Some(spec) = MotorCatalog::find(id) else {
                bail!("unknown motor '{}', see the motors subcommand", id);
            };
            input.motor = spec.to_raw_motor();
        }
        if self.time_step.is_some() {
            input.settings.time_step = self.time_step;
        }
        // Command-line wind beats both manual settings and a stored weather snapshot
        if self.wind_speed.is_some() {
            input.settings.wind_speed = self.wind_speed;
            if let Some(snapshot) = input.environment.as_mut() {
                snapshot.wind_speed = self.wind_speed;
            }
        }
        if self.wind_direction.is_some() {
            input.settings.wind_direction = self.wind_direction;
            if let Some(snapshot) = input.environment.as_mut() {
                snapshot.wind_direction = self.wind_direction;
            }
        }

        Ok(input.into_builder().build())
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Simulate(flight) => {
            let config = flight.load_config()?;
            let result = simulate(&config)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", Report::flight(&result));
            }
        }
        Commands::MonteCarlo {
            flight,
            trials,
            seed,
            parallel,
        } => {
            let config = flight.load_config()?;
            let nominal = simulate(&config)?;
            let seed = seed.unwrap_or_else(rand::random::<u64>);
            info!(seed, trials, parallel, "dispersion run");

            let runner = MonteCarloRunner::new(trials);
            let ensemble = if parallel {
                runner.run_parallel(&config, seed, |_| {})?
            } else {
                let mut source = SeededSource::seeded(seed);
                let mut next_report = 0.1;
                runner.run(&config, &mut source, |fraction| {
                    if fraction >= next_report {
                        info!("{:.0}% of trials complete", fraction * 100.0);
                        next_report += 0.1;
                    }
                })?
            };
            let summary = DispersionAnalyzer.analyze(&ensemble)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let mut report = Report::flight(&nominal);
                report.add_dispersion(&summary);
                println!("{}", report);
            }
        }
        Commands::Stability {
            input,
            center_of_mass,
        } => {
            let mut input = load_input(input.as_ref())?;
            if center_of_mass.is_some() {
                input.rocket.center_of_mass = center_of_mass;
            }
            let stability = analyze_stability(&input.into_builder().build_airframe())?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stability)?);
            } else {
                let mut report = Report::new();
                report.add_stability(&stability);
                println!("{}", report);
            }
        }
        Commands::Motors {
            class,
            manufacturer,
        } => {
            let motors = MotorCatalog::search(class, manufacturer.as_deref());
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&motors)?);
            } else {
                println!(
                    "{:<20} {:<12} {:>6} {:>9} {:>8} {:>10}",
                    "ID", "Maker", "Class", "Avg (N)", "Burn (s)", "Total (Ns)"
                );
                for motor in motors {
                    println!(
                        "{:<20} {:<12} {:>6} {:>9.1} {:>8.2} {:>10.1}",
                        motor.id,
                        motor.manufacturer,
                        motor.impulse_class,
                        motor.average_thrust,
                        motor.burn_time,
                        motor.total_impulse
                    );
                }
            }
        }
    }

    Ok(())
}
