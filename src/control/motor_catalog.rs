use serde::Serialize;

use super::config_builder::RawMotor;

/// Catalog entry for a commercial hobby motor. Masses in grams, dimensions in
/// millimeters, as motor data sheets publish them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotorSpec {
    pub id: &'static str,
    pub manufacturer: &'static str,
    pub designation: &'static str,
    pub impulse_class: char,
    pub diameter: f64,        // mm
    pub length: f64,          // mm
    pub total_mass: f64,      // g
    pub propellant_mass: f64, // g
    pub average_thrust: f64,  // N
    pub max_thrust: f64,      // N
    pub burn_time: f64,       // s
    pub total_impulse: f64,   // N⋅s
    pub thrust_curve: &'static [(f64, f64)], // (s, N) published curve points
}

impl MotorSpec {
    pub fn to_raw_motor(&self) -> RawMotor {
        RawMotor {
            designation: Some(self.designation.to_string()),
            total_mass: Some(self.total_mass),
            average_thrust: Some(self.average_thrust),
            burn_time: Some(self.burn_time),
        }
    }
}

const MOTORS: &[MotorSpec] = &[
    MotorSpec {
        id: "Estes_A8",
        manufacturer: "Estes",
        designation: "A8",
        impulse_class: 'A',
        diameter: 18.0,
        length: 70.0,
        total_mass: 16.2,
        propellant_mass: 3.12,
        average_thrust: 5.0,
        max_thrust: 10.0,
        burn_time: 0.5,
        total_impulse: 2.5,
        thrust_curve: &[(0.0, 0.0), (0.02, 10.0), (0.1, 8.0), (0.25, 5.0), (0.4, 3.0), (0.5, 0.0)],
    },
    MotorSpec {
        id: "Estes_B6",
        manufacturer: "Estes",
        designation: "B6",
        impulse_class: 'B',
        diameter: 18.0,
        length: 70.0,
        total_mass: 18.4,
        propellant_mass: 5.6,
        average_thrust: 6.0,
        max_thrust: 13.0,
        burn_time: 0.85,
        total_impulse: 5.0,
        thrust_curve: &[(0.0, 0.0), (0.03, 13.0), (0.15, 9.0), (0.4, 6.0), (0.7, 4.0), (0.85, 0.0)],
    },
    MotorSpec {
        id: "Estes_C6",
        manufacturer: "Estes",
        designation: "C6",
        impulse_class: 'C',
        diameter: 18.0,
        length: 70.0,
        total_mass: 24.0,
        propellant_mass: 10.8,
        average_thrust: 6.0,
        max_thrust: 14.0,
        burn_time: 1.6,
        total_impulse: 8.8,
        thrust_curve: &[(0.0, 0.0), (0.04, 14.0), (0.2, 10.0), (0.5, 7.0), (1.0, 5.0), (1.4, 3.0), (1.6, 0.0)],
    },
    MotorSpec {
        id: "Estes_D12",
        manufacturer: "Estes",
        designation: "D12",
        impulse_class: 'D',
        diameter: 24.0,
        length: 70.0,
        total_mass: 44.0,
        propellant_mass: 21.1,
        average_thrust: 12.0,
        max_thrust: 30.0,
        burn_time: 1.6,
        total_impulse: 16.8,
        thrust_curve: &[(0.0, 0.0), (0.03, 30.0), (0.1, 22.0), (0.4, 14.0), (0.8, 11.0), (1.2, 8.0), (1.6, 0.0)],
    },
    MotorSpec {
        id: "Estes_E12",
        manufacturer: "Estes",
        designation: "E12",
        impulse_class: 'E',
        diameter: 24.0,
        length: 95.0,
        total_mass: 57.0,
        propellant_mass: 33.0,
        average_thrust: 12.0,
        max_thrust: 35.0,
        burn_time: 2.2,
        total_impulse: 28.4,
        thrust_curve: &[(0.0, 0.0), (0.04, 35.0), (0.2, 22.0), (0.6, 14.0), (1.2, 10.0), (1.8, 6.0), (2.2, 0.0)],
    },
    MotorSpec {
        id: "Aerotech_F50",
        manufacturer: "Aerotech",
        designation: "F50",
        impulse_class: 'F',
        diameter: 29.0,
        length: 83.0,
        total_mass: 85.0,
        propellant_mass: 37.0,
        average_thrust: 50.0,
        max_thrust: 78.0,
        burn_time: 1.5,
        total_impulse: 72.0,
        thrust_curve: &[(0.0, 0.0), (0.02, 78.0), (0.1, 65.0), (0.4, 55.0), (0.8, 48.0), (1.2, 35.0), (1.5, 0.0)],
    },
    MotorSpec {
        id: "Aerotech_G80",
        manufacturer: "Aerotech",
        designation: "G80",
        impulse_class: 'G',
        diameter: 29.0,
        length: 124.0,
        total_mass: 125.0,
        propellant_mass: 62.5,
        average_thrust: 80.0,
        max_thrust: 115.0,
        burn_time: 1.5,
        total_impulse: 120.0,
        thrust_curve: &[(0.0, 0.0), (0.02, 115.0), (0.15, 95.0), (0.5, 85.0), (0.9, 75.0), (1.3, 50.0), (1.5, 0.0)],
    },
    MotorSpec {
        id: "Aerotech_H128",
        manufacturer: "Aerotech",
        designation: "H128",
        impulse_class: 'H',
        diameter: 29.0,
        length: 195.0,
        total_mass: 195.0,
        propellant_mass: 95.0,
        average_thrust: 128.0,
        max_thrust: 180.0,
        burn_time: 1.65,
        total_impulse: 210.0,
        thrust_curve: &[(0.0, 0.0), (0.02, 180.0), (0.15, 155.0), (0.5, 140.0), (1.0, 110.0), (1.4, 70.0), (1.65, 0.0)],
    },
    MotorSpec {
        id: "Aerotech_I284",
        manufacturer: "Aerotech",
        designation: "I284",
        impulse_class: 'I',
        diameter: 38.0,
        length: 230.0,
        total_mass: 350.0,
        propellant_mass: 175.0,
        average_thrust: 284.0,
        max_thrust: 380.0,
        burn_time: 1.5,
        total_impulse: 400.0,
        thrust_curve: &[(0.0, 0.0), (0.02, 380.0), (0.12, 320.0), (0.4, 300.0), (0.8, 280.0), (1.2, 200.0), (1.5, 0.0)],
    },
    MotorSpec {
        id: "Cesaroni_M1670",
        manufacturer: "Cesaroni",
        designation: "M1670",
        impulse_class: 'M',
        diameter: 75.0,
        length: 621.0,
        total_mass: 4827.0,
        propellant_mass: 2727.0,
        average_thrust: 1670.0,
        max_thrust: 2100.0,
        burn_time: 3.9,
        total_impulse: 6500.0,
        thrust_curve: &[(0.0, 0.0), (0.1, 2100.0), (0.5, 1900.0), (1.5, 1700.0), (2.5, 1600.0), (3.5, 1400.0), (3.9, 0.0)],
    },
];

pub struct MotorCatalog;

impl MotorCatalog {
    pub fn all() -> &'static [MotorSpec] {
        MOTORS
    }

    pub fn find(id: &str) -> Option<&'static MotorSpec> {
        MOTORS.iter().find(|motor| motor.id.eq_ignore_ascii_case(id))
    }

    /// Filters by impulse class and/or manufacturer, both case-insensitive.
    pub fn search(impulse_class: Option<char>, manufacturer: Option<&str>) -> Vec<&'static MotorSpec> {
        MOTORS
            .iter()
            .filter(|motor| {
                impulse_class.map_or(true, |class| {
                    motor.impulse_class == class.to_ascii_uppercase()
                })
            })
            .filter(|motor| {
                manufacturer.map_or(true, |name| motor.manufacturer.eq_ignore_ascii_case(name))
            })
            .collect()
    }
}
