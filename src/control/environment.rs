use serde::{Deserialize, Serialize};

use crate::constants::{
    GRAVITY, MOLAR_MASS_AIR, SEA_LEVEL_PRESSURE, SEA_LEVEL_TEMPERATURE,
    SPECIFIC_GAS_CONSTANT_AIR, TROPOPAUSE_TEMPERATURE, TROPOSPHERE_HEIGHT,
    TROPOSPHERE_LAPSE_RATE, UNIVERSAL_GAS_CONSTANT,
};

/// How the air density seen by the parachute is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Atmosphere {
    /// Ideal-gas density from temperature (K) and pressure (Pa).
    Conditions { temperature: f64, pressure: f64 },
    /// Precomputed density (kg/m³).
    Density { density: f64 },
}

impl Atmosphere {
    pub fn standard() -> Self {
        Atmosphere::Conditions {
            temperature: SEA_LEVEL_TEMPERATURE,
            pressure: SEA_LEVEL_PRESSURE,
        }
    }

    pub fn air_density(&self) -> f64 {
        match *self {
            Atmosphere::Conditions {
                temperature,
                pressure,
            } => air_density(temperature, pressure),
            Atmosphere::Density { density } => density,
        }
    }
}

impl Default for Atmosphere {
    fn default() -> Self {
        Atmosphere::standard()
    }
}

pub fn air_density(temperature: f64, pressure: f64) -> f64 {
    if pressure > 0.0 && temperature > 0.0 {
        pressure / (SPECIFIC_GAS_CONSTANT_AIR * temperature)
    } else {
        0.0
    }
}

/// International Standard Atmosphere state at a geometric altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AtmosphericConditions {
    pub altitude: f64,
    pub temperature: f64,
    pub pressure: f64,
    pub density: f64,
    pub speed_of_sound: f64,
}

impl AtmosphericConditions {
    pub fn at_altitude(altitude: f64) -> Self {
        let exponent = GRAVITY * MOLAR_MASS_AIR / (UNIVERSAL_GAS_CONSTANT * TROPOSPHERE_LAPSE_RATE);

        let (temperature, pressure) = if altitude < TROPOSPHERE_HEIGHT {
            let temperature = SEA_LEVEL_TEMPERATURE - TROPOSPHERE_LAPSE_RATE * altitude;
            let pressure = SEA_LEVEL_PRESSURE * (temperature / SEA_LEVEL_TEMPERATURE).powf(exponent);
            (temperature, pressure)
        } else {
            // Isothermal above the tropopause
            let tropopause_temp = SEA_LEVEL_TEMPERATURE - TROPOSPHERE_LAPSE_RATE * TROPOSPHERE_HEIGHT;
            let tropopause_pressure =
                SEA_LEVEL_PRESSURE * (tropopause_temp / SEA_LEVEL_TEMPERATURE).powf(exponent);
            let pressure = tropopause_pressure
                * (-GRAVITY * MOLAR_MASS_AIR * (altitude - TROPOSPHERE_HEIGHT)
                    / (UNIVERSAL_GAS_CONSTANT * TROPOPAUSE_TEMPERATURE))
                    .exp();
            (TROPOPAUSE_TEMPERATURE, pressure)
        };

        AtmosphericConditions {
            altitude,
            temperature,
            pressure,
            density: air_density(temperature, pressure),
            speed_of_sound: (1.4 * SPECIFIC_GAS_CONSTANT_AIR * temperature).sqrt(),
        }
    }

    pub fn as_atmosphere(&self) -> Atmosphere {
        Atmosphere::Conditions {
            temperature: self.temperature,
            pressure: self.pressure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::AIR_DENSITY_SEA_LEVEL;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_conditions_convert_to_atmosphere() {
        let site = AtmosphericConditions::at_altitude(1500.0);
        let atmosphere = site.as_atmosphere();
        assert_eq!(atmosphere.air_density(), site.density);
        assert!(matches!(atmosphere, Atmosphere::Conditions { .. }));
    }

    #[test]
    fn test_standard_sea_level_density() {
        let atmosphere = Atmosphere::standard();
        assert_abs_diff_eq!(atmosphere.air_density(), 1.225, epsilon = 0.001);
    }

    #[test]
    fn test_precomputed_density_passes_through() {
        let atmosphere = Atmosphere::Density { density: 1.1 };
        assert_eq!(atmosphere.air_density(), 1.1);
    }

    #[test]
    fn test_invalid_conditions_give_zero_density() {
        assert_eq!(air_density(0.0, 101_325.0), 0.0);
        assert_eq!(air_density(288.15, -5.0), 0.0);
    }

    #[test]
    fn test_isa_sea_level() {
        let conditions = AtmosphericConditions::at_altitude(0.0);
        assert_abs_diff_eq!(conditions.temperature, 288.15, epsilon = 1e-9);
        assert_abs_diff_eq!(conditions.pressure, 101_325.0, epsilon = 1e-6);
        assert_abs_diff_eq!(conditions.speed_of_sound, 340.3, epsilon = 0.1);
    }

    #[test]
    fn test_isa_tropopause() {
        let conditions = AtmosphericConditions::at_altitude(11_000.0);
        assert_abs_diff_eq!(conditions.temperature, 216.65, epsilon = 0.01);
        assert_abs_diff_eq!(conditions.pressure, 22_632.0, epsilon = 150.0);
        assert_abs_diff_eq!(conditions.density, 0.3639, epsilon = 0.01);
    }

    #[test]
    fn test_density_decreases_with_altitude() {
        let low = AtmosphericConditions::at_altitude(1_400.0);
        let high = AtmosphericConditions::at_altitude(15_000.0);
        assert!(low.density < AIR_DENSITY_SEA_LEVEL);
        assert!(high.density < low.density);
        assert_eq!(high.temperature, TROPOPAUSE_TEMPERATURE);
    }
}
