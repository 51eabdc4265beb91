//! Unit decoding and display conversion
//!
//! The API reports every measurement as an integer mantissa scaled by a
//! power of ten (`value`, `unit` on the wire). [`decode_value`] turns that
//! pair back into a physical quantity in the measurement's canonical unit
//! (kg, m, °C, mmHg, ...).
//!
//! The unit enums below only convert canonical values for presentation.
//! Records always hold the canonical value.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Mantissa / Exponent Decoding
// ============================================================================

/// Decode a wire measurement: `mantissa * 10^exponent`.
///
/// Negative exponents divide by `10^|exponent|`, which is exact for the
/// exponents the API uses, so `decode_value(7913, -3)` is exactly `7.913`.
pub fn decode_value(mantissa: i64, exponent: i32) -> f64 {
    let mantissa = mantissa as f64;
    if exponent >= 0 {
        mantissa * 10f64.powi(exponent)
    } else {
        mantissa / 10f64.powi(exponent.saturating_neg())
    }
}

// ============================================================================
// Weight Units
// ============================================================================

/// Display unit for masses (canonical: kilograms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
    Stone,
}

impl WeightUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value * 0.453592,
            WeightUnit::Stone => value * 6.35029,
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lbs => kg / 0.453592,
            WeightUnit::Stone => kg / 6.35029,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
            WeightUnit::Stone => "st",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lbs" | "lb" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            "st" | "stone" | "stones" => Ok(WeightUnit::Stone),
            _ => Err(format!("Unknown weight unit: {}", s)),
        }
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Display unit for heights (canonical: meters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Meters,
    Cm,
    Inches,
}

impl LengthUnit {
    /// Convert from this unit to meters
    pub fn to_meters(&self, value: f64) -> f64 {
        match self {
            LengthUnit::Meters => value,
            LengthUnit::Cm => value / 100.0,
            LengthUnit::Inches => value * 0.0254,
        }
    }

    /// Convert from meters to this unit
    pub fn from_meters(&self, meters: f64) -> f64 {
        match self {
            LengthUnit::Meters => meters,
            LengthUnit::Cm => meters * 100.0,
            LengthUnit::Inches => meters / 0.0254,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            LengthUnit::Meters => "m",
            LengthUnit::Cm => "cm",
            LengthUnit::Inches => "in",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "m" | "meter" | "meters" => Ok(LengthUnit::Meters),
            "cm" | "centimeter" | "centimeters" => Ok(LengthUnit::Cm),
            "in" | "inch" | "inches" => Ok(LengthUnit::Inches),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

// ============================================================================
// Temperature Units
// ============================================================================

/// Display unit for temperatures (canonical: Celsius)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert from this unit to Celsius
    pub fn to_celsius(&self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        }
    }

    /// Convert from Celsius to this unit
    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

// ============================================================================
// Display Preferences
// ============================================================================

/// Display units applied by [`crate::measures::Measurement::display`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UnitPreferences {
    pub weight: WeightUnit,
    pub length: LengthUnit,
    pub temperature: TemperatureUnit,
}

impl UnitPreferences {
    /// Canonical units, i.e. no conversion
    pub fn metric() -> Self {
        Self {
            weight: WeightUnit::Kg,
            length: LengthUnit::Meters,
            temperature: TemperatureUnit::Celsius,
        }
    }

    /// US customary units
    pub fn imperial() -> Self {
        Self {
            weight: WeightUnit::Lbs,
            length: LengthUnit::Inches,
            temperature: TemperatureUnit::Fahrenheit,
        }
    }

    pub fn uk() -> Self {
        Self {
            weight: WeightUnit::Stone,
            length: LengthUnit::Inches,
            temperature: TemperatureUnit::Celsius,
        }
    }
}
