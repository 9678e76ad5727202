//! Physical units and value conversion
//!
//! Units are identified by strings (e.g. `"count"`, `"kcal"`, `"m"`). Two
//! units are either identical, related by a known linear factor within the
//! same dimension, or incompatible. Conversion never rounds: the full `f64`
//! precision of the input is preserved, and the identical-unit path performs
//! no arithmetic at all.
//!
//! # Example
//!
//! ```rust
//! use vitalstore::unit::Unit;
//!
//! let km = Unit::new("km");
//! let m = Unit::new("m");
//!
//! assert_eq!(km.convert(2.5, &m).unwrap(), 2500.0);
//! assert_eq!(m.convert(42.0, &m).unwrap(), 42.0); // identity, exact
//! assert!(km.convert(1.0, &Unit::new("kcal")).is_err());
//! ```

use crate::error::UnitError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical dimension of a unit
///
/// Conversion is only defined between units of the same dimension.
/// Temperature is deliberately absent: Celsius/Fahrenheit conversion is
/// affine, not linear, and is out of scope for this model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Dimensionless counts (steps, occurrences)
    Count,
    /// Counts per minute (heart rate, respiratory rate)
    CountPerMinute,
    /// Mass
    Mass,
    /// Length / distance
    Length,
    /// Energy
    Energy,
    /// Duration
    Duration,
    /// Volume
    Volume,
    /// Percentage (0-100 scale)
    Percent,
    /// Blood glucose concentration
    BloodGlucose,
}

/// Resolve a unit identifier to its dimension and linear factor relative to
/// the dimension's base unit.
///
/// Returns `None` for identifiers with no entry in the table. The table is
/// the single source of truth for convertibility; adding a unit means adding
/// a row here.
fn lookup(identifier: &str) -> Option<(Dimension, f64)> {
    let entry = match identifier {
        // Counts
        "count" => (Dimension::Count, 1.0),
        "count/min" => (Dimension::CountPerMinute, 1.0),

        // Mass (base: gram)
        "g" => (Dimension::Mass, 1.0),
        "kg" => (Dimension::Mass, 1_000.0),
        "mg" => (Dimension::Mass, 0.001),
        "lb" => (Dimension::Mass, 453.592_37),
        "oz" => (Dimension::Mass, 28.349_523_125),

        // Length (base: meter)
        "m" => (Dimension::Length, 1.0),
        "cm" => (Dimension::Length, 0.01),
        "km" => (Dimension::Length, 1_000.0),
        "mi" => (Dimension::Length, 1_609.344),
        "ft" => (Dimension::Length, 0.3048),
        "in" => (Dimension::Length, 0.0254),

        // Energy (base: kilocalorie)
        "kcal" => (Dimension::Energy, 1.0),
        "cal" => (Dimension::Energy, 0.001),
        "kJ" => (Dimension::Energy, 1.0 / 4.184),
        "J" => (Dimension::Energy, 1.0 / 4_184.0),

        // Duration (base: second)
        "s" => (Dimension::Duration, 1.0),
        "ms" => (Dimension::Duration, 0.001),
        "min" => (Dimension::Duration, 60.0),
        "hr" => (Dimension::Duration, 3_600.0),

        // Volume (base: liter)
        "L" => (Dimension::Volume, 1.0),
        "mL" => (Dimension::Volume, 0.001),
        "fl_oz_us" => (Dimension::Volume, 0.029_573_529_562_5),

        // Percent
        "%" => (Dimension::Percent, 1.0),

        // Blood glucose (base: mg/dL)
        "mg/dL" => (Dimension::BloodGlucose, 1.0),
        "mmol/L" => (Dimension::BloodGlucose, 18.018_2),

        _ => return None,
    };
    Some(entry)
}

/// A physical unit identified by a string
///
/// Wraps the identifier without eagerly validating it: an unknown identifier
/// is still a usable unit for identity conversion, it just cannot convert to
/// anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unit(String);

impl Unit {
    /// Create a unit from its string identifier
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    /// The unit's string identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The unit's dimension, if it is in the conversion table
    pub fn dimension(&self) -> Option<Dimension> {
        lookup(&self.0).map(|(dim, _)| dim)
    }

    /// Convert a value expressed in this unit into `target`
    ///
    /// Identical units return the value untouched (exact identity, no factor
    /// multiplication). Units in the same dimension convert through their
    /// linear factors. Anything else fails with [`UnitError::Incompatible`].
    pub fn convert(&self, value: f64, target: &Unit) -> Result<f64, UnitError> {
        if self.0 == target.0 {
            return Ok(value);
        }

        let incompatible = || UnitError::Incompatible {
            from: self.0.clone(),
            to: target.0.clone(),
        };

        let (from_dim, from_factor) = lookup(&self.0).ok_or_else(incompatible)?;
        let (to_dim, to_factor) = lookup(&target.0).ok_or_else(incompatible)?;

        if from_dim != to_dim {
            return Err(incompatible());
        }

        Ok(value * from_factor / to_factor)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Unit {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
