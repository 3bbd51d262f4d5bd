//! Rescaling between the 0–255 sample domain and real-world units.

use serde::{Deserialize, Serialize};

/// Affine mapping from stored samples to real-world values.
///
/// Grids are commonly quantized to 0–255 on ingest; this carries the bounds
/// needed to read them back out. There is no universally correct range, so
/// anything producing real-world values requires one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueScale {
    /// Real-world value of sample 0
    pub min: f64,
    /// Real-world value of sample 255
    pub max: f64,
    /// Decimal places kept when formatting
    #[serde(default)]
    pub round_digits: u8,
}

impl ValueScale {
    pub fn new(min: f64, max: f64, round_digits: u8) -> Self {
        Self {
            min,
            max,
            round_digits,
        }
    }

    /// Real-world value of a raw sample.
    pub fn from_sample(&self, sample: f64) -> f64 {
        sample * (self.max - self.min) / 255.0 + self.min
    }

    /// Raw sample for a real-world value.
    pub fn to_sample(&self, value: f64) -> f64 {
        (value - self.min) * 255.0 / (self.max - self.min)
    }

    /// Format a raw sample as a real-world value string.
    pub fn format(&self, sample: f64) -> String {
        format!(
            "{:.*}",
            self.round_digits as usize,
            self.from_sample(sample)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sample() {
        let scale = ValueScale::new(0.0, 255.0, 0);
        assert_eq!(scale.from_sample(128.0), 128.0);

        let celsius = ValueScale::new(-60.0, 50.0, 0);
        assert_eq!(celsius.from_sample(0.0), -60.0);
        assert_eq!(celsius.from_sample(255.0), 50.0);
    }

    #[test]
    fn test_roundtrip() {
        let scale = ValueScale::new(-60.0, 50.0, 0);
        let sample = scale.to_sample(12.5);
        assert!((scale.from_sample(sample) - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_format_digits() {
        let scale = ValueScale::new(-50.0, 50.0, 1);
        assert_eq!(scale.format(128.0), "0.2");

        let whole = ValueScale::new(0.0, 255.0, 0);
        assert_eq!(whole.format(128.0), "128");
    }
}
