//! Color schema configuration: ordered value→color breakpoints.

use crate::{TileError, TileResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An ordered sequence of `(breakpoint value, color string)` stops.
///
/// Values must be strictly ascending and at least one stop is required.
/// Colors stay as configured strings here; they are normalized to RGB
/// triples when a color scale is built from the schema.
///
/// The JSON form matches the common configuration shape:
/// `[[0, "#CD0074"], [21, "#7209AB"], ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f64, String)>", into = "Vec<(f64, String)>")]
pub struct ColorSchema {
    stops: Vec<(f64, String)>,
}

impl ColorSchema {
    /// Create a schema, validating stop ordering.
    pub fn new(stops: Vec<(f64, String)>) -> TileResult<Self> {
        if stops.is_empty() {
            return Err(TileError::InvalidSchema(
                "schema must have at least one stop".to_string(),
            ));
        }
        for pair in stops.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(TileError::InvalidSchema(format!(
                    "stop values must be strictly ascending ({} follows {})",
                    pair[1].0, pair[0].0
                )));
            }
        }
        Ok(Self { stops })
    }

    /// Parse a schema from its JSON array form.
    pub fn from_json(json: &str) -> TileResult<Self> {
        serde_json::from_str(json).map_err(|e| TileError::InvalidSchema(e.to_string()))
    }

    /// Load a schema from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> TileResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TileError::InvalidSchema(e.to_string()))?;
        Self::from_json(&content)
    }

    /// The stock 12-stop palette over the 0–255 sample domain.
    pub fn default_palette() -> Self {
        let stops = [
            (0.0, "#CD0074"),
            (21.0, "#7209AB"),
            (43.0, "#3914B0"),
            (64.0, "#1240AC"),
            (106.0, "#009A9A"),
            (128.0, "#00CC00"),
            (149.0, "#9FEE00"),
            (170.0, "#FFFF00"),
            (191.0, "#FFD300"),
            (213.0, "#FFAA00"),
            (234.0, "#FF7400"),
            (255.0, "#FF0000"),
        ];
        Self {
            stops: stops
                .iter()
                .map(|(v, c)| (*v, (*c).to_string()))
                .collect(),
        }
    }

    pub fn stops(&self) -> &[(f64, String)] {
        &self.stops
    }
}

impl TryFrom<Vec<(f64, String)>> for ColorSchema {
    type Error = TileError;

    fn try_from(stops: Vec<(f64, String)>) -> TileResult<Self> {
        Self::new(stops)
    }
}

impl From<ColorSchema> for Vec<(f64, String)> {
    fn from(schema: ColorSchema) -> Self {
        schema.stops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_palette() {
        let schema = ColorSchema::default_palette();
        assert_eq!(schema.stops().len(), 12);
        assert_eq!(schema.stops()[0], (0.0, "#CD0074".to_string()));
        assert_eq!(schema.stops()[11].0, 255.0);
    }

    #[test]
    fn test_single_stop_allowed() {
        let schema = ColorSchema::new(vec![(0.0, "#fff".to_string())]).unwrap();
        assert_eq!(schema.stops().len(), 1);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            ColorSchema::new(vec![]),
            Err(TileError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_unordered_rejected() {
        let result = ColorSchema::new(vec![
            (0.0, "#000000".to_string()),
            (10.0, "#333333".to_string()),
            (10.0, "#666666".to_string()),
        ]);
        assert!(matches!(result, Err(TileError::InvalidSchema(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let schema =
            ColorSchema::from_json(r##"[[0, "#000000"], [100, "#FFFFFF"]]"##).unwrap();
        assert_eq!(schema.stops().len(), 2);

        let json = serde_json::to_string(&schema).unwrap();
        let back = ColorSchema::from_json(&json).unwrap();
        assert_eq!(schema, back);
    }

    #[test]
    fn test_json_unordered_rejected() {
        let result = ColorSchema::from_json(r##"[[100, "#FFFFFF"], [0, "#000000"]]"##);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r##"[[0, "#CD0074"], [255, "#FF0000"]]"##).unwrap();

        let schema = ColorSchema::from_file(file.path()).unwrap();
        assert_eq!(schema.stops().len(), 2);
    }
}
