//! Piecewise-linear color scale over ordered breakpoints.

use heatmap_common::{ColorSchema, TileError, TileResult};

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Maps a scalar value to a color by linear interpolation between schema
/// stops. All color strings are normalized to triples at construction; a
/// malformed one fails the whole construction.
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<(f64, Rgb)>,
}

impl ColorScale {
    pub fn new(schema: &ColorSchema) -> TileResult<Self> {
        let stops = schema
            .stops()
            .iter()
            .map(|(value, color)| Ok((*value, parse_color(color)?)))
            .collect::<TileResult<Vec<_>>>()?;
        Ok(Self { stops })
    }

    /// Color for a value: clamped to the end stops outside the range,
    /// channel-wise interpolated between the bracketing stops inside it.
    pub fn color_for(&self, value: f64) -> Rgb {
        // ColorSchema guarantees at least one stop.
        let (first_value, first_color) = self.stops[0];
        if value < first_value {
            return first_color;
        }
        for pair in self.stops.windows(2) {
            let (low_value, low) = pair[0];
            let (high_value, high) = pair[1];
            if value < high_value {
                let t = (value - low_value) / (high_value - low_value);
                return Rgb {
                    r: lerp_channel(low.r, high.r, t),
                    g: lerp_channel(low.g, high.g, t),
                    b: lerp_channel(low.b, high.b, t),
                };
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

fn lerp_channel(left: u8, right: u8, t: f64) -> u8 {
    (left as f64 + (right as f64 - left as f64) * t).round() as u8
}

/// Normalize a configured color string to an RGB triple.
///
/// Accepts 3- and 6-digit hex ("#fff", "#ffffff") and "rgb(r, g, b)".
/// rgb() channels are taken modulo 255 to bound out-of-range input.
pub fn parse_color(s: &str) -> TileResult<Rgb> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| TileError::InvalidColorFormat(s.to_string()));
    }
    if let Some(inner) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        return parse_rgb_channels(inner)
            .ok_or_else(|| TileError::InvalidColorFormat(s.to_string()));
    }
    Err(TileError::InvalidColorFormat(s.to_string()))
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    // Byte-range slicing below must not land inside a multi-byte character.
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let mut channels = [0u8; 3];
            for (slot, c) in channels.iter_mut().zip(hex.chars()) {
                let digit = c.to_digit(16)? as u8;
                *slot = digit * 16 + digit;
            }
            Some(Rgb::new(channels[0], channels[1], channels[2]))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        _ => None,
    }
}

fn parse_rgb_channels(inner: &str) -> Option<Rgb> {
    let mut channels = [0u8; 3];
    let mut parts = inner.split(',');
    for slot in channels.iter_mut() {
        let part = parts.next()?.trim();
        if part.is_empty() || part.len() > 3 {
            return None;
        }
        let n: u32 = part.parse().ok()?;
        *slot = (n % 255) as u8;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Rgb::new(channels[0], channels[1], channels[2]))
}
