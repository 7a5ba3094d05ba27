//! Maps an LGA's school count to marker size and colour.

use crate::config::EncodingConfig;
use serde::Serialize;

pub const EMPTY_RADIUS: u32 = 5;
/// Radius for each fifth of the dataset maximum, smallest first.
pub const RADIUS_STEPS: [u32; 5] = [7, 10, 13, 16, 20];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    DarkGreen,
    LightGreen,
    Yellow,
    Orange,
    Red,
    Gray,
}

impl MarkerColor {
    pub fn css_name(self) -> &'static str {
        match self {
            MarkerColor::DarkGreen => "darkgreen",
            MarkerColor::LightGreen => "lightgreen",
            MarkerColor::Yellow => "yellow",
            MarkerColor::Orange => "orange",
            MarkerColor::Red => "red",
            MarkerColor::Gray => "gray",
        }
    }
}

/// Marker radius in pixels, bucketed by fifths of `max`.
pub fn radius(count: u32, max: u32) -> u32 {
    if count == 0 {
        return EMPTY_RADIUS;
    }
    let count = count as f64;
    let fifth = max as f64 / 5.0;
    RADIUS_STEPS[..4].iter()
        .zip(1..)
        .find(|&(_, k)| count <= fifth * k as f64)
        .map(|(&r, _)| r)
        .unwrap_or(RADIUS_STEPS[4])
}

/// Fixed count thresholds; only the top bucket depends on the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScale {
    bounds: EncodingConfig,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::new(EncodingConfig::default())
    }
}

impl ColorScale {
    pub fn new(bounds: EncodingConfig) -> Self {
        Self { bounds }
    }

    pub fn color(&self, count: u32, max: u32) -> MarkerColor {
        let b = &self.bounds;
        if count <= b.dark_green {
            MarkerColor::DarkGreen
        } else if count <= b.light_green {
            MarkerColor::LightGreen
        } else if count <= b.yellow {
            MarkerColor::Yellow
        } else if count <= b.orange {
            MarkerColor::Orange
        } else if count <= max {
            MarkerColor::Red
        } else {
            MarkerColor::Gray
        }
    }
}
