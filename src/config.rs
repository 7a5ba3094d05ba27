use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Context, Result};

pub const DEFAULT_SHEET: &str = "SchoolLocations 2023";

// Colour bucket upper bounds (inclusive), in schools per LGA.
pub const DARK_GREEN_MAX: u32 = 5;
pub const LIGHT_GREEN_MAX: u32 = 15;
pub const YELLOW_MAX: u32 = 30;
pub const ORANGE_MAX: u32 = 50;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub encoding: EncodingConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub path: PathBuf,
    #[serde(default = "default_sheet")]
    pub sheet: String, // Ignored for CSV input
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
}

impl Default for MapConfig {
    // Roughly the centroid of continental Australia.
    fn default() -> Self {
        Self {
            center_lat: -25.2744,
            center_lon: 133.7751,
            zoom: 4,
            width: 1500,
            height: 700,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct EncodingConfig {
    pub dark_green: u32,
    pub light_green: u32,
    pub yellow: u32,
    pub orange: u32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            dark_green: DARK_GREEN_MAX,
            light_green: LIGHT_GREEN_MAX,
            yellow: YELLOW_MAX,
            orange: ORANGE_MAX,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    pub port: u16,
}

fn default_sheet() -> String {
    DEFAULT_SHEET.to_string()
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }
}
