//! Configuration types for a mounted universe view.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

fn default_steps_per_frame() -> u32 {
    3
}

fn default_frame_rate_window() -> usize {
    100
}

fn default_field_of_view() -> f32 {
    100.0
}

/// Top-level view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Universe dimensions and seeding.
    #[serde(default)]
    pub universe: UniverseConfig,
    /// Simulation steps advanced per displayed frame.
    #[serde(default = "default_steps_per_frame")]
    pub steps_per_frame: u32,
    /// Number of instantaneous frame rates kept for statistics.
    #[serde(default = "default_frame_rate_window")]
    pub frame_rate_window: usize,
    /// Drawing surface size in logical pixels.
    #[serde(default)]
    pub surface: SurfaceConfig,
    /// Cell colors.
    #[serde(default)]
    pub palette: Palette,
    /// Vertical field of view of the scene camera, in degrees.
    #[serde(default = "default_field_of_view")]
    pub field_of_view: f32,
    /// Which drawing backend to mount.
    #[serde(default)]
    pub backend: BackendKind,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            universe: UniverseConfig::default(),
            steps_per_frame: default_steps_per_frame(),
            frame_rate_window: default_frame_rate_window(),
            surface: SurfaceConfig::default(),
            palette: Palette::default(),
            field_of_view: default_field_of_view(),
            backend: BackendKind::default(),
        }
    }
}

/// Universe dimensions in cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseConfig {
    pub width: u16,
    pub height: u16,
    /// Seed for the random initial state. `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            seed: None,
        }
    }
}

/// Logical pixel size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
        }
    }
}

/// Alive / dead cell colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub alive: Color,
    pub dead: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            alive: Color::BLACK,
            dead: Color::WHITE,
        }
    }
}

/// Drawing backend selected at composition time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Immediate-mode 2D raster drawing.
    #[default]
    Raster,
    /// Retained-mode 3D scene graph.
    Scene,
}

/// Opaque RGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` (or `rrggbb`) hex string.
    pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ConfigError::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ConfigError::InvalidColor(hex.to_string()))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// RGBA bytes with full opacity.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xff]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl ViewConfig {
    /// Total number of cells in the configured universe.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.universe.width as usize * self.universe.height as usize
    }

    /// Read and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: ViewConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.universe.width == 0 || self.universe.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err(ConfigError::InvalidSurface);
        }
        if self.steps_per_frame == 0 {
            return Err(ConfigError::InvalidStepsPerFrame);
        }
        if self.frame_rate_window == 0 {
            return Err(ConfigError::InvalidFrameRateWindow);
        }
        if !(self.field_of_view > 0.0 && self.field_of_view < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(self.field_of_view));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Universe dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Surface dimensions (width, height) must be non-zero")]
    InvalidSurface,
    #[error("Steps per frame must be non-zero")]
    InvalidStepsPerFrame,
    #[error("Frame rate window must hold at least one sample")]
    InvalidFrameRateWindow,
    #[error("Field of view must lie strictly between 0 and 180 degrees, got {0}")]
    InvalidFieldOfView(f32),
    #[error("Invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
