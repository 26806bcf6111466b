use crate::errors::{OverlayError, OverlayResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable naming a JSON configuration file
pub const CONFIG_PATH_ENV: &str = "SCREEN_OVERLAY_CONFIG";
pub const DISPLAY_ENV: &str = "SCREEN_OVERLAY_DISPLAY";
pub const POLL_TIMEOUT_ENV: &str = "SCREEN_OVERLAY_POLL_TIMEOUT_MS";

/// Placement and appearance of one composed window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Higher values render on top
    pub zorder: i32,
    /// Whether the window consumes pointer/touch input
    pub sensitive: bool,
    /// Window-level alpha (0 = invisible, 255 = opaque); left to the service when unset
    pub transparency: Option<u8>,
    /// Solid ARGB fill colour
    pub color: u32,
}

impl WindowConfig {
    /// Position vector as the service takes it: x, y, width, height
    pub fn rect(&self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    pub fn size(&self) -> [i32; 2] {
        [self.width, self.height]
    }

    /// Opaque black, touch sensitive, at 100,100
    pub fn background() -> Self {
        Self {
            x: 100,
            y: 100,
            width: 500,
            height: 500,
            zorder: -1,
            sensitive: true,
            transparency: None,
            color: 0xFF00_0000,
        }
    }

    /// Semi-transparent blue, touch transparent, covering the background
    pub fn overlay() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1000,
            height: 1000,
            zorder: 0,
            sensitive: false,
            transparency: Some(128),
            color: 0x8000_00FF,
        }
    }
}

/// Everything the overlay needs to set itself up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub background: WindowConfig,
    pub overlay: WindowConfig,
    /// Target display for both windows, passed to the service uninspected
    pub display_id: i32,
    /// Back buffers allocated per window; only a single buffer is supported
    pub buffer_count: i32,
    /// Upper bound on one event poll (ms)
    pub poll_timeout_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            background: WindowConfig::background(),
            overlay: WindowConfig::overlay(),
            display_id: 0,
            buffer_count: 1,
            poll_timeout_ms: 1000,
        }
    }
}

impl OverlayConfig {
    /// Load configuration from file
    pub fn load_from_file(path: &str) -> OverlayResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| OverlayError::ConfigError(format!("{}: {}", path, e)))?;
        let config: OverlayConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &str) -> OverlayResult<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .map_err(|e| OverlayError::ConfigError(format!("{}: {}", path, e)))?;
        Ok(())
    }

    /// Defaults, then the file named by `SCREEN_OVERLAY_CONFIG`, then the
    /// individual environment overrides
    pub fn from_env() -> OverlayResult<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => Self::load_from_file(&path)?,
            _ => Self::default(),
        };

        if let Ok(display) = std::env::var(DISPLAY_ENV) {
            config.display_id = parse_display_id(&display);
        }
        if let Ok(timeout) = std::env::var(POLL_TIMEOUT_ENV) {
            if let Ok(timeout) = timeout.trim().parse::<u64>() {
                config.poll_timeout_ms = timeout;
            }
        }

        Ok(config)
    }

    /// Applies the optional positional display argument
    pub fn apply_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(display) = args.into_iter().next() {
            self.display_id = parse_display_id(display.as_ref());
        }
    }

    /// Get poll timeout as Duration
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    /// Validate configuration values
    pub fn validate(&self) -> OverlayResult<()> {
        for (name, window) in [("background", &self.background), ("overlay", &self.overlay)] {
            if window.width <= 0 || window.height <= 0 {
                return Err(OverlayError::ConfigError(format!(
                    "{} window size must be positive, got {}x{}",
                    name, window.width, window.height
                )));
            }
        }

        if self.overlay.zorder <= self.background.zorder {
            return Err(OverlayError::ConfigError(format!(
                "overlay z-order ({}) must be above background z-order ({})",
                self.overlay.zorder, self.background.zorder
            )));
        }

        if self.buffer_count != 1 {
            return Err(OverlayError::ConfigError(format!(
                "Exactly one buffer per window is supported, got {}",
                self.buffer_count
            )));
        }

        if self.poll_timeout_ms == 0 {
            return Err(OverlayError::ConfigError(
                "Poll timeout must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parses a display id the way C `atoi` does: leading whitespace, an optional
/// sign, then digits. Anything else yields 0 and trailing text is ignored.
pub fn parse_display_id(arg: &str) -> i32 {
    let trimmed = arg.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
