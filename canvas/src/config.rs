use crate::{color::Palette, error::{CanvasError, Result}};

pub const DEFAULT_SIZE: usize = 1000;
pub const DEFAULT_COOLDOWN_SECONDS: u64 = 60;
pub const MAX_SIZE: usize = 10_000;
pub const MAX_COOLDOWN_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Startup configuration of the canvas core. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    pub size: usize,
    pub cooldown_seconds: u64,
    pub palette: Palette,
}

impl Default for CanvasConfig {
    fn default() -> CanvasConfig {
        CanvasConfig {
            size: DEFAULT_SIZE,
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
            palette: Palette::default(),
        }
    }
}

impl CanvasConfig {
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 || self.size > MAX_SIZE {
            return Err(CanvasError::InvalidConfig(format!("grid size must be in 1..={MAX_SIZE}, got {}", self.size)));
        }
        if self.cooldown_seconds == 0 || self.cooldown_seconds > MAX_COOLDOWN_SECONDS {
            return Err(CanvasError::InvalidConfig(format!(
                "cooldown must be in 1..={MAX_COOLDOWN_SECONDS} seconds, got {}",
                self.cooldown_seconds
            )));
        }
        Ok(())
    }
}
