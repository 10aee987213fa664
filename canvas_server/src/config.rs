use anyhow::Context;
use canvas::{config::{DEFAULT_COOLDOWN_SECONDS, DEFAULT_SIZE}, CanvasConfig, Palette};
use clap::Parser;

pub const DEFAULT_PORT: u16 = 9080;
pub const DEFAULT_COOKIE_MAX_AGE: u64 = 3600;

#[derive(Debug, Clone, Parser)]
#[command(name = "canvas_server", version, about = "Shared pixel canvas with a per-client paint cooldown")]
pub struct CanvasArgs {
    #[arg(long, env = "CANVAS_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Width and height of the square grid.
    #[arg(long, env = "CANVAS_SIZE", default_value_t = DEFAULT_SIZE)]
    pub size: usize,
    #[arg(long, env = "CANVAS_COOLDOWN_SECONDS", default_value_t = DEFAULT_COOLDOWN_SECONDS)]
    pub cooldown_seconds: u64,
    /// `any-hex` or a comma separated list of #RRGGBB colors. Defaults to the 15 color palette.
    #[arg(long, env = "CANVAS_PALETTE")]
    pub palette: Option<String>,
    /// Key for signing cooldown tokens. A random key is generated when unset,
    /// so outstanding tokens do not survive a restart.
    #[arg(long, env = "CANVAS_TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: Option<String>,
    #[arg(long, env = "CANVAS_COOKIE_MAX_AGE", default_value_t = DEFAULT_COOKIE_MAX_AGE)]
    pub cookie_max_age: u64,
}

impl CanvasArgs {
    pub fn canvas_config(&self) -> anyhow::Result<CanvasConfig> {
        let palette = match &self.palette {
            Some(palette) => Palette::parse(palette).context("could not parse --palette")?,
            None => Palette::default(),
        };
        let config = CanvasConfig {
            size: self.size,
            cooldown_seconds: self.cooldown_seconds,
            palette,
        };
        config.validate()?;
        Ok(config)
    }
}
