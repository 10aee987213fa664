pub mod color;
pub mod config;
pub mod error;
pub mod gate;
pub mod grid;
pub mod paint;
pub mod token;

pub use color::{Color, Palette};
pub use config::CanvasConfig;
pub use error::{CanvasError, Result};
pub use gate::{GateDecision, RateGate};
pub use grid::{GridStore, Snapshot};
pub use paint::{BoardView, PaintOrchestrator, PaintOutcome, PaintRequest, PaintedCell};
pub use token::{CooldownToken, TokenCodec};
