use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    color::{Color, Palette},
    config::CanvasConfig,
    error::{CanvasError, Result},
    gate::RateGate,
    grid::{GridStore, Snapshot},
    token::{CooldownToken, TokenCodec},
};

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct PaintRequest {
    pub x: i64,
    pub y: i64,
    pub color: String,
}

/// A committed write, as announced to viewers. Announcements may arrive out
/// of commit order; for a given cell the highest `generation` holds, and any
/// event at or below a board's `generation` is already reflected in it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PaintedCell {
    pub x: usize,
    pub y: usize,
    pub color: Color,
    pub generation: u64,
}

/// Grid plus the caller's remaining cooldown:
/// `{"board": [...], "cooldown": n, "generation": g}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BoardView {
    pub board: Snapshot,
    pub cooldown: u64,
    pub generation: u64,
}

impl BoardView {
    fn new(board: Snapshot, cooldown: u64) -> BoardView {
        let generation = board.generation();
        BoardView { board, cooldown, generation }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintOutcome {
    Painted {
        view: BoardView,
        token: CooldownToken,
        cell: PaintedCell,
    },
    /// Too early; nothing was written and the caller keeps its token.
    RateLimited { view: BoardView },
}

impl PaintOutcome {
    pub fn view(&self) -> &BoardView {
        match self {
            PaintOutcome::Painted { view, .. } | PaintOutcome::RateLimited { view } => view,
        }
    }

    pub fn into_view(self) -> BoardView {
        match self {
            PaintOutcome::Painted { view, .. } | PaintOutcome::RateLimited { view } => view,
        }
    }
}

pub struct PaintOrchestrator {
    config: CanvasConfig,
    grid: GridStore,
    gate: RateGate,
}

impl PaintOrchestrator {
    pub fn new(config: CanvasConfig, codec: TokenCodec) -> Result<PaintOrchestrator> {
        config.validate()?;
        Ok(PaintOrchestrator {
            grid: GridStore::new(config.size),
            gate: RateGate::new(config.cooldown_seconds, codec),
            config,
        })
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn snapshot(&self, token: Option<&CooldownToken>, now: DateTime<Utc>) -> BoardView {
        let decision = self.gate.evaluate(token, now);
        BoardView::new(self.grid.read(), decision.remaining_seconds)
    }

    pub fn paint(&self, request: &PaintRequest, token: Option<&CooldownToken>, now: DateTime<Utc>) -> Result<PaintOutcome> {
        let (x, y, color) = self.validate(request)?;

        let decision = self.gate.evaluate(token, now);
        if !decision.allowed {
            debug!(x, y, remaining = decision.remaining_seconds, "paint rate limited");
            return Ok(PaintOutcome::RateLimited {
                view: BoardView::new(self.grid.read(), decision.remaining_seconds),
            });
        }

        let generation = self.grid.write(x, y, color.clone())?;
        let token = self.gate.issue(now);
        debug!(x, y, %color, generation, "cell painted");

        Ok(PaintOutcome::Painted {
            view: BoardView::new(self.grid.read(), self.gate.cooldown_seconds()),
            token,
            cell: PaintedCell { x, y, color, generation },
        })
    }

    fn validate(&self, request: &PaintRequest) -> Result<(usize, usize, Color)> {
        let x = self.coordinate(request.x, "x")?;
        let y = self.coordinate(request.y, "y")?;
        let color = self.palette().validate(&request.color)?;
        Ok((x, y, color))
    }

    fn coordinate(&self, value: i64, axis: &str) -> Result<usize> {
        usize::try_from(value)
            .ok()
            .filter(|value| *value < self.config.size)
            .ok_or_else(|| CanvasError::InvalidInput(format!("{axis} = {value} is outside 0..{}", self.config.size)))
    }

    fn palette(&self) -> &Palette {
        &self.config.palette
    }
}
