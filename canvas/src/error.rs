#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// Rejected at the boundary: bad coordinates or an unrecognized color.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A coordinate reached the grid store unchecked.
    #[error("cell ({x}, {y}) is outside the {size}x{size} grid")]
    OutOfBounds { x: usize, y: usize, size: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CanvasError>;
