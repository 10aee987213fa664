use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Serialize, Serializer};

use crate::{color::Color, error::{CanvasError, Result}};

struct Cells {
    cells: Vec<Option<Color>>,
    painted: usize,
    generation: u64,
}

/// Owns the N×N cell array. Readers share the lock, a write holds it
/// exclusively for a single cell, so a snapshot never sees a torn write.
pub struct GridStore {
    size: usize,
    inner: RwLock<Cells>,
}

impl GridStore {
    pub fn new(size: usize) -> GridStore {
        GridStore {
            size,
            inner: RwLock::new(Cells {
                cells: vec![None; size * size],
                painted: 0,
                generation: 0,
            }),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn read(&self) -> Snapshot {
        let inner = self.read_lock();
        Snapshot {
            size: self.size,
            generation: inner.generation,
            cells: inner.cells.clone(),
        }
    }

    /// Last committed write to a cell wins. Returns the generation of this
    /// write; generations are strictly increasing in commit order.
    pub fn write(&self, x: usize, y: usize, color: Color) -> Result<u64> {
        let index = self.index(x, y)?;
        let mut inner = self.write_lock();
        if inner.cells[index].replace(color).is_none() {
            inner.painted += 1;
        }
        inner.generation += 1;
        Ok(inner.generation)
    }

    pub fn cell(&self, x: usize, y: usize) -> Result<Option<Color>> {
        let index = self.index(x, y)?;
        Ok(self.read_lock().cells[index].clone())
    }

    pub fn painted_cells(&self) -> usize {
        self.read_lock().painted
    }

    pub fn generation(&self) -> u64 {
        self.read_lock().generation
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.size || y >= self.size {
            return Err(CanvasError::OutOfBounds { x, y, size: self.size });
        }
        Ok(y * self.size + x)
    }

    // A panic while holding the lock cannot leave a cell half written,
    // so poisoning is ignored.
    fn read_lock(&self) -> RwLockReadGuard<'_, Cells> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, Cells> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Point-in-time copy of the grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    size: usize,
    generation: u64,
    cells: Vec<Option<Color>>,
}

impl Snapshot {
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of writes committed before this snapshot was taken.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Color> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.cells[y * self.size + x].as_ref()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<Color>]> {
        self.cells.chunks(self.size.max(1))
    }
}

/// Serialized as `[y][x]` rows of color strings, `""` for unpainted cells.
impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows().map(Row))
    }
}

struct Row<'a>(&'a [Option<Color>]);

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|cell| cell.as_ref().map_or("", Color::as_str)))
    }
}
