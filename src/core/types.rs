//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Identifier for a match participant, issued by the host session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Identifier for a live actor (unit or structure) in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Identifier for a production queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueId(pub u32);

/// Name of an actor type in the game rules (e.g. "power_plant", "rifleman").
///
/// Cheap to clone; the bot never interprets the string beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorTypeId(pub std::sync::Arc<str>);

impl ActorTypeId {
    pub fn new(name: &str) -> Self {
        Self(std::sync::Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorTypeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Map cell coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev (chessboard) distance: the number of steps a unit that
    /// moves in 8 directions needs to reach `other`.
    pub fn chebyshev_distance(&self, other: CellPos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Playable map bounds in cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapBounds {
    /// Left edge of the playable area
    pub x: i32,
    /// Top edge of the playable area
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl MapBounds {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, cell: CellPos) -> bool {
        cell.x >= self.x
            && cell.x < self.x + self.width
            && cell.y >= self.y
            && cell.y < self.y + self.height
    }

    pub fn center(&self) -> CellPos {
        CellPos::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Iterate every in-bounds cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = CellPos> {
        let bounds = *self;
        (bounds.y..bounds.y + bounds.height)
            .flat_map(move |y| (bounds.x..bounds.x + bounds.width).map(move |x| CellPos::new(x, y)))
    }
}
