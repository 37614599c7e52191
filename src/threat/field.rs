//! Accumulated-threat grid over the playable map
//!
//! Damage events and enemy presence add threat at cells; a periodic
//! smoothing pass diffuses and decays the signal so undamaged cells near
//! combat still read hot while isolated spikes fade. Target selection and
//! defensive reactions read the field to decide where to go.

use crate::core::types::{CellPos, MapBounds};

/// Weight of each in-bounds neighbour during smoothing (self weighs 1.0)
const NEIGHBOR_WEIGHT: f32 = 0.1;

/// Dense scalar field sized to the playable bounds
///
/// Storage is indexed by normalized local coordinates (cell minus the
/// bounds origin); every accessor bounds-checks, so callers can pass raw
/// world cells without caring about map offsets.
#[derive(Debug, Clone)]
pub struct ThreatField {
    bounds: MapBounds,
    data: Vec<f32>,
}

impl ThreatField {
    pub fn new(bounds: MapBounds) -> Self {
        let len = (bounds.width.max(0) as usize) * (bounds.height.max(0) as usize);
        Self {
            bounds,
            data: vec![0.0; len],
        }
    }

    pub fn bounds(&self) -> MapBounds {
        self.bounds
    }

    #[inline]
    fn index(&self, cell: CellPos) -> Option<usize> {
        if !self.bounds.contains(cell) {
            return None;
        }
        let x = (cell.x - self.bounds.x) as usize;
        let y = (cell.y - self.bounds.y) as usize;
        Some(y * self.bounds.width as usize + x)
    }

    /// Threat at a cell; zero outside the playable bounds
    pub fn get(&self, cell: CellPos) -> f32 {
        self.index(cell).map(|i| self.data[i]).unwrap_or(0.0)
    }

    /// Add threat at a cell; out-of-bounds adds are dropped
    pub fn add(&mut self, cell: CellPos, amount: f32) {
        if let Some(i) = self.index(cell) {
            self.data[i] += amount;
        }
    }

    /// Remove threat at a cell, clamped at zero
    ///
    /// Used by defenders closing on an attack site so a handled threat
    /// stops escalating.
    pub fn reduce(&mut self, cell: CellPos, amount: f32) {
        if let Some(i) = self.index(cell) {
            self.data[i] = (self.data[i] - amount).max(0.0);
        }
    }

    /// One diffusion/decay pass
    ///
    /// Each cell becomes the weighted average of itself (1.0) and its
    /// in-bounds neighbours (0.1 each), normalized by the weights actually
    /// considered. Out-of-bounds neighbours contribute to neither
    /// numerator nor denominator, so edge cells are not drained toward
    /// the map border.
    pub fn smooth(&mut self) {
        let mut smoothed = vec![0.0f32; self.data.len()];
        for cell in self.bounds.cells() {
            let mut total = self.get(cell);
            let mut weight = 1.0f32;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let neighbor = CellPos::new(cell.x + dx, cell.y + dy);
                    if let Some(i) = self.index(neighbor) {
                        total += self.data[i] * NEIGHBOR_WEIGHT;
                        weight += NEIGHBOR_WEIGHT;
                    }
                }
            }
            // index() cannot fail for a cell the bounds iterator produced
            if let Some(i) = self.index(cell) {
                smoothed[i] = total / weight;
            }
        }
        self.data = smoothed;
    }

    /// The cell holding the most threat, with its value
    ///
    /// Returns `None` only for a zero-area field. A field that is all
    /// zeros reports a zero value; callers treat that as "no target".
    pub fn max_cell(&self) -> Option<(CellPos, f32)> {
        let mut best: Option<(CellPos, f32)> = None;
        for cell in self.bounds.cells() {
            let value = self.get(cell);
            match best {
                Some((_, v)) if v >= value => {}
                _ => best = Some((cell, value)),
            }
        }
        best
    }
}
