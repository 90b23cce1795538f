//! Segment-level burn state for composite entities
//!
//! A composite entity (e.g. a multi-seed plant) burns segment by segment.
//! Each slot holds burn progress in `[0, 1]`: zero means untouched, anything
//! above zero means lit, and a slot that reaches 1 is fully consumed and
//! never moves again. Slots cannot be un-lit.

use serde::{Deserialize, Serialize};

/// Per-segment burn progress, lazily sized on first access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedBurnState {
    segments: Vec<f32>,
}

impl SeedBurnState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow to `count` slots; existing progress is preserved.
    pub fn ensure_len(&mut self, count: usize) {
        if self.segments.len() < count {
            self.segments.resize(count, 0.0);
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Burn progress of segment `index` (0 for unallocated slots).
    pub fn get(&self, index: usize) -> f32 {
        self.segments.get(index).copied().unwrap_or(0.0)
    }

    /// True once any segment has been lit.
    pub fn any_lit(&self) -> bool {
        self.segments.iter().any(|&burn| burn > 0.0)
    }

    /// Mean burn progress across all slots (0 when unallocated).
    pub fn average(&self) -> f32 {
        if self.segments.is_empty() {
            0.0
        } else {
            self.segments.iter().sum::<f32>() / self.segments.len() as f32
        }
    }

    /// Indices of segments that have not been lit yet.
    pub fn unlit(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, &burn)| burn == 0.0)
            .map(|(index, _)| index)
    }

    /// Light segment `index` if it is still untouched. Lit or consumed
    /// segments are left alone, so a slot ignites at most once.
    pub fn ignite(&mut self, index: usize) {
        if let Some(burn) = self.segments.get_mut(index) {
            if *burn == 0.0 {
                *burn = 0.01;
            }
        }
    }

    /// Advance a burning segment by `amount`, clamping at 1.
    /// Returns true on the tick the segment completes. Untouched and
    /// consumed segments do not move.
    pub fn advance(&mut self, index: usize, amount: f32) -> bool {
        let Some(burn) = self.segments.get_mut(index) else {
            return false;
        };
        if *burn <= 0.0 || *burn >= 1.0 {
            return false;
        }
        *burn += amount.max(0.0);
        if *burn >= 1.0 {
            *burn = 1.0;
            return true;
        }
        false
    }

    /// Heat output of a segment at `burn` progress: an inverted parabola
    /// peaking mid-burn, `1 - (2*burn - 1)^2`. A segment radiates most while
    /// half-consumed and tapers to zero at both ends.
    pub fn segment_heat(burn: f32) -> f32 {
        1.0 - (2.0 * burn - 1.0).powi(2)
    }
}
