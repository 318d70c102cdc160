//! Per-session tile pitches
//!
//! Every tile gets a MIDI note drawn from a minor pentatonic set so step
//! sounds form a melody as the player walks. The mapping is fixed for the
//! session and regenerated on reset.

use glam::IVec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Minor pentatonic MIDI notes across four octaves
pub const PENTATONIC: [u8; 20] = [
    36, 39, 41, 43, 46, 48, 51, 53, 55, 58, 60, 63, 65, 67, 70, 72, 75, 77, 79, 82,
];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NoteMap {
    size: i32,
    notes: Vec<u8>,
}

impl NoteMap {
    pub fn generate(size: i32, rng: &mut impl Rng) -> Self {
        let mut scale = PENTATONIC;
        scale.shuffle(rng);
        let octave_offset = rng.random_range(0..3u8) * 12;

        let size = size.max(0);
        let mut notes = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                let base = scale[((x * size + y) as usize) % scale.len()];
                let lift = if (x * 7 + y * 11) % 2 == 1 { 12 } else { 0 };
                notes.push(base + octave_offset + lift);
            }
        }
        Self { size, notes }
    }

    /// Note for a tile; out-of-bounds tiles fall back to the lowest scale note
    pub fn note_at(&self, tile: IVec2) -> u8 {
        if tile.x < 0 || tile.y < 0 || tile.x >= self.size || tile.y >= self.size {
            return PENTATONIC[0];
        }
        self.notes[(tile.y * self.size + tile.x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_notes_stay_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let map = NoteMap::generate(12, &mut rng);
        for y in 0..12 {
            for x in 0..12 {
                let note = map.note_at(IVec2::new(x, y));
                assert!((36..=82 + 24 + 12).contains(&note));
            }
        }
    }

    #[test]
    fn test_same_seed_same_notes() {
        let a = NoteMap::generate(10, &mut Pcg32::seed_from_u64(3));
        let b = NoteMap::generate(10, &mut Pcg32::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_out_of_bounds_note() {
        let map = NoteMap::generate(4, &mut Pcg32::seed_from_u64(1));
        assert_eq!(map.note_at(IVec2::new(-1, 0)), PENTATONIC[0]);
    }
}
