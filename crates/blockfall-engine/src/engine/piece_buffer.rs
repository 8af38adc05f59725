use std::collections::VecDeque;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Seeded source of the piece sequence.
///
/// Pieces come in shuffled bags holding each kind once. At least one full bag is
/// always queued ahead, so the preview can be drawn at any time. Two buffers built
/// from the same [`PieceSeed`] yield the same sequence.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceBuffer, PieceSeed};
///
/// let mut a = PieceBuffer::with_seed(PieceSeed::from(7));
/// let mut b = PieceBuffer::with_seed(PieceSeed::from(7));
/// assert_eq!(a.pop_next(), b.pop_next());
/// ```
#[derive(Debug, Clone)]
pub struct PieceBuffer {
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
}

/// 128-bit seed of a [`PieceBuffer`], serialized as 32 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl From<u64> for PieceSeed {
    fn from(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&format_args!("{:032x}", u128::from_be_bytes(self.0)))
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows drawing seeds with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceBuffer {
    /// Creates a piece buffer whose sequence is determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            bag: VecDeque::with_capacity(PieceKind::LEN * 2),
        };
        this.fill_bag();
        this
    }

    fn fill_bag(&mut self) {
        while self.bag.len() <= PieceKind::LEN {
            let mut kinds = PieceKind::ALL;
            kinds.shuffle(&mut self.rng);
            self.bag.extend(kinds);
        }
    }

    /// Draws the next piece.
    pub fn pop_next(&mut self) -> PieceKind {
        self.fill_bag();
        let Some(kind) = self.bag.pop_front() else {
            unreachable!("bag is refilled before every draw");
        };
        kind
    }

    /// Returns an iterator over the upcoming pieces (at least 7).
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_seed_serialization() {
        let seed = PieceSeed::from(0x0123_4567_89ab_cdef);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"00000000000000000123456789abcdef\"");

        let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
    }

    #[test]
    fn test_deserialize_errors() {
        assert!(serde_json::from_str::<PieceSeed>("\"\"").is_err());
        assert!(serde_json::from_str::<PieceSeed>("\"0123\"").is_err());
        let not_hex = "\"ghijklmnopqrstuvwxyzghijklmnopqr\"";
        let err = serde_json::from_str::<PieceSeed>(not_hex).unwrap_err();
        assert!(err.to_string().contains("invalid hex"));
    }

    #[test]
    fn test_deterministic_piece_generation() {
        let mut buffer1 = PieceBuffer::with_seed(PieceSeed::from(42));
        let mut buffer2 = PieceBuffer::with_seed(PieceSeed::from(42));
        for _ in 0..20 {
            assert_eq!(buffer1.pop_next(), buffer2.pop_next());
        }
    }

    #[test]
    fn test_every_bag_holds_each_kind_once() {
        let mut buffer = PieceBuffer::with_seed(PieceSeed::from(3));
        for _ in 0..3 {
            let mut bag: Vec<_> = (0..PieceKind::LEN).map(|_| buffer.pop_next()).collect();
            bag.sort_by_key(|kind| *kind as u8);
            assert_eq!(bag, PieceKind::ALL.to_vec());
        }
        assert!(buffer.next_pieces().count() >= PieceKind::LEN);
    }
}
