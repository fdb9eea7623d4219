use std::fmt::{self, Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ShapeKind;

/// Source of falling shapes for one game.
///
/// Every spawn is drawn independently and uniformly from the seven [`ShapeKind`]s, so
/// droughts and repeats are possible. Two supplies built from the same [`ShapeSeed`]
/// yield the same sequence.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ShapeSeed, ShapeSupply};
/// use rand::Rng as _;
///
/// let seed: ShapeSeed = rand::rng().random();
/// let mut a = ShapeSupply::with_seed(seed);
/// let mut b = ShapeSupply::with_seed(seed);
///
/// for _ in 0..10 {
///     assert_eq!(a.pop_next(), b.pop_next());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ShapeSupply {
    rng: Pcg32,
}

impl Default for ShapeSupply {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for a deterministic shape sequence.
///
/// A 128-bit value serialized as a 32-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeSeed([u8; 16]);

impl ShapeSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for ShapeSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for ShapeSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{self}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for ShapeSeed {
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

impl Distribution<ShapeSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ShapeSeed(seed)
    }
}

impl ShapeSupply {
    /// Creates a supply with a random seed.
    ///
    /// For a reproducible sequence, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: ShapeSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Draws the next shape kind.
    pub fn pop_next(&mut self) -> ShapeKind {
        self.rng.random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQUENTIAL: [u8; 16] = [
        0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54, 0x32,
        0x10,
    ];

    #[test]
    fn test_seed_serializes_as_big_endian_hex() {
        let seed = ShapeSeed::from_bytes(SEQUENTIAL);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
        assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");

        let deserialized: ShapeSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
    }

    #[test]
    fn test_seed_accepts_uppercase_hex() {
        let json = "\"0123456789ABCDEFFEDCBA9876543210\"";
        let deserialized: ShapeSeed = serde_json::from_str(json).unwrap();
        assert_eq!(deserialized.to_bytes(), SEQUENTIAL);
    }

    #[test]
    fn test_zero_seed_keeps_leading_zeros() {
        let seed = ShapeSeed::from_bytes([0; 16]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"00000000000000000000000000000000\"");
    }

    #[test]
    fn test_seed_rejects_bad_hex() {
        for json in [
            "\"ghijklmnopqrstuvwxyzghijklmnopqr\"",
            "\"0123456789abcdef0123456789abcde\"",
            "\"0123456789abcdef0123456789abcdef0\"",
            "\"\"",
        ] {
            let err = serde_json::from_str::<ShapeSeed>(json).unwrap_err();
            assert!(err.to_string().contains("invalid hex"), "{json}: {err}");
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let seed = ShapeSeed::from_bytes(SEQUENTIAL);
        let mut a = ShapeSupply::with_seed(seed);
        let mut b = ShapeSupply::with_seed(seed);
        let seq_a: Vec<_> = (0..50).map(|_| a.pop_next()).collect();
        let seq_b: Vec<_> = (0..50).map(|_| b.pop_next()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = ShapeSupply::with_seed(ShapeSeed::from_bytes([0; 16]));
        let mut b = ShapeSupply::with_seed(ShapeSeed::from_bytes(SEQUENTIAL));
        let seq_a: Vec<_> = (0..50).map(|_| a.pop_next()).collect();
        let seq_b: Vec<_> = (0..50).map(|_| b.pop_next()).collect();
        assert_ne!(seq_a, seq_b);
    }
}
