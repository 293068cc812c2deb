//! Stable seeded hashing for the shape value types.

use std::hash::{Hash, Hasher};

/// Hasher that folds every written word into its state with a `hash_combine` step.
///
/// The output only depends on the seed and the written values, so unlike
/// [`DefaultHasher`](std::collections::hash_map::DefaultHasher) it is stable between runs and toolchain versions
/// and can be persisted by the host application.
#[derive(Debug, Clone, Copy)]
pub struct SeededHasher {
    state: u64,
}

impl SeededHasher {
    /// Creates a new hasher starting from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn combine(&mut self, value: u64) {
        self.state ^= value
            .wrapping_add(0x9e37_79b9_7f4a_7c15)
            .wrapping_add(self.state << 6)
            .wrapping_add(self.state >> 2);
    }
}

impl Default for SeededHasher {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Hasher for SeededHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            self.combine(u64::from_le_bytes(word));
        }
    }

    fn write_u32(&mut self, i: u32) {
        self.combine(i as u64);
    }

    fn write_u64(&mut self, i: u64) {
        self.combine(i);
    }

    fn write_usize(&mut self, i: usize) {
        self.combine(i as u64);
    }
}

/// Hashes `value` with [`SeededHasher`] started from `seed`.
pub fn seeded_hash<T: Hash + ?Sized>(value: &T, seed: u64) -> u64 {
    let mut hasher = SeededHasher::new(seed);
    value.hash(&mut hasher);
    hasher.finish()
}

/// Feeds a float into `state` so that values equal under NaN-matching equality hash equally.
pub(crate) fn hash_f64<H: Hasher>(value: f64, state: &mut H) {
    let bits = if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        // -0.0 == 0.0
        (value + 0.0).to_bits()
    };
    state.write_u64(bits);
}

/// Equality of two floats where NaN equals NaN.
pub(crate) fn f64_eq(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}
