//! Non-cryptographic mixing primitives behind the tag and keystream.
//!
//! Provides:
//! - FNV-1a 64 with a caller-chosen seed, fed in chunks
//! - splitmix64 generator
//!
//! Both are frozen by the image format; changing a constant here breaks
//! every image produced so far.

/// FNV-1a 64 offset basis
pub const FNV1A_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64 prime
pub const FNV1A_PRIME: u64 = 0x0000_0100_0000_01b3;

const SPLITMIX_INCREMENT: u64 = 0x9e37_79b9_7f4a_7c15;
const SPLITMIX_MUL_1: u64 = 0xbf58_476d_1ce4_e5b9;
const SPLITMIX_MUL_2: u64 = 0x94d0_49bb_1331_11eb;

/// Incremental FNV-1a 64 hasher.
///
/// Feeding chunks one after another is identical to hashing their
/// concatenation.
#[derive(Debug, Clone)]
pub struct Fnv1a64 {
    state: u64,
}

impl Fnv1a64 {
    /// Create a hasher starting from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Update with more data.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(FNV1A_PRIME);
        }
    }

    /// Update with multiple chunks, in order.
    pub fn update_batch(&mut self, chunks: &[&[u8]]) {
        for chunk in chunks {
            self.update(chunk);
        }
    }

    /// Current hash value.
    #[must_use]
    pub fn finish(&self) -> u64 {
        self.state
    }
}

impl Default for Fnv1a64 {
    fn default() -> Self {
        Self::with_seed(FNV1A_OFFSET)
    }
}

/// FNV-1a 64 over the concatenation of `chunks`, starting from `seed`.
#[must_use]
pub fn fnv1a64(chunks: &[&[u8]], seed: u64) -> u64 {
    let mut hasher = Fnv1a64::with_seed(seed);
    hasher.update_batch(chunks);
    hasher.finish()
}

/// splitmix64 pseudorandom generator.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Create a generator from a 64-bit seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advance the state and return the next output.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX_INCREMENT);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX_MUL_1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX_MUL_2);
        z ^ (z >> 31)
    }
}
