//! Deterministic placeholder names for sources without a public type.

use rand::RngCore;

/// Seed used for fallback names, kept fixed so builds are reproducible.
pub const FALLBACK_SEED: u64 = 239;

/// Separator between the package prefix and the random suffix.
pub const FALLBACK_DELIMITER: &str = "$$__";

/// Number of letters in a fallback suffix.
pub const FALLBACK_LEN: usize = 11;

const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const ADDEND: u64 = 0xB;
const MASK: u64 = (1 << 48) - 1;

/// The 48-bit linear congruential generator of `java.util.Random`.
///
/// Reproducing it bit-for-bit keeps fallback names identical to the ones
/// earlier JVM tooling produced for the same seed.
#[derive(Debug, Clone)]
pub struct JavaRandom {
    seed: u64,
}

impl JavaRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed: (seed ^ MULTIPLIER) & MASK,
        }
    }

    fn next_bits(&mut self, bits: u32) -> u32 {
        self.seed = (self.seed.wrapping_mul(MULTIPLIER).wrapping_add(ADDEND)) & MASK;
        (self.seed >> (48 - bits)) as u32
    }
}

impl RngCore for JavaRandom {
    fn next_u32(&mut self) -> u32 {
        self.next_bits(32)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Uniform integer in `0..bound` following `Random.nextInt(int)`.
///
/// The top 31 bits of `next_u32` are the generator's 31-bit output, so with a
/// [`JavaRandom`] source the sequence matches the JVM exactly.
pub fn next_bounded<R: RngCore + ?Sized>(rng: &mut R, bound: u32) -> u32 {
    debug_assert!(bound > 0 && bound <= i32::MAX as u32);
    if bound.is_power_of_two() {
        return ((u64::from(bound) * u64::from(rng.next_u32() >> 1)) >> 31) as u32;
    }
    loop {
        let bits = rng.next_u32() >> 1;
        let val = bits % bound;
        // Reject the tail that would bias small values.
        if bits - val + (bound - 1) <= i32::MAX as u32 {
            return val;
        }
    }
}

/// Produces fallback type names. One instance is threaded through every
/// compile invocation of a process so the sequence continues across them.
#[derive(Debug, Clone)]
pub struct FallbackNamer<R = JavaRandom> {
    rng: R,
}

impl FallbackNamer<JavaRandom> {
    /// A namer seeded with [`FALLBACK_SEED`].
    pub fn seeded() -> Self {
        Self::with_rng(JavaRandom::new(FALLBACK_SEED))
    }
}

impl Default for FallbackNamer<JavaRandom> {
    fn default() -> Self {
        Self::seeded()
    }
}

impl<R: RngCore> FallbackNamer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Next `$$__xxxxxxxxxxx` suffix.
    pub fn next_suffix(&mut self) -> String {
        let mut name = String::with_capacity(FALLBACK_DELIMITER.len() + FALLBACK_LEN);
        name.push_str(FALLBACK_DELIMITER);
        for _ in 0..FALLBACK_LEN {
            name.push(char::from(b'a' + next_bounded(&mut self.rng, 26) as u8));
        }
        name
    }
}
