//! Random number source and unbiased range sampling.

/// Trait for abstracting random number generators.
///
/// Every call to [`RandomSource::next_u32`] returns a value in `0..=Self::MAX`.
pub trait RandomSource {
    /// Largest value the generator can return.
    const MAX: u32;

    /// Returns the next raw value.
    fn next_u32(&mut self) -> u32;
}

/// Draws a uniform integer in `min..=max` without modulo bias.
///
/// The generator range is split into `MAX / (max - min + 1)` equally sized
/// buckets. Draws that land past the last complete bucket are rejected and
/// redrawn. If the requested span is wider than the generator range, only the
/// first `MAX + 1` values of the span are reachable.
pub fn randint<R: RandomSource>(rng: &mut R, min: u32, max: u32) -> u32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let span = (max - min) as u64 + 1;
    let buckets = (R::MAX as u64 / span).max(1);
    let limit = buckets * span;

    loop {
        let draw = rng.next_u32() as u64;
        if draw < limit {
            return min + (draw / buckets) as u32;
        }
    }
}

/// Park-Miller "minimal standard" generator.
///
/// Small and fast enough for an 8-bit target, and the same generator the
/// AVR C library uses for `rand()`.
#[derive(Debug, Clone)]
pub struct MinStdRand {
    state: u32,
}

impl MinStdRand {
    const MODULUS: u64 = 0x7FFF_FFFF;
    const MULTIPLIER: u64 = 16_807;

    /// Creates a generator. Seeds of `0` and the modulus itself are mapped to `1`.
    pub fn new(seed: u32) -> Self {
        let state = (seed as u64 % Self::MODULUS) as u32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }
}

impl Default for MinStdRand {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RandomSource for MinStdRand {
    const MAX: u32 = 0x7FFF_FFFE;

    fn next_u32(&mut self) -> u32 {
        self.state = (self.state as u64 * Self::MULTIPLIER % Self::MODULUS) as u32;
        self.state
    }
}
