//! Tick-seeded pseudo-random numbers.
//!
//! A [`TickRng`] is built fresh from `(seed, tick)` every time it is needed and
//! never stored between ticks, so the draws for a tick do not depend on how
//! many earlier ticks ran, in which order, or on which thread.

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Splitmix64 output mix.
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Splitmix64 stream keyed by a base seed and a tick number.
#[derive(Debug, Clone)]
pub struct TickRng {
    state: u64,
}

impl TickRng {
    pub fn new(seed: u64, tick: u64) -> Self {
        Self {
            state: mix64(seed.wrapping_add(mix64(tick.wrapping_add(GOLDEN_GAMMA)))),
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        mix64(self.state)
    }

    /// Uniform in `[0, 1)` with 24 bits of precision.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform in `[lo, hi)`; returns `lo` when the range is empty.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.next_f32()
    }

    pub fn coin(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }
}
