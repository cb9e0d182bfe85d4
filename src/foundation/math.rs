#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Hash of a pixel buffer, used to compare textures by content.
pub fn pixel_fingerprint(width: u32, height: u32, bytes: &[u8]) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(&width.to_le_bytes());
    h.write_bytes(&height.to_le_bytes());
    h.write_bytes(bytes);
    h.finish()
}

/// Fraction of the remaining distance covered after `dt` seconds of exponential damping.
///
/// Non-finite or non-positive inputs cover nothing.
pub fn damp_factor(rate: f64, dt: f64) -> f64 {
    if !rate.is_finite() || !dt.is_finite() || rate <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}

/// `current + (target - current) * (1 - e^(-rate * dt))`.
pub fn damp(current: f64, target: f64, rate: f64, dt: f64) -> f64 {
    current + (target - current) * damp_factor(rate, dt)
}

/// Map `v` in `0..=extent` to `-1..=1`. Degenerate extents map to 0.
pub fn normalize_signed(v: f64, extent: f64) -> f64 {
    if !v.is_finite() || !extent.is_finite() || extent <= 0.0 {
        return 0.0;
    }
    ((v / extent) * 2.0 - 1.0).clamp(-1.0, 1.0)
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
