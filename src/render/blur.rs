use rayon::prelude::*;

use crate::foundation::error::{CardSkinError, CardSkinResult};

/// Separable gaussian blur of an 8-bit coverage mask (one byte per pixel).
///
/// Edges clamp. Rows are processed on the rayon pool.
pub(crate) fn blur_alpha_mask(
    mask: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> CardSkinResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| CardSkinError::render("blur buffer size overflow"))?;
    if mask.len() != expected_len {
        return Err(CardSkinError::render(
            "blur_alpha_mask expects one byte per pixel",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(mask.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let w = width as usize;
    let h = height as usize;

    let mut tmp = vec![0u8; expected_len];
    tmp.par_chunks_exact_mut(w)
        .zip(mask.par_chunks_exact(w))
        .for_each(|(dst, src)| convolve_line(src, dst, &kernel));

    // Transpose so the vertical pass is also a row pass.
    let mut cols = vec![0u8; expected_len];
    transpose(&tmp, &mut cols, w, h);
    let mut blurred_cols = vec![0u8; expected_len];
    blurred_cols
        .par_chunks_exact_mut(h)
        .zip(cols.par_chunks_exact(h))
        .for_each(|(dst, src)| convolve_line(src, dst, &kernel));

    let mut out = vec![0u8; expected_len];
    transpose(&blurred_cols, &mut out, h, w);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> CardSkinResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CardSkinError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(CardSkinError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&q| i64::from(q)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn convolve_line(src: &[u8], dst: &mut [u8], k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    let n = src.len() as isize;
    for (x, out) in dst.iter_mut().enumerate() {
        let mut acc = 0u64;
        for (ki, &kw) in k.iter().enumerate() {
            let sx = (x as isize + ki as isize - radius).clamp(0, n - 1);
            acc += u64::from(kw) * u64::from(src[sx as usize]);
        }
        *out = ((acc + 32768) >> 16).min(255) as u8;
    }
}

fn transpose(src: &[u8], dst: &mut [u8], w: usize, h: usize) {
    for y in 0..h {
        for x in 0..w {
            dst[x * h + y] = src[y * w + x];
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
