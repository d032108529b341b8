/// TM-score distance scale for a chain of `length` residues.
///
/// `1.24 * (L - 15)^(1/3) - 1.8` for `L > 15`, else `0.5`. The formula is kept
/// verbatim, so it is negative for `16 <= L <= 18`; every use squares it.
pub fn d0(length: usize) -> f64 {
    if length > 15 {
        1.24 * ((length - 15) as f64).powf(1.0 / 3.0) - 1.8
    } else {
        0.5
    }
}

/// TM-style similarity `1 / (1 + (d / d0)^2)`.
#[inline]
pub fn similarity(dist: f64, d0: f64) -> f64 {
    let ratio = dist / d0;
    1.0 / (1.0 + ratio * ratio)
}

/// Derivative of [`similarity`] with respect to the distance.
#[inline]
pub fn similarity_derivative(dist: f64, d0: f64) -> f64 {
    let s = similarity(dist, d0);
    -2.0 * dist / (d0 * d0) * s * s
}

/// Soft distance cutoff `sigmoid(-(d - cutoff) * steepness)`.
#[inline]
pub fn cutoff_gate(dist: f64, cutoff: f64, steepness: f64) -> f64 {
    sigmoid(-(dist - cutoff) * steepness)
}

/// Derivative of [`cutoff_gate`] with respect to the distance.
#[inline]
pub fn cutoff_gate_derivative(dist: f64, cutoff: f64, steepness: f64) -> f64 {
    let g = cutoff_gate(dist, cutoff, steepness);
    -steepness * g * (1.0 - g)
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
