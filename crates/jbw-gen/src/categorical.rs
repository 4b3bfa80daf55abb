//! Softmax normalization and categorical draws over log-weights.

use jbw_core::DeterministicRng;

/// Turn log-weights into probabilities in place.
///
/// Subtracts the maximum before exponentiating so large energies don't overflow.
pub fn normalize_exp(weights: &mut [f64]) {
    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return;
    }

    let mut sum = 0.0;
    for w in weights.iter_mut() {
        *w = (*w - max).exp();
        sum += *w;
    }
    for w in weights.iter_mut() {
        *w /= sum;
    }
}

/// Draw an index from normalized `probabilities`.
pub fn sample_categorical<R: DeterministicRng + ?Sized>(probabilities: &[f64], rng: &mut R) -> usize {
    let u = rng.next_f64_unit();
    let mut cumulative = 0.0;
    for (i, p) in probabilities.iter().enumerate() {
        cumulative += p;
        if u < cumulative {
            return i;
        }
    }
    // Rounding can leave the total a hair below 1.
    probabilities.len().saturating_sub(1)
}
