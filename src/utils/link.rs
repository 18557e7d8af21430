//! Logistic and softmax link functions

use num_traits::Float;

use crate::{ModelError, Result};

/// Logistic function, the inverse of the logit link: `1 / (1 + exp(-x))`.
///
/// Maps the real line into `(0, 1)` mathematically; `logistic(0) == 0.5`.
/// In floating point the result saturates: for `f64` it is exactly `1.0`
/// above roughly `x = 37` and exactly `0.0` below roughly `x = -710`, where
/// `exp(-x)` overflows.
#[inline]
pub fn logistic<T: Float>(x: T) -> T {
    T::one() / (T::one() + (-x).exp())
}

/// Softmax of `x` written into `out`.
///
/// Exponentiates each entry and divides by the sum. There is no max shift,
/// so inputs above roughly 709 (for `f64`) overflow; the overflow is reported
/// as [`ModelError::NonFinite`] rather than written through. Use
/// [`stable_softmax_into`] when large logits are expected.
pub fn softmax_into<T: Float>(x: &[T], out: &mut [T]) -> Result<()> {
    check_lengths(x, out)?;
    for (o, &v) in out.iter_mut().zip(x) {
        *o = v.exp();
    }
    normalize(out)
}

/// Softmax with the maximum logit subtracted before exponentiating.
///
/// Same result as [`softmax_into`] wherever that one is finite.
pub fn stable_softmax_into<T: Float>(x: &[T], out: &mut [T]) -> Result<()> {
    check_lengths(x, out)?;
    let max = x.iter().copied().fold(T::neg_infinity(), T::max);
    for (o, &v) in out.iter_mut().zip(x) {
        *o = (v - max).exp();
    }
    normalize(out)
}

fn check_lengths<T>(x: &[T], out: &[T]) -> Result<()> {
    if x.len() != out.len() {
        return Err(ModelError::ShapeMismatch {
            what: "softmax output",
            expected: x.len(),
            got: out.len(),
        });
    }
    Ok(())
}

fn normalize<T: Float>(out: &mut [T]) -> Result<()> {
    let scale = out.iter().fold(T::zero(), |acc, &v| acc + v);
    for o in out.iter_mut() {
        *o = *o / scale;
    }
    if out.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite {
            component: "softmax",
        });
    }
    Ok(())
}
