//! Random sampling of weight vectors around a base vector.

use blockfall_evaluator::weights::Weights;
use rand::Rng;

/// Perturbation amplitude that is negative or not finite.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("perturbation amplitude must be finite and non-negative, got {amplitude}")]
pub struct InvalidAmplitude {
    pub amplitude: f32,
}

/// Checks that `amplitude` can be used with [`perturb`].
pub fn validate_amplitude(amplitude: f32) -> Result<(), InvalidAmplitude> {
    if amplitude.is_finite() && amplitude >= 0.0 {
        Ok(())
    } else {
        Err(InvalidAmplitude { amplitude })
    }
}

/// Adds independent uniform noise in `[-amplitude, amplitude]` to each coefficient of `base`.
///
/// Coefficients are drawn in the order lines, height, holes, bumpiness.
///
/// # Examples
///
/// ```
/// use blockfall_evaluator::weights::Weights;
/// use blockfall_training::weights;
///
/// let mut rng = rand::rng();
/// let sample = weights::perturb(Weights::DEFAULT, 0.5, &mut rng).unwrap();
/// for (w, b) in sample.to_array().into_iter().zip(Weights::DEFAULT.to_array()) {
///     assert!((w - b).abs() <= 0.5);
/// }
///
/// assert!(weights::perturb(Weights::DEFAULT, -1.0, &mut rng).is_err());
/// ```
pub fn perturb<R>(base: Weights, amplitude: f32, rng: &mut R) -> Result<Weights, InvalidAmplitude>
where
    R: Rng + ?Sized,
{
    validate_amplitude(amplitude)?;
    let base = base.to_array();
    Ok(Weights::from_fn(|i| {
        base[i] + rng.random_range(-amplitude..=amplitude)
    }))
}

/// Converts weights to regression features.
#[must_use]
pub fn to_features(weights: Weights) -> [f64; Weights::LEN] {
    weights.to_array().map(f64::from)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_zero_amplitude_returns_base() {
        let mut rng = Pcg32::seed_from_u64(0);
        let base = Weights::new(0.3, -0.2, -0.9, -0.1);
        assert_eq!(perturb(base, 0.0, &mut rng), Ok(base));
    }

    #[test]
    fn test_noise_stays_within_amplitude() {
        let mut rng = Pcg32::seed_from_u64(17);
        for _ in 0..200 {
            let w = perturb(Weights::DEFAULT, 1.5, &mut rng).unwrap();
            for (w, b) in w.to_array().into_iter().zip(Weights::DEFAULT.to_array()) {
                assert!((w - b).abs() <= 1.5 + 1e-6);
            }
        }
    }

    #[test]
    fn test_same_seed_same_samples() {
        let mut a = Pcg32::seed_from_u64(99);
        let mut b = Pcg32::seed_from_u64(99);
        for _ in 0..10 {
            assert_eq!(
                perturb(Weights::DEFAULT, 1.0, &mut a),
                perturb(Weights::DEFAULT, 1.0, &mut b)
            );
        }
    }

    #[test]
    fn test_rejects_invalid_amplitude() {
        let mut rng = Pcg32::seed_from_u64(0);
        for amplitude in [-0.1, f32::NAN, f32::INFINITY] {
            assert!(perturb(Weights::DEFAULT, amplitude, &mut rng).is_err());
        }
    }
}
