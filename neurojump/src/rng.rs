use rand::Rng;

/// Bernoulli trial succeeding with the given
/// probability. Probabilities outside [0, 1]
/// saturate instead of panicking like `Rng::gen_bool`.
pub(crate) fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}
