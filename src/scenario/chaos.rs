use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random-failure policy behind the intentionally unreliable step.
///
/// The randomness is deliberately injectable: a fixed seed makes the step's
/// behavior reproducible in the harness's own tests, while production runs
/// seed from entropy and fail at the configured rate.
pub struct ChaosPolicy {
    probability: f64,
    rng: StdRng,
}

impl ChaosPolicy {
    pub fn new(probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { probability, rng }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// One biased coin flip per invocation of the chaos step.
    pub fn should_fail(&mut self) -> bool {
        self.rng.gen::<f64>() < self.probability
    }

    /// The settle delay the original page needed before counting rows,
    /// randomized to widen the timing window.
    pub fn settle_delay_ms(&mut self) -> u64 {
        self.rng.gen_range(500..1500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_reproduces_the_same_outcomes() {
        let mut a = ChaosPolicy::new(0.3, Some(42));
        let mut b = ChaosPolicy::new(0.3, Some(42));
        let outcomes_a: Vec<bool> = (0..100).map(|_| a.should_fail()).collect();
        let outcomes_b: Vec<bool> = (0..100).map(|_| b.should_fail()).collect();
        assert_eq!(outcomes_a, outcomes_b);
    }

    #[test]
    fn empirical_failure_rate_tracks_the_probability() {
        let mut policy = ChaosPolicy::new(0.3, Some(7));
        let trials = 10_000;
        let failures = (0..trials).filter(|_| policy.should_fail()).count();
        let rate = failures as f64 / trials as f64;
        // Generous band: the point is that 0.3 is intentional, not a bug.
        assert!((0.27..=0.33).contains(&rate), "rate was {rate}");
    }

    #[test]
    fn zero_and_one_probabilities_are_degenerate() {
        let mut never = ChaosPolicy::new(0.0, Some(1));
        assert!((0..100).all(|_| !never.should_fail()));

        let mut always = ChaosPolicy::new(1.0, Some(1));
        assert!((0..100).all(|_| always.should_fail()));
    }

    #[test]
    fn settle_delay_stays_in_band() {
        let mut policy = ChaosPolicy::new(0.3, Some(9));
        for _ in 0..100 {
            let delay = policy.settle_delay_ms();
            assert!((500..1500).contains(&delay));
        }
    }
}
