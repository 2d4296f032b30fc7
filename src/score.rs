use rand::Rng;
use std::collections::VecDeque;

/// Produces the two scores of a single match from the teams' ranks
pub trait ScoreGenerator {
    /// Scores for a match between a team ranked `rank_a` and one ranked `rank_b`
    fn generate(&mut self, rank_a: u32, rank_b: u32) -> (u32, u32);
}

/// Base score plus uniform variance, nudged by the rank gap.
///
/// `score_a = base + U(0..=variance) + (rank_b - rank_a)`
/// `score_b = base + U(0..=variance) - (rank_b - rank_a)`
///
/// Both draws are independent. A score that would go negative is floored at 0.
pub struct RankedScoreGenerator<R: Rng> {
    rng: R,
    base_score: u32,
    variance: u32,
}

impl<R: Rng> RankedScoreGenerator<R> {
    pub fn new(rng: R, base_score: u32, variance: u32) -> Self {
        Self {
            rng,
            base_score,
            variance,
        }
    }

    fn draw(&mut self) -> i64 {
        self.base_score as i64 + self.rng.gen_range(0..=self.variance) as i64
    }
}

impl<R: Rng> ScoreGenerator for RankedScoreGenerator<R> {
    fn generate(&mut self, rank_a: u32, rank_b: u32) -> (u32, u32) {
        let rank_difference = rank_b as i64 - rank_a as i64;
        let score_a = self.draw() + rank_difference;
        let score_b = self.draw() - rank_difference;
        (clamp_score(score_a), clamp_score(score_b))
    }
}

fn clamp_score(score: i64) -> u32 {
    score.clamp(0, u32::MAX as i64) as u32
}

/// Replays a fixed sequence of scores, ignoring ranks.
///
/// # Panics
///
/// `generate` panics once the sequence runs out, unless a fallback was set
/// with [`ScriptedScores::with_fallback`] or the source was built with
/// [`ScriptedScores::constant`].
#[derive(Clone, Debug)]
pub struct ScriptedScores {
    scores: VecDeque<(u32, u32)>,
    fallback: Option<(u32, u32)>,
    served: usize,
}

impl ScriptedScores {
    pub fn new(scores: impl IntoIterator<Item = (u32, u32)>) -> Self {
        Self {
            scores: scores.into_iter().collect(),
            fallback: None,
            served: 0,
        }
    }

    /// Every match ends with the same score
    pub fn constant(score_a: u32, score_b: u32) -> Self {
        Self {
            scores: VecDeque::new(),
            fallback: Some((score_a, score_b)),
            served: 0,
        }
    }

    /// Score for every match after the sequence runs out
    pub fn with_fallback(mut self, score_a: u32, score_b: u32) -> Self {
        self.fallback = Some((score_a, score_b));
        self
    }
}

impl ScoreGenerator for ScriptedScores {
    fn generate(&mut self, _rank_a: u32, _rank_b: u32) -> (u32, u32) {
        let score = match self.scores.pop_front().or(self.fallback) {
            Some(score) => score,
            None => panic!("scripted scores ran out after {} matches and no fallback is set", self.served),
        };
        self.served += 1;
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scores_stay_in_band_for_equal_ranks() {
        let mut gen = RankedScoreGenerator::new(StdRng::seed_from_u64(7), 70, 30);
        for _ in 0..500 {
            let (a, b) = gen.generate(4, 4);
            assert!((70..=100).contains(&a));
            assert!((70..=100).contains(&b));
        }
    }

    #[test]
    fn test_rank_gap_shifts_band() {
        let mut gen = RankedScoreGenerator::new(StdRng::seed_from_u64(11), 70, 30);
        for _ in 0..500 {
            // Stronger team A: +9 for A, -9 for B
            let (a, b) = gen.generate(1, 10);
            assert!((79..=109).contains(&a));
            assert!((61..=91).contains(&b));
        }
    }

    #[test]
    fn test_zero_variance_is_deterministic() {
        let mut gen = RankedScoreGenerator::new(StdRng::seed_from_u64(0), 70, 0);
        assert_eq!(gen.generate(3, 5), (72, 68));
        assert_eq!(gen.generate(5, 3), (68, 72));
    }

    #[test]
    fn test_huge_rank_gap_floors_at_zero() {
        let mut gen = RankedScoreGenerator::new(StdRng::seed_from_u64(0), 70, 0);
        let (a, b) = gen.generate(1, 500);
        assert_eq!(a, 569);
        assert_eq!(b, 0);
    }

    #[test]
    fn test_scripted_scores_replay_then_fall_back() {
        let mut gen = ScriptedScores::new([(80, 75), (60, 61)]).with_fallback(1, 2);
        assert_eq!(gen.generate(1, 2), (80, 75));
        assert_eq!(gen.generate(1, 2), (60, 61));
        assert_eq!(gen.generate(1, 2), (1, 2));
        assert_eq!(gen.generate(9, 9), (1, 2));
    }

    #[test]
    #[should_panic(expected = "ran out after 1 matches")]
    fn test_scripted_scores_without_fallback_panic_when_exhausted() {
        let mut gen = ScriptedScores::new([(80, 75)]);
        assert_eq!(gen.generate(1, 2), (80, 75));
        gen.generate(1, 2);
    }

    #[test]
    fn test_constant_scores_never_run_out() {
        let mut gen = ScriptedScores::constant(70, 70);
        for _ in 0..10 {
            assert_eq!(gen.generate(1, 2), (70, 70));
        }
    }

    #[test]
    fn test_same_seed_same_scores() {
        let mut first = RankedScoreGenerator::new(StdRng::seed_from_u64(99), 70, 30);
        let mut second = RankedScoreGenerator::new(StdRng::seed_from_u64(99), 70, 30);
        for _ in 0..50 {
            assert_eq!(first.generate(2, 6), second.generate(2, 6));
        }
    }
}
