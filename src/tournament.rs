use crate::error::Result;
use crate::group_stage::{initialize_groups, play_group, standings};
use crate::knockout::play_knockout;
use crate::ranking::RankingComparator;
use crate::score::{RankedScoreGenerator, ScoreGenerator};
use crate::seeding::seed_teams;
use crate::types::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Runs the whole pipeline: group stage, standings, seeding, knockout
#[derive(Clone, Debug)]
pub struct Tournament {
    /// Tournament configuration
    pub config: TournamentConfig,
    /// Random number generator seed
    rng_seed: u64,
}

impl Tournament {
    pub fn new(config: TournamentConfig, seed: u64) -> Self {
        Self {
            config,
            rng_seed: seed,
        }
    }

    /// Seed drawn from OS entropy. The seed is kept so the run can be replayed.
    pub fn from_entropy(config: TournamentConfig) -> Self {
        let seed = StdRng::from_entropy().gen();
        Self::new(config, seed)
    }

    pub fn seed(&self) -> u64 {
        self.rng_seed
    }

    /// Simulate with scores drawn from this tournament's seeded RNG
    pub fn run(&self, roster: &Roster) -> Result<TournamentResult> {
        let mut scores = RankedScoreGenerator::new(
            StdRng::seed_from_u64(self.rng_seed),
            self.config.base_score,
            self.config.score_variance,
        );
        self.run_with(roster, &mut scores)
    }

    /// Simulate with an injected score source
    pub fn run_with<G: ScoreGenerator>(&self, roster: &Roster, scores: &mut G) -> Result<TournamentResult> {
        self.config.validate()?;
        let groups = initialize_groups(roster)?;
        info!(groups = groups.len(), seed = self.rng_seed, "tournament started");

        let group_comparator = RankingComparator::new(self.config.group_criteria.clone());
        let mut played = Vec::with_capacity(groups.len());
        let mut results = Vec::with_capacity(groups.len());
        for group in groups {
            let (mut group, matches) = play_group(group, scores)?;
            let table = standings(&mut group, &group_comparator);
            results.push(GroupResult {
                label: group.label.clone(),
                standings: table,
                matches,
            });
            played.push(group);
        }

        let seeding_comparator = RankingComparator::new(self.config.seeding_criteria.clone());
        let seeding = seed_teams(&played, &seeding_comparator, self.config.bracket_size())?;
        let knockout = play_knockout(&seeding, &self.config, scores)?;

        Ok(TournamentResult {
            groups: results,
            seeding,
            knockout,
        })
    }

    /// Parse a JSON roster, simulate, and return the result as JSON
    pub fn run_json(&self, roster_json: &str) -> Result<String> {
        let roster: Roster = serde_json::from_str(roster_json)?;
        let result = self.run(&roster)?;
        Ok(serde_json::to_string(&result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TournamentError;
    use crate::score::ScriptedScores;

    fn three_groups() -> Roster {
        let mut roster = Roster::new();
        let mut rank = 0;
        for label in ["A", "B", "C"] {
            let entries = (1..=4)
                .map(|i| {
                    rank += 1;
                    RosterEntry::new(&format!("{}{}", label, i), rank)
                })
                .collect();
            roster.insert(label.to_string(), entries);
        }
        roster
    }

    #[test]
    fn test_full_run_shape() {
        let tournament = Tournament::new(TournamentConfig::default(), 42);
        let result = tournament.run(&three_groups()).unwrap();

        assert_eq!(result.groups.len(), 3);
        for group in &result.groups {
            assert_eq!(group.standings.len(), 4);
            assert_eq!(group.matches.len(), 6);
        }
        assert_eq!(result.seeding.len(), 12);
        assert_eq!(result.seeding.iter().filter(|r| r.qualified).count(), 8);
        assert_eq!(result.knockout.matches.len(), 8);
    }

    #[test]
    fn test_same_seed_same_json() {
        let tournament = Tournament::new(TournamentConfig::default(), 2024);
        let roster = serde_json::to_string(&three_groups()).unwrap();
        let first = tournament.run_json(&roster).unwrap();
        let second = tournament.run_json(&roster).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_two_team_group_cannot_fill_bracket() {
        let mut roster = Roster::new();
        roster.insert("A".to_string(), vec![RosterEntry::new("TeamX", 1), RosterEntry::new("TeamY", 5)]);
        let tournament = Tournament::new(TournamentConfig::default(), 1);
        let result = tournament.run(&roster);
        assert!(matches!(result, Err(TournamentError::InsufficientQualifiers { .. })));
    }

    #[test]
    fn test_scripted_group_stage_feeds_standings() {
        // Every match won by the first-listed team: roster order is finishing order
        let tournament = Tournament::new(TournamentConfig::default(), 0);
        let mut scores = ScriptedScores::constant(90, 60);
        let result = tournament.run_with(&three_groups(), &mut scores).unwrap();

        for group in &result.groups {
            let points: Vec<u32> = group.standings.iter().map(|r| r.points).collect();
            assert_eq!(points, [6, 5, 4, 3]);
        }
        assert_eq!(result.seeding[0].position, 1);
        assert_eq!(result.seeding[3].position, 2);
    }

    #[test]
    fn test_bad_json_is_reported() {
        let tournament = Tournament::new(TournamentConfig::default(), 0);
        assert!(matches!(tournament.run_json("{not json"), Err(TournamentError::Json(_))));
    }
}
