use crate::error::{Result, TournamentError};
use crate::ranking::RankCriterion;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One roster line supplied by the caller.
///
/// Accepts both the plain keys and the keys used by the published
/// tournament data (`Team`, `ISOCode`, `FIBARanking`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(alias = "Team")]
    pub name: String,
    #[serde(alias = "ISOCode", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// World ranking, lower is stronger
    #[serde(alias = "FIBARanking")]
    pub rank: i64,
}

impl RosterEntry {
    pub fn new(name: &str, rank: i64) -> Self {
        Self {
            name: name.to_string(),
            code: None,
            rank,
        }
    }
}

/// Group label -> ordered team list. Groups are processed in label order.
pub type Roster = BTreeMap<String, Vec<RosterEntry>>;

/// Outcome of one group match from a single team's point of view
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub opponent: String,
    pub score: u32,
    pub opponent_score: u32,
}

impl MatchResult {
    pub fn won(&self) -> bool {
        self.score > self.opponent_score
    }

    pub fn lost(&self) -> bool {
        self.score < self.opponent_score
    }
}

/// A team and its accumulated group stage statistics
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub rank: u32,
    pub points: u32,
    pub scored: u32,
    pub conceded: u32,
    pub matches: Vec<MatchResult>,
}

impl Team {
    pub fn new(name: &str, rank: u32) -> Self {
        Self {
            name: name.to_string(),
            code: None,
            rank,
            points: 0,
            scored: 0,
            conceded: 0,
            matches: Vec::new(),
        }
    }

    pub fn differential(&self) -> i64 {
        self.scored as i64 - self.conceded as i64
    }

    pub fn wins(&self) -> usize {
        self.matches.iter().filter(|m| m.won()).count()
    }

    /// Ties count as neither a win nor a loss here, even though the
    /// points table awards them to the second team.
    pub fn losses(&self) -> usize {
        self.matches.iter().filter(|m| m.lost()).count()
    }

    /// The recorded match against `opponent`, if any
    pub fn head_to_head(&self, opponent: &str) -> Option<&MatchResult> {
        self.matches.iter().find(|m| m.opponent == opponent)
    }

    /// Add one played match to the running totals.
    /// Leaves the team untouched if any total would overflow.
    pub(crate) fn record(&mut self, opponent: &str, score: u32, opponent_score: u32, points: u32) -> Result<()> {
        let overflow = || TournamentError::ScoreOverflow {
            team: self.name.clone(),
            max: u32::MAX,
        };
        let scored = self.scored.checked_add(score).ok_or_else(overflow)?;
        let conceded = self.conceded.checked_add(opponent_score).ok_or_else(overflow)?;
        let total = self.points.checked_add(points).ok_or_else(overflow)?;

        self.scored = scored;
        self.conceded = conceded;
        self.points = total;
        self.matches.push(MatchResult {
            opponent: opponent.to_string(),
            score,
            opponent_score,
        });
        Ok(())
    }
}

/// A labelled round-robin group
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
    pub teams: Vec<Team>,
}

impl Group {
    pub fn match_count(&self) -> usize {
        let n = self.teams.len();
        n * n.saturating_sub(1) / 2
    }
}

/// One played group match, in play order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMatch {
    /// 1-based matchday from the round-robin schedule
    pub matchday: usize,
    pub team_a: String,
    pub team_b: String,
    pub score_a: u32,
    pub score_b: u32,
}

/// A row in a final group table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    pub position: usize,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub rank: u32,
    pub wins: usize,
    pub losses: usize,
    pub points: u32,
    pub scored: u32,
    pub conceded: u32,
    pub differential: i64,
}

impl StandingRow {
    pub fn from_team(position: usize, team: &Team) -> Self {
        Self {
            position,
            name: team.name.clone(),
            code: team.code.clone(),
            rank: team.rank,
            wins: team.wins(),
            losses: team.losses(),
            points: team.points,
            scored: team.scored,
            conceded: team.conceded,
            differential: team.differential(),
        }
    }
}

/// Final state of one group: standings plus the match log
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupResult {
    pub label: String,
    pub standings: Vec<StandingRow>,
    pub matches: Vec<GroupMatch>,
}

/// A team tagged with its group finish and global seed.
/// Value copy, independent of the group's own records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedTeam {
    pub team: Team,
    pub group: String,
    /// In-group finishing position (1-based)
    pub position: usize,
    /// Global seed (1-based)
    pub seed: usize,
    /// Whether the seed falls inside the bracket
    pub qualified: bool,
}

/// A participant in the knockout bracket
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BracketTeam {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub group: String,
    pub seed: usize,
    pub rank: u32,
}

impl From<&RankedTeam> for BracketTeam {
    fn from(ranked: &RankedTeam) -> Self {
        Self {
            name: ranked.team.name.clone(),
            code: ranked.team.code.clone(),
            group: ranked.group.clone(),
            seed: ranked.seed,
            rank: ranked.team.rank,
        }
    }
}

/// Knockout stage labels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Earlier rounds, labelled by number of teams still in
    RoundOf(usize),
    Quarterfinal,
    Semifinal,
    ThirdPlace,
    Final,
}

impl Stage {
    /// Label for an elimination round entered by `teams` teams.
    /// The final and third-place match are labelled where they are played.
    pub fn for_round(teams: usize) -> Self {
        match teams {
            8 => Stage::Quarterfinal,
            4 => Stage::Semifinal,
            n => Stage::RoundOf(n),
        }
    }
}

/// One played knockout match
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnockoutMatch {
    pub stage: Stage,
    pub team_a: BracketTeam,
    pub team_b: BracketTeam,
    pub score_a: u32,
    pub score_b: u32,
    pub winner: BracketTeam,
}

impl KnockoutMatch {
    pub fn loser(&self) -> &BracketTeam {
        if self.winner == self.team_a {
            &self.team_b
        } else {
            &self.team_a
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medals {
    pub gold: BracketTeam,
    pub silver: BracketTeam,
    pub bronze: BracketTeam,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnockoutResult {
    /// Every bracket match in play order
    pub matches: Vec<KnockoutMatch>,
    pub medals: Medals,
}

impl KnockoutResult {
    pub fn matches_in(&self, stage: Stage) -> impl Iterator<Item = &KnockoutMatch> {
        self.matches.iter().filter(move |m| m.stage == stage)
    }
}

/// Everything a presentation layer needs from one run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentResult {
    pub groups: Vec<GroupResult>,
    pub seeding: Vec<RankedTeam>,
    pub knockout: KnockoutResult,
}

/// Position of a team inside a pot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PotSlot {
    pub pot: usize,
    pub index: usize,
}

impl PotSlot {
    pub const fn new(pot: usize, index: usize) -> Self {
        Self { pot, index }
    }
}

/// A first-round bracket pairing. `second` wins exact ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub first: PotSlot,
    pub second: PotSlot,
}

/// Tournament configuration parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Base score before variance and rank adjustment
    pub base_score: u32,
    /// Random variance added to each score, drawn from 0..=score_variance
    pub score_variance: u32,

    /// Seeds held by each pot, best pot first
    pub pots: Vec<Vec<usize>>,
    /// First knockout round, in bracket order; later rounds pair adjacent winners
    pub first_round: Vec<Pairing>,

    /// Tiebreak chain for in-group standings
    pub group_criteria: Vec<RankCriterion>,
    /// Tiebreak chain for ranking a position class across groups
    pub seeding_criteria: Vec<RankCriterion>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            base_score: 70,
            score_variance: 30,
            pots: vec![vec![1, 2], vec![3, 4], vec![5, 6], vec![7, 8]],
            first_round: vec![
                Pairing { first: PotSlot::new(0, 0), second: PotSlot::new(3, 1) },
                Pairing { first: PotSlot::new(0, 1), second: PotSlot::new(3, 0) },
                Pairing { first: PotSlot::new(1, 0), second: PotSlot::new(2, 1) },
                Pairing { first: PotSlot::new(1, 1), second: PotSlot::new(2, 0) },
            ],
            group_criteria: RankCriterion::GROUP_STANDINGS.to_vec(),
            seeding_criteria: RankCriterion::CROSS_GROUP.to_vec(),
        }
    }
}

impl TournamentConfig {
    /// Number of teams that enter the knockout phase
    pub fn bracket_size(&self) -> usize {
        self.first_round.len() * 2
    }

    /// Check that pots, pairings and criteria describe a playable bracket
    pub fn validate(&self) -> Result<()> {
        let pairs = self.first_round.len();
        if pairs < 2 || !pairs.is_power_of_two() {
            return Err(TournamentError::InvalidConfig(format!(
                "first round must have a power-of-two number of pairings (at least 2), got {}",
                pairs
            )));
        }

        let size = self.bracket_size();
        let mut seeds = HashSet::new();
        for seed in self.pots.iter().flatten() {
            if *seed == 0 || *seed > size {
                return Err(TournamentError::InvalidConfig(format!(
                    "pot seed {} outside bracket of {}",
                    seed, size
                )));
            }
            if !seeds.insert(*seed) {
                return Err(TournamentError::InvalidConfig(format!(
                    "seed {} appears in more than one pot slot",
                    seed
                )));
            }
        }
        if seeds.len() != size {
            return Err(TournamentError::InvalidConfig(format!(
                "pots hold {} seeds, bracket needs {}",
                seeds.len(),
                size
            )));
        }

        let mut used = HashSet::new();
        for slot in self.first_round.iter().flat_map(|p| [p.first, p.second]) {
            let in_range = self
                .pots
                .get(slot.pot)
                .map(|pot| slot.index < pot.len())
                .unwrap_or(false);
            if !in_range {
                return Err(TournamentError::InvalidConfig(format!(
                    "pairing slot pot {} index {} does not exist",
                    slot.pot, slot.index
                )));
            }
            if !used.insert(slot) {
                return Err(TournamentError::InvalidConfig(format!(
                    "pairing slot pot {} index {} used twice",
                    slot.pot, slot.index
                )));
            }
        }

        if self.group_criteria.is_empty() || self.seeding_criteria.is_empty() {
            return Err(TournamentError::InvalidConfig(
                "ranking criteria must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
