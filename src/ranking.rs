//! The single tiebreak policy used for group standings and cross-group seeding.
//!
//! Criteria are applied in order and the first one that separates two teams
//! decides. Head-to-head only applies to a pair of teams level on points,
//! and only when no other team in the class shares that points total. With
//! no class (a direct comparison) head-to-head always applies to the pair,
//! which is not transitive for cyclic three-way results; sorting therefore
//! always goes through [`RankingComparator::rank`], which supplies the class.

use crate::types::Team;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A single tiebreak criterion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankCriterion {
    /// Total points, descending
    Points,
    /// Winner of the direct match between exactly two teams level on points
    HeadToHead,
    /// Scored minus conceded, descending
    PointDifferential,
    /// Total scored, descending
    Scored,
}

impl RankCriterion {
    pub const GROUP_STANDINGS: [RankCriterion; 4] = [
        RankCriterion::Points,
        RankCriterion::HeadToHead,
        RankCriterion::PointDifferential,
        RankCriterion::Scored,
    ];

    pub const CROSS_GROUP: [RankCriterion; 3] = [
        RankCriterion::Points,
        RankCriterion::PointDifferential,
        RankCriterion::Scored,
    ];
}

/// How many teams of a class share each points total
struct PointsTally(HashMap<u32, usize>);

impl PointsTally {
    fn of<'a>(teams: impl IntoIterator<Item = &'a Team>) -> Self {
        let mut tally = HashMap::new();
        for team in teams {
            *tally.entry(team.points).or_insert(0) += 1;
        }
        Self(tally)
    }

    fn is_two_way_tie(&self, points: u32) -> bool {
        self.0.get(&points).copied() == Some(2)
    }
}

/// Orders teams by an explicit chain of criteria.
/// `Ordering::Less` means the first team ranks higher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankingComparator {
    criteria: Vec<RankCriterion>,
}

impl RankingComparator {
    pub fn new(criteria: Vec<RankCriterion>) -> Self {
        Self { criteria }
    }

    pub fn group_standings() -> Self {
        Self::new(RankCriterion::GROUP_STANDINGS.to_vec())
    }

    pub fn cross_group() -> Self {
        Self::new(RankCriterion::CROSS_GROUP.to_vec())
    }

    pub fn criteria(&self) -> &[RankCriterion] {
        &self.criteria
    }

    /// Compare two teams, optionally within the class of teams being ranked
    pub fn compare(&self, a: &Team, b: &Team, class: Option<&[&Team]>) -> Ordering {
        let tally = class.map(|teams| PointsTally::of(teams.iter().copied()));
        self.compare_in(a, b, tally.as_ref())
    }

    /// Stable sort of `items` best-first; `items` is the class
    pub fn rank<T>(&self, items: &mut [T], team: impl Fn(&T) -> &Team) {
        let tally = PointsTally::of(items.iter().map(&team));
        items.sort_by(|a, b| self.compare_in(team(a), team(b), Some(&tally)));
    }

    fn compare_in(&self, a: &Team, b: &Team, tally: Option<&PointsTally>) -> Ordering {
        self.criteria
            .iter()
            .map(|criterion| match criterion {
                RankCriterion::Points => b.points.cmp(&a.points),
                RankCriterion::HeadToHead => head_to_head(a, b, tally),
                RankCriterion::PointDifferential => b.differential().cmp(&a.differential()),
                RankCriterion::Scored => b.scored.cmp(&a.scored),
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

fn head_to_head(a: &Team, b: &Team, tally: Option<&PointsTally>) -> Ordering {
    if a.points != b.points {
        return Ordering::Equal;
    }
    if let Some(tally) = tally {
        if !tally.is_two_way_tie(a.points) {
            return Ordering::Equal;
        }
    }

    // Both sides must hold the same match; guards against namesakes in other groups
    let (Some(ours), Some(theirs)) = (a.head_to_head(&b.name), b.head_to_head(&a.name)) else {
        return Ordering::Equal;
    };
    if ours.score != theirs.opponent_score || ours.opponent_score != theirs.score {
        return Ordering::Equal;
    }

    if ours.won() {
        Ordering::Less
    } else if ours.lost() {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, points: u32, scored: u32, conceded: u32) -> Team {
        let mut team = Team::new(name, 1);
        team.points = points;
        team.scored = scored;
        team.conceded = conceded;
        team
    }

    fn play(a: &mut Team, b: &mut Team, score_a: u32, score_b: u32) {
        a.matches.push(crate::types::MatchResult {
            opponent: b.name.clone(),
            score: score_a,
            opponent_score: score_b,
        });
        b.matches.push(crate::types::MatchResult {
            opponent: a.name.clone(),
            score: score_b,
            opponent_score: score_a,
        });
    }

    #[test]
    fn test_points_decide_first() {
        let cmp = RankingComparator::group_standings();
        let a = team("A", 5, 200, 250);
        let b = team("B", 4, 300, 200);
        assert_eq!(cmp.compare(&a, &b, None), Ordering::Less);
        assert_eq!(cmp.compare(&b, &a, None), Ordering::Greater);
    }

    #[test]
    fn test_head_to_head_beats_differential_for_two_way_tie() {
        let cmp = RankingComparator::group_standings();
        let mut a = team("A", 5, 240, 250);
        let mut b = team("B", 5, 260, 230);
        play(&mut a, &mut b, 81, 80);

        let class = [&a, &b];
        assert_eq!(cmp.compare(&a, &b, Some(&class)), Ordering::Less);
        assert_eq!(cmp.compare(&a, &b, None), Ordering::Less);
    }

    #[test]
    fn test_three_way_tie_skips_head_to_head() {
        let cmp = RankingComparator::group_standings();
        let mut a = team("A", 5, 240, 250);
        let mut b = team("B", 5, 260, 230);
        let c = team("C", 5, 250, 250);
        play(&mut a, &mut b, 81, 80);

        let class = [&a, &b, &c];
        // Differential decides: B(+30) ahead of A(-10)
        assert_eq!(cmp.compare(&a, &b, Some(&class)), Ordering::Greater);
    }

    #[test]
    fn test_tied_head_to_head_falls_through() {
        let cmp = RankingComparator::group_standings();
        let mut a = team("A", 5, 240, 250);
        let mut b = team("B", 5, 260, 230);
        play(&mut a, &mut b, 70, 70);
        assert_eq!(cmp.compare(&a, &b, None), Ordering::Greater);
    }

    #[test]
    fn test_scored_is_last_resort() {
        let cmp = RankingComparator::cross_group();
        let a = team("A", 5, 250, 240);
        let b = team("B", 5, 260, 250);
        assert_eq!(cmp.compare(&a, &b, None), Ordering::Greater);
        assert_eq!(cmp.compare(&a, &a.clone(), None), Ordering::Equal);
    }

    #[test]
    fn test_namesake_from_other_group_is_not_head_to_head() {
        let cmp = RankingComparator::group_standings();
        let mut a = team("A", 5, 240, 250);
        let mut other = team("X", 5, 240, 250);
        let mut b = team("B", 5, 260, 230);
        let mut other_b = team("Y", 5, 240, 250);
        // A beat some "B" in its group, this B never met A
        play(&mut a, &mut other, 90, 60);
        play(&mut b, &mut other_b, 50, 60);
        a.matches[0].opponent = "B".to_string();

        assert_eq!(cmp.compare(&a, &b, None), Ordering::Greater);
    }

    #[test]
    fn test_cyclic_pairwise_head_to_head_is_not_transitive() {
        // A beat B, B beat C, C beat A; all level on points
        let cmp = RankingComparator::group_standings();
        let mut a = team("A", 4, 240, 240);
        let mut b = team("B", 4, 240, 240);
        let mut c = team("C", 4, 240, 240);
        play(&mut a, &mut b, 80, 70);
        play(&mut b, &mut c, 80, 70);
        play(&mut c, &mut a, 80, 70);

        assert_eq!(cmp.compare(&a, &b, None), Ordering::Less);
        assert_eq!(cmp.compare(&b, &c, None), Ordering::Less);
        assert_eq!(cmp.compare(&c, &a, None), Ordering::Less);

        // With the class supplied the three-way tie ignores head-to-head
        let class = [&a, &b, &c];
        assert_eq!(cmp.compare(&a, &b, Some(&class)), Ordering::Equal);
    }

    #[test]
    fn test_rank_sorts_best_first_and_is_stable() {
        let cmp = RankingComparator::group_standings();
        let mut teams = vec![
            team("Low", 3, 200, 260),
            team("Even1", 4, 240, 240),
            team("Top", 6, 270, 210),
            team("Even2", 4, 240, 240),
        ];
        cmp.rank(&mut teams, |t| t);
        let names: Vec<_> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Top", "Even1", "Even2", "Low"]);
    }
}
