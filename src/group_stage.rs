use crate::error::{Result, TournamentError};
use crate::ranking::RankingComparator;
use crate::score::ScoreGenerator;
use crate::types::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Highest accepted world ranking. Keeps the rank gap, and with it every
/// generated score, far below the range of the running totals.
pub const MAX_RANK: u32 = 1_000_000;

/// Validate the roster and build zeroed groups from it
pub fn initialize_groups(roster: &Roster) -> Result<Vec<Group>> {
    if roster.is_empty() {
        return Err(TournamentError::InvalidRoster("roster has no groups".to_string()));
    }

    let mut groups = Vec::with_capacity(roster.len());
    for (label, entries) in roster {
        if entries.len() < 2 {
            return Err(TournamentError::InvalidRoster(format!(
                "group {} has {} team(s), at least 2 required",
                label,
                entries.len()
            )));
        }

        let mut names = HashSet::new();
        let mut teams = Vec::with_capacity(entries.len());
        for entry in entries {
            if !names.insert(entry.name.as_str()) {
                return Err(TournamentError::InvalidRoster(format!(
                    "duplicate team {} in group {}",
                    entry.name, label
                )));
            }
            let rank = u32::try_from(entry.rank)
                .ok()
                .filter(|rank| (1..=MAX_RANK).contains(rank))
                .ok_or_else(|| {
                    TournamentError::InvalidRoster(format!(
                        "team {} in group {} has invalid rank {}",
                        entry.name, label, entry.rank
                    ))
                })?;

            let mut team = Team::new(&entry.name, rank);
            team.code = entry.code.clone();
            teams.push(team);
        }

        groups.push(Group {
            label: label.clone(),
            teams,
        });
    }

    Ok(groups)
}

/// 1-based matchday of the pairing `(i, j)` in a circle-method schedule.
///
/// Every team plays at most once per matchday: `n - 1` matchdays for an even
/// group, `n` for an odd one (the extra slot is a bye).
pub fn matchday(i: usize, j: usize, teams: usize) -> usize {
    let slots = teams + teams % 2;
    let rounds = slots - 1;
    let pivot = slots - 1;

    let round = if j == pivot {
        (2 * i) % rounds
    } else if i == pivot {
        (2 * j) % rounds
    } else {
        (i + j) % rounds
    };
    round + 1
}

/// Play every pairing of one group once, in roster order.
///
/// The team listed first takes 2 points only if it outscores the other;
/// otherwise, ties included, the second team takes 2 and the first 1.
/// Fails with [`TournamentError::ScoreOverflow`] if a team's totals outgrow `u32`.
pub fn play_group<G: ScoreGenerator>(mut group: Group, scores: &mut G) -> Result<(Group, Vec<GroupMatch>)> {
    let n = group.teams.len();
    let mut log = Vec::with_capacity(group.match_count());

    for i in 0..n {
        for j in (i + 1)..n {
            let (score_a, score_b) = scores.generate(group.teams[i].rank, group.teams[j].rank);
            let (points_a, points_b) = if score_a > score_b { (2, 1) } else { (1, 2) };

            let (head, tail) = group.teams.split_at_mut(j);
            let (team_a, team_b) = (&mut head[i], &mut tail[0]);
            team_a.record(&team_b.name, score_a, score_b, points_a)?;
            team_b.record(&team_a.name, score_b, score_a, points_b)?;

            debug!(
                group = %group.label,
                team_a = %team_a.name,
                team_b = %team_b.name,
                score_a,
                score_b,
                "group match"
            );

            log.push(GroupMatch {
                matchday: matchday(i, j, n),
                team_a: team_a.name.clone(),
                team_b: team_b.name.clone(),
                score_a,
                score_b,
            });
        }
    }

    info!(group = %group.label, matches = log.len(), "group stage complete");
    Ok((group, log))
}

/// Sort a played group into finishing order and produce its table
pub fn standings(group: &mut Group, comparator: &RankingComparator) -> Vec<StandingRow> {
    comparator.rank(&mut group.teams, |team| team);
    group
        .teams
        .iter()
        .enumerate()
        .map(|(index, team)| StandingRow::from_team(index + 1, team))
        .collect()
}
