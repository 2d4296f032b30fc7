use crate::error::{Result, TournamentError};
use crate::ranking::RankingComparator;
use crate::types::{Group, RankedTeam};
use tracing::{debug, info};

/// Assign every team a global seed from its group finish.
///
/// `groups` must already be in finishing order. Teams are split into
/// position classes (all group winners, all runners-up, ...), each class is
/// ordered with `comparator`, and seeds run class by class: the best group
/// winner is seed 1 and the first runner-up follows the last group winner.
/// Seeds up to `bracket_size` qualify; the rest are ranked but left out.
pub fn seed_teams(
    groups: &[Group],
    comparator: &RankingComparator,
    bracket_size: usize,
) -> Result<Vec<RankedTeam>> {
    let available: usize = groups.iter().map(|g| g.teams.len()).sum();
    if available < bracket_size {
        return Err(TournamentError::InsufficientQualifiers {
            required: bracket_size,
            available,
        });
    }

    let deepest = groups.iter().map(|g| g.teams.len()).max().unwrap_or(0);
    let mut classes: Vec<Vec<RankedTeam>> = vec![Vec::new(); deepest];
    for group in groups {
        for (index, team) in group.teams.iter().enumerate() {
            classes[index].push(RankedTeam {
                team: team.clone(),
                group: group.label.clone(),
                position: index + 1,
                seed: 0,
                qualified: false,
            });
        }
    }

    let mut seeded = Vec::with_capacity(available);
    for mut class in classes {
        comparator.rank(&mut class, |ranked| &ranked.team);
        let offset = seeded.len();
        for (index, mut ranked) in class.into_iter().enumerate() {
            ranked.seed = offset + index + 1;
            ranked.qualified = ranked.seed <= bracket_size;
            debug!(
                team = %ranked.team.name,
                group = %ranked.group,
                position = ranked.position,
                seed = ranked.seed,
                "seeded"
            );
            seeded.push(ranked);
        }
    }

    info!(teams = seeded.len(), qualified = bracket_size, "seeding complete");
    Ok(seeded)
}
