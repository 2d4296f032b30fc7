use crate::error::{Result, TournamentError};
use crate::score::ScoreGenerator;
use crate::types::*;
use tracing::{debug, info};

/// Fill the configured pots with qualified teams, each pot ordered by seed
pub fn build_pots(seeded: &[RankedTeam], config: &TournamentConfig) -> Result<Vec<Vec<BracketTeam>>> {
    let required = config.bracket_size();
    let available = seeded.iter().filter(|r| r.qualified).count();

    config
        .pots
        .iter()
        .map(|seeds| {
            let mut seeds = seeds.clone();
            seeds.sort_unstable();
            seeds
                .iter()
                .map(|seed| {
                    seeded
                        .iter()
                        .find(|r| r.qualified && r.seed == *seed)
                        .map(BracketTeam::from)
                        .ok_or(TournamentError::InsufficientQualifiers { required, available })
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect()
}

/// Play one knockout match. The first team must outscore the second to
/// advance; an exact tie sends the second team through.
fn play_match<G: ScoreGenerator>(
    stage: Stage,
    team_a: BracketTeam,
    team_b: BracketTeam,
    scores: &mut G,
) -> KnockoutMatch {
    let (score_a, score_b) = scores.generate(team_a.rank, team_b.rank);
    let winner = if score_a > score_b { team_a.clone() } else { team_b.clone() };

    debug!(
        ?stage,
        team_a = %team_a.name,
        team_b = %team_b.name,
        score_a,
        score_b,
        winner = %winner.name,
        "knockout match"
    );

    KnockoutMatch {
        stage,
        team_a,
        team_b,
        score_a,
        score_b,
        winner,
    }
}

/// Play the bracket from the first round to the final.
///
/// Adjacent winners meet in the next round. The two semifinal losers play
/// for third place, then the semifinal winners play the final.
pub fn play_knockout<G: ScoreGenerator>(
    seeded: &[RankedTeam],
    config: &TournamentConfig,
    scores: &mut G,
) -> Result<KnockoutResult> {
    config.validate()?;
    let pots = build_pots(seeded, config)?;

    let mut pairings: Vec<(BracketTeam, BracketTeam)> = config
        .first_round
        .iter()
        .map(|p| {
            (
                pots[p.first.pot][p.first.index].clone(),
                pots[p.second.pot][p.second.index].clone(),
            )
        })
        .collect();
    let mut matches = Vec::with_capacity(config.bracket_size());

    loop {
        let stage = Stage::for_round(pairings.len() * 2);
        let mut played = Vec::with_capacity(pairings.len());
        for (team_a, team_b) in pairings {
            played.push(play_match(stage, team_a, team_b, scores));
        }

        if played.len() == 2 {
            let third = play_match(
                Stage::ThirdPlace,
                played[0].loser().clone(),
                played[1].loser().clone(),
                scores,
            );
            let final_match = play_match(
                Stage::Final,
                played[0].winner.clone(),
                played[1].winner.clone(),
                scores,
            );

            let medals = Medals {
                gold: final_match.winner.clone(),
                silver: final_match.loser().clone(),
                bronze: third.winner.clone(),
            };
            info!(
                gold = %medals.gold.name,
                silver = %medals.silver.name,
                bronze = %medals.bronze.name,
                "knockout complete"
            );

            matches.extend(played);
            matches.push(third);
            matches.push(final_match);
            return Ok(KnockoutResult { matches, medals });
        }

        pairings = played
            .chunks(2)
            .map(|pair| (pair[0].winner.clone(), pair[1].winner.clone()))
            .collect();
        matches.extend(played);
    }
}
