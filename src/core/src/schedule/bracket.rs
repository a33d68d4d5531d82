use crate::league::{Game, PlayoffRound, PlayoffSeed};
use log::warn;

/// Games of one bracket round. Conference rounds pair each conference's
/// seeds with the better seed hosting; a round that lacks the seeds it needs
/// yields no games.
pub fn generate_playoff_round(
    afc: &[PlayoffSeed],
    nfc: &[PlayoffSeed],
    round: PlayoffRound,
    season: u16,
    week: u8,
) -> Vec<Game> {
    if round == PlayoffRound::SuperBowl {
        return super_bowl(afc, nfc, season, week).into_iter().collect();
    }

    [afc, nfc]
        .into_iter()
        .flat_map(|seeds| conference_round(seeds, round, season, week))
        .collect()
}

fn conference_round(seeds: &[PlayoffSeed], round: PlayoffRound, season: u16, week: u8) -> Vec<Game> {
    let mut seeds = seeds.to_vec();
    seeds.sort_by_key(|seed| seed.seed);

    let pairs: Vec<(usize, usize)> = match (round, seeds.len()) {
        (PlayoffRound::WildCard, len) if len >= 7 => vec![(1, 6), (2, 5), (3, 4)],
        (PlayoffRound::Divisional, 4) => vec![(0, 3), (1, 2)],
        (PlayoffRound::ConferenceChampionship, 2) => vec![(0, 1)],
        (round, len) => {
            warn!("{} cannot be drawn from {} seeds", round, len);
            return Vec::new();
        }
    };

    pairs
        .into_iter()
        .map(|(high, low)| Game::playoff(season, week, round, seeds[high].team_id, seeds[low].team_id))
        .collect()
}

/// Conference champions meet; the AFC hosts in even seasons
fn super_bowl(afc: &[PlayoffSeed], nfc: &[PlayoffSeed], season: u16, week: u8) -> Option<Game> {
    match (afc, nfc) {
        ([afc], [nfc]) => {
            let (home, away) = if season % 2 == 0 { (afc, nfc) } else { (nfc, afc) };
            Some(Game::playoff(season, week, PlayoffRound::SuperBowl, home.team_id, away.team_id))
        }
        _ => {
            warn!(
                "super bowl needs one champion per conference, got {} and {}",
                afc.len(),
                nfc.len()
            );
            None
        }
    }
}

/// Seeds still alive after a round: winners of their game plus teams that
/// had no game. Sorted by seed.
pub fn filter_to_winners(seeds: &[PlayoffSeed], games: &[Game]) -> Vec<PlayoffSeed> {
    let mut survivors: Vec<PlayoffSeed> = seeds
        .iter()
        .filter(|seed| {
            let mut played = games.iter().filter(|game| game.involves(seed.team_id)).peekable();
            if played.peek().is_none() {
                return true;
            }
            played.any(|game| game.winner() == Some(seed.team_id))
        })
        .copied()
        .collect();

    survivors.sort_by_key(|seed| seed.seed);
    survivors
}
