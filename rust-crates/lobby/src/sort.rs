use crate::{
    model::NormalizedGame,
    status::{
        DerivedStatus,
        derive_status,
    },
};
use multicall::Address;
use std::cmp::Ordering;

#[cfg(test)]
mod tests;

/// One game plus its derived facts: the unit the display comparators
/// order.
#[derive(Clone, Debug)]
pub struct RankedGame {
    pub game: NormalizedGame,
    pub status: DerivedStatus,
}

/// Derive statuses for a snapshot collection in one pass.
pub fn rank_games(games: Vec<NormalizedGame>, viewer: Option<&Address>) -> Vec<RankedGame> {
    games
        .into_iter()
        .map(|game| {
            let status = derive_status(&game, viewer);
            RankedGame { game, status }
        })
        .collect()
}

fn is_playing(ranked: &RankedGame) -> bool {
    ranked.status.user.map(|user| user.is_playing).unwrap_or(false)
}

fn has_lost(ranked: &RankedGame) -> bool {
    ranked.status.user.map(|user| user.has_lost).unwrap_or(false)
}

/// General listing order. Rules apply top to bottom; the first
/// difference decides. Equal-rank games keep their input order, so use
/// a stable sort.
///
/// 1. Both played by the viewer: not-lost first, then in-progress
///    first, then fewer remaining players (closer to resolution).
/// 2. A game the viewer plays before one they do not.
/// 3. Both in progress (viewer in neither): fewer remaining players.
/// 4. Paused games last.
/// 5. Games with registered players before empty ones.
/// 6. Games with survivors before games with none.
pub fn sort_games_default(a: &RankedGame, b: &RankedGame) -> Ordering {
    let a_playing = is_playing(a);
    let b_playing = is_playing(b);

    if a_playing && b_playing {
        match (has_lost(a), has_lost(b)) {
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            (false, false) => {
                match (a.status.is_in_progress, b.status.is_in_progress) {
                    (true, false) => return Ordering::Less,
                    (false, true) => return Ordering::Greater,
                    (true, true) => {
                        match a
                            .status
                            .remaining_players_count
                            .cmp(&b.status.remaining_players_count)
                        {
                            Ordering::Equal => {}
                            closer => return closer,
                        }
                    }
                    (false, false) => {}
                }
            }
            (true, true) => {}
        }
    } else if a_playing {
        return Ordering::Less;
    } else if b_playing {
        return Ordering::Greater;
    }

    // Only when the viewer is in neither game; the both-playing ladder
    // above already settled its own remaining-players tie-break.
    if !a_playing && a.status.is_in_progress && b.status.is_in_progress {
        match a
            .status
            .remaining_players_count
            .cmp(&b.status.remaining_players_count)
        {
            Ordering::Equal => {}
            closer => return closer,
        }
    }

    match (a.status.is_paused, b.status.is_paused) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }

    let a_has_players = a.status.player_addresses_count > 0;
    let b_has_players = b.status.player_addresses_count > 0;
    match (a_has_players, b_has_players) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    let a_has_survivors = a.status.remaining_players_count > 0;
    let b_has_survivors = b.status.remaining_players_count > 0;
    match (a_has_survivors, b_has_survivors) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// "Launching soon" order: this view favors games that have not started
/// yet, so running and paused games sink.
///
/// 1. Paused games last.
/// 2. In-progress games last among the rest.
/// 3. Games with at least one registered player first.
pub fn sort_games_launching(a: &RankedGame, b: &RankedGame) -> Ordering {
    match (a.status.is_paused, b.status.is_paused) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }

    match (a.status.is_in_progress, b.status.is_in_progress) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }

    let a_has_players = a.status.player_addresses_count > 0;
    let b_has_players = b.status.player_addresses_count > 0;
    match (a_has_players, b_has_players) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
