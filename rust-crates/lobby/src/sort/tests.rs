#![allow(non_snake_case)]

use super::*;
use crate::model::{
    GameIdentity,
    GameSettings,
    PlayerRecord,
};
use proptest::prelude::*;

const VIEWER: Address = Address::new([0xee; 20]);

fn settings() -> GameSettings {
    GameSettings {
        name: "ranked".to_string(),
        max_players: 50,
        play_time_range: 48,
        registration_amount: 1_000,
        prizepool: 0,
        treasury_fee: 500,
        creator_fee: 300,
        encoded_cron: "0 18 * * *".to_string(),
    }
}

fn player(address: Address, has_lost: bool) -> PlayerRecord {
    PlayerRecord {
        address,
        registered_at: 0,
        has_lost,
        prize_claimed: false,
    }
}

/// Build a ranked game whose derived status is computed for `VIEWER`,
/// exactly as the listing pipeline would.
fn ranked(
    paused: bool,
    finished: bool,
    others: u8,
    others_lost: u8,
    viewer_plays: bool,
    viewer_lost: bool,
) -> RankedGame {
    let mut players = Vec::new();
    if viewer_plays {
        players.push(player(VIEWER, viewer_lost));
    }
    for n in 0..others {
        players.push(player(Address::new([n + 1; 20]), n < others_lost));
    }
    let game = NormalizedGame {
        identity: GameIdentity::new(Address::new([0x77; 20]), 1),
        settings: settings(),
        paused,
        finished,
        player_addresses: Some(players.iter().map(|p| p.address).collect()),
        players: Some(players),
        prizes: None,
    };
    let status = derive_status(&game, Some(&VIEWER));
    RankedGame { game, status }
}

fn arb_ranked() -> impl Strategy<Value = RankedGame> {
    (
        any::<bool>(),
        any::<bool>(),
        0u8..6,
        0u8..6,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(paused, finished, others, lost, viewer_plays, viewer_lost)| {
            ranked(paused, finished, others, lost.min(others), viewer_plays, viewer_lost)
        })
}

#[test]
fn default__fewer_remaining_players_first_when_viewer_plays_neither() {
    // given: both in progress, viewer in neither, 3 vs 7 survivors
    let closer = ranked(false, false, 3, 0, false, false);
    let further = ranked(false, false, 7, 0, false, false);

    assert_eq!(sort_games_default(&closer, &further), Ordering::Less);
    assert_eq!(sort_games_default(&further, &closer), Ordering::Greater);
}

#[test]
fn default__remaining_tie_break_skipped_when_viewer_lost_in_both() {
    // Both played and lost: the in-progress tie-break is reserved for
    // games the viewer is not part of, so these rank equal.
    let a = ranked(false, false, 7, 0, true, true);
    let b = ranked(false, false, 3, 0, true, true);

    assert_eq!(sort_games_default(&a, &b), Ordering::Equal);
}

#[test]
fn default__not_lost_before_lost_when_viewer_plays_both() {
    let alive = ranked(false, false, 4, 0, true, false);
    let eliminated = ranked(false, false, 2, 0, true, true);

    assert_eq!(sort_games_default(&alive, &eliminated), Ordering::Less);
}

#[test]
fn default__paused_sinks_below_unstarted_games() {
    let paused = ranked(true, false, 2, 0, false, false);
    let idle = ranked(false, true, 2, 0, false, false);

    assert_eq!(sort_games_default(&paused, &idle), Ordering::Greater);
}

#[test]
fn default__populated_games_rank_above_empty_ones() {
    let populated = ranked(false, true, 2, 2, false, false);
    let empty = ranked(false, true, 0, 0, false, false);

    assert_eq!(sort_games_default(&populated, &empty), Ordering::Less);
    // ...and among populated games, survivors beat none left
    let survivors = ranked(false, true, 2, 1, false, false);
    assert_eq!(sort_games_default(&survivors, &populated), Ordering::Less);
}

#[test]
fn launching__running_and_paused_games_sink() {
    let fresh = ranked(false, false, 0, 0, false, false);
    let running = ranked(false, false, 3, 0, false, false);
    let paused = ranked(true, false, 0, 0, false, false);

    assert_eq!(sort_games_launching(&fresh, &running), Ordering::Less);
    assert_eq!(sort_games_launching(&running, &paused), Ordering::Less);
}

#[test]
fn launching__registered_players_break_ties_between_unstarted_games() {
    // neither is in progress: one is finished with players, one empty
    let with_players = ranked(false, true, 3, 0, false, false);
    let empty = ranked(false, false, 0, 0, false, false);

    assert_eq!(sort_games_launching(&with_players, &empty), Ordering::Less);
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 10, .. ProptestConfig::default() })]
    #[test]
    fn default__viewer_playing_and_alive_always_ranks_first(
        a in arb_ranked(),
        b in arb_ranked(),
    ) {
        let playing = ranked(a.game.paused, a.game.finished, 3, 1, true, false);
        prop_assume!(!is_playing(&b));

        prop_assert_eq!(sort_games_default(&playing, &b), Ordering::Less);
        prop_assert_eq!(sort_games_default(&b, &playing), Ordering::Greater);
    }

    #[test]
    fn launching__paused_always_sorts_after_every_non_paused(
        a in arb_ranked(),
        b in arb_ranked(),
    ) {
        let paused = ranked(true, a.game.finished, 4, 2, true, false);
        prop_assume!(!b.status.is_paused);

        prop_assert_eq!(sort_games_launching(&paused, &b), Ordering::Greater);
        prop_assert_eq!(sort_games_launching(&b, &paused), Ordering::Less);
    }

    #[test]
    fn comparators__are_antisymmetric(a in arb_ranked(), b in arb_ranked()) {
        prop_assert_eq!(
            sort_games_default(&a, &b),
            sort_games_default(&b, &a).reverse()
        );
        prop_assert_eq!(
            sort_games_launching(&a, &b),
            sort_games_launching(&b, &a).reverse()
        );
    }
}
