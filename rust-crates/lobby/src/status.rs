use crate::model::NormalizedGame;
use multicall::Address;

/// Facts about the viewing account's relationship to a game. Only
/// present when a viewer was supplied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserStatus {
    pub is_playing: bool,
    pub has_lost: bool,
}

/// Facts derived from a normalized snapshot rather than stored on
/// chain. Recomputed from scratch on every poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedStatus {
    pub is_paused: bool,
    pub is_in_progress: bool,
    pub is_free: bool,
    pub player_addresses_count: u32,
    pub remaining_players_count: u32,
    pub user: Option<UserStatus>,
}

/// Pure derivation. Absent optional fields degrade to zero/false; a
/// game with no registered players is a legitimate state, not an error.
pub fn derive_status(
    game: &NormalizedGame,
    viewer: Option<&Address>,
) -> DerivedStatus {
    let player_addresses_count = game.player_addresses_count();
    let remaining_players_count = game
        .players
        .as_ref()
        .map(|players| players.iter().filter(|p| !p.has_lost).count() as u32)
        .unwrap_or(0);
    // Finality is decided by the contract; this only consumes the flag.
    let is_in_progress = !game.paused && player_addresses_count > 0 && !game.finished;
    let user = viewer.map(|account| {
        let is_playing = game
            .player_addresses
            .as_ref()
            .map(|addresses| addresses.contains(account))
            .or_else(|| {
                game.players
                    .as_ref()
                    .map(|players| players.iter().any(|p| p.address == *account))
            })
            .unwrap_or(false);
        let has_lost = game
            .players
            .as_ref()
            .and_then(|players| players.iter().find(|p| p.address == *account))
            .map(|p| p.has_lost)
            .unwrap_or(false);
        UserStatus {
            is_playing,
            has_lost,
        }
    });
    DerivedStatus {
        is_paused: game.paused,
        is_in_progress,
        is_free: game.settings.registration_amount == 0,
        player_addresses_count,
        remaining_players_count,
        user,
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use crate::model::{
        GameIdentity,
        GameSettings,
        PlayerRecord,
    };

    fn settings(registration_amount: u128) -> GameSettings {
        GameSettings {
            name: "test".to_string(),
            max_players: 10,
            play_time_range: 48,
            registration_amount,
            prizepool: 0,
            treasury_fee: 500,
            creator_fee: 300,
            encoded_cron: "0 18 * * *".to_string(),
        }
    }

    fn player(n: u8, has_lost: bool) -> PlayerRecord {
        PlayerRecord {
            address: Address::new([n; 20]),
            registered_at: 0,
            has_lost,
            prize_claimed: false,
        }
    }

    fn game_with_players(players: Vec<PlayerRecord>) -> NormalizedGame {
        NormalizedGame {
            identity: GameIdentity::new(Address::new([1u8; 20]), 1),
            settings: settings(1_000),
            paused: false,
            finished: false,
            player_addresses: Some(players.iter().map(|p| p.address).collect()),
            players: Some(players),
            prizes: None,
        }
    }

    #[test]
    fn derive_status__is_free_only_for_exactly_zero_registration() {
        let mut game = game_with_players(Vec::new());
        game.settings.registration_amount = 0;
        assert!(derive_status(&game, None).is_free);

        // 0.0001 of the native token, in smallest units: not free
        game.settings.registration_amount = 100_000_000_000_000;
        assert!(!derive_status(&game, None).is_free);
    }

    #[test]
    fn derive_status__counts_only_players_who_have_not_lost() {
        let game = game_with_players(vec![
            player(1, false),
            player(2, true),
            player(3, false),
        ]);

        let status = derive_status(&game, None);

        assert_eq!(status.remaining_players_count, 2);
        assert_eq!(status.player_addresses_count, 3);
        assert!(status.remaining_players_count <= game.settings.max_players);
    }

    #[test]
    fn derive_status__in_progress_needs_players_and_neither_pause_nor_finish() {
        let empty = game_with_players(Vec::new());
        assert!(!derive_status(&empty, None).is_in_progress);

        let running = game_with_players(vec![player(1, false)]);
        assert!(derive_status(&running, None).is_in_progress);

        let mut paused = game_with_players(vec![player(1, false)]);
        paused.paused = true;
        assert!(!derive_status(&paused, None).is_in_progress);

        let mut done = game_with_players(vec![player(1, false)]);
        done.finished = true;
        assert!(!derive_status(&done, None).is_in_progress);
    }

    #[test]
    fn derive_status__reports_viewer_participation_and_loss() {
        let game = game_with_players(vec![player(1, false), player(2, true)]);

        let playing = derive_status(&game, Some(&Address::new([2u8; 20])));
        assert_eq!(
            playing.user,
            Some(UserStatus {
                is_playing: true,
                has_lost: true
            })
        );

        let outsider = derive_status(&game, Some(&Address::new([9u8; 20])));
        assert_eq!(outsider.user, Some(UserStatus::default()));

        let anonymous = derive_status(&game, None);
        assert_eq!(anonymous.user, None);
    }

    #[test]
    fn derive_status__degrades_gracefully_when_optional_fields_are_absent() {
        let mut game = game_with_players(vec![player(1, false)]);
        game.player_addresses = None;
        game.players = None;

        let status = derive_status(&game, Some(&Address::new([1u8; 20])));

        assert_eq!(status.player_addresses_count, 0);
        assert_eq!(status.remaining_players_count, 0);
        assert_eq!(status.user, Some(UserStatus::default()));
    }
}
