#![allow(non_snake_case)]

use super::*;
use multicall::{
    CallValue,
    client::in_memory::InMemoryChain,
};

fn game_address(n: u8) -> Address {
    Address::new([n; 20])
}

fn player_address(n: u8) -> Address {
    Address::new([0xa0 + n; 20])
}

fn game_tuple(name: &str, registration_amount: u128) -> CallValue {
    CallValue::Tuple(vec![
        CallValue::Str(name.to_string()),
        CallValue::Uint(10),                  // maxPlayers
        CallValue::Uint(48),                  // playTimeRange
        CallValue::Uint(registration_amount), // registrationAmount
        CallValue::Uint(1_000),               // prizepool
        CallValue::Uint(500),                 // treasuryFee
        CallValue::Uint(300),                 // creatorFee
        CallValue::Str("0 18 * * *".to_string()),
        CallValue::Bool(false), // paused
        CallValue::Bool(false), // finished
    ])
}

fn player_tuple(registered_at: u64, has_lost: bool) -> CallValue {
    CallValue::Tuple(vec![
        CallValue::Uint(registered_at.into()),
        CallValue::Bool(has_lost),
        CallValue::Bool(false),
    ])
}

fn prize_tuple(position: u128, amount: u128) -> CallValue {
    CallValue::Tuple(vec![
        CallValue::Uint(position),
        CallValue::Uint(amount),
        CallValue::Uint(0),
        CallValue::Address(Address::ZERO),
        CallValue::Uint(0),
    ])
}

/// Seed one complete game: base record, address list, one record per
/// player, a single winner-takes-all prize.
fn seed_game(chain: &InMemoryChain, identity: GameIdentity, player_count: u8) {
    let round = CallParam::Uint(identity.round_id.into());
    chain.set_value(
        identity.address,
        METHOD_GAME,
        vec![round.clone()],
        game_tuple(&format!("game-{player_count}"), 1_000),
    );
    let players: Vec<Address> = (0..player_count).map(player_address).collect();
    chain.set_value(
        identity.address,
        METHOD_PLAYER_ADDRESSES,
        Vec::new(),
        CallValue::List(players.iter().copied().map(CallValue::Address).collect()),
    );
    for (order, player) in players.iter().enumerate() {
        chain.set_value(
            identity.address,
            METHOD_PLAYER,
            vec![CallParam::Address(*player)],
            player_tuple(1_700_000_000 + order as u64, false),
        );
    }
    chain.set_value(
        identity.address,
        METHOD_PRIZES,
        vec![round],
        CallValue::List(vec![prize_tuple(1, 1_000)]),
    );
}

fn identities() -> Vec<GameIdentity> {
    vec![
        GameIdentity::new(game_address(1), 3),
        GameIdentity::new(game_address(2), 7),
        GameIdentity::new(game_address(3), 1),
    ]
}

#[tokio::test]
async fn refresh__assembles_games_with_player_counts_in_input_order() {
    // given: three games with 0, 2 and 5 registered players
    let chain = InMemoryChain::new();
    let identities = identities();
    for (identity, count) in identities.iter().zip([0u8, 2, 5]) {
        seed_game(&chain, *identity, count);
    }
    let aggregator = GameAggregator::new(chain);

    // when
    let games = aggregator.refresh(&identities).await.unwrap();

    // then: same game order as input, player sub-arrays sized [0, 2, 5]
    assert_eq!(games.len(), 3);
    let addresses: Vec<Address> = games.iter().map(|g| g.identity.address).collect();
    assert_eq!(
        addresses,
        vec![game_address(1), game_address(2), game_address(3)]
    );
    let counts: Vec<usize> = games
        .iter()
        .map(|g| g.players.as_ref().unwrap().len())
        .collect();
    assert_eq!(counts, vec![0, 2, 5]);
    // registration order is preserved through batching
    let second = games[1].players.as_ref().unwrap();
    assert_eq!(second[0].address, player_address(0));
    assert_eq!(second[1].address, player_address(1));
    assert!(second[0].registered_at < second[1].registered_at);
}

#[tokio::test]
async fn refresh__leaves_prizes_absent_when_only_that_read_fails() {
    // given
    let chain = InMemoryChain::new();
    let identities = identities();
    for identity in &identities {
        seed_game(&chain, *identity, 1);
    }
    chain.set_failure(
        identities[1].address,
        METHOD_PRIZES,
        vec![CallParam::Uint(identities[1].round_id.into())],
        "execution reverted",
    );
    let aggregator = GameAggregator::new(chain);

    // when
    let games = aggregator.refresh(&identities).await.unwrap();

    // then: the failed field is absent on that one record only
    assert_eq!(games.len(), 3);
    assert!(games[0].prizes.is_some());
    assert!(games[1].prizes.is_none());
    assert!(games[2].prizes.is_some());
    assert!(games[1].players.is_some());
}

#[tokio::test]
async fn refresh__skips_a_game_whose_base_record_fails() {
    let chain = InMemoryChain::new();
    let identities = identities();
    for identity in &identities {
        seed_game(&chain, *identity, 1);
    }
    chain.set_failure(
        identities[0].address,
        METHOD_GAME,
        vec![CallParam::Uint(identities[0].round_id.into())],
        "connection reset",
    );
    let aggregator = GameAggregator::new(chain);

    let games = aggregator.refresh(&identities).await.unwrap();

    let addresses: Vec<Address> = games.iter().map(|g| g.identity.address).collect();
    assert_eq!(addresses, vec![game_address(2), game_address(3)]);
}

#[tokio::test]
async fn refresh__drops_player_records_but_keeps_addresses_on_record_failure() {
    // given: one player's record read reverts
    let chain = InMemoryChain::new();
    let identities = identities();
    for identity in &identities {
        seed_game(&chain, *identity, 3);
    }
    chain.set_failure(
        identities[2].address,
        METHOD_PLAYER,
        vec![CallParam::Address(player_address(1))],
        "execution reverted",
    );
    let aggregator = GameAggregator::new(chain);

    // when
    let games = aggregator.refresh(&identities).await.unwrap();

    // then: the ordered record list cannot be trusted with a hole in it
    assert!(games[2].players.is_none());
    assert_eq!(games[2].player_addresses.as_ref().unwrap().len(), 3);
    assert!(games[0].players.is_some());
}

#[tokio::test]
async fn deployed_games__decodes_the_registry_list() {
    let chain = InMemoryChain::new();
    let registry = Address::new([0xff; 20]);
    chain.set_value(
        registry,
        METHOD_DEPLOYED_GAMES,
        Vec::new(),
        CallValue::List(vec![
            CallValue::Tuple(vec![
                CallValue::Address(game_address(1)),
                CallValue::Uint(3),
            ]),
            CallValue::Tuple(vec![
                CallValue::Address(game_address(2)),
                CallValue::Uint(7),
            ]),
        ]),
    );
    let aggregator = GameAggregator::new(chain);

    let games = aggregator.deployed_games(registry).await.unwrap();

    assert_eq!(
        games,
        vec![
            GameIdentity::new(game_address(1), 3),
            GameIdentity::new(game_address(2), 7),
        ]
    );
}
