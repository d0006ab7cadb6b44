use crate::{
    decode,
    model::{
        GameIdentity,
        NormalizedGame,
        PlayerRecord,
    },
};
use anyhow::anyhow;
use futures::future::join_all;
use multicall::{
    Address,
    BatchPlan,
    CallFailure,
    CallOutcome,
    CallParam,
    CallRequest,
    ChainRead,
};
use tracing::warn;

#[cfg(test)]
mod tests;

pub const METHOD_GAME: &str = "games";
pub const METHOD_PLAYER_ADDRESSES: &str = "getPlayerAddresses";
pub const METHOD_PLAYER: &str = "players";
pub const METHOD_PRIZES: &str = "getPrizes";
pub const METHOD_DEPLOYED_GAMES: &str = "getDeployedGames";

/// Read-path orchestrator: plans batched reads, dechunks the flat
/// results and assembles one fresh `NormalizedGame` snapshot per game.
/// A failed read for one game never aborts the cycle; the affected
/// field is simply absent on that record until the next poll.
pub struct GameAggregator<C> {
    chain: C,
}

impl<C: ChainRead> GameAggregator<C> {
    pub fn new(chain: C) -> Self {
        Self { chain }
    }

    /// Fetch the registry's deployed game list. This is the entry read;
    /// a failure here is fatal for the cycle since there is nothing to
    /// aggregate without it.
    pub async fn deployed_games(
        &self,
        registry: Address,
    ) -> crate::Result<Vec<GameIdentity>> {
        let calls = [CallRequest::new(registry, METHOD_DEPLOYED_GAMES, Vec::new())];
        let outcomes = self.chain.read_batch(&calls).await?;
        match outcomes.into_iter().next() {
            Some(Ok(value)) => Ok(decode::game_identities(&value)?),
            Some(Err(failure)) => Err(anyhow!("registry read failed: {failure}")),
            None => Err(anyhow!("registry returned no outcome")),
        }
    }

    /// One full refresh cycle over the given games, preserving input
    /// order in the output.
    pub async fn refresh(
        &self,
        identities: &[GameIdentity],
    ) -> crate::Result<Vec<NormalizedGame>> {
        if identities.is_empty() {
            return Ok(Vec::new());
        }
        let mut games = self.fetch_games(identities).await?;
        self.fetch_player_addresses(&mut games).await?;
        self.fetch_player_records(&mut games).await?;
        self.fetch_prizes(&mut games).await?;
        Ok(games.into_iter().flatten().collect())
    }

    async fn fetch_games(
        &self,
        identities: &[GameIdentity],
    ) -> crate::Result<Vec<Option<NormalizedGame>>> {
        let plan = BatchPlan::uniform(identities, |identity| {
            vec![CallRequest::new(
                identity.address,
                METHOD_GAME,
                vec![CallParam::Uint(identity.round_id.into())],
            )]
        })?;
        let outcomes = self.chain.read_batch(plan.calls()).await?;
        let groups = plan.dechunk(outcomes)?;
        let games = identities
            .iter()
            .zip(groups)
            .map(|(identity, group)| match single(group) {
                Ok(value) => match decode::game_record(&value) {
                    Ok((settings, paused, finished)) => Some(NormalizedGame {
                        identity: *identity,
                        settings,
                        paused,
                        finished,
                        player_addresses: None,
                        players: None,
                        prizes: None,
                    }),
                    Err(err) => {
                        warn!(
                            game = %identity.address,
                            error = %err,
                            "undecodable game record; skipping game this cycle"
                        );
                        None
                    }
                },
                Err(failure) => {
                    warn!(
                        game = %identity.address,
                        error = %failure,
                        "game record read failed; skipping game this cycle"
                    );
                    None
                }
            })
            .collect();
        Ok(games)
    }

    async fn fetch_player_addresses(
        &self,
        games: &mut [Option<NormalizedGame>],
    ) -> crate::Result<()> {
        let targets: Vec<(usize, Address)> = games
            .iter()
            .enumerate()
            .filter_map(|(index, game)| {
                game.as_ref().map(|game| (index, game.identity.address))
            })
            .collect();
        if targets.is_empty() {
            return Ok(());
        }
        let plan = BatchPlan::uniform(&targets, |(_, address)| {
            vec![CallRequest::new(
                *address,
                METHOD_PLAYER_ADDRESSES,
                Vec::new(),
            )]
        })?;
        let outcomes = self.chain.read_batch(plan.calls()).await?;
        let groups = plan.dechunk(outcomes)?;
        for ((index, address), group) in targets.into_iter().zip(groups) {
            let decoded = single(group).and_then(|value| {
                decode::player_addresses(&value)
                    .map_err(|err| CallFailure::new(err.to_string()))
            });
            match decoded {
                Ok(addresses) => {
                    if let Some(game) = &mut games[index] {
                        game.player_addresses = Some(addresses);
                    }
                }
                Err(failure) => warn!(
                    game = %address,
                    error = %failure,
                    "player addresses read failed; leaving field absent"
                ),
            }
        }
        Ok(())
    }

    async fn fetch_player_records(
        &self,
        games: &mut [Option<NormalizedGame>],
    ) -> crate::Result<()> {
        let mut targets = Vec::new();
        for (index, game) in games.iter_mut().enumerate() {
            let Some(game) = game else { continue };
            let Some(addresses) = game.player_addresses.clone() else {
                continue;
            };
            if addresses.is_empty() {
                game.players = Some(Vec::new());
                continue;
            }
            targets.push((index, game.identity.address, addresses));
        }
        // Chunk boundaries differ per game, so every game gets its own
        // inner batch. The batches have no ordering dependency and run
        // concurrently; each writes a disjoint record.
        let fetches =
            targets
                .into_iter()
                .map(|(index, game_address, addresses)| async move {
                    let records =
                        self.player_records_for(game_address, &addresses).await;
                    (index, game_address, records)
                });
        for (index, game_address, records) in join_all(fetches).await {
            match records {
                Ok(records) => {
                    if let Some(game) = &mut games[index] {
                        game.players = Some(records);
                    }
                }
                Err(err) => warn!(
                    game = %game_address,
                    error = %err,
                    "player records read failed; leaving field absent"
                ),
            }
        }
        Ok(())
    }

    async fn player_records_for(
        &self,
        game_address: Address,
        addresses: &[Address],
    ) -> crate::Result<Vec<PlayerRecord>> {
        let plan = BatchPlan::uniform(addresses, |player| {
            vec![CallRequest::new(
                game_address,
                METHOD_PLAYER,
                vec![CallParam::Address(*player)],
            )]
        })?;
        let outcomes = self.chain.read_batch(plan.calls()).await?;
        let groups = plan.dechunk(outcomes)?;
        addresses
            .iter()
            .zip(groups)
            .map(|(player, group)| {
                let value = single(group)
                    .map_err(|failure| anyhow!("player {player}: {failure}"))?;
                Ok(decode::player_record(*player, &value)?)
            })
            .collect()
    }

    async fn fetch_prizes(
        &self,
        games: &mut [Option<NormalizedGame>],
    ) -> crate::Result<()> {
        let targets: Vec<(usize, GameIdentity)> = games
            .iter()
            .enumerate()
            .filter_map(|(index, game)| game.as_ref().map(|game| (index, game.identity)))
            .collect();
        if targets.is_empty() {
            return Ok(());
        }
        let plan = BatchPlan::uniform(&targets, |(_, identity)| {
            vec![CallRequest::new(
                identity.address,
                METHOD_PRIZES,
                vec![CallParam::Uint(identity.round_id.into())],
            )]
        })?;
        let outcomes = self.chain.read_batch(plan.calls()).await?;
        let groups = plan.dechunk(outcomes)?;
        for ((index, identity), group) in targets.into_iter().zip(groups) {
            let decoded = single(group).and_then(|value| {
                decode::prize_list(&value)
                    .map_err(|err| CallFailure::new(err.to_string()))
            });
            match decoded {
                Ok(prizes) => {
                    if let Some(game) = &mut games[index] {
                        game.prizes = Some(prizes);
                    }
                }
                Err(failure) => warn!(
                    game = %identity.address,
                    error = %failure,
                    "prize list read failed; leaving field absent"
                ),
            }
        }
        Ok(())
    }
}

fn single(mut group: Vec<CallOutcome>) -> CallOutcome {
    group
        .pop()
        .unwrap_or_else(|| Err(CallFailure::new("empty result group")))
}
