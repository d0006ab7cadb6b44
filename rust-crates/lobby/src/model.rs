use multicall::Address;

/// Identity of one deployed game contract. `round_id` increments each
/// draw cycle; the address never changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GameIdentity {
    pub address: Address,
    pub round_id: u64,
}

impl GameIdentity {
    pub fn new(address: Address, round_id: u64) -> Self {
        Self { address, round_id }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrizeStandard {
    Native,
    Erc20,
    Erc721,
}

impl PrizeStandard {
    /// Wire code used by the contracts for this standard.
    pub fn code(self) -> u8 {
        match self {
            PrizeStandard::Native => 0,
            PrizeStandard::Erc20 => 1,
            PrizeStandard::Erc721 => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<PrizeStandard> {
        match code {
            0 => Some(PrizeStandard::Native),
            1 => Some(PrizeStandard::Erc20),
            2 => Some(PrizeStandard::Erc721),
            _ => None,
        }
    }
}

/// One prize slot in a round's prize list, ordered by finishing
/// position. `contract_address`/`token_id` are only present for token
/// prizes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prize {
    pub position: u32,
    pub amount: u128,
    pub standard: PrizeStandard,
    pub contract_address: Option<Address>,
    pub token_id: Option<u128>,
}

/// Configuration half of the raw on-chain game record. Fees are basis
/// points; amounts are in the chain's smallest native unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSettings {
    pub name: String,
    pub max_players: u32,
    pub play_time_range: u32,
    pub registration_amount: u128,
    pub prizepool: u128,
    pub treasury_fee: u64,
    pub creator_fee: u64,
    pub encoded_cron: String,
}

/// Per-(game, player) record. The position of a player in the address
/// list is the order of registration and is preserved through batching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerRecord {
    pub address: Address,
    pub registered_at: u64,
    pub has_lost: bool,
    pub prize_claimed: bool,
}

/// One game as assembled by the aggregator. Refresh cycles always build
/// a complete fresh value; an existing snapshot is never mutated in
/// place, so concurrent readers never observe a partial update. The
/// optional fields stay `None` when their read failed this cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedGame {
    pub identity: GameIdentity,
    pub settings: GameSettings,
    pub paused: bool,
    pub finished: bool,
    pub player_addresses: Option<Vec<Address>>,
    pub players: Option<Vec<PlayerRecord>>,
    pub prizes: Option<Vec<Prize>>,
}

impl NormalizedGame {
    pub fn player_addresses_count(&self) -> u32 {
        self.player_addresses
            .as_ref()
            .map(|addresses| addresses.len() as u32)
            .or_else(|| self.players.as_ref().map(|players| players.len() as u32))
            .unwrap_or(0)
    }
}
