pub mod aggregator;
pub mod decode;
pub mod model;
pub mod schedule;
pub mod sort;
pub mod status;

pub use aggregator::GameAggregator;
pub use model::{
    GameIdentity,
    GameSettings,
    NormalizedGame,
    PlayerRecord,
    Prize,
    PrizeStandard,
};
pub use sort::{
    RankedGame,
    rank_games,
    sort_games_default,
    sort_games_launching,
};
pub use status::{
    DerivedStatus,
    UserStatus,
    derive_status,
};

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
