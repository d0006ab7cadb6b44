pub mod batch;
pub mod call;
pub mod client;

pub use batch::{
    BatchError,
    BatchPlan,
    dechunk,
};
pub use call::{
    Address,
    CallFailure,
    CallOutcome,
    CallParam,
    CallRequest,
    CallValue,
    DecodeError,
    MutationReceipt,
    MutationRequest,
};
pub use client::{
    ChainRead,
    ChainWrite,
};

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
