use crate::call::{
    CallOutcome,
    CallRequest,
    MutationReceipt,
    MutationRequest,
};

pub mod http;
pub mod in_memory;

/// Read collaborator: executes a planned batch in one network round trip
/// and returns one outcome per call, in call order. Failures are
/// per-call; a failed read must not abort its siblings.
pub trait ChainRead {
    fn read_batch(
        &self,
        calls: &[CallRequest],
    ) -> impl Future<Output = crate::Result<Vec<CallOutcome>>>;
}

/// Write collaborator: submits one mutation and returns its receipt.
/// Callers treat a receipt with `status == false` and a transport error
/// identically: the mutation was not applied.
pub trait ChainWrite {
    fn submit(
        &self,
        mutation: &MutationRequest,
    ) -> impl Future<Output = crate::Result<MutationReceipt>>;
}
