use crate::{
    call::{
        Address,
        CallFailure,
        CallOutcome,
        CallParam,
        CallRequest,
        CallValue,
        MutationReceipt,
        MutationRequest,
    },
    client::{
        ChainRead,
        ChainWrite,
    },
};
use std::{
    collections::{
        HashMap,
        HashSet,
    },
    sync::{
        Arc,
        Mutex,
    },
};

type MethodKey = (Address, String, Vec<CallParam>);

/// Programmable chain used by tests and demos. Reads resolve against a
/// seeded (address, method, params) table; writes are recorded and
/// acknowledged with sequential receipts.
#[derive(Clone, Default)]
pub struct InMemoryChain {
    reads: Arc<Mutex<HashMap<MethodKey, CallOutcome>>>,
    submitted: Arc<Mutex<Vec<MutationRequest>>>,
    rejected_methods: Arc<Mutex<HashSet<String>>>,
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_value(
        &self,
        address: Address,
        method: impl Into<String>,
        params: Vec<CallParam>,
        value: CallValue,
    ) {
        let mut reads = self.reads.lock().unwrap();
        reads.insert((address, method.into(), params), Ok(value));
    }

    pub fn set_failure(
        &self,
        address: Address,
        method: impl Into<String>,
        params: Vec<CallParam>,
        message: impl Into<String>,
    ) {
        let mut reads = self.reads.lock().unwrap();
        reads.insert(
            (address, method.into(), params),
            Err(CallFailure::new(message)),
        );
    }

    /// Mutations with this method name are acknowledged with a reverted
    /// receipt (`status == false`).
    pub fn reject_method(&self, method: impl Into<String>) {
        self.rejected_methods.lock().unwrap().insert(method.into());
    }

    pub fn submitted(&self) -> Vec<MutationRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

impl ChainRead for InMemoryChain {
    async fn read_batch(
        &self,
        calls: &[CallRequest],
    ) -> crate::Result<Vec<CallOutcome>> {
        let reads = self.reads.lock().unwrap();
        let outcomes = calls
            .iter()
            .map(|call| {
                let key = (call.address, call.method.clone(), call.params.clone());
                reads.get(&key).cloned().unwrap_or_else(|| {
                    Err(CallFailure::new(format!(
                        "no value seeded for {}::{}",
                        call.address, call.method
                    )))
                })
            })
            .collect();
        Ok(outcomes)
    }
}

impl ChainWrite for InMemoryChain {
    async fn submit(
        &self,
        mutation: &MutationRequest,
    ) -> crate::Result<MutationReceipt> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(mutation.clone());
        let sequence = submitted.len();
        let status = !self
            .rejected_methods
            .lock()
            .unwrap()
            .contains(&mutation.method);
        Ok(MutationReceipt {
            status,
            tx_hash: format!("0x{sequence:064x}"),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    #[tokio::test]
    async fn read_batch__reports_unseeded_calls_as_per_call_failures() {
        // given
        let chain = InMemoryChain::new();
        let address = Address::new([7u8; 20]);
        chain.set_value(address, "known", Vec::new(), CallValue::Uint(42));

        // when
        let outcomes = chain
            .read_batch(&[
                CallRequest::new(address, "known", Vec::new()),
                CallRequest::new(address, "unknown", Vec::new()),
            ])
            .await
            .unwrap();

        // then: the unseeded call fails without aborting its sibling
        assert_eq!(outcomes[0], Ok(CallValue::Uint(42)));
        assert!(outcomes[1].is_err());
    }

    #[tokio::test]
    async fn submit__records_mutations_and_honors_rejections() {
        let chain = InMemoryChain::new();
        chain.reject_method("setPaused");
        let address = Address::new([9u8; 20]);

        let accepted = chain
            .submit(&MutationRequest::new(address, "createGame", Vec::new()))
            .await
            .unwrap();
        let rejected = chain
            .submit(&MutationRequest::new(address, "setPaused", Vec::new()))
            .await
            .unwrap();

        assert!(accepted.status);
        assert!(!rejected.status);
        assert_eq!(chain.submitted().len(), 2);
    }
}
