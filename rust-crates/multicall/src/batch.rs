use crate::call::CallRequest;
use itertools::Itertools;
use std::fmt;


/// Structural planning/dechunking failures. These indicate a programming
/// mistake rather than a transient network condition and are surfaced to
/// the caller instead of being swallowed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchError {
    /// A plan was requested for zero entities; no chunk size can be
    /// derived from an empty batch.
    EmptyBatch,
    /// An entity contributed a different number of calls than the first
    /// one, which would misalign every later chunk boundary.
    NonUniformArity {
        entity_index: usize,
        expected: usize,
        got: usize,
    },
    /// The result sequence is not a whole number of chunks, so planning
    /// and execution disagree about the call count.
    ChunkMisaligned {
        results_len: usize,
        chunk_size: usize,
    },
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::EmptyBatch => {
                write!(f, "cannot plan a batch over zero entities")
            }
            BatchError::NonUniformArity {
                entity_index,
                expected,
                got,
            } => write!(
                f,
                "entity {entity_index} contributed {got} calls, expected {expected}"
            ),
            BatchError::ChunkMisaligned {
                results_len,
                chunk_size,
            } => write!(
                f,
                "{results_len} results cannot be split into chunks of {chunk_size}"
            ),
        }
    }
}

impl std::error::Error for BatchError {}

/// A flattened batch of read calls for a single network round trip,
/// together with the per-entity call count needed to invert the
/// flattening.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchPlan {
    calls: Vec<CallRequest>,
    chunk_size: usize,
}

impl BatchPlan {
    /// Flatten one call batch where every entity contributes the same
    /// number of calls. The shared arity becomes the chunk size; an
    /// entity expanding to a different count is rejected outright rather
    /// than silently misaligning every chunk after it.
    pub fn uniform<T, F>(entities: &[T], expand: F) -> Result<Self, BatchError>
    where
        F: Fn(&T) -> Vec<CallRequest>,
    {
        let mut calls = Vec::new();
        let mut chunk_size: Option<usize> = None;
        for (entity_index, entity) in entities.iter().enumerate() {
            let expanded = expand(entity);
            match chunk_size {
                None => chunk_size = Some(expanded.len()),
                Some(expected) if expected != expanded.len() => {
                    return Err(BatchError::NonUniformArity {
                        entity_index,
                        expected,
                        got: expanded.len(),
                    });
                }
                Some(_) => {}
            }
            calls.extend(expanded);
        }
        let chunk_size = chunk_size.ok_or(BatchError::EmptyBatch)?;
        Ok(Self { calls, chunk_size })
    }

    pub fn calls(&self) -> &[CallRequest] {
        &self.calls
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Partition the flat result sequence back into per-entity groups in
    /// plan order.
    pub fn dechunk<R>(&self, results: Vec<R>) -> Result<Vec<Vec<R>>, BatchError> {
        dechunk(results, self.chunk_size)
    }
}

/// Order-preserving partition of a flat result sequence into groups of
/// `chunk_size`. Group `i` of the output corresponds to entity `i` of
/// the plan that produced the results.
pub fn dechunk<R>(results: Vec<R>, chunk_size: usize) -> Result<Vec<Vec<R>>, BatchError> {
    if chunk_size == 0 {
        return Err(BatchError::EmptyBatch);
    }
    if results.len() % chunk_size != 0 {
        return Err(BatchError::ChunkMisaligned {
            results_len: results.len(),
            chunk_size,
        });
    }
    let chunks = results.into_iter().chunks(chunk_size);
    let groups = chunks
        .into_iter()
        .map(|chunk| chunk.collect())
        .collect();
    Ok(groups)
}
