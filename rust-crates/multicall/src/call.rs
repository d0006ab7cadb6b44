use anyhow::anyhow;
use std::{
    fmt,
    str::FromStr,
};

/// 20-byte account or contract address, parsed from and rendered as
/// `0x`-prefixed hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl FromStr for Address {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s.trim().trim_start_matches("0x");
        let bytes = hex::decode(cleaned)
            .map_err(|e| anyhow!("invalid address '{s}': {e}"))?;
        let bytes: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| anyhow!("address '{s}' must be exactly 20 bytes"))?;
        Ok(Address(bytes))
    }
}

/// Parameter attached to a read call or mutation, drawn from the entity
/// that produced it (a round id, a player address, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CallParam {
    Uint(u128),
    Bool(bool),
    Address(Address),
    Str(String),
}

/// One read call descriptor: contract address, method name, parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallRequest {
    pub address: Address,
    pub method: String,
    pub params: Vec<CallParam>,
}

impl CallRequest {
    pub fn new(
        address: Address,
        method: impl Into<String>,
        params: Vec<CallParam>,
    ) -> Self {
        Self {
            address,
            method: method.into(),
            params,
        }
    }
}

/// Value decoded from a single read call. Loose container shapes (lists,
/// tuples) are permitted on the wire but are converted into per-method
/// typed records immediately at the read boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallValue {
    Uint(u128),
    Bool(bool),
    Address(Address),
    Str(String),
    List(Vec<CallValue>),
    Tuple(Vec<CallValue>),
}

impl CallValue {
    fn kind(&self) -> &'static str {
        match self {
            CallValue::Uint(_) => "uint",
            CallValue::Bool(_) => "bool",
            CallValue::Address(_) => "address",
            CallValue::Str(_) => "string",
            CallValue::List(_) => "list",
            CallValue::Tuple(_) => "tuple",
        }
    }

    pub fn as_uint(&self) -> Result<u128, DecodeError> {
        match self {
            CallValue::Uint(n) => Ok(*n),
            other => Err(DecodeError::type_mismatch("uint", other)),
        }
    }

    pub fn as_u64(&self) -> Result<u64, DecodeError> {
        let n = self.as_uint()?;
        u64::try_from(n).map_err(|_| DecodeError::Value {
            message: format!("uint {n} exceeds u64 range"),
        })
    }

    pub fn as_u32(&self) -> Result<u32, DecodeError> {
        let n = self.as_uint()?;
        u32::try_from(n).map_err(|_| DecodeError::Value {
            message: format!("uint {n} exceeds u32 range"),
        })
    }

    pub fn as_bool(&self) -> Result<bool, DecodeError> {
        match self {
            CallValue::Bool(b) => Ok(*b),
            other => Err(DecodeError::type_mismatch("bool", other)),
        }
    }

    pub fn as_address(&self) -> Result<Address, DecodeError> {
        match self {
            CallValue::Address(address) => Ok(*address),
            other => Err(DecodeError::type_mismatch("address", other)),
        }
    }

    pub fn as_str(&self) -> Result<&str, DecodeError> {
        match self {
            CallValue::Str(s) => Ok(s),
            other => Err(DecodeError::type_mismatch("string", other)),
        }
    }

    pub fn as_list(&self) -> Result<&[CallValue], DecodeError> {
        match self {
            CallValue::List(items) => Ok(items),
            other => Err(DecodeError::type_mismatch("list", other)),
        }
    }

    pub fn as_tuple(&self) -> Result<&[CallValue], DecodeError> {
        match self {
            CallValue::Tuple(fields) => Ok(fields),
            other => Err(DecodeError::type_mismatch("tuple", other)),
        }
    }
}

/// Failure converting a raw call value into its typed per-method record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    Arity {
        expected: usize,
        got: usize,
    },
    Value {
        message: String,
    },
}

impl DecodeError {
    fn type_mismatch(expected: &'static str, found: &CallValue) -> Self {
        DecodeError::TypeMismatch {
            expected,
            found: found.kind(),
        }
    }

    pub fn expect_arity(fields: &[CallValue], expected: usize) -> Result<(), Self> {
        if fields.len() == expected {
            Ok(())
        } else {
            Err(DecodeError::Arity {
                expected,
                got: fields.len(),
            })
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            DecodeError::Arity { expected, got } => {
                write!(f, "expected a tuple of {expected} fields, got {got}")
            }
            DecodeError::Value { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Per-call failure reported by the read collaborator. Failures are
/// per-call: one failed read never aborts its siblings in the batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallFailure {
    pub message: String,
}

impl CallFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CallFailure {}

pub type CallOutcome = Result<CallValue, CallFailure>;

/// One state-changing call descriptor. `value` is the native amount
/// attached to the transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationRequest {
    pub address: Address,
    pub method: String,
    pub params: Vec<CallParam>,
    pub value: u128,
}

impl MutationRequest {
    pub fn new(
        address: Address,
        method: impl Into<String>,
        params: Vec<CallParam>,
    ) -> Self {
        Self {
            address,
            method: method.into(),
            params,
            value: 0,
        }
    }

    pub fn with_value(mut self, value: u128) -> Self {
        self.value = value;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationReceipt {
    pub status: bool,
    pub tx_hash: String,
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    #[test]
    fn address__round_trips_through_display_and_parse() {
        let address = Address::new([0xab; 20]);
        let parsed: Address = address.to_string().parse().unwrap();
        assert_eq!(parsed, address);
    }

    #[test]
    fn address__rejects_wrong_length() {
        assert!("0xdeadbeef".parse::<Address>().is_err());
    }

    #[test]
    fn call_value__accessors_report_the_found_kind() {
        let err = CallValue::Bool(true).as_uint().unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                expected: "uint",
                found: "bool"
            }
        );
    }
}
