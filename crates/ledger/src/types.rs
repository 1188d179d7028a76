use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::LedgerError;
use crate::util::{format_hex_prefixed, format_hex_u64, format_hex_u128, parse_hex_bytes};

/// A 20-byte account or contract address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_hex_prefixed(&self.0))
    }
}

impl FromStr for Address {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_bytes::<20>(s).map(Address)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_hex_prefixed(&self.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    Pending,
}

impl BlockTag {
    pub fn to_param(self) -> serde_json::Value {
        let tag = match self {
            BlockTag::Latest => "latest",
            BlockTag::Pending => "pending",
        };
        serde_json::Value::String(tag.to_string())
    }
}

/// A state-mutating call as the node expects it: hex-quantity fields,
/// absent fields omitted so the node fills them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Address,
    pub to: Address,
    pub value: u128,
    pub data: Vec<u8>,
    pub gas: Option<u64>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub nonce: Option<u64>,
}

impl Serialize for CallRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let optional = [
            self.gas.is_some(),
            self.max_fee_per_gas.is_some(),
            self.max_priority_fee_per_gas.is_some(),
            self.nonce.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();
        let mut state = serializer.serialize_struct("CallRequest", 4 + optional)?;
        state.serialize_field("from", &self.from)?;
        state.serialize_field("to", &self.to)?;
        state.serialize_field("value", &format_hex_u128(self.value))?;
        state.serialize_field("data", &format_hex_prefixed(&self.data))?;
        if let Some(gas) = self.gas {
            state.serialize_field("gas", &format_hex_u64(gas))?;
        }
        if let Some(max_fee) = self.max_fee_per_gas {
            state.serialize_field("maxFeePerGas", &format_hex_u128(max_fee))?;
        }
        if let Some(priority) = self.max_priority_fee_per_gas {
            state.serialize_field("maxPriorityFeePerGas", &format_hex_u128(priority))?;
        }
        if let Some(nonce) = self.nonce {
            state.serialize_field("nonce", &format_hex_u64(nonce))?;
        }
        state.end()
    }
}

/// Live pricing signals as reported by the node. Any of them can be
/// missing: pre-1559 nodes have no base fee or priority fee hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeSignals {
    pub base_fee: Option<u128>,
    pub priority_fee: Option<u128>,
    pub legacy_gas_price: Option<u128>,
}

/// Outcome of a finalized submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalityReport {
    pub ok: bool,
    pub block_number: Option<u64>,
    pub tx_hash: String,
}
