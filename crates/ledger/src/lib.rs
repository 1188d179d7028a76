//! Typed JSON-RPC client for EVM-style ledger endpoints.
//!
//! The [`LedgerClient`] trait is the seam consumers program against; the
//! [`RpcLedger`] implementation speaks JSON-RPC over HTTP. Transaction
//! signing is left to the connected node's keystore (`eth_sendTransaction`),
//! so no key material ever passes through this crate.

pub mod client;
pub mod rpc;
pub mod types;
pub mod util;

pub use client::LedgerClient;
pub use rpc::{RpcClient, RpcLedger};
pub use types::{Address, BlockTag, CallRequest, FeeSignals, FinalityReport};
pub use util::{format_hex_prefixed, parse_hex_u64, parse_hex_u128, parse_units, strip_0x};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Http(String),

    #[error("rpc error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },

    #[error("rpc response carried no result")]
    MissingResult,

    #[error("invalid hex value: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
}
