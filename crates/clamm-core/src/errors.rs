//! Error types for the CLAMM toolkit

use thiserror::Error;

/// Core errors that can occur in the CLAMM toolkit
#[derive(Debug, Error)]
pub enum Error {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    #[error("Transaction error: {0}")]
    Tx(#[from] TxError),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Ledger read and index-service errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Object not found: {object_id}")]
    ObjectNotFound { object_id: String },

    #[error("Ledger returned error: {message}")]
    Rpc { message: String },

    #[error("Pool index service unavailable on {network}")]
    IndexUnavailable { network: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Coin metadata not found for {coin_type}")]
    CoinMetadataNotFound { coin_type: String },
}

/// Decode-time structural failures
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed coin type: {0}")]
    MalformedCoinType(String),

    #[error("Missing field: {path}")]
    MissingField { path: String },

    #[error("Invalid numeric literal at {path}: {value}")]
    InvalidNumber { path: String, value: String },

    #[error("Invalid object id at {path}: {value}")]
    InvalidId { path: String, value: String },

    #[error("Object {object_id} is not a CLAMM pool (type: {type_tag})")]
    ForeignPool { object_id: String, type_tag: String },

    #[error("Coin states do not cover the pool's coins: {reason}")]
    CoinStateMismatch { reason: String },
}

/// Quote-chain failures
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Route has no hops")]
    EmptyRoute,

    #[error("Simulation returned no results")]
    EmptySimulationResult,

    #[error("Unexpected result arity: expected {expected} scalars, got {got}")]
    UnexpectedResultArity { expected: usize, got: usize },

    #[error("Simulation failed: {0}")]
    SimulationFailed(String),

    #[error("Route references unknown pool: {0}")]
    UnknownPool(String),

    #[error("Failed to decode return value: {0}")]
    ReturnValue(String),
}

/// Transaction assembly errors
#[derive(Debug, Error)]
pub enum TxError {
    #[error("Type arguments and coin mismatch: {type_args} type arguments for {coins} coins")]
    TypeArgumentMismatch { type_args: usize, coins: usize },

    #[error("Volatile pool creation requires at least one price")]
    MissingPrices,

    #[error("Unsupported coin count: {0}")]
    UnsupportedCoinCount(usize),

    #[error("Coin {coin_type} is not part of pool {pool_id}")]
    CoinNotInPool { coin_type: String, pool_id: String },

    #[error("Failed to encode argument: {0}")]
    Encode(String),
}

/// Result type alias for CLAMM operations
pub type Result<T> = std::result::Result<T, Error>;
