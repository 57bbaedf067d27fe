//! sui-ptb: Programmable-transaction draft structures
//!
//! Defines the in-memory shape of a transaction draft: declared inputs,
//! an ordered command list, and result references that let later commands
//! consume earlier commands' outputs. No byte-level transaction encoding
//! happens here; an executing client (wallet or ledger adapter) turns a
//! draft into a signed transaction or a dev-inspect request.

pub mod draft;

pub use draft::{Argument, Command, DraftError, Input, MoveCall, TransactionDraft};
