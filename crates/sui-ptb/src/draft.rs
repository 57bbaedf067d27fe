//! Transaction draft builder
//!
//! Inputs are declared up front (pure literals are BCS-encoded at
//! declaration; objects are recorded by id and resolved by the executing
//! client). Commands reference inputs and earlier command results through
//! [`Argument`], which keeps hop chaining explicit: command *n+1* can name
//! command *n*'s output without either side knowing the concrete value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use clamm_core::ObjectId;

/// Errors raised while assembling a draft
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Failed to BCS-encode pure argument: {0}")]
    Encode(String),

    #[error("Invalid address literal: {0}")]
    InvalidAddress(String),
}

/// A value declared in the draft's input table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Input {
    /// BCS-encoded literal
    Pure { bytes: Vec<u8> },
    /// Object reference, resolved to a concrete version by the executing client
    Object { object_id: ObjectId },
}

/// Reference to a value usable as a call argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Argument {
    /// The gas coin of the executing transaction
    GasCoin,
    /// Entry in the input table
    Input(u16),
    /// The (single) result of an earlier command
    Result(u16),
    /// One element of an earlier command's tuple result
    NestedResult(u16, u16),
}

/// A contract entry-point call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Argument>,
}

/// One step of a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Command {
    MoveCall(MoveCall),
    TransferObjects {
        objects: Vec<Argument>,
        recipient: Argument,
    },
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },
    MergeCoins {
        destination: Argument,
        sources: Vec<Argument>,
    },
}

/// An in-memory transaction draft
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionDraft {
    inputs: Vec<Input>,
    commands: Vec<Command>,
}

impl TransactionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Declare a BCS-encoded pure literal and return its argument handle.
    pub fn pure<T: Serialize>(&mut self, value: &T) -> Result<Argument, DraftError> {
        let bytes = bcs::to_bytes(value).map_err(|e| DraftError::Encode(e.to_string()))?;
        self.inputs.push(Input::Pure { bytes });
        Ok(Argument::Input((self.inputs.len() - 1) as u16))
    }

    /// Declare a 32-byte address literal (canonical hex form).
    pub fn pure_address(&mut self, address: &str) -> Result<Argument, DraftError> {
        let digits = address.strip_prefix("0x").unwrap_or(address);
        let mut bytes =
            hex::decode(digits).map_err(|_| DraftError::InvalidAddress(address.to_string()))?;
        if bytes.len() > 32 {
            return Err(DraftError::InvalidAddress(address.to_string()));
        }
        // left-pad short addresses to 32 bytes
        let mut padded = vec![0u8; 32 - bytes.len()];
        padded.append(&mut bytes);
        self.inputs.push(Input::Pure { bytes: padded });
        Ok(Argument::Input((self.inputs.len() - 1) as u16))
    }

    /// Declare an object input, reusing an existing entry for the same id.
    pub fn object(&mut self, object_id: ObjectId) -> Argument {
        let existing = self.inputs.iter().position(|input| {
            matches!(input, Input::Object { object_id: id } if *id == object_id)
        });
        let index = match existing {
            Some(index) => index,
            None => {
                self.inputs.push(Input::Object { object_id });
                self.inputs.len() - 1
            }
        };
        Argument::Input(index as u16)
    }

    /// Append a move call and return its command index.
    ///
    /// Use [`Argument::Result`] for a single-value return and
    /// [`Argument::NestedResult`] to pick an element of a tuple return.
    pub fn move_call(&mut self, call: MoveCall) -> u16 {
        self.commands.push(Command::MoveCall(call));
        (self.commands.len() - 1) as u16
    }

    pub fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: Argument) -> u16 {
        self.commands.push(Command::TransferObjects { objects, recipient });
        (self.commands.len() - 1) as u16
    }

    pub fn split_coins(&mut self, coin: Argument, amounts: Vec<Argument>) -> u16 {
        self.commands.push(Command::SplitCoins { coin, amounts });
        (self.commands.len() - 1) as u16
    }

    pub fn merge_coins(&mut self, destination: Argument, sources: Vec<Argument>) -> u16 {
        self.commands.push(Command::MergeCoins {
            destination,
            sources,
        });
        (self.commands.len() - 1) as u16
    }
}
