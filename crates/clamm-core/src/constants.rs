//! Well-known ledger addresses

/// Sui framework package (`0x2`), canonical form
pub const SUI_FRAMEWORK_PACKAGE: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002";

/// Shared clock object (`0x6`), canonical form
pub const CLOCK_OBJECT_ID: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000006";
