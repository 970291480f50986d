//! Transfer outcome type
//!
//! A transfer is a single transaction with three states:
//! `Pending -> {Committed | Rejected}`. `Pending` is the window in which the
//! coordinator holds both account locks; it is never observable from outside.
//! What callers see is the terminal state, encoded here as an outcome value.

/// Result of one transfer call
///
/// Expected failures are outcomes rather than errors so that callers can
/// compose transfers without error-handling boilerplate. No variant implies a
/// partial mutation: a transfer either updates both balances or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Both balances were updated under both locks
    Success,

    /// The source balance was below the requested amount
    ///
    /// Detected under lock, after canonical-order acquisition. A normal
    /// negative result, not an exceptional condition; state is unchanged.
    InsufficientFunds,

    /// The call was rejected before any lock was taken
    ///
    /// Non-positive amount, or a source/destination id that does not refer to
    /// any created account. No lock is acquired and no balance is altered.
    /// Arithmetic overflow against the destination balance also reports this
    /// outcome (the amount is not representable against those balances); in
    /// that case locks were held but both balances are left as they were.
    InvalidArgument,
}

impl TransferOutcome {
    /// Whether the transfer committed
    pub fn is_success(self) -> bool {
        matches!(self, TransferOutcome::Success)
    }

    /// Short name used in telemetry events and log output
    pub fn as_str(self) -> &'static str {
        match self {
            TransferOutcome::Success => "success",
            TransferOutcome::InsufficientFunds => "insufficient_funds",
            TransferOutcome::InvalidArgument => "invalid_argument",
        }
    }
}
