//! # Invocation Dispatcher
//!
//! Maps a function name and its string arguments onto the lifecycle and
//! encodes the result. Function names may carry the contract namespace
//! (`NotarizationContract:InstrumentGet`).
//!
//! | Function | Arguments | Result | Kind |
//! |----------|-----------|--------|------|
//! | `PutPrivateRecord` | caseId | empty | submit |
//! | `InstrumentIssue` | payload, requireExtraApproval | Instrument | submit |
//! | `InstrumentGet` | id | Instrument | evaluate |
//! | `InstrumentVerify` | id, candidateHash | VerificationResult | evaluate |
//! | `InstrumentRevoke` | id, reason | Instrument | submit |
//! | `InstrumentHistory` | id | HistoryEntry[] | evaluate |
//! | `InstrumentFindByNo` | instrumentNo | Instrument[] | evaluate |
//! | `GetPrivateRecord` | caseId | raw bytes | evaluate |

use crate::config::NotarizationConfig;
use crate::errors::{NotarizationError, NotarizationResult};
use crate::lifecycle::InstrumentLifecycle;
use nl_01_ledger_substrate::ports::ChaincodeStub;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Name the contract is deployed under.
pub const CONTRACT_NAME: &str = "NotarizationContract";

/// Name the contract is deployed under.
#[must_use]
pub fn contract_name() -> &'static str {
    CONTRACT_NAME
}

/// A contract function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractFunction {
    /// Store a transient blob privately.
    PutPrivateRecord,
    /// Issue an instrument.
    InstrumentIssue,
    /// Read an instrument.
    InstrumentGet,
    /// Verify a content hash.
    InstrumentVerify,
    /// Revoke an instrument.
    InstrumentRevoke,
    /// Modification history of an instrument.
    InstrumentHistory,
    /// Look up instruments by number.
    InstrumentFindByNo,
    /// Read a private blob.
    GetPrivateRecord,
}

impl ContractFunction {
    /// Every function, in table order.
    pub const ALL: [Self; 8] = [
        Self::PutPrivateRecord,
        Self::InstrumentIssue,
        Self::InstrumentGet,
        Self::InstrumentVerify,
        Self::InstrumentRevoke,
        Self::InstrumentHistory,
        Self::InstrumentFindByNo,
        Self::GetPrivateRecord,
    ];

    /// Function name as invoked.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PutPrivateRecord => "PutPrivateRecord",
            Self::InstrumentIssue => "InstrumentIssue",
            Self::InstrumentGet => "InstrumentGet",
            Self::InstrumentVerify => "InstrumentVerify",
            Self::InstrumentRevoke => "InstrumentRevoke",
            Self::InstrumentHistory => "InstrumentHistory",
            Self::InstrumentFindByNo => "InstrumentFindByNo",
            Self::GetPrivateRecord => "GetPrivateRecord",
        }
    }

    /// Resolve a function name, with or without the contract namespace.
    ///
    /// # Errors
    ///
    /// `Validation` for an unknown name.
    pub fn parse(name: &str) -> NotarizationResult<Self> {
        let bare = name
            .strip_prefix(CONTRACT_NAME)
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|f| f.name() == bare)
            .ok_or_else(|| NotarizationError::Validation(format!("unknown function {name:?}")))
    }

    /// Number of arguments the function takes.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::PutPrivateRecord
            | Self::InstrumentGet
            | Self::InstrumentHistory
            | Self::InstrumentFindByNo
            | Self::GetPrivateRecord => 1,
            Self::InstrumentIssue | Self::InstrumentVerify | Self::InstrumentRevoke => 2,
        }
    }

    /// Returns true if the function changes state and must be submitted.
    #[must_use]
    pub fn is_submit(self) -> bool {
        matches!(
            self,
            Self::PutPrivateRecord | Self::InstrumentIssue | Self::InstrumentRevoke
        )
    }
}

impl fmt::Display for ContractFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a boolean argument. Accepts `1 t T TRUE true True` and
/// `0 f F FALSE false False`.
///
/// # Errors
///
/// `Validation` for any other value.
pub fn parse_bool(field: &str, value: &str) -> NotarizationResult<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(NotarizationError::Validation(format!(
            "{field} must be a boolean, got {other:?}"
        ))),
    }
}

fn encode<T: Serialize>(value: &T) -> NotarizationResult<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| NotarizationError::Validation(format!("result encoding: {e}")))
}

/// Run one contract function against a stub.
///
/// # Errors
///
/// - `Validation` - unknown function or wrong argument count
/// - any error of the invoked lifecycle operation
pub fn dispatch<S>(
    stub: &mut S,
    config: &NotarizationConfig,
    function: ContractFunction,
    args: &[String],
) -> NotarizationResult<Vec<u8>>
where
    S: ChaincodeStub + ?Sized,
{
    if args.len() != function.arity() {
        return Err(NotarizationError::Validation(format!(
            "{function} takes {} argument(s), got {}",
            function.arity(),
            args.len()
        )));
    }
    debug!(function = %function, "Dispatching");

    let lifecycle = InstrumentLifecycle::new(config);
    match function {
        ContractFunction::PutPrivateRecord => {
            lifecycle.put_private_record(stub, &args[0])?;
            Ok(Vec::new())
        }
        ContractFunction::InstrumentIssue => {
            let extra = parse_bool("requireExtraApproval", &args[1])?;
            encode(&lifecycle.issue(stub, &args[0], extra)?)
        }
        ContractFunction::InstrumentGet => encode(&lifecycle.get(stub, &args[0])?),
        ContractFunction::InstrumentVerify => encode(&lifecycle.verify(stub, &args[0], &args[1])?),
        ContractFunction::InstrumentRevoke => encode(&lifecycle.revoke(stub, &args[0], &args[1])?),
        ContractFunction::InstrumentHistory => encode(&lifecycle.history(stub, &args[0])?),
        ContractFunction::InstrumentFindByNo => {
            encode(&lifecycle.find_by_instrument_no(stub, &args[0])?)
        }
        ContractFunction::GetPrivateRecord => lifecycle.get_private_record(stub, &args[0]),
    }
}

/// Resolve `function` by name, then [`dispatch`] it.
///
/// # Errors
///
/// Same as [`dispatch`].
pub fn dispatch_by_name<S>(
    stub: &mut S,
    config: &NotarizationConfig,
    function: &str,
    args: &[String],
) -> NotarizationResult<Vec<u8>>
where
    S: ChaincodeStub + ?Sized,
{
    dispatch(stub, config, ContractFunction::parse(function)?, args)
}
