//! Argument validation for named remote calls.
//!
//! Runs before any ledger read so a malformed call never touches state.

use crate::errors::ContractError;

/// Reject an empty or whitespace-only argument.
pub fn require<'a>(name: &str, value: &'a str) -> Result<&'a str, ContractError> {
    if value.trim().is_empty() {
        return Err(ContractError::Validation(format!("{name} is required")));
    }
    Ok(value)
}

/// Check the positional argument count of a named call and borrow the args.
pub fn expect_args<'a, const N: usize>(
    function: &str,
    args: &'a [String],
) -> Result<[&'a str; N], ContractError> {
    if args.len() != N {
        return Err(ContractError::Validation(format!(
            "{function} expects {N} argument(s), got {}",
            args.len()
        )));
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}
