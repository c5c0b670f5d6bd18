//! Transaction-scoped authorization over introspected scope strings.
//!
//! A grant for transaction `n` is the scope token `transactionId<n>`. Only
//! the first token carrying the prefix is honoured; later ones are ignored
//! even if they would match.

use std::num::IntErrorKind;
use thiserror::Error;

pub const TRANSACTION_SCOPE_PREFIX: &str = "transactionId";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("scope token `{0}` does not carry an integer transaction id")]
    MalformedScope(String),
}

/// The id named by a `transactionId<n>` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Transaction(i128),
    /// An integer too large to represent; matches no request.
    OutOfRange,
}

impl Grant {
    pub fn permits(self, requested_id: i128) -> bool {
        self == Grant::Transaction(requested_id)
    }
}

/// Grant carried by the first prefixed scope token, if any.
pub fn granted_transaction_id(scope: &str) -> Result<Option<Grant>, ScopeError> {
    let Some((token, suffix)) = scope.split_whitespace().find_map(|token| {
        token
            .strip_prefix(TRANSACTION_SCOPE_PREFIX)
            .map(|suffix| (token, suffix))
    }) else {
        return Ok(None);
    };

    match suffix.parse::<i128>() {
        Ok(id) => Ok(Some(Grant::Transaction(id))),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Ok(Some(Grant::OutOfRange)),
            _ => Err(ScopeError::MalformedScope(token.to_string())),
        },
    }
}

/// Whether `scope` grants access to `requested_id`.
///
/// A non-integer first grant is an error rather than a denial.
pub fn authorize(scope: &str, requested_id: i128) -> Result<bool, ScopeError> {
    Ok(granted_transaction_id(scope)?.is_some_and(|grant| grant.permits(requested_id)))
}

/// Whether any token carries the transaction prefix at all.
pub fn has_prefixed_scope(scope: &str) -> bool {
    scope
        .split_whitespace()
        .any(|token| token.starts_with(TRANSACTION_SCOPE_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_grant_matches() {
        assert_eq!(authorize("transactionId5", 5), Ok(true));
        assert_eq!(authorize("transactionId5", 6), Ok(false));
    }

    #[test]
    fn grant_found_among_other_tokens() {
        assert_eq!(authorize("foo transactionId5 bar", 5), Ok(true));
        assert_eq!(authorize("  openid\ttransactionId7\n profile ", 7), Ok(true));
    }

    #[test]
    fn first_prefixed_token_wins() {
        assert_eq!(authorize("transactionId5 transactionId6", 6), Ok(false));
        assert_eq!(authorize("transactionId5 transactionId6", 5), Ok(true));
    }

    #[test]
    fn empty_scope_denies() {
        assert_eq!(authorize("", 0), Ok(false));
        assert_eq!(authorize("   ", 3), Ok(false));
        assert_eq!(authorize("openid profile", 0), Ok(false));
    }

    #[test]
    fn malformed_first_grant_is_an_error() {
        assert_eq!(
            authorize("transactionIdabc transactionId1", 1),
            Err(ScopeError::MalformedScope("transactionIdabc".to_string()))
        );
        assert_eq!(
            authorize("transactionId", 0),
            Err(ScopeError::MalformedScope("transactionId".to_string()))
        );
    }

    #[test]
    fn repeated_prefix_inside_a_token_is_malformed() {
        assert_eq!(
            authorize("transactionId5transactionId", 5),
            Err(ScopeError::MalformedScope(
                "transactionId5transactionId".to_string()
            ))
        );
    }

    #[test]
    fn oversized_grants_deny_instead_of_failing() {
        let huge = "transactionId9999999999999999999999999999999999999999";
        assert_eq!(granted_transaction_id(huge), Ok(Some(Grant::OutOfRange)));
        assert_eq!(authorize(huge, 0), Ok(false));
        assert_eq!(authorize(&format!("{huge} transactionId0"), 0), Ok(false));
        assert_eq!(
            authorize("transactionId-9999999999999999999999999999999999999999", 0),
            Ok(false)
        );
    }

    #[test]
    fn grants_beyond_i64_still_compare_exactly() {
        assert_eq!(authorize("transactionId99999999999999999999", 0), Ok(false));
        assert_eq!(
            authorize("transactionId10000000000000000000", 10_000_000_000_000_000_000),
            Ok(true)
        );
    }

    #[test]
    fn non_prefixed_tokens_are_not_parsed() {
        assert_eq!(granted_transaction_id("xtransactionId5 other"), Ok(None));
        assert_eq!(granted_transaction_id("scope:transactionId3"), Ok(None));
    }

    #[test]
    fn signed_grants_parse() {
        assert_eq!(
            granted_transaction_id("transactionId-1"),
            Ok(Some(Grant::Transaction(-1)))
        );
        assert_eq!(
            granted_transaction_id("transactionId+4"),
            Ok(Some(Grant::Transaction(4)))
        );
        assert_eq!(
            granted_transaction_id("transactionId007"),
            Ok(Some(Grant::Transaction(7)))
        );
    }

    #[test]
    fn prefix_presence() {
        assert!(has_prefixed_scope("openid transactionId1"));
        assert!(has_prefixed_scope("transactionIdjunk"));
        assert!(!has_prefixed_scope("openid profile"));
        assert!(!has_prefixed_scope(""));
    }
}
