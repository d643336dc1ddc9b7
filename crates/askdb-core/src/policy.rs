//! Sensitive-identifier policy consulted by the statement gate.
//!
//! The policy is a fixed, ordered deny list of identifier substrings.
//! Matching is purely lexical over the lower-cased statement text:
//!
//! - a whitespace token exactly equal to an identifier (`password`),
//! - a qualified reference (`users.password`) via `.identifier` substring,
//! - a space-delimited occurrence via ` identifier ` substring.
//!
//! Column checks (wildcard-select table scan) use plain substring matching
//! instead, so `password_hash` still trips on `password`.

use serde::{Deserialize, Serialize};

/// Default deny list. Order matters: the first match is the one reported.
pub const DEFAULT_SENSITIVE_IDENTIFIERS: [&str; 20] = [
    "password",
    "salary",
    "credit_card",
    "ssn",
    "phone",
    "email",
    "address",
    "id_card",
    "bank_account",
    "social_security",
    "passport",
    "driver_license",
    "medical_record",
    "tax_id",
    "secret_key",
    "api_key",
    "token",
    "private_key",
    "encrypted",
    "hash",
];

/// Ordered set of forbidden identifier substrings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivePolicy {
    identifiers: Vec<String>,
}

impl Default for SensitivePolicy {
    fn default() -> Self {
        Self {
            identifiers: DEFAULT_SENSITIVE_IDENTIFIERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl SensitivePolicy {
    /// Build a policy from an explicit identifier list.
    ///
    /// Identifiers are lower-cased; empty entries are dropped.
    #[must_use]
    pub fn new(identifiers: impl IntoIterator<Item = String>) -> Self {
        Self {
            identifiers: identifiers
                .into_iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// The identifiers in match order.
    #[must_use]
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Scan a lower-cased statement for a forbidden identifier.
    ///
    /// Returns the first identifier matched as a whole token, as a
    /// `.identifier` qualified reference, or as a space-delimited word.
    #[must_use]
    pub fn match_statement(&self, sql_lower: &str) -> Option<&str> {
        let tokens: Vec<&str> = sql_lower.split_whitespace().collect();
        self.identifiers.iter().map(String::as_str).find(|id| {
            tokens.contains(id)
                || sql_lower.contains(&format!(".{id}"))
                || sql_lower.contains(&format!(" {id} "))
        })
    }

    /// Check a column name for a forbidden identifier substring.
    ///
    /// Returns the first identifier contained in the lower-cased name.
    #[must_use]
    pub fn match_column(&self, column_name: &str) -> Option<&str> {
        let lower = column_name.to_lowercase();
        self.identifiers
            .iter()
            .map(String::as_str)
            .find(|id| lower.contains(*id))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
