//! Journal record and statistics types.

use askdb_core::result::{QueryOutcome, StatementResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One journaled request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// RFC 3339 timestamp.
    pub timestamp: String,
    /// The natural-language query as submitted.
    pub nl_query: String,
    /// The SQL the model produced (post fence-stripping).
    pub generated_sql: String,
    /// Wall-clock request time in seconds.
    pub execution_time: f64,
    /// Caller-supplied user tag.
    pub user_info: String,
    /// Shape of the result (`select`, `show`, `multiple`, `error`, ...).
    pub result_type: String,
    /// Whether the request produced a non-error result.
    pub success: bool,
    /// Error message, for failed requests.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_message: Option<String>,
    /// Batch extras: statements in the batch.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_statements: Option<usize>,
    /// Batch extras: statements that succeeded.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub successful_statements: Option<usize>,
    /// Batch extras: statements that failed.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub failed_statements: Option<usize>,
    /// Batch extras: rows changed across the batch.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_affected_rows: Option<u64>,
    /// Rowset extras: rows returned.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub row_count: Option<usize>,
    /// Rowset extras: columns returned.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub column_count: Option<usize>,
}

impl QueryRecord {
    /// Build a record from an executed outcome.
    #[must_use]
    pub fn from_outcome(
        nl_query: &str,
        generated_sql: &str,
        outcome: &QueryOutcome,
        execution_time: f64,
        user_info: &str,
    ) -> Self {
        let mut record = Self::base(nl_query, generated_sql, execution_time, user_info);
        record.result_type = outcome.type_str().to_string();

        match outcome {
            QueryOutcome::Statement(StatementResult::Error { message, .. }) => {
                record.success = false;
                record.error_message = Some(message.clone());
            }
            QueryOutcome::Statement(StatementResult::Rowset {
                columns, row_count, ..
            }) => {
                record.row_count = Some(*row_count);
                record.column_count = Some(columns.len());
            }
            QueryOutcome::Statement(StatementResult::Modify { .. }) => {}
            QueryOutcome::Batch(batch) => {
                record.total_statements = Some(batch.total_statements);
                record.successful_statements = Some(batch.successful_statements);
                record.failed_statements = Some(batch.failed_statements);
                record.total_affected_rows = Some(batch.total_affected_rows);
            }
        }
        record
    }

    /// Build a record for a request that failed before execution (for
    /// example a generation failure).
    #[must_use]
    pub fn failure(
        nl_query: &str,
        generated_sql: &str,
        message: &str,
        execution_time: f64,
        user_info: &str,
    ) -> Self {
        let mut record = Self::base(nl_query, generated_sql, execution_time, user_info);
        record.result_type = "error".to_string();
        record.success = false;
        record.error_message = Some(message.to_string());
        record
    }

    fn base(nl_query: &str, generated_sql: &str, execution_time: f64, user_info: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            nl_query: nl_query.to_string(),
            generated_sql: generated_sql.to_string(),
            execution_time,
            user_info: user_info.to_string(),
            result_type: String::new(),
            success: true,
            error_message: None,
            total_statements: None,
            successful_statements: None,
            failed_statements: None,
            total_affected_rows: None,
            row_count: None,
            column_count: None,
        }
    }

    /// Statements this record accounts for in the running totals.
    #[must_use]
    pub fn statement_count(&self) -> usize {
        self.total_statements.unwrap_or(1)
    }
}

/// Failed-request entry mirrored into the error log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// RFC 3339 timestamp.
    pub timestamp: String,
    /// The natural-language query as submitted.
    pub nl_query: String,
    /// The SQL the model produced.
    pub generated_sql: String,
    /// What went wrong.
    pub error_message: Option<String>,
    /// Wall-clock request time in seconds.
    pub execution_time: f64,
}

impl From<&QueryRecord> for ErrorRecord {
    fn from(record: &QueryRecord) -> Self {
        Self {
            timestamp: record.timestamp.clone(),
            nl_query: record.nl_query.clone(),
            generated_sql: record.generated_sql.clone(),
            error_message: record.error_message.clone(),
            execution_time: record.execution_time,
        }
    }
}

/// Running statistics across all journaled requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JournalStats {
    /// Requests journaled.
    pub total_queries: u64,
    /// Requests with a non-error result.
    pub successful_queries: u64,
    /// Requests with an error result.
    pub failed_queries: u64,
    /// Statements across all requests (batches count each statement).
    pub total_statements: u64,
    /// When the journal was initialized (RFC 3339).
    pub start_time: String,
    /// Timestamp of the most recent request.
    pub last_query_time: Option<String>,
    /// Percentage of successful requests, two decimals. Computed on read.
    #[serde(default)]
    pub success_rate: f64,
}

impl Default for JournalStats {
    fn default() -> Self {
        Self {
            total_queries: 0,
            successful_queries: 0,
            failed_queries: 0,
            total_statements: 0,
            start_time: Utc::now().to_rfc3339(),
            last_query_time: None,
            success_rate: 0.0,
        }
    }
}

impl JournalStats {
    /// Recompute the success rate from the counters.
    #[allow(clippy::cast_precision_loss)]
    pub fn recompute_rate(&mut self) {
        if self.total_queries > 0 {
            let rate = self.successful_queries as f64 / self.total_queries as f64 * 100.0;
            self.success_rate = (rate * 100.0).round() / 100.0;
        } else {
            self.success_rate = 0.0;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
