//! Terminal rendering of query responses and journal views.
//!
//! Pure text builders; the REPL in `main` decides when to print and when
//! to hand a rowset to the interactive pager.

use askdb_core::result::{BatchResult, StatementResult};
use askdb_journal::{ErrorRecord, JournalStats, QueryRecord};
use askdb_service::QueryResponse;
use std::fmt::Write as _;

/// Header lines for a processed response.
#[must_use]
pub fn response_header(response: &QueryResponse) -> String {
    format!(
        "query processed\noriginal query: {}\ngenerated SQL: {}\nexecution time: {:.3}s",
        response.original_query, response.generated_sql, response.execution_time
    )
}

/// Summary line for one statement result (the rowset body is paged
/// separately).
#[must_use]
pub fn statement_summary(result: &StatementResult) -> String {
    match result {
        StatementResult::Error { message, .. } => format!("error: {message}"),
        StatementResult::Rowset {
            kind,
            columns,
            row_count,
            ..
        } => {
            if *row_count == 0 {
                format!("{kind}: no rows returned")
            } else {
                format!(
                    "{kind}: {row_count} row(s)\ncolumns: {}",
                    columns.join(", ")
                )
            }
        }
        StatementResult::Modify {
            message,
            affected_rows,
            sql_type,
        } => format!("{message}\ntype: {sql_type}\naffected rows: {affected_rows}"),
    }
}

/// Header lines for a batch result.
#[must_use]
pub fn batch_header(batch: &BatchResult) -> String {
    format!(
        "batch of {} statement(s): {} succeeded, {} failed, {} row(s) affected",
        batch.total_statements,
        batch.successful_statements,
        batch.failed_statements,
        batch.total_affected_rows
    )
}

/// Journal statistics view.
#[must_use]
pub fn stats_view(stats: &JournalStats) -> String {
    let mut out = String::from("journal statistics:\n");
    let _ = writeln!(out, "  total queries:      {}", stats.total_queries);
    let _ = writeln!(out, "  successful queries: {}", stats.successful_queries);
    let _ = writeln!(out, "  failed queries:     {}", stats.failed_queries);
    let _ = writeln!(out, "  success rate:       {}%", stats.success_rate);
    let _ = writeln!(out, "  total statements:   {}", stats.total_statements);
    let _ = writeln!(out, "  started:            {}", stats.start_time);
    let _ = writeln!(
        out,
        "  last query:         {}",
        stats.last_query_time.as_deref().unwrap_or("never")
    );
    out
}

/// Recent-queries view.
#[must_use]
pub fn recent_view(records: &[QueryRecord]) -> String {
    if records.is_empty() {
        return "no queries recorded".to_string();
    }
    let mut out = format!("last {} quer(ies):\n", records.len());
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", i + 1, record.timestamp);
        let _ = writeln!(out, "   query: {}", record.nl_query);
        let _ = writeln!(out, "   SQL: {}", record.generated_sql);
        let _ = writeln!(out, "   time: {:.3}s", record.execution_time);
        let _ = writeln!(
            out,
            "   status: {}",
            if record.success { "ok" } else { "failed" }
        );
        if let Some(message) = &record.error_message {
            let _ = writeln!(out, "   error: {message}");
        }
    }
    out
}

/// Error-log view.
#[must_use]
pub fn errors_view(errors: &[ErrorRecord]) -> String {
    if errors.is_empty() {
        return "no errors recorded".to_string();
    }
    let mut out = format!("last {} error(s):\n", errors.len());
    for (i, error) in errors.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", i + 1, error.timestamp);
        let _ = writeln!(out, "   query: {}", error.nl_query);
        let _ = writeln!(out, "   SQL: {}", error.generated_sql);
        let _ = writeln!(
            out,
            "   error: {}",
            error.error_message.as_deref().unwrap_or("unknown")
        );
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use askdb_core::result::{ErrorKind, QueryOutcome, RowsetKind, SqlValue};

    fn response() -> QueryResponse {
        QueryResponse {
            original_query: "list students".into(),
            generated_sql: "SELECT name FROM student;".into(),
            result: QueryOutcome::Statement(StatementResult::Rowset {
                kind: RowsetKind::Select,
                columns: vec!["name".into()],
                rows: vec![vec![SqlValue::Text("ada".into())]],
                row_count: 1,
            }),
            execution_time: 0.1234,
        }
    }

    #[test]
    fn header_includes_sql_and_time() {
        let text = response_header(&response());
        assert!(text.contains("SELECT name FROM student;"));
        assert!(text.contains("0.123s"));
    }

    #[test]
    fn rowset_summary_counts() {
        let text = statement_summary(&StatementResult::Rowset {
            kind: RowsetKind::Show,
            columns: vec!["name".into()],
            rows: vec![],
            row_count: 2,
        });
        assert!(text.contains("show: 2 row(s)"));
        assert!(text.contains("columns: name"));
    }

    #[test]
    fn empty_rowset_summary() {
        let text = statement_summary(&StatementResult::Rowset {
            kind: RowsetKind::Select,
            columns: vec!["name".into()],
            rows: vec![],
            row_count: 0,
        });
        assert_eq!(text, "select: no rows returned");
    }

    #[test]
    fn error_summary_carries_message() {
        let text = statement_summary(&StatementResult::Error {
            message: "blocked".into(),
            sql: "x".into(),
            kind: ErrorKind::Restricted,
        });
        assert_eq!(text, "error: blocked");
    }

    #[test]
    fn batch_header_counts() {
        let batch = BatchResult::from_results(vec![]);
        assert!(batch_header(&batch).contains("batch of 0 statement(s)"));
    }

    #[test]
    fn stats_view_renders_all_counters() {
        let stats = JournalStats {
            total_queries: 4,
            successful_queries: 3,
            failed_queries: 1,
            success_rate: 75.0,
            ..JournalStats::default()
        };
        let text = stats_view(&stats);
        assert!(text.contains("total queries:      4"));
        assert!(text.contains("success rate:       75%"));
        assert!(text.contains("last query:         never"));
    }

    #[test]
    fn empty_views() {
        assert_eq!(recent_view(&[]), "no queries recorded");
        assert_eq!(errors_view(&[]), "no errors recorded");
    }
}
