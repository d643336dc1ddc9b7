//! MySQL-style admin statement shim for `SQLite`.
//!
//! The prompt teaches the model a MySQL-flavored read-only surface, so the
//! generator emits `SHOW TABLES`, `DESCRIBE student`, and friends. `SQLite`
//! has no such statements; this module rewrites them onto `sqlite_master`
//! and `pragma_table_info` queries before execution. Everything else passes
//! through untouched.
//!
//! Result classification is NOT affected: the executor classifies by the
//! original statement's leading verb, so a rewritten `SHOW TABLES` still
//! reports as a `show` rowset.

/// Rewrite a statement into the SQL actually executed.
#[must_use]
pub fn rewrite(sql: &str) -> String {
    let trimmed = sql.trim().trim_end_matches(';').trim();
    let tokens: Vec<String> = trimmed
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();

    match tokens.as_slice() {
        [show, tables] if show == "show" && tables == "tables" => {
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
                .to_string()
        }
        [show, create, table, _] if show == "show" && create == "create" && table == "table" => {
            // Take the identifier from the original text to preserve case.
            let name = clean_identifier(trimmed.split_whitespace().nth(3).unwrap_or_default());
            format!(
                "SELECT name AS \"Table\", sql AS \"Create Table\" FROM sqlite_master \
                 WHERE type = 'table' AND name = '{}'",
                escape_literal(&name)
            )
        }
        [verb, _] if verb == "describe" || verb == "desc" => {
            let name = clean_identifier(trimmed.split_whitespace().nth(1).unwrap_or_default());
            format!(
                "SELECT name AS \"Field\", type AS \"Type\", \
                 CASE WHEN \"notnull\" = 1 THEN 'NO' ELSE 'YES' END AS \"Null\", \
                 CASE WHEN pk > 0 THEN 'PRI' ELSE '' END AS \"Key\", \
                 dflt_value AS \"Default\" \
                 FROM pragma_table_info('{}')",
                escape_literal(&name)
            )
        }
        _ => sql.to_string(),
    }
}

/// Strip quoting characters a generator may wrap around an identifier.
fn clean_identifier(raw: &str) -> String {
    raw.trim_matches(|c| c == '`' || c == '"' || c == '\'' || c == ';')
        .to_string()
}

/// Escape a string for inclusion in a single-quoted SQL literal.
fn escape_literal(s: &str) -> String {
    s.replace('\'', "''")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_tables_rewrites() {
        let out = rewrite("SHOW TABLES;");
        assert!(out.contains("sqlite_master"));
        assert!(out.contains("NOT LIKE 'sqlite_%'"));
    }

    #[test]
    fn show_tables_case_insensitive() {
        assert_eq!(rewrite("show tables"), rewrite("Show Tables;"));
    }

    #[test]
    fn show_create_table_rewrites_with_name() {
        let out = rewrite("SHOW CREATE TABLE student;");
        assert!(out.contains("name = 'student'"));
        assert!(out.contains("\"Create Table\""));
    }

    #[test]
    fn describe_rewrites_to_pragma() {
        let out = rewrite("DESCRIBE student;");
        assert!(out.contains("pragma_table_info('student')"));
        assert!(out.contains("\"Field\""));
        assert!(out.contains("'PRI'"));
    }

    #[test]
    fn desc_shorthand_rewrites() {
        let out = rewrite("desc student");
        assert!(out.contains("pragma_table_info('student')"));
    }

    #[test]
    fn backticked_identifier_cleaned() {
        let out = rewrite("DESCRIBE `student`;");
        assert!(out.contains("pragma_table_info('student')"));
    }

    #[test]
    fn select_passes_through() {
        let sql = "SELECT name FROM student WHERE age > 20;";
        assert_eq!(rewrite(sql), sql);
    }

    #[test]
    fn explain_passes_through() {
        let sql = "EXPLAIN SELECT 1;";
        assert_eq!(rewrite(sql), sql);
    }

    #[test]
    fn quote_in_identifier_escaped() {
        let out = rewrite("DESCRIBE o'brien;");
        assert!(out.contains("pragma_table_info('o''brien')"));
    }

    #[test]
    fn show_with_extra_tokens_passes_through() {
        // Not a recognized admin form; let the driver report its own error.
        let sql = "SHOW COLUMNS FROM student;";
        assert_eq!(rewrite(sql), sql);
    }
}
