//! Interactive result pagination.
//!
//! [`QueryPager`] holds one rowset and a cursor; navigation commands move
//! the cursor and re-render. Rowsets at or under one page are printed
//! directly by the caller without entering the command loop.

use askdb_core::result::SqlValue;
use std::fmt::Write as _;

/// Pager over one rowset.
pub struct QueryPager {
    rows: Vec<Vec<SqlValue>>,
    columns: Vec<String>,
    page_size: usize,
    current_page: usize,
}

/// Snapshot of the pager's position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageInfo {
    /// Current page, 1-based.
    pub current_page: usize,
    /// Total pages.
    pub total_pages: usize,
    /// Total rows across all pages.
    pub total_rows: usize,
    /// First row shown, 1-based.
    pub start_row: usize,
    /// Last row shown, 1-based.
    pub end_row: usize,
    /// Whether a next page exists.
    pub has_next: bool,
    /// Whether a previous page exists.
    pub has_prev: bool,
}

impl QueryPager {
    /// Create a pager. A zero page size is clamped to 1.
    #[must_use]
    pub fn new(rows: Vec<Vec<SqlValue>>, columns: Vec<String>, page_size: usize) -> Self {
        Self {
            rows,
            columns,
            page_size: page_size.max(1),
            current_page: 0,
        }
    }

    /// Total pages (zero for an empty rowset).
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.rows.len().div_ceil(self.page_size)
    }

    /// Rows on the current page.
    #[must_use]
    pub fn current_page_rows(&self) -> &[Vec<SqlValue>] {
        let start = self.current_page * self.page_size;
        let end = (start + self.page_size).min(self.rows.len());
        &self.rows[start.min(self.rows.len())..end]
    }

    /// Advance one page. Returns `false` at the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current_page + 1 < self.total_pages() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns `false` at the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 0 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a 0-based page. Returns `false` when out of range.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page < self.total_pages() {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    /// Position snapshot for display.
    #[must_use]
    pub fn page_info(&self) -> PageInfo {
        let total_rows = self.rows.len();
        let total_pages = self.total_pages();
        let shown = self.current_page_rows().len();
        let start_row = if total_rows == 0 {
            0
        } else {
            self.current_page * self.page_size + 1
        };
        PageInfo {
            current_page: self.current_page + 1,
            total_pages,
            total_rows,
            start_row,
            end_row: start_row + shown.saturating_sub(1),
            has_next: self.current_page + 1 < total_pages,
            has_prev: self.current_page > 0,
        }
    }

    /// Render the current page as display text.
    #[must_use]
    pub fn format_page(&self) -> String {
        if self.rows.is_empty() {
            return "no rows".to_string();
        }

        let info = self.page_info();
        let mut out = String::new();
        let _ = writeln!(out, "page {}/{}", info.current_page, info.total_pages);
        let _ = writeln!(
            out,
            "rows {}-{} of {}",
            info.start_row, info.end_row, info.total_rows
        );
        if !self.columns.is_empty() {
            let _ = writeln!(out, "columns: {}", self.columns.join(", "));
        }
        let _ = writeln!(out, "{}", "-".repeat(60));
        for (offset, row) in self.current_page_rows().iter().enumerate() {
            let values: Vec<String> = row.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "{:3}. {}", info.start_row + offset, values.join(" | "));
        }
        let _ = writeln!(out, "{}", "-".repeat(60));
        if info.total_pages > 1 {
            let _ = writeln!(
                out,
                "navigate: next | prev | first | last | page N | auto | exit"
            );
        }
        out
    }
}

/// A parsed pager navigation command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagerCommand {
    /// Advance one page.
    Next,
    /// Go back one page.
    Prev,
    /// Jump to the first page.
    First,
    /// Jump to the last page.
    Last,
    /// Jump to a 1-based page number.
    Page(usize),
    /// Print every remaining page.
    Auto,
    /// Leave the pager.
    Exit,
    /// Anything else.
    Unknown,
}

/// Parse a pager command line.
#[must_use]
pub fn parse_command(input: &str) -> PagerCommand {
    let lower = input.trim().to_lowercase();
    match lower.as_str() {
        "next" => PagerCommand::Next,
        "prev" => PagerCommand::Prev,
        "first" => PagerCommand::First,
        "last" => PagerCommand::Last,
        "auto" => PagerCommand::Auto,
        "exit" => PagerCommand::Exit,
        _ => lower
            .strip_prefix("page ")
            .and_then(|n| n.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .map_or(PagerCommand::Unknown, PagerCommand::Page),
    }
}

/// Apply one command to the pager, returning the text to print and whether
/// the command loop should continue.
pub fn apply_command(pager: &mut QueryPager, command: PagerCommand) -> (String, bool) {
    match command {
        PagerCommand::Next => {
            if pager.next_page() {
                (pager.format_page(), true)
            } else {
                ("already at the last page".to_string(), true)
            }
        }
        PagerCommand::Prev => {
            if pager.prev_page() {
                (pager.format_page(), true)
            } else {
                ("already at the first page".to_string(), true)
            }
        }
        PagerCommand::First => {
            let _ = pager.go_to_page(0);
            (pager.format_page(), true)
        }
        PagerCommand::Last => {
            let last = pager.total_pages().saturating_sub(1);
            let _ = pager.go_to_page(last);
            (pager.format_page(), true)
        }
        PagerCommand::Page(n) => {
            if pager.go_to_page(n - 1) {
                (pager.format_page(), true)
            } else {
                (
                    format!("page out of range (1-{})", pager.total_pages()),
                    true,
                )
            }
        }
        PagerCommand::Auto => {
            let mut out = pager.format_page();
            while pager.next_page() {
                out.push('\n');
                out.push_str(&pager.format_page());
            }
            (out, true)
        }
        PagerCommand::Exit => ("leaving pager".to_string(), false),
        PagerCommand::Unknown => (
            "unknown command; use next, prev, first, last, page N, auto, or exit".to_string(),
            true,
        ),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Vec<SqlValue>> {
        (1..=n)
            .map(|i| vec![SqlValue::Integer(i as i64), SqlValue::Text(format!("row{i}"))])
            .collect()
    }

    fn pager(n: usize, page_size: usize) -> QueryPager {
        QueryPager::new(rows(n), vec!["id".into(), "label".into()], page_size)
    }

    // ── Page math ───────────────────────────────────────────────────

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(pager(25, 10).total_pages(), 3);
        assert_eq!(pager(20, 10).total_pages(), 2);
        assert_eq!(pager(0, 10).total_pages(), 0);
    }

    #[test]
    fn zero_page_size_clamped() {
        assert_eq!(pager(5, 0).total_pages(), 5);
    }

    #[test]
    fn page_info_first_page() {
        let info = pager(25, 10).page_info();
        assert_eq!(info.current_page, 1);
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.start_row, 1);
        assert_eq!(info.end_row, 10);
        assert!(info.has_next);
        assert!(!info.has_prev);
    }

    #[test]
    fn page_info_last_partial_page() {
        let mut p = pager(25, 10);
        assert!(p.go_to_page(2));
        let info = p.page_info();
        assert_eq!(info.start_row, 21);
        assert_eq!(info.end_row, 25);
        assert!(!info.has_next);
        assert!(info.has_prev);
    }

    // ── Navigation ──────────────────────────────────────────────────

    #[test]
    fn next_stops_at_last_page() {
        let mut p = pager(25, 10);
        assert!(p.next_page());
        assert!(p.next_page());
        assert!(!p.next_page());
        assert_eq!(p.page_info().current_page, 3);
    }

    #[test]
    fn prev_stops_at_first_page() {
        let mut p = pager(25, 10);
        assert!(!p.prev_page());
        assert!(p.next_page());
        assert!(p.prev_page());
        assert_eq!(p.page_info().current_page, 1);
    }

    #[test]
    fn go_to_out_of_range_rejected() {
        let mut p = pager(25, 10);
        assert!(!p.go_to_page(3));
        assert_eq!(p.page_info().current_page, 1);
    }

    // ── Rendering ───────────────────────────────────────────────────

    #[test]
    fn format_shows_rows_and_columns() {
        let text = pager(3, 10).format_page();
        assert!(text.contains("page 1/1"));
        assert!(text.contains("rows 1-3 of 3"));
        assert!(text.contains("columns: id, label"));
        assert!(text.contains("1 | row1"));
    }

    #[test]
    fn format_empty_rowset() {
        assert_eq!(pager(0, 10).format_page(), "no rows");
    }

    #[test]
    fn format_single_page_hides_navigation() {
        assert!(!pager(3, 10).format_page().contains("navigate:"));
        assert!(pager(30, 10).format_page().contains("navigate:"));
    }

    // ── Command parsing ─────────────────────────────────────────────

    #[test]
    fn parse_known_commands() {
        assert_eq!(parse_command("next"), PagerCommand::Next);
        assert_eq!(parse_command(" PREV "), PagerCommand::Prev);
        assert_eq!(parse_command("first"), PagerCommand::First);
        assert_eq!(parse_command("last"), PagerCommand::Last);
        assert_eq!(parse_command("auto"), PagerCommand::Auto);
        assert_eq!(parse_command("exit"), PagerCommand::Exit);
        assert_eq!(parse_command("page 3"), PagerCommand::Page(3));
    }

    #[test]
    fn parse_rejects_bad_page_numbers() {
        assert_eq!(parse_command("page"), PagerCommand::Unknown);
        assert_eq!(parse_command("page zero"), PagerCommand::Unknown);
        assert_eq!(parse_command("page 0"), PagerCommand::Unknown);
        assert_eq!(parse_command("gibberish"), PagerCommand::Unknown);
    }

    // ── Command application ─────────────────────────────────────────

    #[test]
    fn apply_next_at_end_reports() {
        let mut p = pager(5, 10);
        let (text, keep_going) = apply_command(&mut p, PagerCommand::Next);
        assert_eq!(text, "already at the last page");
        assert!(keep_going);
    }

    #[test]
    fn apply_exit_stops_loop() {
        let mut p = pager(25, 10);
        let (_, keep_going) = apply_command(&mut p, PagerCommand::Exit);
        assert!(!keep_going);
    }

    #[test]
    fn apply_page_jump() {
        let mut p = pager(25, 10);
        let (text, _) = apply_command(&mut p, PagerCommand::Page(3));
        assert!(text.contains("page 3/3"));

        let (text, _) = apply_command(&mut p, PagerCommand::Page(9));
        assert!(text.contains("page out of range (1-3)"));
    }

    #[test]
    fn apply_auto_prints_remaining_pages() {
        let mut p = pager(25, 10);
        let (text, keep_going) = apply_command(&mut p, PagerCommand::Auto);
        assert!(keep_going);
        assert!(text.contains("page 1/3"));
        assert!(text.contains("page 2/3"));
        assert!(text.contains("page 3/3"));
    }
}
