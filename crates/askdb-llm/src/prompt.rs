//! Conversational prompt construction.
//!
//! The prompt is a fixed instruction preamble, the schema text when one is
//! available, five few-shot dialogue exemplars, up to the three most recent
//! history pairs, and the current request. Two variants exist: without
//! schema text the schema block and the schema-matching rules are omitted.

use std::fmt::Write as _;

/// History pairs included in a prompt (most recent first in age, rendered
/// oldest-to-newest).
pub const MAX_HISTORY_IN_PROMPT: usize = 3;

/// Five fixed few-shot dialogues steering the model's output format.
///
/// Each dialogue shows follow-up requests refining earlier SQL, which is
/// what the conversation context asks the model to do.
const EXAMPLES: &str = "\
[Example dialogue 1]
User: list the names and ages of all students
SQL: SELECT name, age FROM student;

User: only the ones with a score above 80
SQL: SELECT name, age FROM student WHERE score > 80;

User: sort them by age, oldest first
SQL: SELECT name, age FROM student WHERE score > 80 ORDER BY age DESC;

[Example dialogue 2]
User: show all tables
SQL: SHOW TABLES;

User: what does the student table look like
SQL: DESCRIBE student;

User: show the first 5 rows of the student table
SQL: SELECT * FROM student LIMIT 5;

[Example dialogue 3]
User: count the students in each class
SQL: SELECT class_id, COUNT(*) AS student_count FROM student GROUP BY class_id;

User: only classes with more than 10 students
SQL: SELECT class_id, COUNT(*) AS student_count FROM student GROUP BY class_id HAVING COUNT(*) > 10;

User: order them by head count, largest first
SQL: SELECT class_id, COUNT(*) AS student_count FROM student GROUP BY class_id HAVING COUNT(*) > 10 ORDER BY student_count DESC;

[Example dialogue 4]
User: find the student with the highest score
SQL: SELECT * FROM student ORDER BY score DESC LIMIT 1;

User: the top ten students by score
SQL: SELECT * FROM student ORDER BY score DESC LIMIT 10;

User: what is the average score
SQL: SELECT AVG(score) AS average_score FROM student;

[Example dialogue 5]
User: find students whose name starts with Zhang
SQL: SELECT * FROM student WHERE name LIKE 'Zhang%';

User: students whose name contains Ming
SQL: SELECT * FROM student WHERE name LIKE '%Ming%';

User: students between 18 and 25 years old
SQL: SELECT * FROM student WHERE age BETWEEN 18 AND 25;
";

/// Build the complete model prompt.
///
/// `history` is the session's pairs, oldest first; only the last
/// [`MAX_HISTORY_IN_PROMPT`] are rendered.
#[must_use]
pub fn build_prompt(nl_query: &str, schema_text: &str, history: &[(String, String)]) -> String {
    let context = render_history(history);
    if schema_text.is_empty() {
        build_without_schema(nl_query, &context)
    } else {
        build_with_schema(nl_query, schema_text, &context)
    }
}

/// Render the most recent history pairs as a conversation-context block.
fn render_history(history: &[(String, String)]) -> String {
    if history.is_empty() {
        return String::new();
    }
    let recent = &history[history.len().saturating_sub(MAX_HISTORY_IN_PROMPT)..];
    let mut block = String::from("[Conversation context]\n");
    for (i, (query, sql)) in recent.iter().enumerate() {
        let _ = writeln!(block, "Query {}: {query}\nGenerated SQL: {sql}", i + 1);
    }
    block.push('\n');
    block
}

fn build_with_schema(nl_query: &str, schema_text: &str, context: &str) -> String {
    format!(
        "You are a senior MySQL database expert. Using the database schema and the \
natural-language request below, generate high-quality, accurate, directly executable \
MySQL SQL.

[Database schema]
{schema_text}

{EXAMPLES}
{context}[Generation rules]
1. Return standard MySQL SQL only, with no explanation of any kind.
2. SQL must match table names, column names, and column types exactly; respect primary keys, foreign keys, and unique constraints.
3. Column types must agree with the table definitions; avoid type mismatches.
4. Filters, ordering, and grouping must correspond exactly to the request.
5. For multiple statements, separate each SQL statement with a semicolon; do not use line breaks.
6. Never generate DROP, DELETE, UPDATE, INSERT, or any other statement that modifies or deletes data.
7. Prefer standard SQL for aggregation, grouping, and joins.
8. Keep the result column order consistent with the request.
9. Output no comments, no explanations, no markdown, no natural language; SQL only.
10. If the request is ambiguous, choose the most common business interpretation.
11. Mind conversational continuity: when the request refines an earlier one, build the SQL on that context.

[Request]
{nl_query}

[Output format]
Output the SQL statement only, with no explanation, comments, or markdown.
"
    )
}

fn build_without_schema(nl_query: &str, context: &str) -> String {
    format!(
        "You are a senior MySQL database expert. Convert the natural-language request \
below into high-quality, accurate, directly executable MySQL SQL.

{EXAMPLES}
{context}[Generation rules]
1. Return standard MySQL SQL only, with no explanation of any kind.
2. SQL must match table names, column names, and column types exactly.
3. Filters, ordering, and grouping must correspond exactly to the request.
4. For multiple statements, separate each SQL statement with a semicolon; do not use line breaks.
5. Never generate DROP, DELETE, UPDATE, INSERT, or any other statement that modifies or deletes data.
6. Output no comments, no explanations, no markdown, no natural language; SQL only.
7. Mind conversational continuity: when the request refines an earlier one, build the SQL on that context.

[Request]
{nl_query}

[Output format]
Output the SQL statement only, with no explanation, comments, or markdown.
"
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
