//! Console output formatter for research results

use colored::Colorize;
use scholia_domain::{Query, ResearchState};

/// Formats research results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The composed answer alone
    pub fn format_answer(state: &ResearchState) -> String {
        format!("{}\n", state.response())
    }

    /// Answer preceded by the queries issued and the evidence gathered
    pub fn format_full(state: &ResearchState) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Research Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Question:".cyan().bold(),
            state.conversation().last_user_message()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Iterations:".cyan().bold(),
            state.iterations()
        ));

        output.push_str(&Self::section_header("Queries"));
        if state.queries_made().is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for query in state.queries_made() {
            output.push_str(&format!("  * {}\n", Self::describe_query(query)));
        }

        output.push_str(&Self::section_header("Evidence"));
        if state.resource_summaries().is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for (i, summary) in state.resource_summaries().iter().enumerate() {
            output.push_str(&format!(
                "{}\n{}\n",
                format!("[{}]", i + 1).yellow().bold(),
                Self::indent(summary, "    ")
            ));
        }

        if !state.query_satisfied() && !state.feedback().is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Open gaps:".yellow().bold(),
                state.feedback()
            ));
        }

        output.push_str(&Self::section_header("Answer"));
        output.push_str(state.response());
        output.push('\n');
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(state: &ResearchState) -> String {
        serde_json::to_string_pretty(state).unwrap_or_else(|_| "{}".to_string())
    }

    fn describe_query(query: &Query) -> String {
        let Some(filters) = query.effective_filters() else {
            return query.text.clone();
        };
        let mut parts = Vec::new();
        if let Some(author) = &filters.author {
            parts.push(format!("author: {author}"));
        }
        if let Some(source) = &filters.source_title {
            parts.push(format!("source: {source}"));
        }
        format!("{} ({})", query.text, parts.join(", "))
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
