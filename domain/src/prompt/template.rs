//! Prompt templates for the research loop

use crate::conversation::Conversation;
use crate::research::query::Query;

/// Templates for generating prompts at each node
pub struct PromptTemplate;

impl PromptTemplate {
    /// Placeholder when nothing has been retrieved yet.
    pub const NO_RESOURCES: &'static str = "No research resources collected yet.";

    /// Placeholder when the assessor has not produced feedback yet.
    pub const NO_FEEDBACK: &'static str = "No feedback yet.";

    // ==================== Conversation ====================

    pub fn conversation_system() -> &'static str {
        r#"You are a conversation summarizer. Summarize the conversation between the user and the assistant,
keeping the key points discussed, the questions asked, and any context that would help answer a follow-up.
Your summary should be at most half the length of the original conversation."#
    }

    pub fn conversation_prompt(context: &str) -> String {
        format!("Conversation history:\n{}\n", context)
    }

    // ==================== Summarize ====================

    pub fn summarize_system() -> &'static str {
        r#"You are a summarizing agent. Summarize the resource you are given:
- Keep it concise (around half the size of the original)
- Focus on the key arguments, concepts, and ideas presented
- Retain any important quotes
- Keep the attribution line (author, title) at the end
- Write in full sentences and paragraphs"#
    }

    pub fn summarize_prompt(rendered_resource: &str) -> String {
        format!(
            "Here is a resource to summarize:\n---\n{}\n---\n",
            rendered_resource
        )
    }

    // ==================== Plan Queries ====================

    pub fn plan_reasoning_system() -> &'static str {
        r#"You are a reasoning agent for a philosophical research system. Reason about how to break the
user's question down into targeted search queries.

The search returns large passages (several hundred words) containing full philosophical excerpts, so:
- Each query should target broad concepts and arguments, not narrow facts
- Fewer queries are needed since each result carries substantial context

Reason about:
- What is the core philosophical question or concept?
- Which authors or works would be most valuable?
- Should the question be approached from different traditions?
- Simple questions need 1-2 queries; complex multi-faceted questions up to 5

Output ONLY your reasoning. Do not write the queries themselves."#
    }

    pub fn plan_queries_system(reasoning: &str) -> String {
        format!(
            r#"You are a semantic search assistant for philosophical research. Write search queries based on
your previous reasoning.

Your reasoning:
"""
{}
"""

Guidelines:
- Passages are long, so prefer few, broad, conceptual queries over many narrow ones
- CRITICAL: put author and work names in "filters", NEVER in the "query" string
- The "query" field describes concepts, arguments, and topics only
- Filters are fuzzy-matched, so approximate names are fine
- Write between 1 and 5 queries

Each query object has "query" (string) and "filters" (object with optional "author" and "source_title")."#,
            reasoning
        )
    }

    /// User prompt shared by both planning passes.
    pub fn plan_context(conversation: &Conversation, feedback: &str, queries_made: &[Query]) -> String {
        let mut prompt = format!(
            "Conversation summary:\n{}\n\nUser's last message:\n{}\n\nPrevious queries feedback:\n{}",
            conversation.summarized_context(),
            conversation.last_user_message(),
            if feedback.trim().is_empty() {
                Self::NO_FEEDBACK
            } else {
                feedback
            }
        );

        if !queries_made.is_empty() {
            prompt.push_str("\n\nPrevious queries made:\n");
            for query in queries_made {
                prompt.push_str(&format!("- {}\n", query));
            }
            prompt.push_str("\nConsider what information gaps remain and avoid redundant queries.");
        }

        prompt
    }

    // ==================== Assess ====================

    pub fn classify_system() -> &'static str {
        r#"You are a reasoning assistant that evaluates whether the provided research is sufficient to answer
the user's query. Decide whether the current research can support a satisfactory answer now; it must at
least cover every aspect of the question.

Return NOTHING but 'Yes' if the research is sufficient, or 'No' if more research is needed."#
    }

    pub fn feedback_system() -> &'static str {
        r#"You are an assistant that explains why the current research resources are insufficient to answer
the user's query. Give specific reasons and suggest what additional research is needed."#
    }

    pub fn assess_prompt(conversation: &Conversation, summaries: &[String]) -> String {
        format!(
            "Here is the user's last message:\n{}\n\nHere are summaries of the research results obtained so far:\n{}\n",
            conversation.last_user_message(),
            Self::format_summaries(summaries)
        )
    }

    pub fn feedback_prompt(conversation: &Conversation, summaries: &[String]) -> String {
        let mut prompt = Self::assess_prompt(conversation, summaries);
        prompt.push_str("Explain why this research is insufficient and what additional research is needed.");
        prompt
    }

    // ==================== Compose ====================

    pub fn compose_system(conversation: &Conversation, summaries: &[String]) -> String {
        format!(
            r#"Respond to the user's last message using the resources you have researched. Use specific quotes,
answer in a conversational yet academic tone, and cite every source at the end in the format
'(author last, author first; title)'.

Consider:
- Which resources are most relevant to the question?
- Based on those resources, what is the answer?
- How do the resources support that answer?

Summary of the conversation before the user's message:
{}

Summaries of the research resources gathered:
{}

After reasoning, output only your final response."#,
            conversation.summarized_context(),
            Self::format_summaries(summaries)
        )
    }

    // ==================== Helpers ====================

    /// Numbered list of summaries, or a placeholder when empty.
    pub fn format_summaries(summaries: &[String]) -> String {
        if summaries.is_empty() {
            return Self::NO_RESOURCES.to_string();
        }
        summaries
            .iter()
            .enumerate()
            .map(|(i, s)| format!("[{}] {}", i + 1, s.trim()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
