//! Prompt templates for retrieval-augmented answers

use std::collections::HashMap;

/// System prompt sent ahead of every generated answer
pub const SYSTEM_PROMPT: &str = "You are a helpful blockchain data assistant.";

/// Template for generating prompts
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Fill in the template in one pass; unknown placeholders are left as
    /// written and substituted values are never scanned again.
    #[must_use]
    pub fn render(&self, values: &HashMap<&str, String>) -> String {
        let mut result = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                break;
            };
            result.push_str(&rest[..start]);
            match values.get(after[..end].trim()) {
                Some(value) => result.push_str(value),
                None => result.push_str(&rest[start..start + end + 4]),
            }
            rest = &after[end + 2..];
        }

        result.push_str(rest);
        result
    }

    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Extract `{{name}}` placeholders in first-appearance order
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let name = after[..end].trim();
        if !name.is_empty() && !variables.iter().any(|v| v == name) {
            variables.push(name.to_string());
        }
        rest = &after[end + 2..];
    }

    variables
}

/// Prompt asking the model to answer strictly from retrieved context
#[must_use]
pub fn context_qa() -> PromptTemplate {
    PromptTemplate::new(
        r"You are a helpful assistant that answers questions about blockchain data.

User Question: {{question}}

Relevant Context from Blockchain Data:
{{context}}

Please provide a clear, accurate, and helpful answer based on the context provided. If the context doesn't contain enough information, say so politely.

Answer:",
    )
}

/// Render numbered context sections, one per retrieved document
pub fn format_context<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| format!("Context {}: {}", i + 1, text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the user prompt for `question` over the given document texts
pub fn build_answer_prompt<'a>(question: &str, texts: impl IntoIterator<Item = &'a str>) -> String {
    let mut values = HashMap::new();
    values.insert("question", question.to_string());
    values.insert("context", format_context(texts));
    context_qa().render(&values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_variables() {
        let template = PromptTemplate::new("Block {{block}} has {{count}} rows, block {{block}}.");
        assert_eq!(template.variables(), &["block", "count"]);
    }

    #[test]
    fn test_unterminated_placeholder_is_ignored() {
        let template = PromptTemplate::new("Hello {{name");
        assert!(template.variables().is_empty());
    }

    #[test]
    fn test_answer_prompt_layout() {
        let prompt = build_answer_prompt("Who sent the most?", ["first doc", "second doc"]);
        assert!(prompt.contains("User Question: Who sent the most?"));
        assert!(prompt.contains("Context 1: first doc\n\nContext 2: second doc"));
        assert!(prompt.ends_with("Answer:"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let template = PromptTemplate::new("{{greeting}}, {{name}}! {{unclosed");
        let mut values = HashMap::new();
        values.insert("greeting", "Hi".to_string());
        assert_eq!(template.render(&values), "Hi, {{name}}! {{unclosed");
    }

    #[test]
    fn test_placeholders_inside_question_are_not_expanded() {
        let prompt = build_answer_prompt("what is {{context}} here?", ["retrieved text"]);
        assert!(prompt.contains("User Question: what is {{context}} here?"));
        assert_eq!(prompt.matches("retrieved text").count(), 1);
    }
}
