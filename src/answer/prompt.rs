//! Prompt construction for grounded math answers.
//!
//! The LaTeX rule appears both in the system message and twice in the user
//! message; models drop a single placement often enough that it is repeated.

use crate::llm::types::ChatMessage;
use crate::rag::{GroundingContext, Query};

pub const SYSTEM_PROMPT: &str =
    "You are a helpful probability assistant. Ensure correct LaTeX formatting: $latex_expr$";

const PERSONA: &str = "As a mathematical assistant, use the following context to answer the user's question. \
If the context doesn't provide enough information, use your general knowledge about mathematics, \
but prioritize the given context. Only help with mathematics. \
Respond in the same language the question was asked in.";

const FORMATTING_RULES: &str = r"When responding:
- Use $...$ for inline math and $$...$$ for display math.
- Check every LaTeX expression before writing it, and correct any malformed LaTeX.
- For example, this is incorrect: \[ \chi^2 = \frac{(n-1)s^2}{\sigma_0^2} \]
- and this is correct:
$$
\chi^2 = \frac{(n-1)s^2}{\sigma_0^2}
$$
Make sure every LaTeX expression uses proper delimiters and renders without errors.";

const FORMATTING_REMINDER: &str = "Ensure correct LaTeX formatting: $latex_expr$";

/// User-role prompt: persona, formatting rules, context, question, reminder.
pub fn build_prompt(query: &Query, context: &GroundingContext) -> String {
    format!(
        "{PERSONA}\n\n{FORMATTING_RULES}\n\nContext:\n{context}\n\nUser's question: {query}\n\n{FORMATTING_REMINDER}\n\nAssistant's response:"
    )
}

/// The two-message exchange sent to the completion provider.
pub fn build_messages(query: &Query, context: &GroundingContext) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_prompt(query, context)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::{assemble, PassageScore, RetrievedPassage};

    fn context(text: &str) -> GroundingContext {
        assemble(&[RetrievedPassage {
            id: "1".to_string(),
            score: PassageScore::Missing,
            text: text.to_string(),
        }])
        .unwrap()
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let prompt = build_prompt(
            &Query::new("What is the expected value of a binomial distribution?"),
            &context("For X ~ B(n, p), E[X] = np."),
        );

        let persona = prompt.find("As a mathematical assistant").unwrap();
        let rules = prompt.find("When responding:").unwrap();
        let ctx = prompt.find("Context:\nFor X ~ B(n, p), E[X] = np.").unwrap();
        let question = prompt
            .find("User's question: What is the expected value of a binomial distribution?")
            .unwrap();
        let reminder = prompt.rfind(FORMATTING_REMINDER).unwrap();
        let cue = prompt.find("Assistant's response:").unwrap();

        assert!(persona < rules);
        assert!(rules < ctx);
        assert!(ctx < question);
        assert!(question < reminder);
        assert!(reminder < cue);
        assert!(prompt.ends_with("Assistant's response:"));
    }

    #[test]
    fn context_is_inserted_verbatim() {
        let raw = "line with $\\sigma^2$\n{braces} and \\[ display \\]";
        let prompt = build_prompt(&Query::new("q"), &context(raw));
        assert!(prompt.contains(raw));
    }

    #[test]
    fn messages_are_system_then_user_and_both_carry_the_rule() {
        let messages = build_messages(&Query::new("q"), &context("c"));

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert!(messages[0].content.contains("$latex_expr$"));
        assert!(messages[1].content.contains("$latex_expr$"));
    }
}
