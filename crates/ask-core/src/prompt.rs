//! Prompt assembly for answer generation

use ask_domain::KnowledgeSource;

/// Builds the generation prompt from matched sources and a question
///
/// The layout is fixed:
///
/// ```text
/// Context: {context}
///
/// {preamble}
///
/// Question: {question}
/// {answer cue}
/// ```
///
/// where `{context}` is every source's context block joined by a blank line,
/// or empty when nothing matched.
pub struct PromptBuilder<'a> {
    preamble: &'a str,
    answer_cue: &'a str,
    sources: &'a [KnowledgeSource],
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(preamble: &'a str, answer_cue: &'a str) -> Self {
        Self {
            preamble,
            answer_cue,
            sources: &[],
        }
    }

    /// Add matched sources as context
    pub fn with_sources(mut self, sources: &'a [KnowledgeSource]) -> Self {
        self.sources = sources;
        self
    }

    /// Render the context section
    pub fn context(&self) -> String {
        self.sources
            .iter()
            .map(KnowledgeSource::context_block)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the complete prompt for a question
    pub fn build(&self, question: &str) -> String {
        format!(
            "Context: {}\n\n{}\n\nQuestion: {}\n{}",
            self.context(),
            self.preamble,
            question,
            self.answer_cue
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_sources() {
        let prompt = PromptBuilder::new("Be helpful.", "Answer:").build("Who?");
        assert_eq!(prompt, "Context: \n\nBe helpful.\n\nQuestion: Who?\nAnswer:");
    }

    #[test]
    fn test_sources_are_joined_by_blank_line() {
        let sources = vec![
            KnowledgeSource::new("1", "Services", Some("https://x/s".to_string()), "Three services."),
            KnowledgeSource::new("2", "Podcast", None, "Waves."),
        ];
        let builder = PromptBuilder::new("P", "A:").with_sources(&sources);

        assert_eq!(
            builder.context(),
            "Source: Services (https://x/s)\nContent: Three services.\n\nSource: Podcast ()\nContent: Waves."
        );
        assert!(builder.build("q").starts_with("Context: Source: Services"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the prompt always ends with the question and the cue
        #[test]
        fn test_prompt_ends_with_question(question in "[^\n]{1,80}", cue in "[A-Za-z:]{1,10}") {
            let prompt = PromptBuilder::new("preamble", &cue).build(&question);
            let suffix = format!("\n\nQuestion: {}\n{}", question, cue);
            prop_assert!(prompt.ends_with(&suffix));
        }

        /// Property: every source's content appears in the prompt, in order
        #[test]
        fn test_every_source_in_context(contents in proptest::collection::vec("[a-z]{3,12}", 1..6)) {
            let sources: Vec<KnowledgeSource> = contents
                .iter()
                .enumerate()
                .map(|(i, c)| KnowledgeSource::new(i.to_string(), format!("T{}", i), None, c.as_str()))
                .collect();
            let prompt = PromptBuilder::new("P", "A:").with_sources(&sources).build("q");

            let mut cursor = 0;
            for source in &sources {
                let block = source.context_block();
                let found = prompt[cursor..].find(&block);
                prop_assert!(found.is_some(), "missing block {:?}", block);
                cursor += found.unwrap_or(0) + block.len();
            }
        }
    }
}
