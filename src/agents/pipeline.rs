//! Fixed-step content pipelines, parameterizations of the sequential chainer.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::chain::{ChainOutput, Chainer};
use super::Agent;
use crate::errors::ProviderError;
use crate::providers::base::Provider;

const MARKETING_SYSTEM_PROMPT: &str =
    "You are a helpful assistant specializing in marketing analysis.";

const BLOG_SYSTEM_PROMPT: &str = "You are a professional blog content creator who specializes in \
creating high-quality, engaging blog posts on various topics. You follow SEO best practices and \
create content that is both informative and engaging.";

/// Extract / normalize / sort / format pipeline for turning a prose report
/// into a markdown table of metrics.
pub fn metrics_pipeline(provider: Arc<dyn Provider>, model: &str) -> Chainer {
    let steps = vec![
        "Extract only the numerical values and their associated metrics from the text.\n\
         Format each as 'value: metric' on a new line.\n\
         Example format:\n\
         92: customer satisfaction\n\
         45%: revenue growth"
            .to_string(),
        "Convert all numerical values to percentages where possible.\n\
         If not a percentage or points, convert to decimal (e.g., 92 points -> 92%).\n\
         Keep one number per line.\n\
         Example format:\n\
         92%: customer satisfaction\n\
         45%: revenue growth"
            .to_string(),
        "Sort all lines in descending order by numerical value.\n\
         Keep the format 'value: metric' on each line.\n\
         Example:\n\
         92%: customer satisfaction\n\
         87%: employee satisfaction"
            .to_string(),
        "Format the sorted data as a markdown table with columns, without tags or enclosing \
         quotes:\n\
         | Metric | Value |\n\
         |:--|--:|\n\
         | Customer Satisfaction | 92% |"
            .to_string(),
    ];
    Chainer::new(Agent::new(provider, MARKETING_SYSTEM_PROMPT, model), steps)
}

/// Outline / refine / expand pipeline that generates a complete blog post.
pub struct Blogger {
    chain: Chainer,
    input: String,
}

impl Blogger {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: &str,
        topic: &str,
        target_audience: &str,
        word_count: usize,
    ) -> Self {
        let steps = vec![
            "Create a detailed outline for a blog post on the given topic.\n\
             Include a title, introduction, 4-6 main sections with subpoints, and conclusion.\n\
             Format the outline with clear headings and bullet points."
                .to_string(),
            "Review the outline and ensure it meets these criteria:\n\
             - Covers the topic comprehensively\n\
             - Flows logically from point to point\n\
             - Addresses the needs of the target audience\n\
             - Includes specific, actionable information\n\
             If any criteria are not met, refine the outline accordingly."
                .to_string(),
            format!(
                "Based on the validated outline, write the complete blog post.\n\
                 Include all of the following:\n\
                 1. An engaging title\n\
                 2. A hook-filled introduction\n\
                 3. Well-developed main sections with subheadings\n\
                 4. A strong conclusion with a call-to-action\n\
                 5. Write in a conversational but professional tone\n\
                 The complete post should be approximately {word_count} words."
            ),
        ];
        let input = format!(
            "Topic: {topic}\nTarget Audience: {target_audience}\nApproximate Word Count: {word_count}"
        );
        Self {
            chain: Chainer::new(Agent::new(provider, BLOG_SYSTEM_PROMPT, model), steps),
            input,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: i32) -> Self {
        self.chain = self.chain.with_max_tokens(max_tokens);
        self
    }

    pub async fn generate(&self) -> Result<ChainOutput, ProviderError> {
        self.chain.run(&self.input).await
    }

    /// Generate the post and write it verbatim to `path`, returning the text.
    pub async fn save_to(&self, path: &Path) -> Result<String> {
        let result = self.generate().await?;
        write_artifact(path, &result.output)?;
        Ok(result.output)
    }
}

/// Write generated text verbatim to a file path. Overwrites any existing
/// file; no atomicity guarantee.
pub fn write_artifact(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("writing artifact to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::MockProvider;

    #[test]
    fn test_metrics_pipeline_has_four_steps() {
        let provider = Arc::new(MockProvider::replies(&[]));
        let chain = metrics_pipeline(provider, "test-model");
        assert_eq!(chain.steps().len(), 4);
        assert!(chain.steps()[0].contains("Extract only the numerical values"));
        assert!(chain.steps()[3].contains("| Metric | Value |"));
    }

    #[tokio::test]
    async fn test_blogger_input_and_steps() {
        let provider = Arc::new(MockProvider::replies(&["outline", "refined", "post"]));
        let blogger = Blogger::new(
            Arc::clone(&provider) as Arc<dyn Provider>,
            "test-model",
            "The Future of AI",
            "tech enthusiasts",
            800,
        );

        let result = blogger.generate().await.unwrap();
        assert_eq!(result.output, "post");
        assert_eq!(result.transcript.len(), 7);

        let calls = provider.calls();
        assert_eq!(calls.len(), 3);
        let first_turn = calls[0][1].text();
        assert!(first_turn.contains("Topic: The Future of AI"));
        assert!(first_turn.contains("Target Audience: tech enthusiasts"));
        // The expansion step carries the target word count
        let last_turn = calls[2][calls[2].len() - 1].text();
        assert!(last_turn.contains("approximately 800 words"));
    }

    #[tokio::test]
    async fn test_save_to_writes_verbatim() {
        let provider = Arc::new(MockProvider::replies(&["o", "r", "# Final Post\n\nbody"]));
        let blogger = Blogger::new(provider, "test-model", "t", "a", 100);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post.md");
        let post = blogger.save_to(&path).await.unwrap();

        assert_eq!(post, "# Final Post\n\nbody");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Final Post\n\nbody");
    }

    #[test]
    fn test_write_artifact_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_artifact(&path, "first").unwrap();
        write_artifact(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }
}
