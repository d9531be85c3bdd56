//! Post-hoc scoring helpers for pattern outputs.
//!
//! Pure functions over strings (plus one driver that exercises a router on
//! labeled cases); nothing here is consulted by the agents at runtime. Model
//! output is treated as untyped text: anything structural is parsed
//! explicitly and a failed parse surfaces as a [`ParseError`].

use regex::Regex;

use crate::agents::Router;
use crate::errors::{ParseError, ProviderError};

#[derive(Debug, Clone, PartialEq)]
pub struct DataChainMetrics {
    /// Number of metric-bearing lines found in the source report.
    pub metrics_captured: usize,
    /// Output starts a markdown table with the expected header and separator.
    pub correct_formatting: bool,
    /// Table values appear in non-increasing order.
    pub sorting_accuracy: bool,
}

/// Score the metrics-pipeline output against the report it was derived from.
pub fn evaluate_data_chain(
    original_text: &str,
    processed_output: &str,
) -> Result<DataChainMetrics, ParseError> {
    let metrics_captured = original_text
        .lines()
        .filter(|line| line.contains('%') || line.contains("points") || line.contains('$'))
        .count();

    let correct_formatting = processed_output.contains("| Metric | Value |")
        && processed_output.contains("|:--|--:|");

    let values = parse_table_values(processed_output)?;
    let sorting_accuracy = values.windows(2).all(|pair| pair[0] >= pair[1]);

    Ok(DataChainMetrics {
        metrics_captured,
        correct_formatting,
        sorting_accuracy,
    })
}

/// Pull the numeric value cell out of every data row of the markdown table.
/// A row that looks like a data row but whose value cell does not parse is
/// an error, not a silent skip.
fn parse_table_values(output: &str) -> Result<Vec<f64>, ParseError> {
    let mut values = Vec::new();
    for line in output.lines() {
        if !(line.contains('|') && line.contains('%')) {
            continue;
        }
        let cell = line
            .split('|')
            .nth(2)
            .unwrap_or("")
            .trim()
            .trim_end_matches('%')
            .trim();
        let value: f64 = cell
            .parse()
            .map_err(|_| ParseError::BadValueCell(line.trim().to_string()))?;
        values.push(value);
    }
    Ok(values)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogMetrics {
    pub word_count: usize,
    /// Within 20% of the requested word count.
    pub word_count_match: bool,
    pub has_introduction: bool,
    pub has_conclusion: bool,
    /// Occurrences of topic words per word of post.
    pub topic_relevance: f64,
    /// Heading count normalized against an expected five, capped at 1.0.
    pub structure_score: f64,
}

pub fn evaluate_blog_post(post: &str, topic: &str, target_word_count: usize) -> BlogMetrics {
    let word_count = post.split_whitespace().count();

    let word_count_match = target_word_count > 0
        && (word_count as f64 - target_word_count as f64).abs() / target_word_count as f64 <= 0.2;

    let lowered = post.to_lowercase();
    let topic_relevance = if word_count == 0 {
        0.0
    } else {
        topic
            .split_whitespace()
            .map(|word| lowered.matches(&word.to_lowercase()).count())
            .sum::<usize>() as f64
            / word_count as f64
    };

    let heading_count = post
        .lines()
        .filter(|line| line.trim_start().starts_with('#'))
        .count();
    let structure_score = (heading_count as f64 / 5.0).min(1.0);

    BlogMetrics {
        word_count,
        word_count_match,
        has_introduction: post.contains("Introduction"),
        has_conclusion: post.contains("Conclusion"),
        topic_relevance,
        structure_score,
    }
}

/// Find which of the declared choices a routing response names.
///
/// A quoted occurrence (`'label'` or `"label"`) wins; a bare whole-word
/// occurrence is accepted as a fallback. No match is a [`ParseError`], never
/// a silent miss.
pub fn extract_label(response: &str, choices: &[String]) -> Result<String, ParseError> {
    for choice in choices {
        if response.contains(&format!("'{choice}'")) || response.contains(&format!("\"{choice}\""))
        {
            return Ok(choice.clone());
        }
    }
    for choice in choices {
        let word = Regex::new(&format!(r"\b{}\b", regex::escape(choice))).unwrap();
        if word.is_match(response) {
            return Ok(choice.clone());
        }
    }
    Err(ParseError::NoLabel(response.to_string()))
}

/// A labeled routing test case.
#[derive(Debug, Clone)]
pub struct RouterCase {
    pub input: String,
    pub expected: String,
}

impl RouterCase {
    pub fn new(input: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected: expected.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Misclassification {
    pub input: String,
    pub expected: String,
    pub predicted: Option<String>,
    pub response: String,
}

#[derive(Debug, Clone)]
pub struct RouterReport {
    pub accuracy: f64,
    pub misclassifications: Vec<Misclassification>,
}

/// Run every case through the router and tally accuracy. A response naming
/// no known label counts as a misclassification with `predicted: None`.
pub async fn evaluate_router(
    router: &Router,
    cases: &[RouterCase],
) -> Result<RouterReport, ProviderError> {
    let mut correct = 0;
    let mut misclassifications = Vec::new();

    for case in cases {
        let response = router.route(&case.input).await?;
        let predicted = extract_label(&response, router.choices()).ok();

        if predicted.as_deref() == Some(case.expected.as_str()) {
            correct += 1;
        } else {
            misclassifications.push(Misclassification {
                input: case.input.clone(),
                expected: case.expected.clone(),
                predicted,
                response,
            });
        }
    }

    let accuracy = if cases.is_empty() {
        0.0
    } else {
        correct as f64 / cases.len() as f64
    };

    Ok(RouterReport {
        accuracy,
        misclassifications,
    })
}
