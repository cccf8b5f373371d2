//! Evidence bundle rendering for the downstream language model.
//!
//! Pure text construction: results are grouped by source tag in tag order,
//! numbered across the whole bundle, and followed by a fixed instruction
//! block. No filtering happens here.

use rechtsbron_core::{SearchResult, SourceTag};

/// Returned instead of an evidence bundle when nothing was found.
pub const NO_RESULTS_MESSAGE: &str =
    "No relevant information was found in the verified legal sources for this question.";

/// Returned when only outdated evidence was found for a non-historical query.
pub const OUTDATED_NOTICE: &str = "The verified legal sources only returned information from previous years. \
     This information may be outdated and is withheld; no current-year source is available to answer this question.";

/// Fixed instructions appended to every evidence bundle.
pub fn instruction_block(current_year: i32) -> String {
    format!(
        "INSTRUCTIONS\n\
         - The current year is {current_year}.\n\
         - Answer using only the numbered sources above. Do not add facts, amounts or rules that do not appear in them.\n\
         - If the sources do not answer the question, say so instead of guessing.\n\
         - Cite sources by number and link.\n\
         - If a source describes rules, amounts or thresholds from before {current_year}, say that they may have been \
         superseded and do not present them as current."
    )
}

/// Render `results` as a numbered, tag-grouped evidence bundle.
///
/// Returns exactly [`NO_RESULTS_MESSAGE`] for an empty slice.
pub fn format_evidence(results: &[SearchResult], current_year: i32) -> String {
    if results.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let mut out = format!("VERIFIED SOURCES (current year: {current_year})\n");
    let mut number = 0;

    for tag in SourceTag::ALL {
        let group: Vec<&SearchResult> = results.iter().filter(|r| r.source == tag).collect();
        if group.is_empty() {
            continue;
        }

        out.push_str(&format!("\n## {} ({})\n", tag.label(), group.len()));
        for result in group {
            number += 1;
            out.push_str(&render_item(number, result));
        }
    }

    out.push('\n');
    out.push_str(&instruction_block(current_year));
    out
}

fn render_item(number: usize, result: &SearchResult) -> String {
    let years = if result.verdict.extracted_years.is_empty() {
        "none".to_string()
    } else {
        result.verdict.extracted_years.iter().map(i32::to_string).collect::<Vec<_>>().join(", ")
    };
    let title = if result.title.is_empty() { result.display_link.as_str() } else { result.title.as_str() };

    let mut item = format!("{number}. {title}\n   Link: {}\n", result.link);
    if !result.snippet.is_empty() {
        item.push_str(&format!("   Excerpt: {}\n", result.snippet));
    }
    item.push_str(&format!("   Freshness: {}\n   Years mentioned: {years}\n", result.verdict.reason));
    item
}
