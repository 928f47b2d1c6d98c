//! Web-page text extraction.
//!
//! The pipeline only consumes an ordered sequence of text blocks; how
//! they were pulled out of the markup is this module's business alone.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::types::PipelineError;

/// Extracts ordered text blocks from a URL.
#[async_trait]
pub trait PageParser: Send + Sync {
    async fn extract_text_blocks(&self, url: &Url) -> Result<Vec<String>, PipelineError>;
}

/// CSS-selector based parser for marketing-style pages.
///
/// Rich-copy sections are grouped into blocks around their `h3`
/// headings, list items are rendered as `" - item"` lines, and FAQ
/// accordions become `"Q: …\nA: …"` blocks. Pages without either
/// structure fall back to plain paragraph extraction so arbitrary
/// documents still ingest.
pub struct ScraperPageParser {
    client: reqwest::Client,
    rich_copy: Selector,
    list_item: Selector,
    faq_section: Selector,
    faq_question: Selector,
    faq_answer: Selector,
    paragraph: Selector,
}

impl ScraperPageParser {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            rich_copy: Selector::parse("section.rich-copy").expect("static selector"),
            list_item: Selector::parse("li").expect("static selector"),
            faq_section: Selector::parse("article.accordion-container").expect("static selector"),
            faq_question: Selector::parse("h2.accordion-toggle").expect("static selector"),
            faq_answer: Selector::parse("div.accordion-content").expect("static selector"),
            paragraph: Selector::parse("p").expect("static selector"),
        }
    }

    /// Splits already-fetched markup into text blocks. Separated from
    /// the fetch so fixtures can exercise the grouping rules directly.
    pub fn parse_blocks(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut blocks = Vec::new();

        for section in document.select(&self.rich_copy) {
            self.parse_rich_copy_section(section, &mut blocks);
        }

        for faq in document.select(&self.faq_section) {
            let question = faq.select(&self.faq_question).next().map(element_text);
            let answer = faq.select(&self.faq_answer).next().map(element_text);
            if let (Some(question), Some(answer)) = (question, answer) {
                blocks.push(format!("Q: {question}\nA: {answer}"));
            }
        }

        if blocks.is_empty() {
            for paragraph in document.select(&self.paragraph) {
                let text = element_text(paragraph);
                if !text.is_empty() {
                    blocks.push(text);
                }
            }
        }

        blocks
    }

    fn parse_rich_copy_section(&self, section: ElementRef<'_>, blocks: &mut Vec<String>) {
        let mut current = String::new();
        let mut previous_was_heading = false;

        for child in section.children() {
            let Some(element) = ElementRef::wrap(child) else {
                continue;
            };
            match element.value().name() {
                "h3" => {
                    flush_block(&mut current, blocks);
                    current.push_str(&element_text(element));
                    current.push('\n');
                    previous_was_heading = true;
                }
                "p" => {
                    current.push_str(&element_text(element));
                    current.push('\n');
                    previous_was_heading = false;
                }
                "ul" | "ol" => {
                    for item in element.select(&self.list_item) {
                        current.push_str(" - ");
                        current.push_str(&element_text(item));
                        current.push('\n');
                    }
                    previous_was_heading = false;
                }
                _ => {
                    // A stray element directly after a heading stays with
                    // it; otherwise it opens a fresh block.
                    if !previous_was_heading {
                        flush_block(&mut current, blocks);
                        current.push_str(&element_text(element));
                        current.push('\n');
                    }
                }
            }
        }

        flush_block(&mut current, blocks);
    }
}

#[async_trait]
impl PageParser for ScraperPageParser {
    async fn extract_text_blocks(&self, url: &Url) -> Result<Vec<String>, PipelineError> {
        let html = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let blocks = self.parse_blocks(&html);
        debug!(%url, blocks = blocks.len(), bytes = html.len(), "extracted text blocks");
        Ok(blocks)
    }
}

fn flush_block(current: &mut String, blocks: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        blocks.push(trimmed.to_string());
    }
    current.clear();
}

/// Whitespace-normalized text content of an element.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ScraperPageParser {
        ScraperPageParser::new(reqwest::Client::new())
    }

    #[test]
    fn rich_copy_sections_group_around_headings() {
        let html = r#"
        <html><body>
          <section class="rich-copy">
            <h3>Savings</h3>
            <p>Open an account in minutes.</p>
            <ul><li>No fees</li><li>High rates</li></ul>
            <h3>Loans</h3>
            <p>Flexible terms for everyone.</p>
          </section>
        </body></html>"#;

        let blocks = parser().parse_blocks(html);
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            "Savings\nOpen an account in minutes.\n - No fees\n - High rates"
        );
        assert_eq!(blocks[1], "Loans\nFlexible terms for everyone.");
    }

    #[test]
    fn faq_accordions_become_question_answer_blocks() {
        let html = r#"
        <html><body>
          <section class="rich-copy"><p>Intro paragraph.</p></section>
          <article class="accordion-container">
            <h2 class="accordion-toggle">How do I apply?</h2>
            <div class="accordion-content">Fill in the online form.</div>
          </article>
        </body></html>"#;

        let blocks = parser().parse_blocks(html);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "Intro paragraph.");
        assert_eq!(blocks[1], "Q: How do I apply?\nA: Fill in the online form.");
    }

    #[test]
    fn pages_without_known_structure_fall_back_to_paragraphs() {
        let html = r#"
        <html><body>
          <div><p>First paragraph.</p><p>Second paragraph.</p><p>  </p></div>
        </body></html>"#;

        let blocks = parser().parse_blocks(html);
        assert_eq!(blocks, vec!["First paragraph.", "Second paragraph."]);
    }

    #[test]
    fn unheaded_elements_open_their_own_blocks() {
        let html = r#"
        <html><body>
          <section class="rich-copy">
            <p>Lead-in text.</p>
            <div>Standalone callout.</div>
          </section>
        </body></html>"#;

        let blocks = parser().parse_blocks(html);
        assert_eq!(blocks, vec!["Lead-in text.", "Standalone callout."]);
    }

    #[test]
    fn empty_documents_yield_no_blocks() {
        assert!(parser().parse_blocks("<html><body></body></html>").is_empty());
    }
}
