//! Highlight extraction from memory documents.
//!
//! Distills free-form text into a short list of durable highlights. Ordered
//! strategies run one after another and the first non-empty result wins:
//! a heading-scoped pass over summary/takeaway sections, then a bullet-line
//! fallback over the whole document.
//!
//! Extraction is pure: identical input always yields identical output.

use std::collections::HashSet;

use regex::Regex;

/// Configuration for highlight extraction.
///
/// The keyword and prefix tables default to the sets the janitor has always
/// used; deployments with different note-taking conventions replace them
/// wholesale.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Keywords that mark a heading as a summary/takeaway section.
    pub heading_keywords: Vec<String>,
    /// Line prefixes recognized by the bullet fallback.
    pub bullet_prefixes: Vec<String>,
    /// Maximum highlights taken from a heading-scoped block.
    pub heading_cap: usize,
    /// Maximum highlights taken from the bullet fallback.
    pub bullet_cap: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            heading_keywords: ["精华", "要点", "总结", "回顾", "反思", "结论", "行动", "改进", "学到"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            bullet_prefixes: ["- ", "* ", "• ", "1. ", "2. ", "3. "]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            heading_cap: 30,
            bullet_cap: 20,
        }
    }
}

/// A single extraction strategy.
///
/// An empty result means "nothing found, try the next strategy".
pub trait ExtractionStrategy: Send + Sync {
    fn extract(&self, text: &str) -> Vec<String>;
}

/// Normalization shared by all strategies: strip bullet/number prefixes,
/// trim, drop near-empty lines, dedup preserving first-seen order.
#[derive(Debug, Clone)]
pub struct Cleanup {
    bullet_prefix: Regex,
    number_prefix: Regex,
}

impl Cleanup {
    pub fn new() -> Self {
        Self {
            bullet_prefix: Regex::new(r"^[-*•]\s+").expect("valid regex"),
            number_prefix: Regex::new(r"^\d+\.\s+").expect("valid regex"),
        }
    }

    /// Normalize and deduplicate raw candidate lines.
    pub fn apply(&self, items: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for item in items {
            let trimmed = item.trim();
            if trimmed.is_empty() {
                continue;
            }
            let stripped = self.bullet_prefix.replace(trimmed, "");
            let stripped = self.number_prefix.replace(&stripped, "").into_owned();

            if stripped.chars().count() < 2 {
                continue;
            }
            if !seen.insert(stripped.clone()) {
                continue;
            }
            out.push(stripped);
        }

        out
    }
}

impl Default for Cleanup {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a markdown heading: 1-6 leading `#`, whitespace, non-empty title.
///
/// Returns the nesting level and the trimmed title.
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let title = rest.trim();
    if title.is_empty() {
        return None;
    }
    Some((hashes, title))
}

/// Collects the block under the first summary-keyword heading, stopping at
/// the next heading of equal-or-shallower level.
struct HeadingScoped {
    keywords: Vec<String>,
    cap: usize,
    cleanup: Cleanup,
}

impl ExtractionStrategy for HeadingScoped {
    fn extract(&self, text: &str) -> Vec<String> {
        let lines: Vec<&str> = text.lines().collect();

        for (i, line) in lines.iter().enumerate() {
            let Some((level, title)) = parse_heading(line) else {
                continue;
            };
            if !self.keywords.iter().any(|kw| title.contains(kw.as_str())) {
                continue;
            }

            let mut collected = Vec::new();
            for next in &lines[i + 1..] {
                if let Some((next_level, _)) = parse_heading(next) {
                    if next_level <= level {
                        break;
                    }
                }
                let s = next.trim();
                if s.is_empty() {
                    continue;
                }
                collected.push(s.to_string());
            }

            let mut cleaned = self.cleanup.apply(collected);
            if !cleaned.is_empty() {
                cleaned.truncate(self.cap);
                return cleaned;
            }
            // Empty section: keep scanning for a later matching heading.
        }

        Vec::new()
    }
}

/// Collects bullet-prefixed lines from the whole document.
struct BulletLines {
    prefixes: Vec<String>,
    cap: usize,
    cleanup: Cleanup,
}

impl ExtractionStrategy for BulletLines {
    fn extract(&self, text: &str) -> Vec<String> {
        let mut bullets = Vec::new();
        for line in text.lines() {
            let s = line.trim();
            if s.is_empty() {
                continue;
            }
            if self.prefixes.iter().any(|p| s.starts_with(p.as_str())) {
                bullets.push(s.to_string());
            }
        }

        let mut cleaned = self.cleanup.apply(bullets);
        cleaned.truncate(self.cap);
        cleaned
    }
}

/// Heuristic highlight extractor over an ordered strategy list.
pub struct HighlightExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl HighlightExtractor {
    /// Build the default strategy chain from a configuration.
    pub fn new(config: ExtractConfig) -> Self {
        let cleanup = Cleanup::new();
        Self {
            strategies: vec![
                Box::new(HeadingScoped {
                    keywords: config.heading_keywords,
                    cap: config.heading_cap,
                    cleanup: cleanup.clone(),
                }),
                Box::new(BulletLines {
                    prefixes: config.bullet_prefixes,
                    cap: config.bullet_cap,
                    cleanup,
                }),
            ],
        }
    }

    /// Extract highlights from a document's text.
    pub fn extract(&self, text: &str) -> Vec<String> {
        for strategy in &self.strategies {
            let result = strategy.extract(text);
            if !result.is_empty() {
                return result;
            }
        }
        Vec::new()
    }
}

impl Default for HighlightExtractor {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> HighlightExtractor {
        HighlightExtractor::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Heading-scoped extraction
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_heading_scoped_stops_at_sibling_heading() {
        let text = "\
# 日志

## 总结
学会了生命周期标注
借用检查器的报错要从所有权角度读
测试要覆盖边界日期

## 其他
这里的内容无关紧要
";
        let highlights = extractor().extract(text);
        assert_eq!(
            highlights,
            vec![
                "学会了生命周期标注",
                "借用检查器的报错要从所有权角度读",
                "测试要覆盖边界日期",
            ]
        );
    }

    #[test]
    fn test_heading_scoped_runs_to_end_of_text() {
        let text = "## 要点\nfirst takeaway\nsecond takeaway";
        let highlights = extractor().extract(text);
        assert_eq!(highlights, vec!["first takeaway", "second takeaway"]);
    }

    #[test]
    fn test_deeper_heading_does_not_end_the_block() {
        let text = "## 总结\nkept line\n### 细节\nalso kept\n## 其他\ndropped";
        let highlights = extractor().extract(text);
        assert_eq!(highlights, vec!["kept line", "### 细节", "also kept"]);
    }

    #[test]
    fn test_empty_summary_section_falls_through_to_next_match() {
        let text = "## 总结\n\n## 反思\nthe real content\n";
        let highlights = extractor().extract(text);
        assert_eq!(highlights, vec!["the real content"]);
    }

    #[test]
    fn test_heading_results_capped_at_thirty() {
        let mut text = String::from("## 总结\n");
        for i in 0..40 {
            text.push_str(&format!("takeaway number {i}\n"));
        }
        let highlights = extractor().extract(&text);
        assert_eq!(highlights.len(), 30);
        assert_eq!(highlights[0], "takeaway number 0");
    }

    #[test]
    fn test_non_keyword_heading_is_ignored() {
        let text = "## Agenda\n- not a takeaway\n";
        // No summary heading: bullet fallback picks the line up instead.
        let highlights = extractor().extract(text);
        assert_eq!(highlights, vec!["not a takeaway"]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bullet fallback
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_bullet_fallback_collects_all_variants() {
        let text = "\
prose that is ignored
- dash bullet
* star bullet
• dot bullet
1. first numbered
2. second numbered
";
        let highlights = extractor().extract(text);
        assert_eq!(
            highlights,
            vec![
                "dash bullet",
                "star bullet",
                "dot bullet",
                "first numbered",
                "second numbered",
            ]
        );
    }

    #[test]
    fn test_bullet_fallback_capped_at_twenty() {
        let mut text = String::new();
        for i in 0..25 {
            text.push_str(&format!("- bullet {i}\n"));
        }
        let highlights = extractor().extract(&text);
        assert_eq!(highlights.len(), 20);
    }

    #[test]
    fn test_no_extractable_content_yields_empty() {
        assert!(extractor().extract("just prose\nmore prose\n").is_empty());
        assert!(extractor().extract("").is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cleanup
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_cleanup_strips_prefixes_and_dedups() {
        let cleanup = Cleanup::new();
        let cleaned = cleanup.apply(vec![
            "- duplicated".to_string(),
            "* duplicated".to_string(),
            "12. numbered entry".to_string(),
            "  padded  ".to_string(),
            "x".to_string(),
        ]);
        assert_eq!(cleaned, vec!["duplicated", "numbered entry", "padded"]);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "## 总结\n- a\n- b\n";
        let first = extractor().extract(text);
        let second = extractor().extract(text);
        assert_eq!(first, second);
    }
}
