//! Hashtag derivation from a category and extracted keywords.

use crate::models::ArticleContent;

/// Keywords shorter than this (in characters, as extracted) are dropped.
///
/// Two-letter acronyms such as "AI" or "EU" survive; single letters do not.
const MIN_KEYWORD_CHARS: usize = 2;

/// Generates hashtag lists for finished articles.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashtagGenerator;

impl HashtagGenerator {
    /// Build at most `max_hashtags` tags, `#<category>` first.
    ///
    /// Keyword tags follow in the extractor's order: whitespace removed,
    /// lowercased, prefixed with `#`. Keywords that are too short are skipped
    /// without using up a slot. A keyword matching the category still gets
    /// its own tag.
    pub fn generate(
        category: &str,
        content: Option<&ArticleContent>,
        max_hashtags: usize,
    ) -> Vec<String> {
        let mut hashtags = vec![format!("#{category}")];

        if let Some(content) = content {
            for keyword in &content.keywords {
                if hashtags.len() >= max_hashtags {
                    break;
                }
                if keyword.chars().count() < MIN_KEYWORD_CHARS {
                    continue;
                }
                let tag: String = keyword
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .flat_map(char::to_lowercase)
                    .collect();
                hashtags.push(format!("#{tag}"));
            }
        }

        hashtags.truncate(max_hashtags);
        hashtags
    }
}
