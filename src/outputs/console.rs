//! Plain-text rendering for the terminal.

use crate::models::NewsArticle;
use itertools::Itertools;
use std::fmt::Write;

/// Render articles as a numbered list with summary, source and hashtags.
pub fn render(articles: &[NewsArticle]) -> String {
    let mut out = String::new();
    for (i, article) in articles.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}. {}", i + 1, article.title);
        let _ = writeln!(out, "   Summary: {}", article.summary);
        let _ = writeln!(out, "   Source: {}", article.source);
        let _ = writeln!(out, "   Hashtags: {}", article.hashtags.iter().join(" "));
        let _ = writeln!(out, "   {}", article.url);
        out.push('\n');
    }
    out
}
