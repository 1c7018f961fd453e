//! HTML cleanup and headline extraction from search result pages.

#[cfg(test)]
mod tests;

use scraper::Html;

/// Marker line Google News emits after each story block.
const BLOCK_MARKER: &str = "More";

/// Strip an HTML document down to its visible text, one text node per line.
#[inline]
pub fn clean_html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let text: Vec<&str> = document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect();
    text.join("\n")
}

/// Extract headlines from cleaned news-page text.
///
/// Story blocks are delimited by a bare `More` line; the first line of each
/// block is its headline. A trailing block without a closing marker is kept.
#[inline]
pub fn extract_headlines(cleaned_text: &str) -> String {
    let mut headlines = Vec::new();
    let mut current_block: Vec<&str> = Vec::new();

    for line in cleaned_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line == BLOCK_MARKER {
            if let Some(first) = current_block.first() {
                headlines.push(*first);
            }
            current_block.clear();
        } else {
            current_block.push(line);
        }
    }

    if let Some(first) = current_block.first() {
        headlines.push(*first);
    }

    headlines.join("\n")
}

/// Extract likely post titles from cleaned Reddit search-page text.
///
/// Reddit pages have no block marker, so this keeps lines that look like
/// titles and drops navigation chrome, community names, and vote/comment
/// counters.
#[inline]
pub fn extract_reddit_titles(cleaned_text: &str) -> String {
    const MIN_TITLE_CHARS: usize = 20;

    cleaned_text
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_TITLE_CHARS)
        .filter(|line| !is_reddit_chrome(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_reddit_chrome(line: &str) -> bool {
    let lower = line.to_lowercase();
    line.starts_with("r/")
        || line.starts_with("u/")
        || lower.ends_with("comments")
        || lower.ends_with("upvotes")
        || lower.contains("sort by")
        || lower.contains("search results")
}
