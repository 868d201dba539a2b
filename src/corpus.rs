//! Plain-text book parsing: header metadata, body banners, paragraph
//! segmentation.
//!
//! Project Gutenberg texts carry `Title:` and `Author:` header lines followed
//! by a body demarcated by START/END banner lines. The banner spelling drifted
//! over the years, so three variants are tried in priority order. The body is
//! segmented into paragraphs at blank-line separators.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::error::{ParseError, ParseResult};

/// Sentinel author for files with no `Author:` header line.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// One parsed book: header metadata plus body paragraphs in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub paragraphs: Vec<String>,
}

/// Banner spellings as (prefix, suffix) around the embedded title, ordered by
/// priority. The first variant that matches wins.
const START_BANNERS: [(&str, &str); 3] = [
    ("*** START OF THIS PROJECT GUTENBERG EBOOK ", " ***"),
    ("*** START OF THE PROJECT GUTENBERG EBOOK ", " ***"),
    ("***START OF THE PROJECT GUTENBERG EBOOK ", "***"),
];

const END_BANNERS: [(&str, &str); 3] = [
    ("*** END OF THIS PROJECT GUTENBERG EBOOK ", " ***"),
    ("*** END OF THE PROJECT GUTENBERG EBOOK ", " ***"),
    ("***END OF THE PROJECT GUTENBERG EBOOK ", "***"),
];

/// Parse one corpus file into a [`Book`].
pub fn parse_book_file(path: &Path) -> ParseResult<Book> {
    let data = std::fs::read(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let text = String::from_utf8_lossy(&data);
    parse_book(&text, &path.display().to_string())
}

/// Parse book text into a [`Book`]. `origin` names the source in errors.
pub fn parse_book(text: &str, origin: &str) -> ParseResult<Book> {
    let (title, author) = scan_header(text);
    info!("reading book \"{title}\" by {author}");

    // Body starts immediately after the matched start banner. Advancing by
    // the matched banner's own length keeps the offset exact across variants.
    let (start, start_len) =
        find_banner(text, &START_BANNERS, &title).ok_or_else(|| ParseError::MarkersNotFound {
            path: origin.to_string(),
        })?;
    let body_start = start + start_len;

    // The end banner is searched after the body start; it is excluded from
    // the body.
    let tail = &text[body_start..];
    let (end_rel, _) =
        find_banner(tail, &END_BANNERS, &title).ok_or_else(|| ParseError::MarkersNotFound {
            path: origin.to_string(),
        })?;

    let body = &tail[..end_rel];
    let paragraphs = segment_paragraphs(body);
    info!("parsed {} paragraphs", paragraphs.len());

    Ok(Book {
        title,
        author,
        paragraphs,
    })
}

/// Scan header lines for `Title:` and `Author:` markers, stopping at the
/// first author match so only the header region is inspected.
fn scan_header(text: &str) -> (String, String) {
    let mut title = String::new();
    let mut author = None;

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("Title:") {
            title = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("Author:") {
            author = Some(rest.trim().to_string());
            break;
        }
    }

    (
        title,
        author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
    )
}

/// Find the first matching banner variant for `title`.
///
/// Returns the byte offset of the match and the matched banner's length.
fn find_banner(text: &str, variants: &[(&str, &str)], title: &str) -> Option<(usize, usize)> {
    for (prefix, suffix) in variants {
        let banner = format!("{prefix}{title}{suffix}");
        if let Some(pos) = find_ascii_ci(text, &banner) {
            return Some((pos, banner.len()));
        }
    }
    None
}

/// Case-insensitive (ASCII) substring search returning a byte offset.
///
/// Byte-wise comparison keeps offsets exact even when the title carries
/// non-ASCII characters, which compare verbatim.
fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    h.windows(n.len()).position(|w| w.eq_ignore_ascii_case(n))
}

/// Separator between paragraphs: a run of whitespace containing at least one
/// blank line. Greedy, so consecutive blank lines collapse into one separator.
fn paragraph_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("static regex"))
}

/// Segment a body into paragraphs at blank-line separators.
///
/// Paragraphs are trimmed; empty ones (leading/trailing separator runs)
/// are dropped. Ordering is preserved.
fn segment_paragraphs(body: &str) -> Vec<String> {
    paragraph_separator()
        .split(body)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
