use std::sync::LazyLock;

use regex::Regex;

// Null character delimits quarantine placeholders; it cannot survive
// normalization, so it never collides with solver text.
const PH: char = '\x00';
const BLOCK_PH_MARK: &str = "\u{0}MATH_BLOCK_";

// Delimiters the typesetting engine scans the fragment for.
const BLOCK_OPEN: &str = "<div class=\"math-display\">\\[";
const BLOCK_CLOSE: &str = "\\]</div>";
const INLINE_OPEN: &str = "\\(";
const INLINE_CLOSE: &str = "\\)";

static INNER_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static PARA_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\n+").unwrap());
static LIST_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9*•-]+[.)]\s*").unwrap());
static BULLET_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*•]\s").unwrap());
static ORDERED_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[0-9]+[.)]").unwrap());
static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9]+[.)]\s*").unwrap());
static BULLET_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*•]\s*").unwrap());

/// One lexed segment of solver text. Math is separated from plain text
/// before any markup rewriting, so the rewrites can never corrupt it.
#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    Text(String),
    /// `$$...$$` content: trimmed, internal newline runs collapsed to
    /// single spaces.
    MathBlock(String),
    /// `$...$` content, trimmed. Never contains a newline; the delimiters
    /// are never adjacent to another `$`.
    MathInline(String),
}

/// Splits text into plain-text and math spans. Block math is recognized
/// first so inline lexing never sees a `$$` delimiter; unbalanced
/// delimiters stay literal text.
pub fn lex_math(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = text;

    loop {
        let Some(open) = rest.find("$$") else { break };
        let Some(close) = rest[open + 2..].find("$$").map(|i| open + 2 + i) else {
            break;
        };
        if open > 0 {
            lex_inline(&rest[..open], &mut spans);
        }
        let content = INNER_NEWLINES
            .replace_all(rest[open + 2..close].trim(), " ")
            .into_owned();
        spans.push(Span::MathBlock(content));
        rest = &rest[close + 2..];
    }

    if !rest.is_empty() {
        lex_inline(rest, &mut spans);
    }
    spans
}

fn lex_inline(text: &str, spans: &mut Vec<Span>) {
    let mut start = 0;
    for (open, close) in scan_single_delimited(text, b'$') {
        if open > start {
            spans.push(Span::Text(text[start..open].to_string()));
        }
        spans.push(Span::MathInline(text[open + 1..close].trim().to_string()));
        start = close + 1;
    }
    if start < text.len() {
        spans.push(Span::Text(text[start..].to_string()));
    }
}

/// Byte ranges `(open, close)` of complete single-delimiter matches. The
/// opening delimiter must not be preceded by another, the closing one not
/// followed by another, and the content must be non-empty with no
/// delimiter or newline inside.
fn scan_single_delimited(text: &str, delim: u8) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut matches = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != delim || (i > 0 && bytes[i - 1] == delim) {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < bytes.len() && bytes[j] != delim && bytes[j] != b'\n' {
            j += 1;
        }
        if j > i + 1
            && j < bytes.len()
            && bytes[j] == delim
            && bytes.get(j + 1) != Some(&delim)
        {
            matches.push((i, j));
            i = j + 1;
        } else {
            i += 1;
        }
    }
    matches
}

fn replace_emphasis(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut start = 0;
    for (open, close) in scan_single_delimited(text, b'*') {
        out.push_str(&text[start..open]);
        out.push_str("<em>");
        out.push_str(&text[open + 1..close]);
        out.push_str("</em>");
        start = close + 1;
    }
    out.push_str(&text[start..]);
    out
}

fn list_items(para: &str) -> Vec<String> {
    para.lines()
        .filter_map(|line| {
            let line = line.trim();
            if NUMBERED_ITEM.is_match(line) {
                Some(NUMBERED_ITEM.replace(line, "").into_owned())
            } else if BULLET_START.is_match(line) {
                Some(BULLET_ITEM.replace(line, "").into_owned())
            } else if !line.is_empty() {
                Some(line.to_string())
            } else {
                None
            }
        })
        .map(|item| format!("<li>{item}</li>"))
        .collect()
}

/// Converts normalized solver text into block markup. Total: malformed
/// input degrades to literal text rather than failing.
pub fn to_markup(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = text.replace("\r\n", "\n");

    // Quarantine math behind opaque placeholders; every rewrite below only
    // ever sees the placeholder tokens.
    let mut block_math: Vec<String> = Vec::new();
    let mut inline_math: Vec<String> = Vec::new();
    let mut working = String::with_capacity(text.len());
    for span in lex_math(&text) {
        match span {
            Span::Text(t) => working.push_str(&t),
            Span::MathBlock(content) => {
                let idx = block_math.len();
                working.push_str(&format!("{PH}MATH_BLOCK_{idx}{PH}"));
                block_math.push(format!("{BLOCK_OPEN}{content}{BLOCK_CLOSE}"));
            }
            Span::MathInline(content) => {
                let idx = inline_math.len();
                working.push_str(&format!("{PH}MATH_INLINE_{idx}{PH}"));
                inline_math.push(format!("{INLINE_OPEN}{content}{INLINE_CLOSE}"));
            }
        }
    }

    // Emphasis: ** pairs first, then guarded single stars.
    let working = BOLD.replace_all(&working, "<strong>$1</strong>");
    let working = replace_emphasis(&working);

    // Block segmentation on blank lines.
    let mut out = String::new();
    for candidate in PARA_SPLIT.split(&working) {
        let para = candidate.trim();
        if para.is_empty() {
            continue;
        }
        if para.contains(BLOCK_PH_MARK) {
            // Pre-built math block; must not be wrapped in <p>.
            out.push_str(para);
        } else if LIST_START.is_match(para) || BULLET_START.is_match(para) {
            let items = list_items(para);
            if ORDERED_START.is_match(para) {
                out.push_str(&format!("<ol>{}</ol>", items.join("")));
            } else {
                out.push_str(&format!("<ul>{}</ul>", items.join("")));
            }
        } else {
            out.push_str(&format!("<p>{}</p>", para.replace('\n', "<br>")));
        }
    }

    // Restore quarantined math.
    for (i, block) in block_math.iter().enumerate() {
        out = out.replace(&format!("{PH}MATH_BLOCK_{i}{PH}"), block);
    }
    for (i, inline) in inline_math.iter().enumerate() {
        out = out.replace(&format!("{PH}MATH_INLINE_{i}{PH}"), inline);
    }
    out
}
