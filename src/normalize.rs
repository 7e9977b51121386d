use std::sync::LazyLock;

use regex::Regex;

static HASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#{3,}").unwrap());
static LEADING_HASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*#+\s*").unwrap());
static STAR_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*{3,}").unwrap());
static UNDERSCORE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{3,}").unwrap());
static NEWLINE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {3,}").unwrap());

/// Characters that survive normalization: ASCII alphanumerics, `_`,
/// whitespace, and the punctuation the math renderer understands.
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c.is_whitespace()
        || matches!(
            c,
            '.' | ','
                | '!'
                | '?'
                | '('
                | ')'
                | '+'
                | '-'
                | '*'
                | '/'
                | '='
                | '^'
                | '{'
                | '}'
                | '['
                | ']'
                | '$'
                | '\\'
                | ':'
                | ';'
                | '\''
                | '"'
                | '<'
                | '>'
        )
}

fn bound_runs(text: &str) -> String {
    let text = STAR_RUNS.replace_all(text, "**");
    let text = UNDERSCORE_RUNS.replace_all(&text, "__");
    let text = NEWLINE_RUNS.replace_all(&text, "\n\n");
    SPACE_RUNS.replace_all(&text, "  ").into_owned()
}

/// Bounds model-output noise before any markup is applied. Total: never
/// fails, empty input yields empty output.
pub fn normalize(text: &str) -> String {
    // Cap hash runs, then strip heading markers from line starts entirely.
    let text = HASH_RUNS.replace_all(text, "###");
    let text = LEADING_HASHES.replace_all(&text, "");

    let text = bound_runs(&text);

    let filtered: String = text.chars().filter(|c| is_allowed(*c)).collect();

    // Deleting characters can merge two bounded runs into one over-long run
    // ("**@*" -> "***"); bound again so no 3+ run survives.
    bound_runs(&filtered).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_whitespace_only() {
        assert_eq!(normalize("   \n\n  \t "), "");
    }

    #[test]
    fn test_heading_markers_stripped() {
        assert_eq!(normalize("### Step 1"), "Step 1");
        assert_eq!(normalize("a\n## b"), "a\nb");
    }

    #[test]
    fn test_hash_runs_removed_entirely() {
        // Mid-text hashes are first capped at 3, then dropped by the
        // character filter.
        assert_eq!(normalize("a ###### b"), "a  b");
    }

    #[test]
    fn test_star_runs_capped() {
        assert_eq!(normalize("a ***** b"), "a ** b");
        assert_eq!(normalize("x *** y"), "x ** y");
    }

    #[test]
    fn test_underscore_runs_capped() {
        assert_eq!(normalize("a _____ b"), "a __ b");
    }

    #[test]
    fn test_blank_lines_capped() {
        assert_eq!(normalize("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_space_runs_capped() {
        assert_eq!(normalize("a     b"), "a  b");
    }

    #[test]
    fn test_disallowed_characters_dropped() {
        assert_eq!(normalize("2 + 2 = 4 @~`|%&"), "2 + 2 = 4");
        assert_eq!(normalize("π ≈ 3.14159"), "3.14159");
    }

    #[test]
    fn test_math_characters_kept() {
        let text = r"$\frac{a}{b} = c^2$ and [x, y]";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_deletion_cannot_rebuild_runs() {
        // The dropped '@' would otherwise merge "**" and "*" into "***".
        assert_eq!(normalize("**@*"), "**");
        assert_eq!(normalize("a\n@\nb\n@\nc"), "a\n\nb\n\nc");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "#### Solution ####\n\n\n\nThe  answer   is **42**.",
            "**@*",
            "a\n@\nb\n@\nc",
            "$$x\n+\ny$$ mixed with *stars* and _under_",
            "   leading and trailing   ",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_no_long_runs_survive() {
        let noisy = "x #####***______\n\n\n\n\n      y @@@@ **@* z";
        let cleaned = normalize(noisy);
        assert!(!cleaned.contains("###"));
        assert!(!cleaned.contains("***"));
        assert!(!cleaned.contains("___"));
        assert!(!cleaned.contains("\n\n\n"));
        assert!(!cleaned.contains("   "));
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(normalize("  x  "), "x");
    }
}
