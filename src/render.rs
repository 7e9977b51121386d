use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::SolvemarkError;
use crate::markup;
use crate::normalize;
use crate::prefs::PrefStore;

static LEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[0-9]+[.)]|[-*•])\s*").unwrap());

/// Full pipeline for one solver field: bound the noise, then mark up.
pub fn fragment(text: &str) -> String {
    markup::to_markup(&normalize::normalize(text))
}

/// One "similar problems" entry: normalized, a single leading enumeration
/// marker stripped, then marked up.
pub fn similar_item(text: &str) -> String {
    let cleaned = normalize::normalize(text);
    let stripped = LEADING_MARKER.replace(&cleaned, "");
    markup::to_markup(stripped.trim())
}

pub fn similar_list(items: &[String]) -> String {
    let rendered: Vec<String> = items
        .iter()
        .map(|item| similar_item(item))
        .filter(|item| !item.is_empty())
        .map(|item| format!("<li>{item}</li>"))
        .collect();

    if rendered.is_empty() {
        String::new()
    } else {
        format!("<ul>{}</ul>", rendered.join(""))
    }
}

/// Boundary failures render as visible blocks, distinguishable from an
/// empty solution. The message passes through the normalizer like any
/// other untrusted text.
pub fn error_block(err: &SolvemarkError) -> String {
    format!("<div class=\"error\">{}</div>", normalize::normalize(&err.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl Theme {
    const PREF_KEY: &'static str = "darkMode";

    pub fn load(store: &mut impl PrefStore) -> Self {
        match store.get(Self::PREF_KEY).as_deref() {
            Some("enabled") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn save(&self, store: &mut impl PrefStore) -> Result<(), SolvemarkError> {
        let value = match self {
            Theme::Dark => "enabled",
            Theme::Light => "disabled",
        };
        store.set(Self::PREF_KEY, value)
    }
}

/// Explicit rendering configuration, passed in rather than read from
/// ambient state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext {
    pub theme: Theme,
}

impl RenderContext {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn container_class(&self) -> &'static str {
        match self.theme {
            Theme::Dark => "solvemark dark-mode",
            Theme::Light => "solvemark",
        }
    }

    pub fn container(&self, inner: &str) -> String {
        format!("<div class=\"{}\">{}</div>", self.container_class(), inner)
    }
}
