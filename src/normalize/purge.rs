//! Dead-rule purging against a rendered document.
//!
//! A style rule survives when at least one selector in its list can match
//! something in the HTML: every type, class, and id token of the selector
//! must appear in the document (or in the safelist). Selectors carrying no
//! such token (`*`, `:root`) always survive. Pseudo-class arguments and
//! attribute selectors are treated as opaque.

use anyhow::{Result, anyhow};
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;
use rustc_hash::FxHashSet;

use crate::config::PurgeConfig;

/// Tags, classes, and ids present in one rendered document.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    tags: FxHashSet<String>,
    classes: FxHashSet<String>,
    ids: FxHashSet<String>,
}

impl DocumentIndex {
    /// Index every element of the document. Unparseable HTML yields an
    /// empty index, which purges everything except token-free selectors.
    pub fn from_html(html: &str) -> Self {
        let mut index = Self::default();

        let Ok(dom) = tl::parse(html, tl::ParserOptions::default()) else {
            return index;
        };

        for node in dom.nodes() {
            let Some(tag) = node.as_tag() else { continue };
            index.tags.insert(tag.name().as_utf8_str().to_lowercase());

            for (key, value) in tag.attributes().iter() {
                let Some(value) = value else { continue };
                let key: &str = key.as_ref();
                match key {
                    "id" => {
                        index.ids.insert(value.to_string());
                    }
                    "class" => {
                        for class in value.split_ascii_whitespace() {
                            index.classes.insert(class.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }

        index
    }

    /// Whether one complex selector can match anything in the document.
    fn selector_survives(&self, selector: &str, safelist: &FxHashSet<String>) -> bool {
        let tokens = tokenize_selector(selector);
        if tokens.is_empty() {
            return true;
        }
        tokens.iter().all(|token| match token {
            SelectorToken::Tag(name) => safelist.contains(name) || self.tags.contains(name),
            SelectorToken::Class(name) => safelist.contains(name) || self.classes.contains(name),
            SelectorToken::Id(name) => safelist.contains(name) || self.ids.contains(name),
        })
    }
}

/// Remove rules whose selectors match nothing in the document.
pub fn purge_css(css: &str, index: &DocumentIndex, config: &PurgeConfig) -> Result<String> {
    let mut stylesheet =
        StyleSheet::parse(css, ParserOptions::default()).map_err(|err| anyhow!("{err}"))?;

    let safelist: FxHashSet<String> = config.safelist.iter().cloned().collect();
    retain_live_rules(&mut stylesheet.rules, index, &safelist);

    let result = stylesheet
        .to_css(PrinterOptions::default())
        .map_err(|err| anyhow!("{err}"))?;
    Ok(result.code)
}

fn retain_live_rules(rules: &mut CssRuleList, index: &DocumentIndex, safelist: &FxHashSet<String>) {
    rules.0.retain_mut(|rule| match rule {
        CssRule::Style(style) => {
            // Unprintable selectors are kept rather than silently dropped.
            let Ok(printed) = style.selectors.to_css_string(PrinterOptions::default()) else {
                return true;
            };
            split_selector_list(&printed)
                .iter()
                .any(|selector| index.selector_survives(selector, safelist))
        }
        CssRule::Media(media) => {
            retain_live_rules(&mut media.rules, index, safelist);
            !media.rules.0.is_empty()
        }
        CssRule::Supports(supports) => {
            retain_live_rules(&mut supports.rules, index, safelist);
            !supports.rules.0.is_empty()
        }
        _ => true,
    });
}

// =============================================================================
// Selector tokenization
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
enum SelectorToken {
    Tag(String),
    Class(String),
    Id(String),
}

/// Split a printed selector list on top-level commas.
fn split_selector_list(list: &str) -> Vec<&str> {
    let mut selectors = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (offset, ch) in list.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                selectors.push(list[start..offset].trim());
                start = offset + 1;
            }
            _ => {}
        }
    }
    selectors.push(list[start..].trim());
    selectors
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii()
}

/// Extract the type/class/id tokens of one complex selector.
fn tokenize_selector(selector: &str) -> Vec<SelectorToken> {
    let chars: Vec<char> = selector.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '.' => {
                i += 1;
                let ident = read_ident(&chars, &mut i);
                if !ident.is_empty() {
                    tokens.push(SelectorToken::Class(ident));
                }
            }
            '#' => {
                i += 1;
                let ident = read_ident(&chars, &mut i);
                if !ident.is_empty() {
                    tokens.push(SelectorToken::Id(ident));
                }
            }
            '[' => skip_until(&chars, &mut i, ']'),
            ':' => {
                while i < chars.len() && chars[i] == ':' {
                    i += 1;
                }
                read_ident(&chars, &mut i);
                if i < chars.len() && chars[i] == '(' {
                    skip_balanced_parens(&chars, &mut i);
                }
            }
            ch if is_ident_char(ch) => {
                let ident = read_ident(&chars, &mut i);
                tokens.push(SelectorToken::Tag(ident.to_lowercase()));
            }
            _ => i += 1,
        }
    }

    tokens
}

fn read_ident(chars: &[char], i: &mut usize) -> String {
    let mut ident = String::new();
    while *i < chars.len() && is_ident_char(chars[*i]) {
        ident.push(chars[*i]);
        *i += 1;
    }
    ident
}

fn skip_until(chars: &[char], i: &mut usize, end: char) {
    while *i < chars.len() && chars[*i] != end {
        *i += 1;
    }
    *i += 1;
}

fn skip_balanced_parens(chars: &[char], i: &mut usize) {
    let mut depth = 0usize;
    while *i < chars.len() {
        match chars[*i] {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    *i += 1;
                    return;
                }
            }
            _ => {}
        }
        *i += 1;
    }
}
