//! Minimal CSS-style selector matching for [`crate::MemNode`].
//!
//! Supports compound simple selectors (`tag`, `.class`, `#id`, `[attr]`,
//! `[attr="value"]`) joined by descendant whitespace, and comma-separated
//! selector groups. Whitespace and commas inside `[...]` belong to the
//! attribute test. Anything else fails to parse and matches nothing.

/// One `[name]` or `[name="value"]` test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttrTest {
    pub name: String,
    pub value: Option<String>,
}

/// A compound selector such as `p.title[data-lat]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrTest>,
}

/// A chain of compounds where each step is a descendant of the previous.
pub(crate) type Chain = Vec<Compound>;

/// Parses a selector group list. Returns `None` on any syntax the matcher
/// does not understand.
pub(crate) fn parse(pattern: &str) -> Option<Vec<Chain>> {
    let mut groups = Vec::new();
    for group in split_top_level(pattern, |c| c == ',')? {
        let chain = split_top_level(group, char::is_whitespace)?
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(parse_compound)
            .collect::<Option<Chain>>()?;
        if chain.is_empty() {
            return None;
        }
        groups.push(chain);
    }
    Some(groups)
}

/// Splits `src` at separators that sit outside attribute brackets and
/// quotes. `None` if a bracket or quote is left unbalanced.
fn split_top_level(src: &str, is_sep: impl Fn(char) -> bool) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in src.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' if depth > 0 => quote = Some(c),
                '[' => depth += 1,
                ']' => depth = depth.checked_sub(1)?,
                _ if depth == 0 && is_sep(c) => {
                    parts.push(&src[start..i]);
                    start = i + c.len_utf8();
                }
                _ => {}
            },
        }
    }
    if depth > 0 || quote.is_some() {
        return None;
    }
    parts.push(&src[start..]);
    Some(parts)
}

/// Byte offset of the `]` closing the bracket that opens `src`.
fn closing_bracket(src: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in src.char_indices().skip(1) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                ']' => return Some(i),
                _ => {}
            },
        }
    }
    None
}

fn parse_compound(src: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut rest = src;

    let tag_len = rest
        .find(|c: char| c == '.' || c == '#' || c == '[')
        .unwrap_or(rest.len());
    if tag_len > 0 {
        let tag = &rest[..tag_len];
        if tag != "*" {
            if !is_ident(tag) {
                return None;
            }
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_len..];
    }

    while let Some(first) = rest.chars().next() {
        match first {
            '.' | '#' => {
                let body = &rest[1..];
                let end = body
                    .find(|c: char| c == '.' || c == '#' || c == '[')
                    .unwrap_or(body.len());
                let ident = &body[..end];
                if !is_ident(ident) {
                    return None;
                }
                let ident = ident.to_string();
                if first == '.' {
                    compound.classes.push(ident);
                } else {
                    compound.id = Some(ident);
                }
                rest = &body[end..];
            }
            '[' => {
                let close = closing_bracket(rest)?;
                compound.attrs.push(parse_attr(&rest[1..close])?);
                rest = &rest[close + 1..];
            }
            _ => return None,
        }
    }

    Some(compound)
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

fn parse_attr(body: &str) -> Option<AttrTest> {
    match body.split_once('=') {
        None => {
            let name = body.trim();
            is_ident(name).then(|| AttrTest {
                name: name.to_string(),
                value: None,
            })
        }
        Some((name, value)) => {
            let name = name.trim();
            if !is_ident(name) {
                return None;
            }
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            Some(AttrTest {
                name: name.to_string(),
                value: Some(value.to_string()),
            })
        }
    }
}
