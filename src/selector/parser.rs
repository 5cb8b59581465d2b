//! Selector string and declarator parsing.
//!
//! Grammar of one selector alternative:
//!
//! ```text
//! selector := node ( [ '>' ] node )*
//! node     := [ '>' ] ( type [ class-chain ] [ '#' id ] | class-chain [ '#' id ] | '#' id )
//! class-chain := ( '.' name )+
//! ```
//!
//! Parts of one node must be adjacent; whitespace starts a new node. Names are
//! lower-cased. Alternatives are separated by `,` and share one declarator.

use crate::cascade::PropertyMap;
use crate::error::{Result, ThemeError};
use crate::selector::chain::{Selector, MAX_SELECTOR_LEN};
use crate::selector::node::{Relationship, SelectorNode};
use crate::selector::tokenizer::{tokenize, Spanned, Token};

/// How the outermost node's relationship is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Rule declarations: the first node never constrains what is above it.
    Rule,
    /// Query paths: relationships are kept exactly as written.
    Query,
}

/// Parse a rule selector string into one [`Selector`] per comma-separated
/// alternative.
///
/// The first node of each alternative is always [`Relationship::Descendant`],
/// even if it was written with a leading `>`.
pub fn parse_selectors(input: &str) -> Result<Vec<Selector>> {
    parse_with(input, Mode::Rule)
}

/// Parse a single query path, keeping a leading `>` on the first node.
///
/// This is the inverse of [`Selector`]'s `Display` form.
pub fn parse_query(input: &str) -> Result<Selector> {
    let mut selectors = parse_with(input, Mode::Query)?;
    if selectors.len() != 1 {
        return Err(ThemeError::parse(input, "query path cannot contain ','"));
    }
    Ok(selectors.remove(0))
}

fn parse_with(input: &str, mode: Mode) -> Result<Vec<Selector>> {
    let tokens = tokenize(input).map_err(|at| {
        let ch = input[at..].chars().next().unwrap_or_default();
        ThemeError::parse(input, format!("unexpected character '{ch}' at byte {at}"))
    })?;

    tokens
        .split(|t| t.token == Token::Comma)
        .map(|group| parse_alternative(input, group, mode))
        .collect()
}

fn parse_alternative(input: &str, tokens: &[Spanned<'_>], mode: Mode) -> Result<Selector> {
    if tokens.is_empty() {
        return Err(ThemeError::parse(input, "empty selector alternative"));
    }

    let mut selector = Selector::new();
    let mut relationship = Relationship::Descendant;
    let mut cursor = 0;

    while cursor < tokens.len() {
        if tokens[cursor].token == Token::GreaterThan {
            if relationship == Relationship::Child {
                return Err(ThemeError::parse(input, "repeated '>'"));
            }
            relationship = Relationship::Child;
            cursor += 1;
            continue;
        }

        let (node, next) = parse_node(input, tokens, cursor, relationship)?;
        selector.push(node);
        relationship = Relationship::Descendant;
        cursor = next;
    }

    if relationship == Relationship::Child {
        return Err(ThemeError::parse(input, "dangling '>' at end of selector"));
    }

    if selector.len() > MAX_SELECTOR_LEN {
        let start = tokens[0].span.start;
        let end = tokens[tokens.len() - 1].span.end;
        return Err(ThemeError::SelectorTooDeep {
            selector: input[start..end].to_owned(),
            len: selector.len(),
        });
    }

    if mode == Mode::Rule {
        if let Some(first) = selector.first_mut() {
            *first = first.clone().with_relationship(Relationship::Descendant);
        }
    }

    Ok(selector)
}

/// Parse one node starting at `start`. Returns the node and the index of the
/// first token after it.
fn parse_node(
    input: &str,
    tokens: &[Spanned<'_>],
    start: usize,
    relationship: Relationship,
) -> Result<(SelectorNode, usize)> {
    let mut element_type = String::new();
    let mut classes: Vec<String> = Vec::new();
    let mut id: Option<String> = None;
    let mut prev_end: Option<usize> = None;
    let mut cursor = start;

    while let Some(tok) = tokens.get(cursor) {
        if prev_end.is_some_and(|end| tok.span.start != end) {
            break;
        }

        match tok.token {
            Token::Ident if prev_end.is_none() => {
                element_type = tok.text.to_lowercase();
                prev_end = Some(tok.span.end);
                cursor += 1;
            }
            Token::Dot => {
                if id.is_some() {
                    return Err(ThemeError::parse(input, "class must come before '#id'"));
                }
                let name = expect_name(input, tokens, cursor, "class name after '.'")?;
                classes.push(name.text.to_lowercase());
                prev_end = Some(name.span.end);
                cursor += 2;
            }
            Token::Hash => {
                if id.is_some() {
                    return Err(ThemeError::parse(input, "node has more than one '#id'"));
                }
                let name = expect_name(input, tokens, cursor, "id after '#'")?;
                id = Some(name.text.to_lowercase());
                prev_end = Some(name.span.end);
                cursor += 2;
            }
            Token::GreaterThan => break,
            Token::Ident | Token::Comma => {
                return Err(ThemeError::parse(
                    input,
                    format!("unexpected '{}' at byte {}", tok.text, tok.span.start),
                ));
            }
        }
    }

    if cursor == start {
        return Err(ThemeError::parse(input, "expected selector node"));
    }

    let node = SelectorNode::new(element_type, classes.join("."), id, relationship);
    Ok((node, cursor))
}

/// The identifier directly following the punctuation at `at`.
fn expect_name<'t, 'a>(
    input: &str,
    tokens: &'t [Spanned<'a>],
    at: usize,
    what: &str,
) -> Result<&'t Spanned<'a>> {
    let punct = &tokens[at];
    match tokens.get(at + 1) {
        Some(name) if name.token == Token::Ident && name.span.start == punct.span.end => Ok(name),
        _ => Err(ThemeError::parse(input, format!("expected {what}"))),
    }
}

/// Parse a declarator: `;`-separated `key: value` pairs.
///
/// Each pair is split on its first `:` only, so values may contain colons.
/// Empty segments are ignored and later keys override earlier ones.
pub fn parse_declarator(input: &str) -> Result<PropertyMap> {
    let mut properties = PropertyMap::new();

    for segment in input.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (key, value) = segment.split_once(':').ok_or_else(|| {
            ThemeError::parse(input, format!("declaration '{segment}' is missing ':'"))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ThemeError::parse(
                input,
                format!("declaration '{segment}' has an empty key"),
            ));
        }
        properties.insert(key.to_owned(), value.trim().to_owned());
    }

    Ok(properties)
}
