//! Selector language: nodes, chains, tokenizer, parser.

pub mod chain;
pub mod node;
pub mod parser;
pub mod tokenizer;

pub use chain::{Selector, MAX_SELECTOR_LEN};
pub use node::{Rank, Relationship, SelectorNode};
pub use parser::{parse_declarator, parse_query, parse_selectors};
