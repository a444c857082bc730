//! raw attribute values
//!
//! Values are never evaluated. What an attribute "is" is the source text between its `=` and the first comment,
//! without leading or trailing whitespace:
//!
//! ```hcl
//! ami = "ami-1234" # pinned
//! ```
//!
//! has the raw value `"ami-1234"` (quotes included).
use crate::token::{TokenKind, Tokens};
use hcl_edit::structure::Attribute;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to find assignment delimiter in attribute: {tokens:?}")]
pub struct MalformedAttributeError {
    pub tokens: String,
}

/// Returns the raw value of an attribute as written in the source
pub fn raw_value(attribute: &Attribute) -> Result<String, MalformedAttributeError> {
    Tokens::from(attribute).raw_value()
}

impl Tokens {
    /// Concatenates everything after the first [TokenKind::Equal] up to the first [TokenKind::Comment]
    pub fn raw_value(&self) -> Result<String, MalformedAttributeError> {
        let Some(equal) = self.iter().position(|token| token.kind == TokenKind::Equal) else {
            return Err(MalformedAttributeError {
                tokens: self.to_string(),
            });
        };

        let value: String = self.as_slice()[equal + 1..]
            .iter()
            .take_while(|token| token.kind != TokenKind::Comment)
            .map(|token| token.text.as_str())
            .collect();

        Ok(value.trim().to_owned())
    }
}
