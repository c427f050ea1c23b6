//! # Token Catalog
//!
//! Tokens the ceremony can exchange, and the ordered, duplicate-free catalog
//! that holds them. The catalog is immutable once built and is shared by every
//! ceremony in the process.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Error when constructing a token catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// A catalog must contain at least one token
    #[error("token catalog is empty")]
    Empty,
    /// Two entries share the same identifier
    #[error("duplicate token identifier: {symbol}")]
    DuplicateSymbol {
        /// The repeated identifier
        symbol: String,
    },
    /// An identifier was empty or whitespace
    #[error("token identifier must not be blank")]
    BlankSymbol,
    /// An accent color was not a `#RRGGBB` hex string
    #[error("invalid accent color {color:?} for token {symbol}")]
    InvalidColor {
        /// Token the color belongs to
        symbol: String,
        /// The rejected color string
        color: String,
    },
}

/// Token identifier (ticker symbol)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    /// Create an identifier from a symbol
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Borrow the symbol
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenId {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

impl From<String> for TokenId {
    fn from(symbol: String) -> Self {
        Self(symbol)
    }
}

/// Accent color used by the token rendering collaborator (`#RRGGBB`).
/// Only built through [`Token::new`], which validates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccentColor(String);

impl AccentColor {
    /// Borrow the hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid_hex(s: &str) -> bool {
        s.len() == 7
            && s.starts_with('#')
            && s[1..].chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A token with its display metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Identifier (ticker symbol)
    pub id: TokenId,
    /// Display label
    pub label: String,
    /// Accent color
    pub accent: AccentColor,
}

impl Token {
    /// Create a token, validating the identifier and accent color
    pub fn new(
        symbol: impl Into<String>,
        label: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(CatalogError::BlankSymbol);
        }
        let color = color.into();
        if !AccentColor::is_valid_hex(&color) {
            return Err(CatalogError::InvalidColor { symbol, color });
        }
        Ok(Self {
            id: TokenId(symbol),
            label: label.into(),
            accent: AccentColor(color),
        })
    }
}

/// Ordered, duplicate-free list of tokens
///
/// Invariants:
/// - At least one token is present
/// - No two tokens share an identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenCatalog {
    tokens: Vec<Token>,
}

impl TokenCatalog {
    /// Build a catalog, preserving the given order
    pub fn new(tokens: Vec<Token>) -> Result<Self, CatalogError> {
        if tokens.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, token) in tokens.iter().enumerate() {
            if tokens[..i].iter().any(|t| t.id == token.id) {
                return Err(CatalogError::DuplicateSymbol {
                    symbol: token.id.to_string(),
                });
            }
        }
        Ok(Self { tokens })
    }

    /// Look up a token by identifier
    pub fn get(&self, id: &TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| &t.id == id)
    }

    /// Check whether the catalog contains an identifier
    pub fn contains(&self, id: &TokenId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate tokens in catalog order
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false for a constructed catalog
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The process-wide default catalog
    pub fn standard() -> &'static TokenCatalog {
        &STANDARD_CATALOG
    }
}

impl<'a> IntoIterator for &'a TokenCatalog {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Symbol, label and accent color of the default tokens, in display order
pub const STANDARD_TOKENS: &[(&str, &str, &str)] = &[
    ("BTC", "BTC", "#F2A900"),
    ("APT", "APT", "#1E90FF"),
    ("ETH", "ETH", "#3C3C3D"),
    ("USDC", "USDC", "#2775CA"),
];

static STANDARD_CATALOG: Lazy<TokenCatalog> = Lazy::new(|| TokenCatalog {
    tokens: STANDARD_TOKENS
        .iter()
        .map(|(symbol, label, color)| Token {
            id: TokenId::new(*symbol),
            label: (*label).to_string(),
            accent: AccentColor((*color).to_string()),
        })
        .collect(),
});
