//! # Selection Gate
//!
//! Pure functions deciding which tokens may be picked on one side given the
//! token already committed on the other side.

use serde::Serialize;
use stellaris_core::{AccentColor, Token, TokenCatalog, TokenId};

use super::commands::RejectReason;

/// Every catalog token whose identifier differs from `excluded`, in catalog
/// order. The full catalog when nothing is excluded.
pub fn selectable<'a>(catalog: &'a TokenCatalog, excluded: Option<&TokenId>) -> Vec<&'a Token> {
    catalog
        .iter()
        .filter(|token| Some(&token.id) != excluded)
        .collect()
}

/// Whether `id` may be picked. Unknown identifiers are never selectable.
pub fn is_selectable(catalog: &TokenCatalog, excluded: Option<&TokenId>, id: &TokenId) -> bool {
    check_pick(catalog, excluded, id).is_ok()
}

/// Check a pick against the catalog and the opposite side's commitment.
pub fn check_pick(
    catalog: &TokenCatalog,
    excluded: Option<&TokenId>,
    id: &TokenId,
) -> Result<(), RejectReason> {
    if !catalog.contains(id) {
        return Err(RejectReason::UnknownToken(id.clone()));
    }
    if excluded == Some(id) {
        return Err(RejectReason::DuplicateToken(id.clone()));
    }
    Ok(())
}

/// One entry of a token picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenOption {
    /// Token identifier
    pub id: TokenId,
    /// Display label
    pub label: String,
    /// Accent color handed to the token renderer
    pub accent: AccentColor,
    /// Shown but not clickable
    pub disabled: bool,
}

/// Picker options: every token in catalog order, the excluded one disabled.
pub fn picker_options(catalog: &TokenCatalog, excluded: Option<&TokenId>) -> Vec<TokenOption> {
    catalog
        .iter()
        .map(|token| TokenOption {
            id: token.id.clone(),
            label: token.label.clone(),
            accent: token.accent.clone(),
            disabled: Some(&token.id) == excluded,
        })
        .collect()
}
