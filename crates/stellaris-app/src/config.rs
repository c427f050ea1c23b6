//! Ceremony configuration
//!
//! `CeremonyConfig` is the serde-facing, overridable form. It compiles into a
//! validated, immutable [`CeremonyContext`] that every ceremony reads.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stellaris_core::config::{parse_millis, StellarisConfig, ENV_PREFIX};
use stellaris_core::effects::TimerPurpose;
use stellaris_core::token::STANDARD_TOKENS;
use stellaris_core::{Result, StellarisError, Token, TokenCatalog};

use crate::ceremony::CeremonyStage;

/// Delays of the timed stage transitions, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageTimings {
    /// RetractingGive to AwaitingReceiveChoice
    pub retract_ms: u64,
    /// Onset of the secondary coin fade on the receive panel
    pub coin_fade_ms: u64,
    /// PresentingReceive to Complete
    pub present_ms: u64,
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            retract_ms: 900,
            coin_fade_ms: 4000,
            present_ms: 1100,
        }
    }
}

impl StageTimings {
    /// Same delay for every timer; handy for tests
    pub fn uniform(ms: u64) -> Self {
        Self {
            retract_ms: ms,
            coin_fade_ms: ms,
            present_ms: ms,
        }
    }

    /// Delay of the timer `stage` arms for `purpose`.
    ///
    /// Returns `None` for a timer the stage does not own.
    pub fn delay_for(&self, stage: CeremonyStage, purpose: TimerPurpose) -> Option<Duration> {
        let ms = match (stage, purpose) {
            (CeremonyStage::RetractingGive, TimerPurpose::StageAdvance) => self.retract_ms,
            (CeremonyStage::PresentingReceive, TimerPurpose::StageAdvance) => self.present_ms,
            (CeremonyStage::AwaitingReceiveChoice, TimerPurpose::CoinFade) => self.coin_fade_ms,
            _ => return None,
        };
        Some(Duration::from_millis(ms))
    }

    fn validate(&self) -> Result<()> {
        for (name, ms) in [
            ("retract_ms", self.retract_ms),
            ("coin_fade_ms", self.coin_fade_ms),
            ("present_ms", self.present_ms),
        ] {
            if ms == 0 {
                return Err(StellarisError::config(format!(
                    "timings.{name} must be greater than zero"
                )));
            }
        }
        Ok(())
    }
}

/// One token of the configured catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntry {
    /// Ticker symbol, used as the identifier
    pub symbol: String,
    /// Display label
    pub label: String,
    /// Accent color (`#RRGGBB`)
    pub color: String,
}

/// Block explorer link settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Explorer base URL
    pub base_url: String,
    /// Network query parameter
    pub network: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://explorer.aptoslabs.com".to_string(),
            network: "mainnet".to_string(),
        }
    }
}

impl ExplorerConfig {
    /// Link opened from the completion summary
    pub fn url(&self) -> String {
        format!(
            "{}/?network={}",
            self.base_url.trim_end_matches('/'),
            self.network
        )
    }
}

/// Ceremony configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CeremonyConfig {
    /// Timed transition delays
    pub timings: StageTimings,
    /// Token catalog, in display order
    pub tokens: Vec<TokenEntry>,
    /// Explorer link
    pub explorer: ExplorerConfig,
}

impl Default for CeremonyConfig {
    fn default() -> Self {
        Self {
            timings: StageTimings::default(),
            tokens: STANDARD_TOKENS
                .iter()
                .map(|(symbol, label, color)| TokenEntry {
                    symbol: (*symbol).to_string(),
                    label: (*label).to_string(),
                    color: (*color).to_string(),
                })
                .collect(),
            explorer: ExplorerConfig::default(),
        }
    }
}

impl CeremonyConfig {
    /// Build the token catalog described by `tokens`
    pub fn catalog(&self) -> Result<TokenCatalog> {
        let tokens = self
            .tokens
            .iter()
            .map(|entry| Token::new(&entry.symbol, &entry.label, &entry.color))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(TokenCatalog::new(tokens)?)
    }
}

impl StellarisConfig for CeremonyConfig {
    fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "RETRACT_MS" => self.timings.retract_ms = parse_millis(&key, &value)?,
                "COIN_FADE_MS" => self.timings.coin_fade_ms = parse_millis(&key, &value)?,
                "PRESENT_MS" => self.timings.present_ms = parse_millis(&key, &value)?,
                "EXPLORER_NETWORK" => self.explorer.network = value.trim().to_string(),
                _ => {}
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.timings.validate()?;
        self.catalog()?;
        if self.explorer.base_url.trim().is_empty() {
            return Err(StellarisError::config("explorer.base_url must not be empty"));
        }
        if self.explorer.network.trim().is_empty() {
            return Err(StellarisError::config("explorer.network must not be empty"));
        }
        Ok(())
    }
}

/// Immutable settings shared by every ceremony in a process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CeremonyContext {
    catalog: TokenCatalog,
    timings: StageTimings,
    explorer: ExplorerConfig,
}

impl CeremonyContext {
    /// Validate `config` and compile it
    pub fn from_config(config: &CeremonyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog: config.catalog()?,
            timings: config.timings,
            explorer: config.explorer.clone(),
        })
    }

    /// Standard catalog, default timings, default explorer
    pub fn standard() -> Self {
        Self {
            catalog: TokenCatalog::standard().clone(),
            timings: StageTimings::default(),
            explorer: ExplorerConfig::default(),
        }
    }

    /// Replace the timings
    pub fn with_timings(mut self, timings: StageTimings) -> Result<Self> {
        timings.validate()?;
        self.timings = timings;
        Ok(self)
    }

    /// Token catalog
    pub fn catalog(&self) -> &TokenCatalog {
        &self.catalog
    }

    /// Stage timings
    pub fn timings(&self) -> &StageTimings {
        &self.timings
    }

    /// Explorer link opened from the summary
    pub fn explorer_url(&self) -> String {
        self.explorer.url()
    }
}

impl Default for CeremonyContext {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_compile_to_standard_context() {
        let ctx = CeremonyContext::from_config(&CeremonyConfig::default()).unwrap();
        assert_eq!(ctx, CeremonyContext::standard());
        assert_eq!(ctx.explorer_url(), "https://explorer.aptoslabs.com/?network=mainnet");
    }

    #[test]
    fn test_delay_for_owned_timers_only() {
        let timings = StageTimings::default();
        assert_eq!(
            timings.delay_for(CeremonyStage::RetractingGive, TimerPurpose::StageAdvance),
            Some(Duration::from_millis(900))
        );
        assert_eq!(
            timings.delay_for(CeremonyStage::AwaitingReceiveChoice, TimerPurpose::CoinFade),
            Some(Duration::from_millis(4000))
        );
        assert_eq!(
            timings.delay_for(CeremonyStage::PresentingReceive, TimerPurpose::StageAdvance),
            Some(Duration::from_millis(1100))
        );
        assert_eq!(
            timings.delay_for(CeremonyStage::Complete, TimerPurpose::StageAdvance),
            None
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CeremonyConfig::default();
        config
            .merge_with_vars(vars(&[
                ("STELLARIS_RETRACT_MS", "250"),
                ("STELLARIS_EXPLORER_NETWORK", "testnet"),
                ("HOME", "/root"),
            ]))
            .unwrap();
        assert_eq!(config.timings.retract_ms, 250);
        assert_eq!(config.timings.present_ms, 1100);
        assert_eq!(config.explorer.network, "testnet");
    }

    #[test]
    fn test_only_prefixed_keys_override() {
        let mut config = CeremonyConfig::default();
        config
            .merge_with_vars(vars(&[
                ("RETRACT_MS", "1"),
                ("APP_STELLARIS_PRESENT_MS", "2"),
                ("STELLARIS_UNKNOWN", "ignored"),
                ("STELLARIS_COIN_FADE_MS", "3000"),
            ]))
            .unwrap();
        assert_eq!(config.timings.retract_ms, 900);
        assert_eq!(config.timings.present_ms, 1100);
        assert_eq!(config.timings.coin_fade_ms, 3000);
    }

    #[test]
    fn test_bad_override_is_config_error() {
        let mut config = CeremonyConfig::default();
        let result = config.merge_with_vars(vars(&[("STELLARIS_PRESENT_MS", "fast")]));
        assert_matches!(result, Err(StellarisError::Config { .. }));
    }

    #[test]
    fn test_validation() {
        let mut config = CeremonyConfig::default();
        config.timings.coin_fade_ms = 0;
        assert_matches!(config.validate(), Err(StellarisError::Config { .. }));

        let mut config = CeremonyConfig::default();
        config.tokens.push(config.tokens[0].clone());
        assert_matches!(config.validate(), Err(StellarisError::Invalid { .. }));

        let mut config = CeremonyConfig::default();
        config.tokens.clear();
        assert_matches!(config.validate(), Err(StellarisError::Invalid { .. }));

        let mut config = CeremonyConfig::default();
        config.explorer.base_url = "  ".to_string();
        assert_matches!(config.validate(), Err(StellarisError::Config { .. }));
    }

    #[test]
    fn test_load_partial_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r##"
[timings]
retract_ms = 300

[[tokens]]
symbol = "SOL"
label = "Solana"
color = "#9945FF"

[[tokens]]
symbol = "APT"
label = "APT"
color = "#1E90FF"
"##
        )
        .unwrap();

        let config = CeremonyConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.timings.retract_ms, 300);
        assert_eq!(config.timings.coin_fade_ms, 4000);
        assert_eq!(config.explorer, ExplorerConfig::default());

        let ctx = CeremonyContext::from_config(&config).unwrap();
        let symbols: Vec<_> = ctx.catalog().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(symbols, vec!["SOL", "APT"]);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"explorer": {{"network": "devnet"}}}}"#).unwrap();
        let config = CeremonyConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.explorer.network, "devnet");
        assert_eq!(config.tokens.len(), 4);
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../config/ceremony.toml");
        let config = CeremonyConfig::load_from_file(&path).unwrap();
        assert_eq!(config, CeremonyConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert_matches!(
            CeremonyConfig::load_from_file(file.path()),
            Err(StellarisError::Config { .. })
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let explorer = ExplorerConfig {
            base_url: "https://example.org/".to_string(),
            network: "testnet".to_string(),
        };
        assert_eq!(explorer.url(), "https://example.org/?network=testnet");
    }
}
