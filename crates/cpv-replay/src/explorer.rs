//! Block-explorer link templates for a derived TXID.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder substituted with the TXID.
pub const TXID_PLACEHOLDER: &str = "{txid}";

/// A template that is neither a preset nor contains [`TXID_PLACEHOLDER`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("explorer template {0:?} is not a preset (blockstream, blockchain, blockcypher) and has no {{txid}} placeholder")]
pub struct ExplorerTemplateError(pub String);

/// Where a TXID link points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExplorerTemplate {
    /// blockstream.info
    Blockstream,
    /// blockchain.com
    Blockchain,
    /// live.blockcypher.com
    Blockcypher,
    /// Any URL containing `{txid}`.
    Custom(String),
}

impl ExplorerTemplate {
    /// The URL template with its `{txid}` placeholder.
    pub fn template(&self) -> &str {
        match self {
            Self::Blockstream => "https://blockstream.info/tx/{txid}",
            Self::Blockchain => "https://www.blockchain.com/btc/tx/{txid}",
            Self::Blockcypher => "https://live.blockcypher.com/btc/tx/{txid}",
            Self::Custom(t) => t,
        }
    }

    /// Link for `txid`.
    pub fn link(&self, txid: &str) -> String {
        self.template().replace(TXID_PLACEHOLDER, txid)
    }
}

impl FromStr for ExplorerTemplate {
    type Err = ExplorerTemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blockstream" => Ok(Self::Blockstream),
            "blockchain" => Ok(Self::Blockchain),
            "blockcypher" => Ok(Self::Blockcypher),
            _ if s.contains(TXID_PLACEHOLDER) => Ok(Self::Custom(s.trim().to_string())),
            _ => Err(ExplorerTemplateError(s.to_string())),
        }
    }
}

impl TryFrom<String> for ExplorerTemplate {
    type Error = ExplorerTemplateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ExplorerTemplate> for String {
    fn from(t: ExplorerTemplate) -> Self {
        match t {
            ExplorerTemplate::Blockstream => "blockstream".to_string(),
            ExplorerTemplate::Blockchain => "blockchain".to_string(),
            ExplorerTemplate::Blockcypher => "blockcypher".to_string(),
            ExplorerTemplate::Custom(s) => s,
        }
    }
}

impl fmt::Display for ExplorerTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_parse_case_insensitively() {
        assert_eq!(
            "Blockstream".parse::<ExplorerTemplate>().unwrap(),
            ExplorerTemplate::Blockstream
        );
        assert_eq!(
            "blockcypher".parse::<ExplorerTemplate>().unwrap(),
            ExplorerTemplate::Blockcypher
        );
    }

    #[test]
    fn custom_template_substitutes_txid() {
        let t: ExplorerTemplate = "https://mempool.space/tx/{txid}".parse().unwrap();
        assert_eq!(t.link("abcd"), "https://mempool.space/tx/abcd");
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        assert!("https://example.com/tx/".parse::<ExplorerTemplate>().is_err());
    }

    #[test]
    fn preset_link() {
        assert_eq!(
            ExplorerTemplate::Blockchain.link("00ff"),
            "https://www.blockchain.com/btc/tx/00ff"
        );
    }

    #[test]
    fn serde_uses_preset_name_or_template() {
        let json = serde_json::to_string(&ExplorerTemplate::Blockstream).unwrap();
        assert_eq!(json, "\"blockstream\"");
        let custom: ExplorerTemplate = serde_json::from_str("\"https://x/{txid}\"").unwrap();
        assert_eq!(custom, ExplorerTemplate::Custom("https://x/{txid}".to_string()));
        assert!(serde_json::from_str::<ExplorerTemplate>("\"nowhere\"").is_err());
    }
}
