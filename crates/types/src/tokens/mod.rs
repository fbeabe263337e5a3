//! Token list models and lookup

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Token metadata used by match filters and strategies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMeta {
	/// Fixed-maturity principal token (traded through its market)
	#[serde(default, alias = "isPendlePT")]
	pub is_principal_token: bool,
	/// Market of the principal token
	#[serde(default, alias = "pendleMarket", skip_serializing_if = "Option::is_none")]
	pub principal_market: Option<Address>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pool_id: Option<String>,
}

/// Token list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
	#[serde(alias = "addressInfo")]
	pub address: Address,
	pub chain_id: u64,
	pub decimals: u8,
	#[serde(default)]
	pub symbol: String,
	#[serde(default)]
	pub name: String,
	#[serde(default, rename = "logoURI", skip_serializing_if = "Option::is_none")]
	pub logo_uri: Option<String>,
	#[serde(default)]
	pub meta: TokenMeta,
}

impl TokenInfo {
	pub fn new(chain_id: u64, address: Address, decimals: u8, symbol: &str) -> Self {
		Self {
			address,
			chain_id,
			decimals,
			symbol: symbol.to_string(),
			name: symbol.to_string(),
			logo_uri: None,
			meta: TokenMeta::default(),
		}
	}

	/// Mark the token as a principal token of the given market
	pub fn with_principal_market(mut self, market: Address) -> Self {
		self.meta.is_principal_token = true;
		self.meta.principal_market = Some(market);
		self
	}

	/// One whole token in base units (10^decimals)
	pub fn unit(&self) -> U256 {
		U256::from(10u64).pow(U256::from(self.decimals))
	}
}

/// Lookup of tokens by chain and address
#[cfg_attr(test, mockall::automock)]
pub trait TokenLookup: Send + Sync {
	fn find_token(&self, chain_id: u64, address: Address) -> Option<TokenInfo>;
}

/// Errors raised while loading token lists
#[derive(Error, Debug)]
pub enum TokenListError {
	#[error("Failed to read token list {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse token list {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Token {address} in {path} declares chain {declared}, expected {expected}")]
	ChainMismatch {
		path: PathBuf,
		address: Address,
		declared: u64,
		expected: u64,
	},
}

/// In-memory token lists keyed by chain
#[derive(Debug, Clone, Default)]
pub struct TokenList {
	tokens: HashMap<u64, HashMap<Address, TokenInfo>>,
}

impl TokenList {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_tokens(tokens: impl IntoIterator<Item = TokenInfo>) -> Self {
		let mut list = Self::new();
		for token in tokens {
			list.insert(token);
		}
		list
	}

	pub fn insert(&mut self, token: TokenInfo) {
		self.tokens
			.entry(token.chain_id)
			.or_default()
			.insert(token.address, token);
	}

	/// Load every `<chain_id>.json` file of a directory.
	///
	/// Files whose stem is not a chain id are skipped. A missing directory yields an empty list.
	pub fn load_dir(dir: &Path) -> Result<Self, TokenListError> {
		let mut list = Self::new();
		if !dir.exists() {
			return Ok(list);
		}

		let entries = std::fs::read_dir(dir).map_err(|source| TokenListError::Io {
			path: dir.to_path_buf(),
			source,
		})?;

		for entry in entries {
			let path = entry
				.map_err(|source| TokenListError::Io {
					path: dir.to_path_buf(),
					source,
				})?
				.path();
			if path.extension().and_then(|e| e.to_str()) != Some("json") {
				continue;
			}
			let Some(chain_id) = path
				.file_stem()
				.and_then(|s| s.to_str())
				.and_then(|s| s.parse::<u64>().ok())
			else {
				continue;
			};

			let raw = std::fs::read_to_string(&path).map_err(|source| TokenListError::Io {
				path: path.clone(),
				source,
			})?;
			let tokens: Vec<TokenInfo> =
				serde_json::from_str(&raw).map_err(|source| TokenListError::Parse {
					path: path.clone(),
					source,
				})?;

			for token in tokens {
				if token.chain_id != chain_id {
					return Err(TokenListError::ChainMismatch {
						path,
						address: token.address,
						declared: token.chain_id,
						expected: chain_id,
					});
				}
				list.insert(token);
			}
		}

		Ok(list)
	}

	pub fn chain_ids(&self) -> Vec<u64> {
		let mut ids: Vec<u64> = self.tokens.keys().copied().collect();
		ids.sort_unstable();
		ids
	}

	pub fn len(&self) -> usize {
		self.tokens.values().map(HashMap::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl TokenLookup for TokenList {
	fn find_token(&self, chain_id: u64, address: Address) -> Option<TokenInfo> {
		self.tokens.get(&chain_id)?.get(&address).cloned()
	}
}
