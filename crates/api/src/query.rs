//! `/swap` query parameters
//!
//! Every field arrives as a string and is validated here, so that malformed
//! requests are rejected with a 400 before any routing happens.

use serde::Deserialize;
use swap_service::SwapParams;
use swap_types::constants::limits::MAX_SLIPPAGE_PERCENT;
use swap_types::{parse_amount, Address, RoutingConfig, SwapperMode, U256};

/// Raw query string of `/swap` and `/swaps`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuery {
	pub chain_id: Option<String>,
	pub token_in: Option<String>,
	pub token_out: Option<String>,
	pub receiver: Option<String>,
	pub vault_in: Option<String>,
	pub origin: Option<String>,
	pub account_in: Option<String>,
	pub account_out: Option<String>,
	pub amount: Option<String>,
	pub target_debt: Option<String>,
	pub current_debt: Option<String>,
	pub swapper_mode: Option<String>,
	pub slippage: Option<String>,
	pub deadline: Option<String>,
	pub is_repay: Option<String>,
	pub routing_override: Option<String>,
}

impl SwapQuery {
	/// Validate into typed parameters, collecting every problem found
	pub fn parse(&self) -> Result<SwapParams, String> {
		let mut errors = Vec::new();

		let chain_id = collect(&mut errors, parse_chain_id(self.chain_id.as_deref()));
		let token_in = collect(&mut errors, required_address("tokenIn", &self.token_in));
		let token_out = collect(&mut errors, required_address("tokenOut", &self.token_out));
		let receiver = collect(&mut errors, required_address("receiver", &self.receiver));
		let vault_in = collect(&mut errors, required_address("vaultIn", &self.vault_in));
		let origin = collect(&mut errors, required_address("origin", &self.origin));
		let account_in = collect(&mut errors, required_address("accountIn", &self.account_in));
		let account_out = collect(&mut errors, required_address("accountOut", &self.account_out));
		let amount = collect(&mut errors, optional_amount("amount", &self.amount));
		let target_debt = collect(&mut errors, optional_amount("targetDebt", &self.target_debt));
		let current_debt = collect(&mut errors, optional_amount("currentDebt", &self.current_debt));
		let mode = collect(&mut errors, parse_mode(self.swapper_mode.as_deref()));
		let slippage_bps = collect(&mut errors, parse_slippage(self.slippage.as_deref()));
		let deadline = collect(&mut errors, parse_deadline(self.deadline.as_deref()));
		let is_repay = collect(&mut errors, parse_bool("isRepay", self.is_repay.as_deref()));
		let routing_override = collect(&mut errors, parse_routing(self.routing_override.as_deref()));

		if !errors.is_empty() {
			return Err(format!("Invalid parameters: {}", errors.join(", ")));
		}

		let params = move || -> Option<SwapParams> {
			Some(SwapParams {
				chain_id: chain_id?,
				token_in: token_in?,
				token_out: token_out?,
				receiver: receiver?,
				vault_in: vault_in?,
				origin: origin?,
				account_in: account_in?,
				account_out: account_out?,
				mode: mode?,
				amount: amount?,
				target_debt: target_debt?,
				current_debt: current_debt?,
				slippage_bps: slippage_bps?,
				deadline: deadline?,
				is_repay: is_repay?,
				routing_override: routing_override?,
			})
		};
		params().ok_or_else(|| "Invalid parameters".to_string())
	}
}

fn collect<T>(errors: &mut Vec<String>, result: Result<T, String>) -> Option<T> {
	match result {
		Ok(value) => Some(value),
		Err(e) => {
			errors.push(e);
			None
		},
	}
}

fn parse_chain_id(raw: Option<&str>) -> Result<u64, String> {
	let raw = raw.ok_or("chainId is required")?;
	match raw.trim().parse::<u64>() {
		Ok(chain_id) if chain_id > 0 => Ok(chain_id),
		_ => Err(format!("chainId must be a positive integer: {}", raw)),
	}
}

/// Checksummed or single-case hex address
pub fn parse_address(raw: &str) -> Result<Address, String> {
	let raw = raw.trim();
	let digits = raw.strip_prefix("0x").unwrap_or(raw);
	let mixed_case = digits.chars().any(|c| c.is_ascii_uppercase())
		&& digits.chars().any(|c| c.is_ascii_lowercase());

	let parsed = if mixed_case {
		Address::parse_checksummed(raw, None).map_err(|_| ())
	} else {
		raw.parse::<Address>().map_err(|_| ())
	};
	parsed.map_err(|_| format!("Invalid Ethereum address: {}", raw))
}

fn required_address(field: &str, raw: &Option<String>) -> Result<Address, String> {
	match raw {
		Some(raw) => parse_address(raw),
		None => Err(format!("{} is required", field)),
	}
}

fn optional_amount(field: &str, raw: &Option<String>) -> Result<U256, String> {
	match raw {
		Some(raw) => parse_amount(raw).map_err(|e| format!("{}: {}", field, e)),
		None => Ok(U256::ZERO),
	}
}

fn parse_mode(raw: Option<&str>) -> Result<SwapperMode, String> {
	let raw = raw.ok_or("swapperMode is required")?;
	raw.trim()
		.parse::<u8>()
		.map_err(|_| format!("swapperMode must be 0, 1 or 2: {}", raw))
		.and_then(SwapperMode::try_from)
}

/// Percent with up to two decimals, converted to basis points
fn parse_slippage(raw: Option<&str>) -> Result<u32, String> {
	let raw = raw.ok_or("slippage is required")?;
	let percent: f64 = raw
		.trim()
		.parse()
		.map_err(|_| format!("slippage must be a number: {}", raw))?;
	if !percent.is_finite() || !(0.0..=MAX_SLIPPAGE_PERCENT).contains(&percent) {
		return Err(format!("slippage must be between 0 and {}", MAX_SLIPPAGE_PERCENT));
	}
	Ok((percent * 100.0).round() as u32)
}

fn parse_deadline(raw: Option<&str>) -> Result<u64, String> {
	match raw {
		Some(raw) => raw
			.trim()
			.parse::<u64>()
			.map_err(|_| format!("deadline must be a non-negative integer: {}", raw)),
		None => Ok(0),
	}
}

fn parse_bool(field: &str, raw: Option<&str>) -> Result<bool, String> {
	match raw.map(|r| r.trim().to_ascii_lowercase()) {
		None => Ok(false),
		Some(value) if value == "true" => Ok(true),
		Some(value) if value == "false" => Ok(false),
		Some(value) => Err(format!("{} must be true or false: {}", field, value)),
	}
}

fn parse_routing(raw: Option<&str>) -> Result<Option<RoutingConfig>, String> {
	match raw {
		Some(raw) if !raw.trim().is_empty() => serde_json::from_str::<RoutingConfig>(raw)
			.map(Some)
			.map_err(|e| format!("routingOverride: {}", e)),
		_ => Ok(None),
	}
}
