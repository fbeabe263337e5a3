//! Overflow-checked amount arithmetic

use swap_types::constants::limits::BPS_DENOMINATOR;
use swap_types::U256;

use crate::errors::MathError;

/// `10^decimals`
pub fn pow10(decimals: u8) -> U256 {
	U256::from(10u64).pow(U256::from(decimals))
}

fn mul_div(a: U256, b: U256, denominator: U256, operation: &'static str) -> Result<U256, MathError> {
	if denominator.is_zero() {
		return Err(MathError::DivisionByZero { operation });
	}
	a.checked_mul(b)
		.map(|product| product / denominator)
		.ok_or(MathError::Overflow { operation })
}

/// Scale `amount` by `(10000 ± bps) / 10000`, rounding the bound down or up
pub fn apply_slippage(amount: U256, bps: u32, round_up: bool) -> Result<U256, MathError> {
	let bps_wide = u64::from(bps);
	if bps_wide > BPS_DENOMINATOR {
		return Err(MathError::InvalidSlippage { bps });
	}
	let factor = if round_up {
		BPS_DENOMINATOR + bps_wide
	} else {
		BPS_DENOMINATOR - bps_wide
	};
	mul_div(
		amount,
		U256::from(factor),
		U256::from(BPS_DENOMINATOR),
		"apply_slippage",
	)
}

/// Pad a debt amount with the interest accrued before the transaction lands
pub fn adjust_for_interest(amount: U256, buffer_bps: u32) -> Result<U256, MathError> {
	mul_div(
		amount,
		U256::from(BPS_DENOMINATOR + u64::from(buffer_bps)),
		U256::from(BPS_DENOMINATOR),
		"adjust_for_interest",
	)
}

/// First guess of the input amount yielding `target`, given the output
/// `unit_to` of a one-unit input probe
pub fn estimate_amount_from(
	unit_to: U256,
	target: U256,
	src_decimals: u8,
	dst_decimals: u8,
) -> Result<U256, MathError> {
	const OPERATION: &str = "estimate_amount_from";
	if unit_to.is_zero() {
		return Err(MathError::DivisionByZero {
			operation: OPERATION,
		});
	}
	let scaled = target
		.checked_mul(pow10(dst_decimals))
		.ok_or(MathError::Overflow {
			operation: OPERATION,
		})?;
	let scaled = if src_decimals > dst_decimals {
		scaled
			.checked_mul(pow10(src_decimals - dst_decimals))
			.ok_or(MathError::Overflow {
				operation: OPERATION,
			})?
	} else {
		scaled / pow10(dst_decimals - src_decimals)
	};
	Ok(scaled / unit_to)
}
