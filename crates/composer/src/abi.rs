//! Solidity bindings of the swapper, verifier, ERC20 and ERC4626 contracts

use alloy_primitives::B256;
use alloy_sol_types::sol;

sol! {
	interface ISwapper {
		struct SwapParams {
			bytes32 handler;
			uint256 mode;
			address account;
			address tokenIn;
			address tokenOut;
			address vaultIn;
			address accountIn;
			address receiver;
			uint256 amountOut;
			bytes data;
		}

		function swap(SwapParams memory params) external;
		function deposit(address token, address vault, uint256 amountMin, address account) external;
		function repay(address token, address vault, uint256 repayAmount, address account) external;
		function repayAndDeposit(address token, address vault, uint256 repayAmount, address account) external;
		function sweep(address token, uint256 amountMin, address to) external;
		function multicall(bytes[] memory calls) external;
	}

	interface ISwapVerifier {
		function verifyAmountMinAndSkim(address vault, address account, uint256 amountMin, uint256 deadline) external;
		function verifyDebtMax(address vault, address account, uint256 amountMax, uint256 deadline) external view;
	}

	interface IERC20 {
		function approve(address spender, uint256 amount) external returns (bool);
		function transfer(address to, uint256 amount) external returns (bool);
	}

	interface IERC4626 {
		function redeem(uint256 amount, address receiver, address owner) external returns (uint256);
		function withdraw(uint256 amount, address receiver, address owner) external returns (uint256);
		function mint(uint256 amount, address receiver) external returns (uint256);
		function previewRedeem(uint256 shares) external view returns (uint256);
		function previewWithdraw(uint256 assets) external view returns (uint256);
		function previewDeposit(uint256 assets) external view returns (uint256);
		function previewMint(uint256 shares) external view returns (uint256);
	}
}

/// Swapper handler selecting how the swap payload is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
	/// `abi.encode(address target, bytes call)` executed verbatim
	Generic,
	UniswapV2,
	UniswapV3,
}

impl Handler {
	pub fn name(&self) -> &'static str {
		match self {
			Handler::Generic => "Generic",
			Handler::UniswapV2 => "UniswapV2",
			Handler::UniswapV3 => "UniswapV3",
		}
	}

	/// Handler name right-padded to 32 bytes
	pub fn id(&self) -> B256 {
		let name = self.name().as_bytes();
		let mut id = [0u8; 32];
		id[..name.len()].copy_from_slice(name);
		B256::from(id)
	}
}
