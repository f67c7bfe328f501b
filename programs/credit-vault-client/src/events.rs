//! Solidity bindings for the vault contract and Multicall3.
//!
//! Uses alloy's `sol!` macro to generate ABI encoders/decoders, typed RPC
//! call builders and the event types the reconciliation log decodes.

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface ICreditVault {
        // ── Views ────────────────────────────────────────────────────────
        function totalAssets() external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function sharePrice() external view returns (uint256);
        function getAllocations() external view returns (uint256 staking, uint256 lending, uint256 lp);
        function getPendingRewards() external view returns (uint256 staking, uint256 lending, uint256 lp);
        function totalHarvested() external view returns (uint256);
        function lastHarvestBlock() external view returns (uint256);
        function stakingWeight() external view returns (uint256);
        function lendingWeight() external view returns (uint256);
        function lpWeight() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function convertToAssets(uint256 shares) external view returns (uint256);
        function maxWithdraw(address owner) external view returns (uint256);

        // ── Writes ───────────────────────────────────────────────────────
        function depositCTC(address receiver) external payable returns (uint256 shares);
        function withdrawCTC(uint256 assets, address receiver, address owner) external returns (uint256 shares);
        function redeemCTC(uint256 shares, address receiver, address owner) external returns (uint256 assets);

        // ── Events ───────────────────────────────────────────────────────

        /// Emitted when native CTC is deposited and shares are minted
        event DepositedCTC(address indexed sender, address indexed receiver, uint256 assets, uint256 shares);

        /// Emitted when CTC is withdrawn and shares are burned
        event WithdrawnCTC(address indexed sender, address indexed receiver, uint256 assets, uint256 shares);

        /// Emitted when strategy rewards are harvested into the vault
        event Harvested(uint256 stakingReward, uint256 lendingReward, uint256 lpReward, uint256 total);

        /// Emitted when capital is redistributed across strategies
        event Rebalanced(uint256 stakingAlloc, uint256 lendingAlloc, uint256 lpAlloc);
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Result {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls) external payable returns (Result[] memory returnData);
        function getEthBalance(address addr) external view returns (uint256 balance);
    }
}
