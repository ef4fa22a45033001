//! FluffySwap exchange contract bindings.

use alloy::sol;

// Fixed-rate ETH -> FLUF exchange
sol! {
    #[sol(rpc)]
    interface IFluffySwap {
        function flufToken() external view returns (address);
        function tokensPerEth() external view returns (uint256);
        function owner() external view returns (address);
        function swapEthForTokens() external payable;

        function getTokenBalance() external view returns (uint256);
        function getEthBalance() external view returns (uint256);
        function calculateTokenAmount(uint256 ethAmount) external view returns (uint256);

        function updateRate(uint256 _tokensPerEth) external;
        function withdrawEth(uint256 amount) external;
        function withdrawTokens(uint256 amount) external;

        event TokensSwapped(address indexed user, uint256 ethAmount, uint256 tokenAmount);
        event RateUpdated(uint256 oldRate, uint256 newRate);
        event EthWithdrawn(address indexed owner, uint256 amount);
        event TokensWithdrawn(address indexed owner, uint256 amount);
    }
}
