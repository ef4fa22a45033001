//! MyToken (FLUF) contract bindings.

use alloy::sol;

// ERC-20 interface plus the owner-controlled supply extensions
sol! {
    #[sol(rpc)]
    interface IMyToken {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);

        function mint(address to, uint256 amount) external;
        function burn(uint256 amount) external;
        function owner() external view returns (address);

        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);
    }
}
