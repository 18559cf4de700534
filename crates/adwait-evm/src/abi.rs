//! AdwaitToken ABI definitions using alloy's `sol!` macro.

use alloy::sol;
use alloy::sol_types::SolInterface;

sol! {
    /// Pausable, role-gated ERC-20 token.
    #[sol(rpc)]
    interface IAdwaitToken {
        error EnforcedPause();
        error ExpectedPause();
        error AccessControlUnauthorizedAccount(address account, bytes32 neededRole);
        error ERC20InsufficientBalance(address sender, uint256 balance, uint256 needed);
        error ERC20InvalidReceiver(address receiver);

        function name() external view returns (string);
        function symbol() external view returns (string);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function paused() external view returns (bool);
        function isAdmin(address account) external view returns (bool);
        function isMinter(address account) external view returns (bool);

        function pause() external;
        function unpause() external;
        function grantMinterRole(address account) external;
        function revokeMinterRole(address account) external;
        function mint(address to, uint256 amount) external;
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// Name of the custom error encoded in revert data, if it is one of ours.
pub fn decode_revert(data: &[u8]) -> Option<&'static str> {
    use IAdwaitToken::IAdwaitTokenErrors as Errors;

    let name = match Errors::abi_decode(data).ok()? {
        Errors::EnforcedPause(_) => "EnforcedPause",
        Errors::ExpectedPause(_) => "ExpectedPause",
        Errors::AccessControlUnauthorizedAccount(_) => "AccessControlUnauthorizedAccount",
        Errors::ERC20InsufficientBalance(_) => "ERC20InsufficientBalance",
        Errors::ERC20InvalidReceiver(_) => "ERC20InvalidReceiver",
    };
    Some(name)
}
