//! State-changing calls on the token contract.

use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;

use crate::abi::IAdwaitToken;
use crate::binding::ContractBinding;

/// One write the dashboard can submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    Pause,
    Unpause,
    GrantMinterRole(Address),
    RevokeMinterRole(Address),
    Mint { to: Address, amount: U256 },
    Transfer { to: Address, amount: U256 },
}

impl WriteCall {
    /// Contract function this call invokes.
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Unpause => "unpause",
            Self::GrantMinterRole(_) => "grantMinterRole",
            Self::RevokeMinterRole(_) => "revokeMinterRole",
            Self::Mint { .. } => "mint",
            Self::Transfer { .. } => "transfer",
        }
    }

    /// ABI-encoded calldata.
    pub fn calldata(&self) -> Vec<u8> {
        match *self {
            Self::Pause => IAdwaitToken::pauseCall {}.abi_encode(),
            Self::Unpause => IAdwaitToken::unpauseCall {}.abi_encode(),
            Self::GrantMinterRole(account) => {
                IAdwaitToken::grantMinterRoleCall { account }.abi_encode()
            }
            Self::RevokeMinterRole(account) => {
                IAdwaitToken::revokeMinterRoleCall { account }.abi_encode()
            }
            Self::Mint { to, amount } => IAdwaitToken::mintCall { to, amount }.abi_encode(),
            Self::Transfer { to, amount } => {
                IAdwaitToken::transferCall { to, amount }.abi_encode()
            }
        }
    }
}

/// Builds the transaction request for `call` against the bound contract.
///
/// Nonce, gas and fees are left to the provider's fillers.
pub fn build_call(binding: &ContractBinding, call: &WriteCall) -> TransactionRequest {
    TransactionRequest::default()
        .to(binding.address())
        .input(Bytes::from(call.calldata()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::TxKind;

    fn binding() -> ContractBinding {
        ContractBinding::parse("0x1234567890abcdef1234567890abcdef12345678").unwrap()
    }

    #[test]
    fn build_mint() {
        let to = Address::repeat_byte(0xaa);
        let call = WriteCall::Mint {
            to,
            amount: U256::from(5u64),
        };
        let tx = build_call(&binding(), &call);

        assert_eq!(tx.to, Some(TxKind::Call(binding().address())));
        let input = tx.input.input().unwrap();
        assert_eq!(&input[..4], &[0x40, 0xc1, 0x0f, 0x19]);
        assert_eq!(&input[16..36], to.as_slice());
        assert!(tx.value.is_none());
    }

    #[test]
    fn function_names() {
        let to = Address::ZERO;
        let amount = U256::ZERO;
        assert_eq!(WriteCall::Pause.function_name(), "pause");
        assert_eq!(WriteCall::Unpause.function_name(), "unpause");
        assert_eq!(WriteCall::GrantMinterRole(to).function_name(), "grantMinterRole");
        assert_eq!(WriteCall::RevokeMinterRole(to).function_name(), "revokeMinterRole");
        assert_eq!(WriteCall::Mint { to, amount }.function_name(), "mint");
        assert_eq!(WriteCall::Transfer { to, amount }.function_name(), "transfer");
    }

    #[test]
    fn no_argument_calls_are_selector_only() {
        assert_eq!(WriteCall::Pause.calldata().len(), 4);
        assert_eq!(WriteCall::Unpause.calldata().len(), 4);
    }
}
