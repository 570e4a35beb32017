use soroban_sdk::{Address, Env, contracttype, token::TokenClient};

use crate::Error;

/// Asset loans are funded and repaid in.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SettlementAsset {
    /// Native asset contract. Payers authorize each transfer themselves.
    Native(Address),
    /// SEP-41 token. Payers grant this contract an allowance and the
    /// contract pulls funds with `transfer_from`.
    Token(Address),
}

impl SettlementAsset {
    pub fn address(&self) -> &Address {
        match self {
            SettlementAsset::Native(address) | SettlementAsset::Token(address) => address,
        }
    }

    fn client<'a>(&self, env: &'a Env) -> TokenClient<'a> {
        TokenClient::new(env, self.address())
    }

    /// Move `amount` from `from` to `to` on behalf of `from`.
    pub fn pay_from(&self, env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
        if amount == 0 {
            return Ok(());
        }
        let client = self.client(env);
        let result = match self {
            SettlementAsset::Native(_) => client.try_transfer(from, to, &amount),
            SettlementAsset::Token(_) => {
                client.try_transfer_from(&env.current_contract_address(), from, to, &amount)
            }
        };
        match result {
            Ok(Ok(())) => Ok(()),
            _ => Err(Error::TransferFailed),
        }
    }

    /// Move `amount` from `from` into this contract's custody.
    pub fn collect(&self, env: &Env, from: &Address, amount: i128) -> Result<(), Error> {
        self.pay_from(env, from, &env.current_contract_address(), amount)
    }

    /// Pay `amount` out of this contract's custody to `to`.
    pub fn release(&self, env: &Env, to: &Address, amount: i128) -> Result<(), Error> {
        if amount == 0 {
            return Ok(());
        }
        match self
            .client(env)
            .try_transfer(&env.current_contract_address(), to, &amount)
        {
            Ok(Ok(())) => Ok(()),
            _ => Err(Error::TransferFailed),
        }
    }
}
