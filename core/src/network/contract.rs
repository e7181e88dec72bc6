use ethers::abi::Abi;

use crate::error::{ClientError, Result};

pub const GET_ALL_MESSAGES: &str = "getAllMessages";
pub const GET_BALANCE: &str = "getBalance";
pub const PAY: &str = "pay";

const MESSAGE_STORAGE_ABI: &str = include_str!("../../abi/MessageStorage.json");

/// Interface of the deployed message storage contract.
pub fn message_storage_abi() -> Result<Abi> {
    serde_json::from_str(MESSAGE_STORAGE_ABI)
        .map_err(|e| ClientError::InvalidState(format!("Bundled contract ABI is invalid: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{ParamType, StateMutability};

    #[test]
    fn abi_exposes_the_three_functions() {
        let abi = message_storage_abi().unwrap();

        let all = abi.function(GET_ALL_MESSAGES).unwrap();
        assert_eq!(all.state_mutability, StateMutability::View);
        assert_eq!(
            all.outputs[0].kind,
            ParamType::Array(Box::new(ParamType::Tuple(vec![
                ParamType::Address,
                ParamType::String,
                ParamType::Uint(256),
            ])))
        );

        let balance = abi.function(GET_BALANCE).unwrap();
        assert_eq!(balance.outputs[0].kind, ParamType::Uint(256));

        let pay = abi.function(PAY).unwrap();
        assert_eq!(pay.state_mutability, StateMutability::Payable);
        assert_eq!(pay.inputs[0].kind, ParamType::String);
    }
}
