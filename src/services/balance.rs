use async_trait::async_trait;
use ethers::{
    providers::{Http, Provider},
    types::{Address, U256},
    utils::format_units,
};
use std::str::FromStr;
use std::sync::Arc;

use crate::{
    config::Config,
    error::{AppError, Result},
};

ethers::contract::abigen!(
    Bep20,
    r#"[
        function balanceOf(address) view returns (uint256)
        function decimals() view returns (uint8)
    ]"#
);

/// Read-only token balance lookup.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Token balance of `address` in whole units. Never fails: any lookup
    /// error yields `0.0`.
    async fn get_balance(&self, address: &str) -> f64;
}

/// SLH balance read from the BEP-20 contract over BSC JSON-RPC.
pub struct Bep20Balance {
    provider: Arc<Provider<Http>>,
    token: Address,
}

impl Bep20Balance {
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.bsc_rpc_url.as_str())
            .map_err(|e| AppError::Internal(format!("Invalid BSC RPC URL: {}", e)))?;
        let token = Address::from_str(&config.slh_token_address)
            .map_err(|_| AppError::Internal("Invalid SLH token address".to_string()))?;

        Ok(Self {
            provider: Arc::new(provider),
            token,
        })
    }

    async fn fetch_balance(&self, address: &str) -> Result<f64> {
        let owner = Address::from_str(address)
            .map_err(|_| AppError::BadRequest(format!("Invalid wallet address: {}", address)))?;
        let contract = Bep20::new(self.token, self.provider.clone());

        let raw = contract
            .balance_of(owner)
            .call()
            .await
            .map_err(|e| AppError::BlockchainRPC(e.to_string()))?;
        let decimals = contract
            .decimals()
            .call()
            .await
            .map_err(|e| AppError::BlockchainRPC(e.to_string()))?;

        scale_units(raw, decimals)
    }
}

#[async_trait]
impl BalanceSource for Bep20Balance {
    async fn get_balance(&self, address: &str) -> f64 {
        match self.fetch_balance(address).await {
            Ok(balance) => balance,
            Err(e) => {
                tracing::error!("Error getting balance for {}: {}", address, e);
                0.0
            }
        }
    }
}

/// `raw / 10^decimals` without going through `u128`.
pub fn scale_units(raw: U256, decimals: u8) -> Result<f64> {
    let text = format_units(raw, decimals as u32)
        .map_err(|e| AppError::Internal(format!("Invalid token amount: {}", e)))?;
    text.parse::<f64>()
        .map_err(|e| AppError::Internal(format!("Invalid token amount: {}", e)))
}
