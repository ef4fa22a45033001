//! Wallet connection.

use alloy::{network::EthereumWallet, primitives::Address, signers::local::PrivateKeySigner};

use crate::error::{AppError, Result};

/// The signing side of the client.
///
/// A connected wallet holds a local signer; a disconnected one still allows
/// every read but refuses to submit transactions.
#[derive(Clone, Default)]
pub enum WalletConnection {
    /// Signer loaded from a private key.
    Connected { signer: PrivateKeySigner, address: Address },
    /// No key configured.
    #[default]
    Disconnected,
}

impl WalletConnection {
    /// Connect from a hex private key (with or without `0x`).
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let signer: PrivateKeySigner = key.parse().map_err(AppError::from)?;
        let address = signer.address();

        tracing::info!(address = %address, "Wallet connected");

        Ok(Self::Connected { signer, address })
    }

    /// Connect when a non-empty key is given, stay disconnected otherwise.
    pub fn from_optional_key(private_key: Option<&str>) -> Result<Self> {
        match private_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => Self::from_private_key(key),
            None => {
                tracing::warn!("No private key configured; running read-only");
                Ok(Self::Disconnected)
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Wallet address, if connected.
    pub fn address(&self) -> Option<Address> {
        match self {
            Self::Connected { address, .. } => Some(*address),
            Self::Disconnected => None,
        }
    }

    /// Wallet address, or `WalletNotConnected`.
    pub fn require_address(&self) -> Result<Address> {
        self.address().ok_or(AppError::WalletNotConnected)
    }

    /// Network wallet for the provider's signing filler.
    pub fn ethereum_wallet(&self) -> Option<EthereumWallet> {
        match self {
            Self::Connected { signer, .. } => Some(EthereumWallet::from(signer.clone())),
            Self::Disconnected => None,
        }
    }
}

impl std::fmt::Debug for WalletConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected { address, .. } => {
                f.debug_struct("Connected").field("address", address).finish()
            }
            Self::Disconnected => f.write_str("Disconnected"),
        }
    }
}
