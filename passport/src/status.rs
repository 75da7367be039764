//! Wallet connection status derived from auth state and the wallet adapter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Combined connection health shown to the user. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionStatus {
    Disconnected,
    FullyConnected,
    AuthOnly,
    WalletOnly,
    Partial,
}

impl ConnectionStatus {
    /// Evaluate the status. Rules apply in order; the first match wins.
    ///
    /// The `AuthOnly` arm can never match because a disconnected wallet is
    /// already caught by the first rule. It stays so the rule table reads the
    /// same as the status list.
    pub fn resolve(wallet_connected: bool, is_authenticated: bool, can_submit: bool) -> Self {
        if !wallet_connected {
            ConnectionStatus::Disconnected
        } else if is_authenticated && wallet_connected && can_submit {
            ConnectionStatus::FullyConnected
        } else if is_authenticated && !wallet_connected {
            ConnectionStatus::AuthOnly
        } else if wallet_connected && !is_authenticated {
            ConnectionStatus::WalletOnly
        } else {
            ConnectionStatus::Partial
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::FullyConnected => "Fully Connected",
            ConnectionStatus::AuthOnly => "Authenticated Only",
            ConnectionStatus::WalletOnly => "Wallet Only",
            ConnectionStatus::Partial => "Partially Connected",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::FullyConnected => "fully-connected",
            ConnectionStatus::AuthOnly => "auth-only",
            ConnectionStatus::WalletOnly => "wallet-only",
            ConnectionStatus::Partial => "partial",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two signals read from a wallet adapter.
pub trait WalletAdapter {
    fn connected(&self) -> bool;

    /// Whether a transaction-signing capability is present.
    fn can_submit(&self) -> bool;
}

/// Snapshot of wallet adapter state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletSignals {
    pub connected: bool,
    pub can_submit: bool,
}

impl WalletAdapter for WalletSignals {
    fn connected(&self) -> bool {
        self.connected
    }

    fn can_submit(&self) -> bool {
        self.can_submit
    }
}

/// Resolve the status for a live adapter.
pub fn resolve_for<A: WalletAdapter + ?Sized>(adapter: &A, is_authenticated: bool) -> ConnectionStatus {
    ConnectionStatus::resolve(adapter.connected(), is_authenticated, adapter.can_submit())
}
