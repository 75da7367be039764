pub mod amount;
pub mod config;
pub mod error;
pub mod outcome;
pub mod rest;
pub mod session;
pub mod status;
pub mod types;

// ---- Top-level re-exports for ergonomic usage ----

// Amounts
pub use amount::{from_base_units, scale_decimal, to_base_units, to_base_units_checked, Amount};

// Clients
pub use rest::{ApiClient, ScoreClient};

// Config + errors
pub use config::ClientConfig;
pub use error::{PassportError, Result};

// Side effects
pub use outcome::{LogEvents, Notice, NoticeKind, Outcome, Route, SessionEvents};

// Session
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};

// Connection status
pub use status::{resolve_for, ConnectionStatus, WalletAdapter, WalletSignals};

// Wire types
pub use types::{ScoreData, ScoreEnvelope, UserProfile};
