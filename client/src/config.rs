//! # Chain Configuration & Constants
//!
//! Every magic number the client needs lives here: known chain registrations,
//! address prefixes, expiration defaults, retry tuning. If you're hardcoding
//! a constant somewhere else, you're doing it wrong.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Known chains
// ---------------------------------------------------------------------------

/// A chain the client knows how to talk to out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainParams {
    /// Hex-encoded SHA-256 of the chain's genesis state. This is what gets
    /// prepended to every signing pre-image, so getting it wrong produces
    /// signatures valid nowhere.
    pub chain_id: &'static str,
    /// Address/public-key prefix, e.g. `GPH` in `GPH6MRy...`.
    pub prefix: &'static str,
    /// Object id of the core asset used for fees.
    pub core_asset: &'static str,
    /// Friendly name, mainly for logging.
    pub name: &'static str,
}

/// Mainnet — the real deal. Mistakes here cost real money.
pub const CHAIN_MAINNET: ChainParams = ChainParams {
    chain_id: "6057d856c398875cac2650fe6a5a6b98fa134b5e1b775ba133b50ac5d6c12cbb",
    prefix: "GPH",
    core_asset: "1.3.0",
    name: "mainnet",
};

/// Testnet — where we break things on purpose and call it "testing."
pub const CHAIN_TESTNET: ChainParams = ChainParams {
    chain_id: "2ad1a1f442e89bcf30dbb087c21f4f85fd904eda7d2f24a3f8a161946a69cd0e",
    prefix: "TEST",
    core_asset: "1.3.0",
    name: "testnet",
};

/// Devnet — reset weekly, no promises, no survivors.
pub const CHAIN_DEVNET: ChainParams = ChainParams {
    chain_id: "8f0ec8b1b2d0ea8f6c96b3a08c4b1d7a4b1a69d4a8f9b5e3c7d2e1f0a9b8c7d6",
    prefix: "DEV",
    core_asset: "1.3.0",
    name: "devnet",
};

/// Chains the client recognizes by id at connect time.
pub const KNOWN_CHAINS: &[ChainParams] = &[CHAIN_MAINNET, CHAIN_TESTNET, CHAIN_DEVNET];

/// Prefix assumed when a key string carries none and no chain is known yet.
pub const DEFAULT_PREFIX: &str = "GPH";

/// Look up a known chain by its id. Returns `None` for unrecognized
/// chains — we don't guess.
pub fn chain_by_id(chain_id: &str) -> Option<&'static ChainParams> {
    KNOWN_CHAINS.iter().find(|c| c.chain_id == chain_id)
}

// ---------------------------------------------------------------------------
// Transaction timing
// ---------------------------------------------------------------------------

/// Default transaction expiration window. If your tx hasn't been included
/// within 30 seconds, the anchor block is stale anyway — resubmit.
pub const TX_EXPIRATION: Duration = Duration::from_secs(30);

/// Default lifetime of a proposal before it lapses unexecuted. The review
/// period, when a proposal wants one, is the caller's to choose.
pub const PROPOSAL_EXPIRATION: Duration = Duration::from_secs(2 * 24 * 60 * 60);

// ---------------------------------------------------------------------------
// Transport tuning
// ---------------------------------------------------------------------------

/// Reconnect backoff grows linearly, two seconds per failed attempt, and
/// stops here. Waiting longer than this buys nothing.
pub const RECONNECT_BACKOFF_CAP: Duration = Duration::from_secs(10);

/// Attempts before the backoff formula gives up on linear growth and sits
/// at the cap.
pub const RECONNECT_BACKOFF_KNEE: u32 = 10;

/// Default retry budget for transport failures. Negative means retry
/// forever, which is what long-running services actually want.
pub const DEFAULT_NUM_RETRIES: i32 = -1;

/// How often the confirmation loop polls for a broadcast transaction to
/// appear in a produced block.
pub const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Signer resolution
// ---------------------------------------------------------------------------

/// Maximum account-authority recursion depth when collecting signing keys.
/// Matches the chain's own recursion limit; deeper delegation chains cannot
/// satisfy an authority anyway.
pub const MAX_AUTHORITY_DEPTH: u8 = 2;
