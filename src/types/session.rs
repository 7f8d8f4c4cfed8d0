//! Session-related types for the PayStream Engine
//!
//! This module defines the connected principal: its address, its write
//! credential, and the capability derived from the authority's owner address.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Opaque on-chain account identifier
///
/// Addresses compare and hash case-insensitively: the authority reports
/// checksummed (mixed-case) addresses while wallets report lowercase ones,
/// and both must refer to the same account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create an address from its string form, preserving the original casing
    pub fn new(raw: impl Into<String>) -> Self {
        Address(raw.into())
    }

    /// The address exactly as it was provided
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty address (used as a neutral default)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl Default for Address {
    fn default() -> Self {
        Address(String::new())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(raw: &str) -> Self {
        Address::new(raw)
    }
}

/// Opaque handle to a signing key
///
/// The engine never inspects the credential; its presence is what gates
/// write actions. Key management lives outside the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteCredential(String);

impl WriteCredential {
    pub fn new(handle: impl Into<String>) -> Self {
        WriteCredential(handle.into())
    }
}

/// Capability level of a connected session
///
/// Derived on every snapshot by comparing the session address with the
/// authority's owner address (case-insensitive). Privileged sessions may
/// toggle the protocol pause flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capability {
    /// Regular employer/employee account
    #[default]
    Ordinary,
    /// The contract owner
    Privileged,
}

/// Identity of the connected principal
///
/// Created on wallet connection, destroyed on disconnect. The session owns
/// all derived state (snapshot, accrual, ledger); none of it survives the
/// session.
#[derive(Debug, Clone)]
pub struct AccountSession {
    /// The connected account address
    pub address: Address,

    /// Write credential, if the wallet granted one
    ///
    /// Actions requested without a credential are silent no-ops.
    pub credential: Option<WriteCredential>,

    /// Capability derived from the latest snapshot
    pub capability: Capability,
}

impl AccountSession {
    /// Create a session for a freshly connected address
    ///
    /// Capability starts as `Ordinary` and is re-derived from the first
    /// snapshot.
    pub fn new(address: Address, credential: Option<WriteCredential>) -> Self {
        AccountSession {
            address,
            credential,
            capability: Capability::default(),
        }
    }

    /// Whether this session can submit state-changing requests
    pub fn can_write(&self) -> bool {
        self.credential.is_some() && !self.address.is_empty()
    }

    /// Whether this session holds the owner capability
    pub fn is_privileged(&self) -> bool {
        self.capability == Capability::Privileged
    }
}
