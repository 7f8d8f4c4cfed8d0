//! Authoritative snapshot reader
//!
//! Issues the six protocol reads concurrently and assembles a [`Snapshot`].
//! Each read is independently fault-tolerant: a failure substitutes the
//! neutral default for that field instead of aborting the whole fetch, so a
//! single unavailable accessor never blocks displaying the others.

use crate::core::traits::ChainAuthority;
use crate::types::{Address, AuthorityError, Snapshot};
use tracing::debug;

fn degraded<T: Default>(field: &'static str, result: Result<T, AuthorityError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            debug!(field, error = %err, "snapshot read degraded, using neutral default");
            T::default()
        }
    }
}

/// Fetch a fresh snapshot for the connected account
///
/// Never fails as a whole and has no side effects beyond the reads.
pub async fn fetch_snapshot<A>(authority: &A, account: &Address) -> Snapshot
where
    A: ChainAuthority + ?Sized,
{
    let (gas_tank, next_id, owner, paused, tvl, tax_vault) = futures::join!(
        authority.gas_tank(account),
        authority.next_stream_id(),
        authority.owner(),
        authority.is_paused(),
        authority.protocol_tvl(),
        authority.tax_vault(account),
    );

    let owner = match owner {
        Ok(addr) => Some(addr),
        Err(err) => {
            debug!(field = "owner", error = %err, "snapshot read degraded, owner unknown");
            None
        }
    };

    Snapshot {
        tvl: degraded("tvl", tvl),
        gas_tank: degraded("gas_tank", gas_tank),
        tax_vault: degraded("tax_vault", tax_vault),
        active_streams: degraded("next_stream_id", next_id),
        owner,
        paused: degraded("is_paused", paused),
    }
}
