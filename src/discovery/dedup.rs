//! Cleanup passes over raw discovery answers

use crate::types::Remote;

/// Drop loopback answers that have a routable twin
///
/// A loopback entry is discarded when another entry carries the same host
/// name with a different IPv4 address. A host that only answered over
/// loopback is kept, since that may be the only route to it (controller and
/// receiver on the same machine).
#[must_use]
pub fn suppress_loopback(remotes: &[Remote]) -> Vec<Remote> {
    remotes
        .iter()
        .filter(|rm| {
            if !rm.is_loopback() {
                return true;
            }

            let has_twin = remotes
                .iter()
                .any(|other| other.name == rm.name && other.ipv4 != rm.ipv4);
            if has_twin {
                tracing::debug!("Dropping loopback answer for {}", rm.name);
            }
            !has_twin
        })
        .cloned()
        .collect()
}

/// Remove duplicate answers
///
/// Answers are scanned from last-received to first-received. Local and
/// virtual adapters tend to answer first, so scanning backwards keeps the
/// slower answer from the external interface. An answer is skipped when an
/// accepted entry is identical, or shares its `(name, port)`.
///
/// The result is in scan order.
#[must_use]
pub fn dedup_remotes(remotes: &[Remote]) -> Vec<Remote> {
    let mut accepted: Vec<Remote> = Vec::with_capacity(remotes.len());

    for rm in remotes.iter().rev() {
        if accepted.iter().any(|a| a == rm || a.same_service(rm)) {
            tracing::debug!("Skipping duplicate for {}", rm.name);
            continue;
        }
        accepted.push(rm.clone());
    }

    accepted
}
