//! Broadcast engine
//!
//! Delivers one message to every registered peer except an excluded one.

use log::{debug, warn};

use crate::broadcast::BroadcastReport;
use crate::connection::ConnectionRegistry;
use crate::peer::PeerId;
use crate::protocol::Message;

/// Sends `message` to every peer in a registry snapshot except `excluded`.
///
/// - Exclusion is by identity, whether or not `excluded` is still registered.
/// - A failed write to one peer is logged and does not stop delivery to the
///   others. The failing peer's own handler is left to notice the broken
///   connection; the registry is never modified here.
/// - Recipients are written to one after another, so two broadcasts awaited
///   in sequence reach each recipient in that order.
pub async fn broadcast(
    registry: &ConnectionRegistry,
    message: &Message,
    excluded: PeerId,
) -> BroadcastReport {
    let recipients = registry.snapshot().await;
    let payload = message.render();
    let mut report = BroadcastReport::default();

    for peer in recipients.iter().filter(|peer| peer.id() != excluded) {
        match peer.send(payload.as_bytes()).await {
            Ok(()) => report.delivered.push(peer.id()),
            Err(e) => {
                warn!(
                    "Failed to deliver message from {} to {} ({}): {}",
                    message.origin(),
                    peer.id(),
                    peer.addr(),
                    e
                );
                report.failed.push(peer.id());
            }
        }
    }

    debug!(
        "Broadcast from {} reached {}/{} peers",
        message.origin(),
        report.delivered.len(),
        report.attempted()
    );

    report
}
