use std::sync::Arc;

use parking_lot::Mutex;
use remoting_config::Role;
use transport::Envelope;
use transport_fabric::{PortClass, SubmitOutcome, TransportEngine, WorkerEndpoint};

use crate::fabric::{Counters, Fabric, Side};

/// Relays queued packets between the two sides while the link is up.
pub(crate) struct PumpEngine {
    fabric: Arc<Mutex<Fabric>>,
    max_batch: usize,
}

impl PumpEngine {
    pub(crate) fn new(fabric: Arc<Mutex<Fabric>>, max_batch: usize) -> Self {
        Self { fabric, max_batch }
    }
}

impl TransportEngine for PumpEngine {
    fn poll(&mut self) -> usize {
        let mut fabric = self.fabric.lock();
        if !fabric.linked {
            return 0;
        }
        let Fabric { server, client, .. } = &mut *fabric;
        let moved = relay(Role::Server, server, client, self.max_batch)
            + relay(Role::Client, client, server, self.max_batch);
        if moved > 0 {
            fabric.publish_stats();
        }
        moved
    }

    fn name(&self) -> &'static str {
        "loopback-pump"
    }
}

/// Moves what the peer will take. A lossless record the peer refuses stays
/// in the sender's queue, so a slow reader backs up into the sender's
/// outbound port instead of losing packets.
fn relay(role: Role, from: &mut Side, to: &mut Side, max_batch: usize) -> usize {
    let (Some(source), Some(target)) = (&from.worker, &to.worker) else {
        return 0;
    };
    let mut sent = Counters::default();
    let mut received = Counters::default();
    let moved = source.forward_outbound(max_batch, |class, envelope, payload| {
        let taken = match deliver(target, class, envelope, payload) {
            Delivery::Accepted => {
                received.record(payload.len());
                true
            }
            Delivery::Refused => false,
            Delivery::Dropped => {
                log::trace!("{class:?} packet from {role:?} dropped at the peer");
                true
            }
        };
        if taken {
            sent.record(payload.len());
            if from.tracing {
                tracing::trace!(
                    target: "transport",
                    from = ?role,
                    ?class,
                    tag = envelope.tag,
                    bytes = payload.len(),
                    "packet relayed"
                );
            }
        }
        taken
    });
    from.sent.packets += sent.packets;
    from.sent.bytes += sent.bytes;
    to.received.packets += received.packets;
    to.received.bytes += received.bytes;
    moved
}

enum Delivery {
    Accepted,
    /// Peer queue is full; retry next round.
    Refused,
    Dropped,
}

fn deliver(
    target: &WorkerEndpoint,
    class: PortClass,
    envelope: Envelope,
    payload: &[u8],
) -> Delivery {
    match target.deliver(class, envelope, payload) {
        Ok(SubmitOutcome::WouldBlock) => Delivery::Refused,
        Ok(outcome) if outcome.is_delivered() => Delivery::Accepted,
        Ok(_) => Delivery::Dropped,
        Err(err) => {
            log::warn!("loopback delivery failed: {err}");
            Delivery::Dropped
        }
    }
}
