//! Endpoint pairs joining a session to its transport thread.

use smallvec::SmallVec;
use transport::{Envelope, Mailbox, MsgQueue};

use crate::codec::{Codec, PortClass};
use crate::error::FabricResult;
use crate::outcome::SubmitOutcome;
use crate::port::{ConsumerPort, PortMetricsSnapshot, PortPair, ProducerPort};

/// Byte budgets for one direction of a link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkSpec {
    pub lossless_bytes: usize,
    pub besteffort_bytes: usize,
    pub coalesce_bytes: usize,
    /// Envelope reported by an empty coalescing mailbox.
    pub coalesce_envelope: Envelope,
}

impl Default for LinkSpec {
    fn default() -> Self {
        Self {
            lossless_bytes: 512 * 1024,
            besteffort_bytes: 256 * 1024,
            coalesce_bytes: 64 * 1024,
            coalesce_envelope: Envelope::new(0, 0),
        }
    }
}

#[derive(Clone)]
struct Ports<T> {
    lossless: T,
    besteffort: T,
    coalesce: T,
}

impl<T> Ports<T> {
    fn get(&self, class: PortClass) -> &T {
        match class {
            PortClass::Lossless => &self.lossless,
            PortClass::BestEffort => &self.besteffort,
            PortClass::Coalesce => &self.coalesce,
        }
    }
}

struct Lane {
    lossless: PortPair,
    besteffort: PortPair,
    coalesce: PortPair,
}

impl Lane {
    fn new(spec: &LinkSpec) -> FabricResult<Self> {
        Ok(Self {
            lossless: PortPair::queued(PortClass::Lossless, MsgQueue::new(spec.lossless_bytes)?)?,
            besteffort: PortPair::queued(
                PortClass::BestEffort,
                MsgQueue::new(spec.besteffort_bytes)?,
            )?,
            coalesce: PortPair::coalescing(Mailbox::new(
                spec.coalesce_bytes,
                spec.coalesce_envelope,
            )?),
        })
    }

    fn split(self) -> (Ports<ProducerPort>, Ports<ConsumerPort>) {
        (
            Ports {
                lossless: self.lossless.producer,
                besteffort: self.besteffort.producer,
                coalesce: self.coalesce.producer,
            },
            Ports {
                lossless: self.lossless.consumer,
                besteffort: self.besteffort.consumer,
                coalesce: self.coalesce.consumer,
            },
        )
    }
}

/// Builds both ends of a link.
///
/// The handle sends typed items outbound and drains typed items inbound; the
/// worker endpoint sees the same traffic from the opposite side as raw
/// envelopes.
pub fn build_link<C: Codec>(
    codec: C,
    spec: &LinkSpec,
) -> FabricResult<(EndpointHandle<C>, WorkerEndpoint)> {
    let (out_producers, out_consumers) = Lane::new(spec)?.split();
    let (in_producers, in_consumers) = Lane::new(spec)?.split();
    Ok((
        EndpointHandle {
            codec,
            outbound: out_producers,
            inbound: in_consumers,
        },
        WorkerEndpoint {
            outbound: out_consumers,
            inbound: in_producers,
        },
    ))
}

/// Session-side end of a link.
#[derive(Clone)]
pub struct EndpointHandle<C: Codec> {
    codec: C,
    outbound: Ports<ProducerPort>,
    inbound: Ports<ConsumerPort>,
}

impl<C: Codec> EndpointHandle<C> {
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Encodes `item` and queues it on the port its class selects.
    pub fn send(&self, item: &C::Item) -> FabricResult<SubmitOutcome> {
        let encoded = self.codec.encode(item)?;
        self.outbound
            .get(encoded.class)
            .try_send(encoded.envelope, &encoded.payload)
    }

    /// Ordered inbound records waiting to be drained.
    pub fn pending(&self) -> usize {
        self.inbound.lossless.pending() + self.inbound.besteffort.pending()
    }

    /// Drains up to `max` ordered inbound items, lossless port first.
    ///
    /// Each port preserves arrival order. Items that fail to decode are
    /// returned as errors so the caller decides how to report them.
    pub fn drain(&self, max: usize) -> SmallVec<[FabricResult<C::Item>; 8]> {
        let mut out = SmallVec::new();
        let mut remaining = max;
        for port in [&self.inbound.lossless, &self.inbound.besteffort] {
            if remaining == 0 {
                break;
            }
            let drained = port.drain_records(remaining, |envelope, payload| {
                out.push(self.codec.decode(envelope, payload));
            });
            remaining -= drained;
        }
        out
    }

    /// Takes the newest coalesced inbound item, if one arrived since the last take.
    pub fn take_latest(&self) -> Option<FabricResult<C::Item>> {
        let mut latest = None;
        self.inbound
            .coalesce
            .drain_records(1, |envelope, payload| {
                latest = Some(self.codec.decode(envelope, payload));
            });
        latest
    }

    /// Returns `true` when a coalesced item is waiting.
    pub fn has_latest(&self) -> bool {
        self.inbound.coalesce.pending() > 0
    }

    /// Drops all inbound traffic that has not been drained yet.
    pub fn discard_inbound(&self) -> usize {
        PortClass::ALL
            .iter()
            .map(|class| self.inbound.get(*class).discard_pending())
            .sum()
    }

    /// Aggregated outbound metrics across every port class.
    pub fn outbound_metrics(&self) -> PortMetricsSnapshot {
        PortClass::ALL
            .iter()
            .map(|class| self.outbound.get(*class).metrics())
            .fold(PortMetricsSnapshot::default(), |acc, m| acc + m)
    }

    pub fn outbound_metrics_for(&self, class: PortClass) -> PortMetricsSnapshot {
        self.outbound.get(class).metrics()
    }
}

/// Transport-side end of a link.
pub struct WorkerEndpoint {
    outbound: Ports<ConsumerPort>,
    inbound: Ports<ProducerPort>,
}

impl WorkerEndpoint {
    /// Moves up to `max` outbound records per port class into `f`.
    pub fn drain_outbound<F>(&self, max: usize, mut f: F) -> usize
    where
        F: FnMut(PortClass, Envelope, &[u8]),
    {
        PortClass::ALL
            .iter()
            .map(|class| {
                self.outbound
                    .get(*class)
                    .drain_records(max, |envelope, payload| f(*class, envelope, payload))
            })
            .sum()
    }

    /// Moves outbound records into `f` until it refuses one. A refused
    /// lossless or best-effort record stays queued and ends that class's
    /// round; the other classes still drain.
    pub fn forward_outbound<F>(&self, max: usize, mut f: F) -> usize
    where
        F: FnMut(PortClass, Envelope, &[u8]) -> bool,
    {
        PortClass::ALL
            .iter()
            .map(|class| {
                self.outbound
                    .get(*class)
                    .forward_records(max, |envelope, payload| f(*class, envelope, payload))
            })
            .sum()
    }

    /// Outbound records the session queued and the transport has not moved yet.
    pub fn outbound_pending(&self) -> usize {
        PortClass::ALL
            .iter()
            .map(|class| self.outbound.get(*class).pending())
            .sum()
    }

    /// Drops every outbound record the session has queued.
    pub fn discard_outbound(&self) -> usize {
        PortClass::ALL
            .iter()
            .map(|class| self.outbound.get(*class).discard_pending())
            .sum()
    }

    /// Hands a record received from the peer to the session's inbound port.
    pub fn deliver(
        &self,
        class: PortClass,
        envelope: Envelope,
        payload: &[u8],
    ) -> FabricResult<SubmitOutcome> {
        self.inbound.get(class).try_send(envelope, payload)
    }
}
