//! Link semantics integration tests.
//! Covers per-class ordering, coalescing, backpressure outcomes and the
//! worker runtime loop, with property checks for FIFO and latest-wins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use proptest::prelude::*;
use transport::schema::SCHEMA_VERSION_V1;
use transport::Envelope;
use transport_fabric::{
    build_link, Codec, Encoded, FabricError, FabricResult, LinkSpec, PortClass, SubmitOutcome,
    TransportEngine, WorkerEndpoint, WorkerRuntime,
};

const SAMPLE_TAG: u8 = 0xE1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sample {
    Ordered(u32),
    Lossy(u32),
    Latest(u32),
}

#[derive(Clone, Default)]
struct SampleCodec;

impl Codec for SampleCodec {
    type Item = Sample;

    fn encode(&self, item: &Sample) -> FabricResult<Encoded> {
        let (variant, value, class) = match *item {
            Sample::Ordered(x) => (0u8, x, PortClass::Lossless),
            Sample::Lossy(x) => (1, x, PortClass::BestEffort),
            Sample::Latest(x) => (2, x, PortClass::Coalesce),
        };
        let mut payload = Vec::with_capacity(5);
        payload.push(variant);
        payload.extend_from_slice(&value.to_le_bytes());
        Ok(Encoded::new(
            class,
            Envelope::new(SAMPLE_TAG, SCHEMA_VERSION_V1),
            payload,
        ))
    }

    fn decode(&self, envelope: Envelope, payload: &[u8]) -> FabricResult<Sample> {
        if envelope.tag != SAMPLE_TAG {
            return Err(FabricError::codec("unexpected sample envelope"));
        }
        if payload.len() != 5 {
            return Err(FabricError::codec("invalid sample payload length"));
        }
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&payload[1..]);
        let value = u32::from_le_bytes(buf);
        match payload[0] {
            0 => Ok(Sample::Ordered(value)),
            1 => Ok(Sample::Lossy(value)),
            2 => Ok(Sample::Latest(value)),
            _ => Err(FabricError::codec("unknown sample variant")),
        }
    }
}

fn small_spec() -> LinkSpec {
    LinkSpec {
        lossless_bytes: 64,
        besteffort_bytes: 64,
        coalesce_bytes: 16,
        ..LinkSpec::default()
    }
}

/// Moves everything one endpoint queued outbound into another endpoint's inbound ports.
fn shuttle(from: &WorkerEndpoint, to: &WorkerEndpoint) -> usize {
    from.drain_outbound(usize::MAX, |class, envelope, payload| {
        let _ = to.deliver(class, envelope, payload);
    })
}

fn values(items: impl IntoIterator<Item = FabricResult<Sample>>) -> Vec<Sample> {
    items
        .into_iter()
        .map(|item| item.expect("sample decodes"))
        .collect()
}

/// Lossless traffic drains ahead of best-effort traffic, each in send order.
#[test]
fn drain_orders_lossless_before_besteffort() {
    let (a, a_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();
    let (b, b_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();

    a.send(&Sample::Lossy(10)).unwrap();
    a.send(&Sample::Ordered(1)).unwrap();
    a.send(&Sample::Lossy(11)).unwrap();
    a.send(&Sample::Ordered(2)).unwrap();
    assert_eq!(shuttle(&a_worker, &b_worker), 4);

    assert_eq!(b.pending(), 4);
    assert_eq!(
        values(b.drain(16)),
        vec![
            Sample::Ordered(1),
            Sample::Ordered(2),
            Sample::Lossy(10),
            Sample::Lossy(11)
        ]
    );
    assert_eq!(b.pending(), 0);
}

/// `drain` honours its budget and leaves the rest queued.
#[test]
fn drain_respects_budget() {
    let (a, a_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();
    let (b, b_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();

    for i in 0..5 {
        a.send(&Sample::Ordered(i)).unwrap();
    }
    shuttle(&a_worker, &b_worker);

    assert_eq!(values(b.drain(2)), vec![Sample::Ordered(0), Sample::Ordered(1)]);
    assert_eq!(b.pending(), 3);
    assert_eq!(b.drain(0).len(), 0);
}

/// Coalesced items keep only the newest value.
#[test]
fn coalesce_keeps_latest() {
    let (a, a_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();
    let (b, b_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();

    assert_eq!(a.send(&Sample::Latest(1)).unwrap(), SubmitOutcome::Accepted);
    assert_eq!(a.send(&Sample::Latest(2)).unwrap(), SubmitOutcome::Coalesced);
    shuttle(&a_worker, &b_worker);

    assert!(b.has_latest());
    assert_eq!(b.take_latest().unwrap().unwrap(), Sample::Latest(2));
    assert!(b.take_latest().is_none());
    assert_eq!(a.outbound_metrics_for(PortClass::Coalesce).coalesced, 1);
}

/// A full lossless queue reports `WouldBlock` while best-effort reports `Dropped`.
#[test]
fn full_queues_report_by_class() {
    let (a, _worker) = build_link(SampleCodec, &small_spec()).unwrap();

    let mut ordered = Vec::new();
    let mut lossy = Vec::new();
    for i in 0..8 {
        ordered.push(a.send(&Sample::Ordered(i)).unwrap());
        lossy.push(a.send(&Sample::Lossy(i)).unwrap());
    }

    assert!(ordered.contains(&SubmitOutcome::WouldBlock));
    assert!(!ordered.contains(&SubmitOutcome::Dropped));
    assert!(lossy.contains(&SubmitOutcome::Dropped));
    assert!(!lossy.contains(&SubmitOutcome::WouldBlock));

    let metrics = a.outbound_metrics();
    assert_eq!(
        metrics.accepted + metrics.would_block + metrics.dropped,
        16
    );
}

/// Bad payloads delivered by the transport come back as errors in order.
#[test]
fn delivered_garbage_yields_codec_error() {
    let (b, b_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();

    b_worker
        .deliver(
            PortClass::Lossless,
            Envelope::new(SAMPLE_TAG, SCHEMA_VERSION_V1),
            &[9, 9],
        )
        .unwrap();
    b_worker
        .deliver(
            PortClass::Lossless,
            Envelope::new(SAMPLE_TAG, SCHEMA_VERSION_V1),
            &[0, 7, 0, 0, 0],
        )
        .unwrap();

    let drained = b.drain(8);
    assert_eq!(drained.len(), 2);
    assert!(matches!(drained[0], Err(FabricError::Codec(_))));
    assert_eq!(*drained[1].as_ref().unwrap(), Sample::Ordered(7));
}

/// Discarding drops every class of pending traffic.
#[test]
fn discard_clears_everything() {
    let (a, a_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();
    let (b, b_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();

    a.send(&Sample::Ordered(1)).unwrap();
    a.send(&Sample::Lossy(2)).unwrap();
    a.send(&Sample::Latest(3)).unwrap();
    assert_eq!(a_worker.outbound_pending(), 3);
    shuttle(&a_worker, &b_worker);

    assert_eq!(b.discard_inbound(), 3);
    assert_eq!(b.pending(), 0);
    assert!(!b.has_latest());

    a.send(&Sample::Ordered(4)).unwrap();
    assert_eq!(a_worker.discard_outbound(), 1);
    assert_eq!(a_worker.outbound_pending(), 0);
}

struct Shuttle {
    from: WorkerEndpoint,
    to: WorkerEndpoint,
}

impl TransportEngine for Shuttle {
    fn poll(&mut self) -> usize {
        shuttle(&self.from, &self.to)
    }

    fn name(&self) -> &'static str {
        "shuttle"
    }
}

/// A runtime thread moves traffic until it is asked to stop.
#[test]
fn runtime_moves_traffic_until_stopped() {
    let (a, a_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();
    let (b, b_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = Arc::clone(&stop);
    let worker = thread::spawn(move || {
        let mut runtime = WorkerRuntime::new();
        runtime.register(Shuttle {
            from: a_worker,
            to: b_worker,
        });
        runtime.run_until(&thread_stop, Duration::from_millis(1));
    });

    for i in 0..32 {
        a.send(&Sample::Ordered(i)).unwrap();
    }

    let mut received = Vec::new();
    for _ in 0..2000 {
        received.extend(values(b.drain(64)));
        if received.len() == 32 {
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }

    stop.store(true, Ordering::Release);
    worker.join().unwrap();

    assert_eq!(received, (0..32).map(Sample::Ordered).collect::<Vec<_>>());
}

/// `settle` keeps ticking until a pass moves nothing.
#[test]
fn settle_drains_pending() {
    let (a, a_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();
    let (b, b_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();
    a.send(&Sample::Ordered(5)).unwrap();

    let mut runtime = WorkerRuntime::default();
    runtime.register(Shuttle {
        from: a_worker,
        to: b_worker,
    });
    assert_eq!(runtime.settle(Duration::ZERO), 1);

    assert_eq!(values(b.drain(4)), vec![Sample::Ordered(5)]);
}

proptest! {
    /// Every accepted lossless send arrives once, in order.
    #[test]
    fn lossless_is_fifo(seq in proptest::collection::vec(any::<u32>(), 0..64)) {
        let (a, a_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();
        let (b, b_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();
        for v in &seq {
            prop_assert_eq!(a.send(&Sample::Ordered(*v)).unwrap(), SubmitOutcome::Accepted);
        }
        shuttle(&a_worker, &b_worker);
        let got = values(b.drain(usize::MAX));
        prop_assert_eq!(got, seq.into_iter().map(Sample::Ordered).collect::<Vec<_>>());
    }

    /// The mailbox always yields the last value written.
    #[test]
    fn coalesce_yields_last(seq in proptest::collection::vec(any::<u32>(), 1..32)) {
        let (a, a_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();
        let (b, b_worker) = build_link(SampleCodec, &LinkSpec::default()).unwrap();
        for v in &seq {
            a.send(&Sample::Latest(*v)).unwrap();
        }
        shuttle(&a_worker, &b_worker);
        let last = *seq.last().unwrap();
        prop_assert_eq!(b.take_latest().unwrap().unwrap(), Sample::Latest(last));
    }
}
