use std::sync::Arc;

use remoting::AnchorReplyCallback;
use remoting_abi::{
    Anchor, AnchorId, AnchorOp, AnchorReply, AnchorReplyKind, AnchorRequest, Error, Pose,
    RequestToken, TrackingState,
};

use crate::harness::{Pair, Recorder};

/// Registers the client to record every anchor request it receives.
fn record_requests(pair: &mut Pair) -> anyhow::Result<Recorder<AnchorRequest>> {
    let requests = Recorder::new();
    for op in AnchorOp::ALL {
        pair.client
            .register_anchor_request_handler(pair.client_handle, *op, requests.sink())?;
    }
    Ok(requests)
}

/// Registers the server to record replies of `kinds` with their tokens.
fn record_replies(
    pair: &mut Pair,
    kinds: &[AnchorReplyKind],
) -> anyhow::Result<Recorder<(RequestToken, AnchorReply)>> {
    let replies = Recorder::new();
    for kind in kinds {
        let seen = replies.clone();
        let handler: AnchorReplyCallback =
            Box::new(move |token, reply: &AnchorReply| seen.push((token, reply.clone())));
        pair.server
            .register_anchor_handler(pair.server_handle, *kind, handler)?;
    }
    Ok(replies)
}

fn anchor(first: u64) -> Anchor {
    Anchor::new(AnchorId::new(first, 0), Pose::default(), TrackingState::Tracking)
}

#[test]
fn persisted_anchor_shows_up_in_the_enumeration() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let requests = record_requests(&mut pair)?;
    let replies = record_replies(
        &mut pair,
        &[
            AnchorReplyKind::Persisted,
            AnchorReplyKind::PersistedNamesEnumerated,
        ],
    )?;
    let id = AnchorId::new(7, 11);

    let persist = pair.server.anchor_persist(pair.server_handle, "desk", id)?;
    let enumerate = pair
        .server
        .anchor_enumerate_persisted_names(pair.server_handle)?;
    assert_ne!(persist, enumerate);

    // The client plays the anchor store.
    let mut store = Vec::new();
    pair.pump_until("both requests", |_| requests.len() == 2)?;
    for request in requests.take() {
        match request {
            AnchorRequest::Persist { name, id } => {
                store.push(name);
                pair.client.anchor_persisted(pair.client_handle, id)?;
            }
            AnchorRequest::EnumeratePersistedNames => {
                pair.client
                    .anchor_persisted_names_enumerated(pair.client_handle, store.clone())?;
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    pair.pump_until("both replies", |_| replies.len() == 2)?;
    assert_eq!(
        replies.items(),
        vec![
            (persist, AnchorReply::Persisted(id)),
            (
                enumerate,
                AnchorReply::PersistedNamesEnumerated(vec!["desk".to_owned()])
            ),
        ]
    );
    Ok(())
}

#[test]
fn same_kind_requests_complete_in_issue_order() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let requests = record_requests(&mut pair)?;
    let replies = record_replies(&mut pair, &[AnchorReplyKind::CreateStore])?;

    let first = pair.server.anchor_create_store(pair.server_handle)?;
    let second = pair.server.anchor_create_store(pair.server_handle)?;
    pair.pump_until("two create requests", |_| requests.len() == 2)?;

    pair.client
        .anchor_create_store_response(pair.client_handle, true)?;
    pair.client
        .anchor_create_store_response(pair.client_handle, false)?;
    pair.pump_until("two create replies", |_| replies.len() == 2)?;

    assert_eq!(
        replies.items(),
        vec![
            (first, AnchorReply::CreateStore(true)),
            (second, AnchorReply::CreateStore(false)),
        ]
    );
    Ok(())
}

#[test]
fn export_then_import_carries_the_blob() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let requests = record_requests(&mut pair)?;
    let replies = record_replies(
        &mut pair,
        &[AnchorReplyKind::Exported, AnchorReplyKind::Imported],
    )?;

    pair.server.anchor_export(pair.server_handle)?;
    pair.pump_until("export request", |_| requests.len() == 1)?;
    pair.client
        .anchor_exported(pair.client_handle, vec![1, 2, 3])?;
    pair.pump_until("export reply", |_| replies.len() == 1)?;
    let blob = match &replies.items()[0].1 {
        AnchorReply::Exported(data) => data.clone(),
        other => panic!("unexpected reply {other:?}"),
    };

    requests.take();
    pair.server.anchor_import(pair.server_handle, &blob)?;
    pair.pump_until("import request", |_| requests.len() == 1)?;
    assert_eq!(
        requests.items(),
        vec![AnchorRequest::Import {
            data: vec![1, 2, 3]
        }]
    );
    pair.client
        .anchor_imported(pair.client_handle, vec![anchor(1), anchor(2)])?;
    pair.pump_until("import reply", |_| replies.len() == 2)?;
    assert_eq!(
        replies.items()[1].1,
        AnchorReply::Imported(vec![anchor(1), anchor(2)])
    );
    Ok(())
}

#[test]
fn notifications_use_the_notification_token() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let replies = record_replies(
        &mut pair,
        &[AnchorReplyKind::Added, AnchorReplyKind::Deleted],
    )?;

    pair.client.anchor_added(pair.client_handle, anchor(5))?;
    pair.client
        .anchor_deleted(pair.client_handle, AnchorId::new(5, 0))?;
    pair.pump_until("two notifications", |_| replies.len() == 2)?;

    let items = replies.items();
    assert!(items.iter().all(|(token, _)| token.is_notification()));
    assert_eq!(items[0].1, AnchorReply::Added(anchor(5)));
    assert_eq!(items[1].1, AnchorReply::Deleted(AnchorId::new(5, 0)));
    Ok(())
}

#[test]
fn responses_without_a_request_are_rejected() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    assert_eq!(
        pair.client.anchor_unpersisted(pair.client_handle, true),
        Err(Error::InvalidArgument)
    );
    Ok(())
}

#[test]
fn unregistered_reply_kinds_still_complete_their_request() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let requests = record_requests(&mut pair)?;
    let replies = record_replies(&mut pair, &[AnchorReplyKind::ClearStore])?;
    pair.server
        .unregister_anchor_handler(pair.server_handle, AnchorReplyKind::ClearStore)?;

    pair.server.anchor_clear_store(pair.server_handle)?;
    pair.pump_until("clear request", |_| requests.len() == 1)?;
    pair.client
        .anchor_clear_store_response(pair.client_handle, true)?;

    // A later registered kind proves the earlier reply was dispatched.
    let marker = Arc::new(parking_lot::Mutex::new(None));
    let seen = Arc::clone(&marker);
    pair.server.register_anchor_handler(
        pair.server_handle,
        AnchorReplyKind::Deleted,
        Box::new(move |token, _reply: &AnchorReply| *seen.lock() = Some(token)),
    )?;
    pair.client
        .anchor_deleted(pair.client_handle, AnchorId::new(1, 1))?;
    pair.pump_until("marker notification", |_| marker.lock().is_some())?;

    assert_eq!(replies.len(), 0);
    Ok(())
}
