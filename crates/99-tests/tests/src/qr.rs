use remoting_abi::{
    Error, Guid, Pose, QrAccessStatus, QrCode, QrMessage, QrMessageKind, QrVersion, XrPose,
};
use remoting_config::Config;

use crate::harness::{Pair, Recorder};

fn code(data: &[u8]) -> QrCode {
    QrCode {
        id: Guid {
            data1: 0xfeed,
            data2: 1,
            data3: 2,
            data4: [3; 8],
        },
        timestamp: 10,
        sys_timestamp: 11,
        physical_side_length: 0.05,
        version: QrVersion::Qr2,
        data: data.to_vec(),
        pose: Pose::default(),
    }
}

#[test]
fn start_is_refused_until_the_client_allows_access() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let queries = Recorder::<QrMessage>::new();
    pair.client.register_qr_handler(
        pair.client_handle,
        QrMessageKind::RequestAccess,
        queries.sink(),
    )?;
    let client_starts = Recorder::<QrMessage>::new();
    pair.client
        .register_qr_handler(pair.client_handle, QrMessageKind::Start, client_starts.sink())?;
    let answers = Recorder::<QrMessage>::new();
    pair.server.register_qr_handler(
        pair.server_handle,
        QrMessageKind::RequestAccess,
        answers.sink(),
    )?;

    assert_eq!(pair.server.qr_start(pair.server_handle), Err(Error::InvalidArgument));

    pair.server.qr_request_access(pair.server_handle)?;
    pair.pump_until("access query", |_| queries.len() == 1)?;
    pair.client
        .qr_request_access(pair.client_handle, QrAccessStatus::DeniedByUser)?;
    pair.pump_until("denied answer", |_| answers.len() == 1)?;
    assert_eq!(pair.server.qr_start(pair.server_handle), Err(Error::InvalidArgument));

    pair.client
        .qr_request_access(pair.client_handle, QrAccessStatus::Allowed)?;
    pair.pump_until("allowed answer", |_| answers.len() == 2)?;
    pair.server.qr_start(pair.server_handle)?;
    pair.pump_until("start request", |_| client_starts.len() == 1)?;
    assert_eq!(client_starts.items(), vec![QrMessage::Start]);
    pair.server.qr_stop(pair.server_handle)?;
    Ok(())
}

#[test]
fn access_does_not_outlive_the_client_that_granted_it() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let requests = Recorder::<QrMessage>::new();
    pair.client.register_qr_handler(
        pair.client_handle,
        QrMessageKind::RequestAccess,
        requests.sink(),
    )?;
    let answers = Recorder::<QrMessage>::new();
    pair.server.register_qr_handler(
        pair.server_handle,
        QrMessageKind::RequestAccess,
        answers.sink(),
    )?;

    pair.server.qr_request_access(pair.server_handle)?;
    pair.pump_until("access request", |_| requests.len() == 1)?;
    pair.client
        .qr_request_access(pair.client_handle, QrAccessStatus::Allowed)?;
    pair.pump_until("allowed answer", |_| answers.len() == 1)?;
    pair.server.qr_start(pair.server_handle)?;

    pair.replace_client(Config::client())?;
    let starts = Recorder::<QrMessage>::new();
    pair.client
        .register_qr_handler(pair.client_handle, QrMessageKind::Start, starts.sink())?;
    assert_eq!(pair.server.qr_start(pair.server_handle), Err(Error::InvalidArgument));

    // A fresh grant from the new client opens the gate again.
    let requests = Recorder::<QrMessage>::new();
    pair.client.register_qr_handler(
        pair.client_handle,
        QrMessageKind::RequestAccess,
        requests.sink(),
    )?;
    pair.server.qr_request_access(pair.server_handle)?;
    pair.pump_until("second access request", |_| requests.len() == 1)?;
    pair.client
        .qr_request_access(pair.client_handle, QrAccessStatus::Allowed)?;
    pair.pump_until("second allowed answer", |_| answers.len() == 2)?;
    pair.server.qr_start(pair.server_handle)?;
    pair.pump_until("start request", |_| starts.len() == 1)?;
    assert_eq!(starts.items(), vec![QrMessage::Start]);
    Ok(())
}

#[test]
fn support_query_round_trip() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let queries = Recorder::<QrMessage>::new();
    pair.client
        .register_qr_handler(pair.client_handle, QrMessageKind::IsSupported, queries.sink())?;
    let answers = Recorder::<QrMessage>::new();
    pair.server
        .register_qr_handler(pair.server_handle, QrMessageKind::IsSupported, answers.sink())?;

    pair.server.qr_is_supported(pair.server_handle)?;
    pair.pump_until("support query", |_| queries.len() == 1)?;
    pair.client.qr_is_supported(pair.client_handle, true)?;
    pair.pump_until("support answer", |_| answers.len() == 1)?;
    assert_eq!(answers.items(), vec![QrMessage::IsSupported(true)]);
    Ok(())
}

#[test]
fn bulk_registration_sees_every_qr_kind_and_poses() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let poses = Recorder::<XrPose>::new();
    let inputs = Recorder::new();
    let qr = Recorder::<QrMessage>::new();
    pair.server.register_message_callbacks(
        pair.server_handle,
        poses.sink(),
        inputs.sink(),
        qr.sink(),
    )?;

    pair.client.qr_added(pair.client_handle, code(b"a"))?;
    pair.client.qr_updated(pair.client_handle, code(b"b"))?;
    pair.client.qr_removed(pair.client_handle, code(b"b"))?;
    pair.client.qr_enumeration_completed(pair.client_handle)?;
    pair.client
        .push_view_pose(pair.client_handle, XrPose::at(3))?;
    pair.pump_until("qr events and pose", |_| qr.len() == 4 && poses.len() == 1)?;

    assert_eq!(
        qr.items(),
        vec![
            QrMessage::Added(code(b"a")),
            QrMessage::Updated(code(b"b")),
            QrMessage::Removed(code(b"b")),
            QrMessage::EnumerationCompleted,
        ]
    );
    assert_eq!(inputs.len(), 0);
    Ok(())
}
