use remoting_abi::{
    AudioData, CustomMessage, Error, GraphicsApiFrame, TextureHandle, XrPose,
    MAX_CUSTOM_MESSAGE_LEN,
};

use crate::harness::{Pair, Recorder};

#[test]
fn pose_timestamp_comes_back_on_the_rendered_frame() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let poses = Recorder::<XrPose>::new();
    pair.server
        .register_view_pose_handler(pair.server_handle, poses.sink())?;

    assert_eq!(
        pair.client.pull_frame(pair.client_handle).err(),
        Some(Error::NoFrame)
    );

    pair.client
        .push_view_pose(pair.client_handle, XrPose::at(100))?;
    pair.pump_until("view pose", |_| poses.len() == 1)?;
    for _ in 0..10 {
        pair.pump()?;
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
    assert_eq!(poses.len(), 1, "one pose push fires the handler once");
    let pose = poses.items()[0];
    assert_eq!(pose.timestamp, 100);

    pair.server.push_frame(
        pair.server_handle,
        GraphicsApiFrame::new(pose, TextureHandle(7)),
        500_000,
    )?;

    let mut pulled = None;
    pair.pump_until("rendered frame", |pair| {
        pulled = pair.client.pull_frame(pair.client_handle).ok();
        pulled.is_some()
    })?;
    let (frame, bandwidth) = pulled.expect("frame pulled");
    assert_eq!(frame.timestamp(), 100);
    assert_eq!(frame.texture, TextureHandle(7));
    assert_eq!(bandwidth, 500_000);
    Ok(())
}

#[test]
fn frame_handler_takes_frames_instead_of_pull() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let frames = Recorder::<(i64, i64)>::new();
    let seen = frames.clone();
    pair.client.register_frame_handler(
        pair.client_handle,
        Box::new(move |frame: &GraphicsApiFrame, bandwidth: i64| {
            seen.push((frame.timestamp(), bandwidth))
        }),
    )?;

    pair.server.push_frame(
        pair.server_handle,
        GraphicsApiFrame::new(XrPose::at(42), TextureHandle(1)),
        1_000,
    )?;
    pair.pump_until("frame callback", |_| frames.len() == 1)?;
    assert_eq!(frames.items(), vec![(42, 1_000)]);
    assert_eq!(
        pair.client.pull_frame(pair.client_handle).err(),
        Some(Error::NoFrame)
    );
    Ok(())
}

#[test]
fn custom_messages_up_to_the_limit_are_delivered() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let received = Recorder::<CustomMessage>::new();
    pair.server
        .register_custom_message_handler(pair.server_handle, received.sink())?;

    let largest = vec![0xAB; MAX_CUSTOM_MESSAGE_LEN];
    assert_eq!(MAX_CUSTOM_MESSAGE_LEN, 16_384);
    pair.client
        .push_custom_message(pair.client_handle, &largest)?;
    assert_eq!(
        pair.client
            .push_custom_message(pair.client_handle, &vec![0; MAX_CUSTOM_MESSAGE_LEN + 1]),
        Err(Error::MessageTooLong)
    );

    // Same ordered channel: the marker arriving means nothing else is coming.
    pair.client.push_custom_message(pair.client_handle, b"end")?;
    pair.pump_until("marker message", |_| received.len() >= 2)?;
    let items = received.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].data(), largest.as_slice());
    assert_eq!(items[1].data(), b"end");
    Ok(())
}

#[test]
fn custom_messages_arrive_in_send_order() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let received = Recorder::<CustomMessage>::new();
    pair.client
        .register_custom_message_handler(pair.client_handle, received.sink())?;

    for index in 0u8..16 {
        pair.server
            .push_custom_message(pair.server_handle, &[index])?;
    }
    pair.pump_until("sixteen messages", |_| received.len() == 16)?;
    let order: Vec<u8> = received.items().iter().map(|m| m.data()[0]).collect();
    assert_eq!(order, (0u8..16).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn accepted_messages_survive_a_reader_that_falls_behind() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;

    // The server does not process messages while the client floods it.
    let mut accepted = Vec::new();
    for index in 0u8..80 {
        match pair
            .client
            .push_custom_message(pair.client_handle, &vec![index; MAX_CUSTOM_MESSAGE_LEN])
        {
            Ok(()) => accepted.push(index),
            Err(Error::DataChannelSend) => {}
            Err(other) => anyhow::bail!("unexpected push error {other:?}"),
        }
        std::thread::sleep(std::time::Duration::from_millis(2));
    }
    assert!(!accepted.is_empty());

    let received = Recorder::<CustomMessage>::new();
    pair.server
        .register_custom_message_handler(pair.server_handle, received.sink())?;
    let expected = accepted.len();
    pair.pump_until("every accepted message", |_| received.len() >= expected)?;

    let order: Vec<u8> = received.items().iter().map(|m| m.data()[0]).collect();
    assert_eq!(order, accepted);
    Ok(())
}

#[test]
fn unregistered_handler_is_not_invoked() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let custom = Recorder::<CustomMessage>::new();
    let poses = Recorder::<XrPose>::new();
    pair.server
        .register_custom_message_handler(pair.server_handle, custom.sink())?;
    pair.server
        .register_view_pose_handler(pair.server_handle, poses.sink())?;

    pair.client.push_custom_message(pair.client_handle, b"one")?;
    pair.pump_until("first message", |_| custom.len() == 1)?;

    pair.server
        .unregister_custom_message_handler(pair.server_handle)?;
    pair.client.push_custom_message(pair.client_handle, b"two")?;
    // Same ordered channel: once the pose is in, the second message was
    // dispatched too.
    pair.client
        .push_view_pose(pair.client_handle, XrPose::at(1))?;
    pair.pump_until("trailing pose", |_| poses.len() == 1)?;

    assert_eq!(custom.len(), 1);
    Ok(())
}

#[test]
fn audio_reaches_the_peer_while_the_track_is_enabled() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let audio = Recorder::<AudioData>::new();
    pair.server
        .register_audio_data_handler(pair.server_handle, audio.sink())?;
    let chunk = AudioData {
        samples: vec![1, 2, 3, 4],
        bits_per_sample: 16,
        sample_rate: 48_000,
        channels: 1,
        samples_per_channel: 2,
    };

    pair.client
        .push_audio_data(pair.client_handle, chunk.clone())?;
    pair.pump_until("audio chunk", |_| audio.len() == 1)?;
    assert_eq!(audio.take(), vec![chunk.clone()]);

    pair.client
        .set_audio_track_enabled(pair.client_handle, false)?;
    pair.client
        .push_audio_data(pair.client_handle, chunk.clone())?;
    pair.client.push_custom_message(pair.client_handle, b"x")?;
    let custom = Recorder::<CustomMessage>::new();
    pair.server
        .register_custom_message_handler(pair.server_handle, custom.sink())?;
    pair.pump_until("marker message", |_| custom.len() == 1)?;
    assert_eq!(audio.len(), 0);
    Ok(())
}

#[test]
fn camera_frames_need_a_camera_track() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let frame = GraphicsApiFrame::new(XrPose::at(9), TextureHandle(3));
    assert_eq!(
        pair.client
            .push_camera_frame(pair.client_handle, frame, b"meta"),
        Err(Error::VideoTrack)
    );

    let camera = Recorder::new();
    pair.server
        .register_camera_frame_handler(pair.server_handle, camera.sink())?;
    pair.client
        .init_camera_track(pair.client_handle, Default::default())?;
    pair.client
        .push_camera_frame(pair.client_handle, frame, b"meta")?;
    pair.pump_until("camera frame", |_| camera.len() == 1)?;

    let received: remoting_abi::CameraFrame = camera.items().remove(0);
    assert_eq!(received.frame.timestamp(), 9);
    assert_eq!(received.extension, b"meta".to_vec());
    Ok(())
}
