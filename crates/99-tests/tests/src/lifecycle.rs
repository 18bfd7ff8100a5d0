use remoting::{ApiFactory, SessionState};
use remoting_abi::{ConnectionState, Error, StatsReport, StatsType, Version, XrPose};
use remoting_config::{Config, DiagnosticOptions};
use runtime_native::LoopbackNetwork;

use crate::harness::{init_logging, Pair, Recorder};

#[test]
fn every_supported_minor_resolves_on_both_sides() -> anyhow::Result<()> {
    init_logging();
    let network = LoopbackNetwork::start()?;
    let factory = ApiFactory::new(network.connector());
    for minor in 0..=Version::LATEST.minor() {
        let version = Version::new(2, minor, 0);
        assert_eq!(factory.create_server_api(version)?.protocol_version(), version);
        assert_eq!(factory.create_client_api(version)?.protocol_version(), version);
    }
    let too_new = Version::new(2, Version::LATEST.minor() + 1, 0);
    assert!(matches!(
        factory.create_client_api(too_new),
        Err(Error::UnsupportedVersion)
    ));
    Ok(())
}

#[test]
fn state_callbacks_report_the_connection() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    pair.pump_until("connected callbacks", |pair| {
        pair.server_states.items().contains(&ConnectionState::Connected)
            && pair.client_states.items().contains(&ConnectionState::Connected)
    })?;
    assert_eq!(
        pair.server.state(Some(pair.server_handle)),
        SessionState::Connected
    );
    Ok(())
}

#[test]
fn closing_the_server_invalidates_its_handle_and_drops_the_client() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    pair.server.close(pair.server_handle)?;

    assert_eq!(
        pair.server.state(Some(pair.server_handle)),
        SessionState::Disconnected
    );
    assert_eq!(
        pair.server.process_messages(pair.server_handle),
        Err(Error::InvalidHandle)
    );
    assert_eq!(
        pair.server.push_custom_message(pair.server_handle, b"late"),
        Err(Error::InvalidHandle)
    );

    pair.pump_until("client disconnect", |pair| {
        pair.client_states.items().last() == Some(&ConnectionState::Disconnected)
    })?;
    assert_eq!(
        pair.client.state(Some(pair.client_handle)),
        SessionState::Initializing
    );
    assert_eq!(
        pair.client.push_view_pose(pair.client_handle, XrPose::at(1)),
        Err(Error::NotConnected)
    );
    Ok(())
}

#[test]
fn reset_returns_to_initializing_and_renegotiates() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    pair.server.reset(pair.server_handle)?;
    assert_eq!(
        pair.server.state(Some(pair.server_handle)),
        SessionState::Initializing
    );

    pair.connect()?;
    assert!(pair.is_connected());
    let custom = Recorder::new();
    pair.server
        .register_custom_message_handler(pair.server_handle, custom.sink())?;
    pair.client
        .push_custom_message(pair.client_handle, b"after reset")?;
    pair.pump_until("message after reset", |_| custom.len() == 1)?;
    Ok(())
}

#[test]
fn stats_follow_the_collector_option() -> anyhow::Result<()> {
    let server_config =
        Config::server().with_diagnostics(DiagnosticOptions::ENABLE_STATS_COLLECTOR);
    let mut pair = Pair::connected_with(server_config, Config::client())?;
    let server_stats = Recorder::<StatsReport>::new();
    let client_stats = Recorder::<StatsReport>::new();
    pair.server
        .register_stats_handler(pair.server_handle, server_stats.sink())?;
    pair.client
        .register_stats_handler(pair.client_handle, client_stats.sink())?;

    pair.server.get_stats(pair.server_handle)?;
    pair.client.get_stats(pair.client_handle)?;
    pair.pump_until("both reports", |_| {
        server_stats.len() == 1 && client_stats.len() == 1
    })?;

    let report = &server_stats.items()[0];
    assert!(report
        .stats
        .iter()
        .any(|stats| stats.kind == StatsType::DataChannel));
    assert!(client_stats.items()[0].is_empty());

    // One report per request.
    pair.pump()?;
    assert_eq!(server_stats.len(), 1);
    Ok(())
}

#[test]
fn closed_client_handle_reads_disconnected() -> anyhow::Result<()> {
    let mut pair = Pair::connected()?;
    let old = pair.client_handle;
    pair.client.close(old)?;
    assert_eq!(pair.client.close(old), Err(Error::InvalidHandle));
    assert_eq!(pair.client.state(Some(old)), SessionState::Disconnected);
    assert_eq!(pair.client.state(None), SessionState::Uninitialized);
    Ok(())
}
