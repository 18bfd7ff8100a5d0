//! A negotiated server/client pair over the loopback transport.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use parking_lot::Mutex;
use remoting::{ApiFactory, ClientApi, ConnectionCallbacks, ServerApi, SessionState};
use remoting_abi::{ConnectionState, GraphicsApiConfig, Handle, IceCandidate, SdpType, Version};
use remoting_config::Config;
use runtime_native::LoopbackNetwork;

const DEADLINE: Duration = Duration::from_secs(5);

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Shared list filled from inside handlers.
pub(crate) struct Recorder<T>(Arc<Mutex<Vec<T>>>);

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Clone + Send + 'static> Recorder<T> {
    pub(crate) fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }

    pub(crate) fn push(&self, item: T) {
        self.0.lock().push(item);
    }

    pub(crate) fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub(crate) fn items(&self) -> Vec<T> {
        self.0.lock().clone()
    }

    pub(crate) fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.0.lock())
    }

    /// Handler that records every payload it is given.
    pub(crate) fn sink(&self) -> Box<dyn FnMut(&T) + Send> {
        let this = self.clone();
        Box::new(move |item: &T| this.push(item.clone()))
    }
}

enum Signal {
    Sdp(SdpType, String),
    Ice(IceCandidate),
}

type Mailbox = Arc<Mutex<VecDeque<Signal>>>;

fn signaling(outbox: &Mailbox, states: &Recorder<ConnectionState>) -> ConnectionCallbacks {
    let sdp_box = Arc::clone(outbox);
    let ice_box = Arc::clone(outbox);
    let states = states.clone();
    ConnectionCallbacks::new()
        .on_sdp_created(move |kind, sdp| {
            sdp_box.lock().push_back(Signal::Sdp(kind, sdp.to_owned()));
        })
        .on_local_ice_candidate(move |candidate| {
            ice_box.lock().push_back(Signal::Ice(candidate.clone()));
        })
        .on_state_changed(move |state| states.push(state))
}

pub(crate) struct Pair {
    pub(crate) server: Box<dyn ServerApi>,
    pub(crate) client: Box<dyn ClientApi>,
    pub(crate) server_handle: Handle,
    pub(crate) client_handle: Handle,
    pub(crate) server_states: Recorder<ConnectionState>,
    pub(crate) client_states: Recorder<ConnectionState>,
    to_client: Mailbox,
    to_server: Mailbox,
    network: LoopbackNetwork,
}

impl Pair {
    /// Opens both sides with default configs and negotiates the link.
    pub(crate) fn connected() -> anyhow::Result<Self> {
        Self::connected_with(Config::server(), Config::client())
    }

    pub(crate) fn connected_with(server: Config, client: Config) -> anyhow::Result<Self> {
        let mut pair = Self::open(server, client)?;
        pair.connect()?;
        Ok(pair)
    }

    pub(crate) fn open(server_config: Config, client_config: Config) -> anyhow::Result<Self> {
        init_logging();
        let network = LoopbackNetwork::start()?;
        let factory = ApiFactory::new(network.connector());
        let gfx = GraphicsApiConfig::default();

        let to_client: Mailbox = Arc::default();
        let to_server: Mailbox = Arc::default();
        let server_states = Recorder::new();
        let client_states = Recorder::new();

        let mut server = factory.create_server_api(Version::LATEST)?;
        let server_handle = server
            .init2(server_config, gfx, signaling(&to_client, &server_states))
            .context("server init")?;
        let mut client = factory.create_client_api(Version::LATEST)?;
        let client_handle = client
            .init2(client_config, gfx, signaling(&to_server, &client_states))
            .context("client init")?;

        Ok(Self {
            server,
            client,
            server_handle,
            client_handle,
            server_states,
            client_states,
            to_client,
            to_server,
            network,
        })
    }

    /// Runs offer, answer and candidate exchange until both sides connect.
    pub(crate) fn connect(&mut self) -> anyhow::Result<()> {
        self.server.create_offer(self.server_handle)?;
        let deadline = Instant::now() + DEADLINE;
        while !self.is_connected() {
            if Instant::now() >= deadline {
                bail!("link did not come up");
            }
            self.pump()?;
            self.relay_signals()?;
            std::thread::sleep(Duration::from_millis(1));
        }
        log::debug!("pair connected (linked: {})", self.network.is_linked());
        Ok(())
    }

    /// Closes the client, waits for the server to notice, then negotiates
    /// with a freshly initialised client on the same network.
    pub(crate) fn replace_client(&mut self, config: Config) -> anyhow::Result<()> {
        self.client.close(self.client_handle)?;
        self.pump_until("server sees the client leave", |pair| {
            pair.server_states.items().last() == Some(&ConnectionState::Disconnected)
        })?;
        self.to_client.lock().clear();
        self.to_server.lock().clear();
        self.client_handle = self
            .client
            .init2(
                config,
                GraphicsApiConfig::default(),
                signaling(&self.to_server, &self.client_states),
            )
            .context("client re-init")?;
        self.connect()
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.server.state(Some(self.server_handle)) == SessionState::Connected
            && self.client.state(Some(self.client_handle)) == SessionState::Connected
    }

    /// One `process_messages` round on each live side.
    pub(crate) fn pump(&mut self) -> anyhow::Result<()> {
        if self.server.state(Some(self.server_handle)) != SessionState::Disconnected {
            self.server.process_messages(self.server_handle)?;
        }
        if self.client.state(Some(self.client_handle)) != SessionState::Disconnected {
            self.client.process_messages(self.client_handle)?;
        }
        Ok(())
    }

    /// Pumps until `done` holds.
    pub(crate) fn pump_until(
        &mut self,
        what: &str,
        mut done: impl FnMut(&mut Self) -> bool,
    ) -> anyhow::Result<()> {
        let deadline = Instant::now() + DEADLINE;
        loop {
            self.pump()?;
            if done(self) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!("timed out waiting for {what}");
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn relay_signals(&mut self) -> anyhow::Result<()> {
        let for_client: Vec<_> = self.to_client.lock().drain(..).collect();
        for signal in for_client {
            match signal {
                Signal::Sdp(SdpType::Offer, sdp) => {
                    self.client.set_remote_offer(self.client_handle, &sdp)?
                }
                Signal::Sdp(kind, _) => bail!("server produced a {kind:?}"),
                Signal::Ice(candidate) => {
                    self.client.add_ice_candidate(self.client_handle, &candidate)?
                }
            }
        }
        let for_server: Vec<_> = self.to_server.lock().drain(..).collect();
        for signal in for_server {
            match signal {
                Signal::Sdp(SdpType::Answer, sdp) => {
                    self.server.set_remote_answer(self.server_handle, &sdp)?
                }
                Signal::Sdp(kind, _) => bail!("client produced a {kind:?}"),
                Signal::Ice(candidate) => {
                    self.server.add_ice_candidate(self.server_handle, &candidate)?
                }
            }
        }
        Ok(())
    }
}
