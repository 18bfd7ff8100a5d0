//! Version-keyed construction of the operation tables.

use std::sync::Arc;

use remoting_abi::{Error, Result, Version};
use session::Connector;

use crate::api::{ClientApi, ServerApi};
use crate::v2::{ClientV2, ServerV2};

/// Builds server and client tables on top of one transport [`Connector`].
///
/// Server and client tables are resolved independently; each one owns its
/// sessions.
#[derive(Clone)]
pub struct ApiFactory {
    connector: Arc<dyn Connector>,
}

impl ApiFactory {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    pub fn create_server_api(&self, requested: Version) -> Result<Box<dyn ServerApi>> {
        match resolve(requested)? {
            2 => Ok(Box::new(ServerV2::new(requested, Arc::clone(&self.connector)))),
            _ => Err(Error::UnsupportedVersion),
        }
    }

    pub fn create_client_api(&self, requested: Version) -> Result<Box<dyn ClientApi>> {
        match resolve(requested)? {
            2 => Ok(Box::new(ClientV2::new(requested, Arc::clone(&self.connector)))),
            _ => Err(Error::UnsupportedVersion),
        }
    }
}

/// Major of a version this build can serve.
fn resolve(requested: Version) -> Result<u32> {
    if !requested.is_valid() || requested.is_newer_feature_level(Version::LATEST) {
        log::debug!("rejecting protocol version {requested}");
        return Err(Error::UnsupportedVersion);
    }
    Ok(requested.major())
}
