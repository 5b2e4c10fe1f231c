//! Init documents: bootstrap the first member of a new etcd cluster

use super::{BootstrapData, STANDARD_INIT_COMMAND, etcdadm_command};
use crate::BootstrapError;
use crate::config::EtcdadmArgs;
use crate::template::DocumentKind;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Input for an init document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitInput {
    #[serde(flatten)]
    pub base: BootstrapData,

    #[serde(default)]
    pub etcdadm_args: EtcdadmArgs,

    /// Full etcdadm init command, only ever set by `prepare()`
    #[serde(skip_deserializing)]
    pub init_command: String,
}

impl InitInput {
    pub fn prepare(&mut self) -> Result<(), BootstrapError> {
        self.base.prepare()?;
        self.init_command = etcdadm_command(STANDARD_INIT_COMMAND, &self.etcdadm_args);
        Ok(())
    }
}

/// Render the cloud-config that initializes a new etcd cluster
pub fn new_init(mut input: InitInput) -> Result<Vec<u8>, BootstrapError> {
    input.prepare()?;
    info!("Generating init cloud-config: {}", input.init_command);
    DocumentKind::Init.render(&input)
}
