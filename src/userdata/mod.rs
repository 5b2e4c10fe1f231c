//! Bootstrap data model
//!
//! [`BootstrapData`] carries everything a node needs on first boot. It is
//! built by the caller, normalized once with [`BootstrapData::prepare`],
//! and then handed to the template engine as read-only input.
//!
//! - [`init`] wraps it for the first member of a new etcd cluster
//! - [`join`] wraps it for members joining an existing cluster

pub mod init;
pub mod join;

pub use init::{InitInput, new_init};
pub use join::{JoinInput, RetryPolicy, new_join};

use crate::BootstrapError;
use crate::config::{DiskSetup, EtcdadmArgs, File, MountPoints, Ntp, User};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Command that initializes a new etcd cluster
pub const STANDARD_INIT_COMMAND: &str = "etcdadm init";

/// Command that joins an existing etcd cluster; the endpoint follows it
pub const STANDARD_JOIN_COMMAND: &str = "etcdadm join";

/// Writes the bootstrap sentinel under /run/cluster-api. The command is the
/// same on Linux and Windows hosts.
pub const SENTINEL_FILE_COMMAND: &str =
    "echo success > /run/cluster-api/bootstrap-success.complete";

/// Path of the script wrapping the join command in a retry loop
pub const RETRIABLE_JOIN_SCRIPT_NAME: &str = "/usr/local/bin/kubeadm-bootstrap-script";

/// Owner of the retriable join script
pub const RETRIABLE_JOIN_SCRIPT_OWNER: &str = "root";

/// Permissions of the retriable join script (rwxr-xr-x)
pub const RETRIABLE_JOIN_SCRIPT_PERMISSIONS: &str = "0755";

/// Preamble marking the document as a Jinja-templated cloud-config
pub const CLOUD_CONFIG_HEADER: &str = "## template: jinja\n#cloud-config\n";

/// Data shared by every bootstrap document kind
///
/// `prepare()` must be called exactly once per instance: it appends
/// `additional_files` to `write_files` without deduplicating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapData {
    /// Document preamble, only ever set by `prepare()`
    #[serde(skip_deserializing)]
    pub header: String,

    /// Commands run before the etcdadm action, in order
    pub pre_join_commands: Vec<String>,

    /// Commands run after the etcdadm action, in order
    pub post_join_commands: Vec<String>,

    /// Files merged into `write_files` by `prepare()`
    pub additional_files: Vec<File>,

    /// Files to write on the node
    pub write_files: Vec<File>,

    pub users: Vec<User>,

    pub ntp: Option<Ntp>,

    pub disk_setup: Option<DiskSetup>,

    pub mounts: Vec<MountPoints>,

    /// Whether the node is also a control plane host
    pub is_control_plane: bool,

    /// Sentinel-writing command, only ever set by `prepare()`
    #[serde(skip_deserializing)]
    pub completion_signal_command: String,
}

impl BootstrapData {
    /// Fill in the derived fields before rendering
    ///
    /// Cannot fail today, but callers must still propagate the result.
    pub fn prepare(&mut self) -> Result<(), BootstrapError> {
        debug!(
            "Preparing bootstrap data ({} write_files, {} additional_files)",
            self.write_files.len(),
            self.additional_files.len()
        );

        self.header = CLOUD_CONFIG_HEADER.to_string();
        self.write_files.extend_from_slice(&self.additional_files);
        self.completion_signal_command = SENTINEL_FILE_COMMAND.to_string();
        Ok(())
    }
}

/// Append the etcdadm flags to a base command, shell-quoting each value
pub(crate) fn etcdadm_command(base: &str, args: &EtcdadmArgs) -> String {
    let mut command = base.to_string();
    for (flag, value) in args.to_flags() {
        command.push(' ');
        command.push_str(flag);
        command.push(' ');
        command.push_str(&shell_quote(value));
    }
    command
}

/// Quote a single word for POSIX shells
///
/// Words made only of characters that are never special to the shell are
/// returned as is; anything else is single-quoted.
pub(crate) fn shell_quote(word: &str) -> String {
    let is_plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-+=:,./@%".contains(c));
    if is_plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', "'\\''"))
    }
}
