//! Join documents: add a member to an existing etcd cluster
//!
//! The join command is parameterized with the address of an existing
//! member and embedded in a retry loop written to
//! [`RETRIABLE_JOIN_SCRIPT_NAME`]. The document's runcmd invokes that
//! script, so transient join failures are retried on the node.

use super::{
    BootstrapData, RETRIABLE_JOIN_SCRIPT_NAME, RETRIABLE_JOIN_SCRIPT_OWNER,
    RETRIABLE_JOIN_SCRIPT_PERMISSIONS, STANDARD_JOIN_COMMAND, etcdadm_command, shell_quote,
};
use crate::BootstrapError;
use crate::config::{EtcdadmArgs, File};
use crate::template::DocumentKind;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How often the join script retries a failed join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total number of join attempts
    pub attempts: u32,
    /// Pause between failed attempts
    pub delay_seconds: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay_seconds: 10,
        }
    }
}

/// Input for a join document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinInput {
    #[serde(flatten)]
    pub base: BootstrapData,

    /// Client URL of an existing member, e.g. `https://10.0.0.10:2379`
    #[serde(default)]
    pub join_address: String,

    #[serde(default)]
    pub etcdadm_args: EtcdadmArgs,

    #[serde(default)]
    pub retry: RetryPolicy,

    /// Full etcdadm join command, only ever set by `prepare()`
    #[serde(skip_deserializing)]
    pub join_command: String,

    /// Path the runcmd invokes, only ever set by `prepare()`
    #[serde(skip_deserializing)]
    pub retriable_join_script: String,
}

impl JoinInput {
    /// Validate the join parameters, then fill in the derived fields
    ///
    /// Nothing is modified when validation fails.
    pub fn prepare(&mut self) -> Result<(), BootstrapError> {
        if self.retry.attempts == 0 {
            return Err(BootstrapError::InvalidData(
                "join retry attempts must be at least 1".to_string(),
            ));
        }
        let command = join_command(&self.join_address, &self.etcdadm_args)?;

        self.base.prepare()?;
        self.join_command = command;
        debug!("Wrapping join command in {}", RETRIABLE_JOIN_SCRIPT_NAME);

        self.base.write_files.push(File {
            path: RETRIABLE_JOIN_SCRIPT_NAME.to_string(),
            owner: Some(RETRIABLE_JOIN_SCRIPT_OWNER.to_string()),
            permissions: Some(RETRIABLE_JOIN_SCRIPT_PERMISSIONS.to_string()),
            encoding: None,
            content: retriable_join_script(&self.join_command, &self.retry),
        });
        self.retriable_join_script = RETRIABLE_JOIN_SCRIPT_NAME.to_string();
        Ok(())
    }
}

/// Format the etcdadm join command for the given member address
///
/// The address and flag values are shell-quoted when they contain
/// anything beyond plain URL characters.
pub fn join_command(address: &str, args: &EtcdadmArgs) -> Result<String, BootstrapError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(BootstrapError::InvalidData(
            "join address must not be empty".to_string(),
        ));
    }
    if address.chars().any(char::is_whitespace) {
        return Err(BootstrapError::InvalidData(format!(
            "join address must not contain whitespace: {:?}",
            address
        )));
    }

    let base = format!("{} {}", STANDARD_JOIN_COMMAND, shell_quote(address));
    Ok(etcdadm_command(&base, args))
}

fn retriable_join_script(join_command: &str, retry: &RetryPolicy) -> String {
    format!(
        r#"#!/usr/bin/env bash
set -o nounset
set -o pipefail

max_attempts={attempts}
delay_seconds={delay}

for attempt in $(seq 1 "${{max_attempts}}"); do
  if {join_command}; then
    exit 0
  fi
  echo "etcdadm join attempt ${{attempt}}/${{max_attempts}} failed" >&2
  if [ "${{attempt}}" -lt "${{max_attempts}}" ]; then
    sleep "${{delay_seconds}}"
  fi
done

echo "etcdadm join failed after ${{max_attempts}} attempts" >&2
exit 1
"#,
        attempts = retry.attempts,
        delay = retry.delay_seconds,
        join_command = join_command,
    )
}

/// Render the cloud-config that joins an existing etcd cluster
pub fn new_join(mut input: JoinInput) -> Result<Vec<u8>, BootstrapError> {
    input.prepare()?;
    info!("Generating join cloud-config for {}", input.join_address.trim());
    DocumentKind::Join.render(&input)
}
