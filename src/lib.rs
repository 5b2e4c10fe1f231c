//! etcdadm-cloudinit library
//!
//! Renders the cloud-config documents that bootstrap members of an
//! etcdadm-managed etcd cluster on first boot.
//!
//! # Overview
//!
//! - [`userdata`]: the bootstrap data model and its one-shot `prepare()`
//! - [`template`]: composes the top-level init/join template with the
//!   fixed fragments (files, commands, ntp, users, disk setup, fs setup,
//!   mounts) and renders it
//! - [`config`]: value objects consumed by the templates, and a loader
//!   for init/join inputs stored as YAML or JSON
//!
//! ```no_run
//! use etcdadm_cloudinit::{JoinInput, new_join};
//!
//! let input = JoinInput {
//!     join_address: "https://10.0.0.10:2379".to_string(),
//!     ..Default::default()
//! };
//! let document = new_join(input)?;
//! # Ok::<(), etcdadm_cloudinit::BootstrapError>(())
//! ```

pub mod config;
pub mod template;
pub mod userdata;

mod error;

pub use error::{BootstrapError, TemplateStage};
pub use template::{DocumentKind, render};
pub use userdata::{BootstrapData, InitInput, JoinInput, RetryPolicy, new_init, new_join};
