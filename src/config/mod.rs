//! Bootstrap configuration value objects
//!
//! These types describe the files, users, NTP servers, disks and mounts a
//! node is configured with on first boot. They are consumed as already
//! validated input; the templates only read their fields.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;

/// File to write on the target machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub path: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub permissions: Option<String>,
    #[serde(default)]
    pub encoding: Option<Encoding>,
    #[serde(default)]
    pub content: String,
}

impl File {
    /// Plain-text file with only path and content set
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            owner: None,
            permissions: None,
            encoding: None,
            content: content.into(),
        }
    }
}

/// Encoding of a file's content as understood by cloud-init
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "base64")]
    Base64,
    #[serde(rename = "gzip")]
    Gzip,
    #[serde(rename = "gzip+base64")]
    GzipBase64,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Base64 => write!(f, "base64"),
            Encoding::Gzip => write!(f, "gzip"),
            Encoding::GzipBase64 => write!(f, "gzip+base64"),
        }
    }
}

/// User account to create
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub name: String,
    pub gecos: Option<String>,
    /// Comma separated list of supplementary groups
    pub groups: Option<String>,
    pub home_dir: Option<String>,
    pub inactive: Option<bool>,
    pub shell: Option<String>,
    pub passwd: Option<String>,
    pub primary_group: Option<String>,
    pub lock_password: Option<bool>,
    pub sudo: Option<String>,
    pub ssh_authorized_keys: Vec<String>,
}

/// NTP configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ntp {
    pub servers: Vec<String>,
    pub enabled: Option<bool>,
}

/// Disk partitioning and filesystem creation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskSetup {
    pub partitions: Vec<Partition>,
    pub filesystems: Vec<Filesystem>,
}

/// Partition layout for a single device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub device: String,
    /// Whether to create a single partition spanning the whole device
    #[serde(default)]
    pub layout: bool,
    #[serde(default)]
    pub overwrite: Option<bool>,
    /// Partition table type, `mbr` or `gpt`
    #[serde(default)]
    pub table_type: Option<String>,
}

/// Filesystem to create on a device or partition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filesystem {
    pub device: String,
    pub filesystem: String,
    pub label: String,
    pub partition: Option<String>,
    pub overwrite: Option<bool>,
    pub replace_fs: Option<String>,
    pub extra_opts: Vec<String>,
}

/// One fstab-style mount entry, e.g. `["LABEL=etcd_disk", "/var/lib/etcd"]`
pub type MountPoints = Vec<String>;

/// Optional flags passed to every etcdadm invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtcdadmArgs {
    pub version: Option<String>,
    pub release_url: Option<String>,
    pub install_dir: Option<String>,
    pub image_repository: Option<String>,
    pub cipher_suites: Option<String>,
}

impl EtcdadmArgs {
    /// Flag/value pairs in a fixed order, skipping unset ones. Values are
    /// raw; shell quoting happens where the command line is assembled.
    pub fn to_flags(&self) -> Vec<(&'static str, &str)> {
        let flags = [
            ("--version", &self.version),
            ("--release-url", &self.release_url),
            ("--install-dir", &self.install_dir),
            ("--image-repository", &self.image_repository),
            ("--cipher-suites", &self.cipher_suites),
        ];

        flags
            .into_iter()
            .filter_map(|(flag, value)| match value.as_deref() {
                Some(v) if !v.is_empty() => Some((flag, v)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_with_encoding() {
        let yaml = r#"
path: /etc/etcd/ca.crt
owner: root:root
permissions: "0640"
encoding: gzip+base64
content: H4sIAAAA
"#;
        let file: File = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.path, "/etc/etcd/ca.crt");
        assert_eq!(file.encoding, Some(Encoding::GzipBase64));
        assert_eq!(file.encoding.unwrap().to_string(), "gzip+base64");
    }

    #[test]
    fn test_parse_user_defaults() {
        let user: User = serde_yaml::from_str("name: etcd").unwrap();
        assert_eq!(user.name, "etcd");
        assert!(user.ssh_authorized_keys.is_empty());
        assert_eq!(user.lock_password, None);
    }

    #[test]
    fn test_etcdadm_flags_order() {
        let args = EtcdadmArgs {
            version: Some("3.5.9".to_string()),
            install_dir: Some("/opt/bin".to_string()),
            cipher_suites: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            args.to_flags(),
            vec![("--version", "3.5.9"), ("--install-dir", "/opt/bin")]
        );
    }

    #[test]
    fn test_etcdadm_flags_empty() {
        assert!(EtcdadmArgs::default().to_flags().is_empty());
    }
}
