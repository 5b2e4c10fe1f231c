//! Top-level document kinds and their templates

use super::render;
use crate::BootstrapError;
use serde::Serialize;
use std::fmt;

const INIT_TEMPLATE: &str = r#"{%- from "files" import render_files -%}
{%- from "commands" import render_commands -%}
{%- from "ntp" import render_ntp -%}
{%- from "users" import render_users -%}
{%- from "disk_setup" import render_disk_setup -%}
{%- from "fs_setup" import render_fs_setup -%}
{%- from "mounts" import render_mounts -%}
{{ header }}{{ render_files(write_files) }}runcmd:
{{- render_commands(pre_join_commands) }}
  - {{ init_command | quote }}
{{- render_commands(post_join_commands) }}
  - {{ completion_signal_command | quote }}
{{ render_ntp(ntp) }}{{ render_users(users) }}{{ render_disk_setup(disk_setup) }}{{ render_fs_setup(disk_setup) }}{{ render_mounts(mounts) }}"#;

const JOIN_TEMPLATE: &str = r#"{%- from "files" import render_files -%}
{%- from "commands" import render_commands -%}
{%- from "ntp" import render_ntp -%}
{%- from "users" import render_users -%}
{%- from "disk_setup" import render_disk_setup -%}
{%- from "fs_setup" import render_fs_setup -%}
{%- from "mounts" import render_mounts -%}
{{ header }}{{ render_files(write_files) }}runcmd:
{{- render_commands(pre_join_commands) }}
  - {{ retriable_join_script | quote }}
{{- render_commands(post_join_commands) }}
  - {{ completion_signal_command | quote }}
{{ render_ntp(ntp) }}{{ render_users(users) }}{{ render_disk_setup(disk_setup) }}{{ render_fs_setup(disk_setup) }}{{ render_mounts(mounts) }}"#;

/// Kind of bootstrap document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Start a new etcd cluster
    Init,
    /// Join an existing etcd cluster
    Join,
}

impl DocumentKind {
    /// Name used as the template namespace root and in errors
    pub fn name(&self) -> &'static str {
        match self {
            DocumentKind::Init => "init",
            DocumentKind::Join => "join",
        }
    }

    /// Top-level template source
    pub fn template(&self) -> &'static str {
        match self {
            DocumentKind::Init => INIT_TEMPLATE,
            DocumentKind::Join => JOIN_TEMPLATE,
        }
    }

    /// Render this kind's template against prepared data
    pub fn render<T: Serialize + ?Sized>(&self, data: &T) -> Result<Vec<u8>, BootstrapError> {
        render(self.name(), self.template(), data)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::SubTemplate;

    #[test]
    fn test_kind_names_do_not_clash_with_fragments() {
        for kind in [DocumentKind::Init, DocumentKind::Join] {
            assert!(!SubTemplate::is_reserved(kind.name()));
        }
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(DocumentKind::Init.to_string(), "init");
        assert_eq!(DocumentKind::Join.to_string(), "join");
    }

    #[test]
    fn test_templates_invoke_every_fragment() {
        for kind in [DocumentKind::Init, DocumentKind::Join] {
            for fragment in SubTemplate::ALL {
                let import = format!("from \"{}\" import", fragment.name());
                assert!(kind.template().contains(&import), "{} lacks {}", kind, fragment);
            }
        }
    }
}
