//! Reusable cloud-config fragments
//!
//! Each fragment is a named template defining one macro. Top-level
//! templates import the macros by fragment name, e.g.
//! `{% from "files" import render_files %}`. Every block macro either
//! emits nothing or a complete block ending in a newline. Scalars go
//! through the `quote` filter so caller strings cannot change the YAML
//! structure.

use std::fmt;

const FILES_TEMPLATE: &str = r#"{% macro render_files(files) -%}
{%- if files -%}
write_files:
{%- for file in files %}
-   path: {{ file.path | quote }}
{%- if file.owner %}
    owner: {{ file.owner | quote }}
{%- endif %}
{%- if file.permissions %}
    permissions: {{ file.permissions | quote }}
{%- endif %}
{%- if file.encoding %}
    encoding: {{ file.encoding | quote }}
{%- endif %}
    content: |2
{{ indent_block(6, file.content) }}
{%- endfor %}
{% endif %}
{%- endmacro %}
"#;

const COMMANDS_TEMPLATE: &str = r#"{% macro render_commands(commands) -%}
{%- for command in commands %}
  - {{ command | quote }}
{%- endfor %}
{%- endmacro %}
"#;

const NTP_TEMPLATE: &str = r#"{% macro render_ntp(ntp) -%}
{%- if ntp -%}
ntp:
{%- if ntp.enabled %}
  enabled: true
{%- endif %}
  servers:
{%- for server in ntp.servers %}
    - {{ server | quote }}
{%- endfor %}
{% endif %}
{%- endmacro %}
"#;

const USERS_TEMPLATE: &str = r#"{% macro render_users(users) -%}
{%- if users -%}
users:
{%- for user in users %}
  - name: {{ user.name | quote }}
{%- if user.passwd %}
    passwd: {{ user.passwd | quote }}
{%- endif %}
{%- if user.gecos %}
    gecos: {{ user.gecos | quote }}
{%- endif %}
{%- if user.groups %}
    groups: {{ user.groups | quote }}
{%- endif %}
{%- if user.home_dir %}
    homedir: {{ user.home_dir | quote }}
{%- endif %}
{%- if user.inactive %}
    inactive: true
{%- endif %}
{%- if user.lock_password is not none %}
    lock_passwd: {{ user.lock_password | quote }}
{%- endif %}
{%- if user.shell %}
    shell: {{ user.shell | quote }}
{%- endif %}
{%- if user.primary_group %}
    primary_group: {{ user.primary_group | quote }}
{%- endif %}
{%- if user.sudo %}
    sudo: {{ user.sudo | quote }}
{%- endif %}
{%- if user.ssh_authorized_keys %}
    ssh_authorized_keys:
{%- for key in user.ssh_authorized_keys %}
      - {{ key | quote }}
{%- endfor %}
{%- endif %}
{%- endfor %}
{% endif %}
{%- endmacro %}
"#;

const DISK_SETUP_TEMPLATE: &str = r#"{% macro render_disk_setup(disk_setup) -%}
{%- if disk_setup and disk_setup.partitions -%}
disk_setup:
{%- for partition in disk_setup.partitions %}
  {{ partition.device | quote }}:
{%- if partition.table_type %}
    table_type: {{ partition.table_type | quote }}
{%- endif %}
    layout: {{ partition.layout | quote }}
{%- if partition.overwrite is not none %}
    overwrite: {{ partition.overwrite | quote }}
{%- endif %}
{%- endfor %}
{% endif %}
{%- endmacro %}
"#;

const FS_SETUP_TEMPLATE: &str = r#"{% macro render_fs_setup(disk_setup) -%}
{%- if disk_setup and disk_setup.filesystems -%}
fs_setup:
{%- for filesystem in disk_setup.filesystems %}
  - label: {{ filesystem.label | quote }}
    filesystem: {{ filesystem.filesystem | quote }}
    device: {{ filesystem.device | quote }}
{%- if filesystem.partition %}
    partition: {{ filesystem.partition | quote }}
{%- endif %}
{%- if filesystem.overwrite is not none %}
    overwrite: {{ filesystem.overwrite | quote }}
{%- endif %}
{%- if filesystem.replace_fs %}
    replace_fs: {{ filesystem.replace_fs | quote }}
{%- endif %}
{%- if filesystem.extra_opts %}
    extra_opts:
{%- for opt in filesystem.extra_opts %}
      - {{ opt | quote }}
{%- endfor %}
{%- endif %}
{%- endfor %}
{% endif %}
{%- endmacro %}
"#;

const MOUNTS_TEMPLATE: &str = r#"{% macro render_mounts(mounts) -%}
{%- if mounts -%}
mounts:
{%- for mount in mounts %}
  - {{ mount | quote }}
{%- endfor %}
{% endif %}
{%- endmacro %}
"#;

/// Fixed fragments composed into every document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubTemplate {
    Files,
    Commands,
    Ntp,
    Users,
    DiskSetup,
    FsSetup,
    Mounts,
}

impl SubTemplate {
    /// Registration (and therefore parse) order
    pub const ALL: [SubTemplate; 7] = [
        SubTemplate::Files,
        SubTemplate::Commands,
        SubTemplate::Ntp,
        SubTemplate::Users,
        SubTemplate::DiskSetup,
        SubTemplate::FsSetup,
        SubTemplate::Mounts,
    ];

    /// Name the fragment is registered and imported under
    pub fn name(&self) -> &'static str {
        match self {
            Self::Files => "files",
            Self::Commands => "commands",
            Self::Ntp => "ntp",
            Self::Users => "users",
            Self::DiskSetup => "disk_setup",
            Self::FsSetup => "fs_setup",
            Self::Mounts => "mounts",
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            Self::Files => FILES_TEMPLATE,
            Self::Commands => COMMANDS_TEMPLATE,
            Self::Ntp => NTP_TEMPLATE,
            Self::Users => USERS_TEMPLATE,
            Self::DiskSetup => DISK_SETUP_TEMPLATE,
            Self::FsSetup => FS_SETUP_TEMPLATE,
            Self::Mounts => MOUNTS_TEMPLATE,
        }
    }

    /// True if `name` is taken by one of the fixed fragments
    pub fn is_reserved(name: &str) -> bool {
        Self::ALL.iter().any(|t| t.name() == name)
    }
}

impl fmt::Display for SubTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
