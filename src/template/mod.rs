//! Cloud-config template composition
//!
//! A document is rendered from one top-level template plus the fixed
//! fragments in [`SubTemplate::ALL`], all registered in a single
//! minijinja environment:
//!
//! ```text
//! files, commands, ntp, users, disk_setup, fs_setup, mounts, <kind>
//! ```
//!
//! Each call clones a shared base environment that carries the helper
//! table from [`functions`], so no state is shared between renders.

pub mod fragments;
pub mod functions;
mod kind;

pub use fragments::SubTemplate;
pub use kind::DocumentKind;

use crate::BootstrapError;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

/// Environment holding the helper table; cloned for every render
static BASE_ENVIRONMENT: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    functions::register(&mut env);
    env
});

/// Render `template` under the name `kind` with `data` as the root context
///
/// `data` is expected to have been prepared already. Errors name the
/// fragment or top-level template that failed to parse, or `kind` when
/// evaluation fails.
pub fn render<T: Serialize + ?Sized>(
    kind: &str,
    template: &str,
    data: &T,
) -> Result<Vec<u8>, BootstrapError> {
    if kind.is_empty() {
        return Err(BootstrapError::InvalidData(
            "template kind must not be empty".to_string(),
        ));
    }
    if SubTemplate::is_reserved(kind) {
        return Err(BootstrapError::InvalidData(format!(
            "template kind {:?} clashes with a fragment name",
            kind
        )));
    }

    let fragments: Vec<(&'static str, &'static str)> = SubTemplate::ALL
        .iter()
        .map(|t| (t.name(), t.source()))
        .collect();
    compose(kind, template, data, &fragments)
}

fn compose<T: Serialize + ?Sized>(
    kind: &str,
    template: &str,
    data: &T,
    fragments: &[(&'static str, &'static str)],
) -> Result<Vec<u8>, BootstrapError> {
    let mut env = BASE_ENVIRONMENT.clone();

    for &(name, source) in fragments {
        debug!("Parsing {} template", name);
        env.add_template(name, source)
            .map_err(|e| BootstrapError::parse(name, e))?;
    }

    debug!("Parsing {} template", kind);
    env.add_template_owned(kind.to_string(), template.to_string())
        .map_err(|e| BootstrapError::parse(kind, e))?;

    let tmpl = env
        .get_template(kind)
        .map_err(|e| BootstrapError::execution(kind, e))?;

    let rendered = tmpl
        .render(data)
        .map_err(|e| BootstrapError::execution(kind, e))?;

    debug!("Rendered {} template ({} bytes)", kind, rendered.len());
    Ok(rendered.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TemplateStage;
    use crate::config::{DiskSetup, File, Filesystem, Ntp, Partition, User};
    use crate::userdata::{BootstrapData, SENTINEL_FILE_COMMAND};

    fn prepared(mut data: BootstrapData) -> BootstrapData {
        data.prepare().unwrap();
        data
    }

    #[test]
    fn test_render_header_and_fields() {
        let data = prepared(BootstrapData {
            is_control_plane: true,
            ..Default::default()
        });
        let out = render(
            "custom",
            "{{ header }}{% if is_control_plane %}control-plane{% endif %}",
            &data,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "## template: jinja\n#cloud-config\ncontrol-plane"
        );
    }

    #[test]
    fn test_render_custom_template_uses_fragments() {
        let data = prepared(BootstrapData {
            write_files: vec![File::new("/etc/motd", "hello")],
            ..Default::default()
        });
        let tpl = r#"{% from "files" import render_files %}{{ header }}{{ render_files(write_files) }}"#;
        let text = String::from_utf8(render("custom", tpl, &data).unwrap()).unwrap();
        assert_eq!(
            text,
            "## template: jinja\n#cloud-config\nwrite_files:\n-   path: \"/etc/motd\"\n    content: |2\n      hello\n"
        );
    }

    #[test]
    fn test_render_missing_fragment_is_execution_error() {
        let data = prepared(BootstrapData::default());
        let err = render("init", r#"{% include "kubeadm" %}"#, &data).unwrap_err();
        assert_eq!(err.stage(), Some(TemplateStage::Execution));
        assert_eq!(err.template_name(), Some("init"));
        assert!(err.to_string().starts_with("failed to generate init template"));
    }

    #[test]
    fn test_render_missing_field_is_execution_error() {
        let data = prepared(BootstrapData::default());
        let err = render("join", "{{ join_address }}", &data).unwrap_err();
        assert_eq!(err.stage(), Some(TemplateStage::Execution));
        assert_eq!(err.template_name(), Some("join"));
    }

    #[test]
    fn test_render_macro_wrong_arguments_is_execution_error() {
        let data = prepared(BootstrapData::default());
        let tpl = r#"{% from "files" import render_files %}{{ render_files() }}"#;
        let err = render("init", tpl, &data).unwrap_err();
        assert_eq!(err.stage(), Some(TemplateStage::Execution));
    }

    #[test]
    fn test_render_broken_top_level_is_parse_error() {
        let data = prepared(BootstrapData::default());
        let err = render("init", "{{ header", &data).unwrap_err();
        assert_eq!(err.stage(), Some(TemplateStage::Parse));
        assert_eq!(err.template_name(), Some("init"));
        assert!(err.to_string().starts_with("failed to parse init template"));
    }

    #[test]
    fn test_broken_fragment_is_blamed_by_name() {
        let data = prepared(BootstrapData::default());
        let fragments = [
            ("files", "{% macro render_files(files) %}ok{% endmacro %}"),
            ("ntp", "{% macro render_ntp(ntp) %}{% if ntp %}{% endmacro %}"),
            ("mounts", "{{ unterminated"),
        ];
        let err = compose("init", "{{ header }}", &data, &fragments).unwrap_err();
        assert_eq!(err.stage(), Some(TemplateStage::Parse));
        assert_eq!(err.template_name(), Some("ntp"));
        assert!(err.to_string().starts_with("failed to parse ntp template"));
    }

    #[test]
    fn test_render_rejects_bad_kind() {
        let data = prepared(BootstrapData::default());
        assert!(matches!(
            render("", "x", &data),
            Err(BootstrapError::InvalidData(_))
        ));
        assert!(matches!(
            render("files", "x", &data),
            Err(BootstrapError::InvalidData(_))
        ));
    }

    #[test]
    fn test_render_is_deterministic() {
        let data = prepared(BootstrapData {
            pre_join_commands: vec!["echo a".to_string()],
            users: vec![User {
                name: "etcd".to_string(),
                ..Default::default()
            }],
            ntp: Some(Ntp {
                servers: vec!["time.example.com".to_string()],
                enabled: Some(true),
            }),
            ..Default::default()
        });
        let tpl = r#"{% from "users" import render_users %}{% from "ntp" import render_ntp %}{{ header }}{{ render_users(users) }}{{ render_ntp(ntp) }}"#;
        let first = render("custom", tpl, &data).unwrap();
        let second = render("custom", tpl, &data).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_disk_blocks() {
        let data = prepared(BootstrapData {
            disk_setup: Some(DiskSetup {
                partitions: vec![Partition {
                    device: "/dev/sdb".to_string(),
                    layout: true,
                    overwrite: Some(false),
                    table_type: Some("gpt".to_string()),
                }],
                filesystems: vec![Filesystem {
                    device: "/dev/sdb1".to_string(),
                    filesystem: "ext4".to_string(),
                    label: "etcd_disk".to_string(),
                    extra_opts: vec!["-E".to_string(), "lazy_itable_init=1".to_string()],
                    ..Default::default()
                }],
            }),
            ..Default::default()
        });
        let tpl = r#"{% from "disk_setup" import render_disk_setup %}{% from "fs_setup" import render_fs_setup %}{{ render_disk_setup(disk_setup) }}{{ render_fs_setup(disk_setup) }}"#;
        let text = String::from_utf8(render("custom", tpl, &data).unwrap()).unwrap();
        assert_eq!(
            text,
            "disk_setup:\n  \"/dev/sdb\":\n    table_type: \"gpt\"\n    layout: true\n    overwrite: false\n\
             fs_setup:\n  - label: \"etcd_disk\"\n    filesystem: \"ext4\"\n    device: \"/dev/sdb1\"\n    extra_opts:\n      - \"-E\"\n      - \"lazy_itable_init=1\"\n"
        );
    }

    #[test]
    fn test_sentinel_not_emitted_without_reference() {
        let data = prepared(BootstrapData::default());
        let text = String::from_utf8(render("custom", "{{ header }}", &data).unwrap()).unwrap();
        assert!(!text.contains(SENTINEL_FILE_COMMAND));
    }
}
