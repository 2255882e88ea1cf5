#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for `create-template` and loading job descriptions.

mod common;

use common::Sandbox;
use win_tools::config::{self, scripts::Interpreter};
use win_tools::jobs::Job;
use win_tools::jobs::template::CreateTemplate;
use win_tools::prompt::Answer;

#[test]
fn written_template_loads_without_warnings() {
    let sandbox = Sandbox::new();
    let path = sandbox.path("config.yaml");
    let (ctx, _) = sandbox.context([]);
    CreateTemplate {
        save_path: Some(path.display().to_string()),
    }
    .run(&ctx)
    .unwrap();

    let loaded = config::load(&path).unwrap();
    assert!(loaded.validate().is_empty());
    assert_eq!(loaded.packages[0].name, "googlechrome");
    assert_eq!(loaded.scripts[0].interpreter, Interpreter::Cmd);
    assert_eq!(loaded.scripts[2].interpreter, Interpreter::PowerShell);
}

#[test]
fn save_path_is_asked_for_when_omitted() {
    let sandbox = Sandbox::new();
    let path = sandbox.path("asked.yaml");
    let (ctx, _) = sandbox.context([Answer::Text(path.display().to_string())]);
    CreateTemplate { save_path: None }.run(&ctx).unwrap();
    assert!(path.is_file());
}

#[test]
fn hand_written_config_with_every_section() {
    let sandbox = Sandbox::new();
    let path = sandbox.write(
        "job.yaml",
        "backup:\n  paths: ['%USERPROFILE%\\Desktop']\n  target: D:\\bak\n\
         environmentVariables:\n  - key: EDITOR\n    value: code\n\
         packages:\n  - git\n  - name: vlc\n    newWindow: true\n\
         scripts:\n  - dir\n",
    );
    let loaded = config::load(&path).unwrap();
    assert_eq!(loaded.backup.paths, [r"%USERPROFILE%\Desktop"]);
    assert_eq!(loaded.environment_variables.len(), 1);
    assert_eq!(loaded.packages.len(), 2);
    assert_eq!(loaded.scripts.len(), 1);
}
