use std::path::PathBuf;

use storyloom::config::{ConfigFlags, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".storyloomrc");
    let content = r"
# comment
--json

--export-dir stories

--action-log=actions.log
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.json);
    assert_eq!(flags.export_dir, Some(PathBuf::from("stories")));
    assert_eq!(flags.action_log, Some(PathBuf::from("actions.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".storyloomrc");
    let content = "--json\n--export-dir from_file\n--action-log file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "storyloom".to_string(),
        "--export-dir".to_string(),
        "from_cli".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.json, "file flags should remain enabled");
    assert_eq!(
        effective.export_dir,
        Some(PathBuf::from("from_cli")),
        "cli should override the export dir"
    );
    assert_eq!(
        effective.action_log,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "storyloom".to_string(),
        "--export-dir=stories".to_string(),
        "--action-log=actions.log".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.export_dir, Some(PathBuf::from("stories")));
    assert_eq!(flags.action_log, Some(PathBuf::from("actions.log")));
}

#[test]
fn test_config_union_prefers_cli_values() {
    let file = ConfigFlags {
        json: true,
        export_dir: Some(PathBuf::from("from_file")),
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags {
        export_dir: Some(PathBuf::from("from_cli")),
        action_log: Some(PathBuf::from("actions.log")),
        ..ConfigFlags::default()
    };
    let merged = file.union(&cli);
    assert!(merged.json);
    assert_eq!(merged.export_dir, Some(PathBuf::from("from_cli")));
    assert_eq!(merged.action_log, Some(PathBuf::from("actions.log")));
}
