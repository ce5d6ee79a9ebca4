use std::fs;

use tempfile::tempdir;

use easel_cli::{Args, CliError, config::ConfigError};

fn args(output: String) -> Args {
    Args {
        output,
        log_level: "off".to_string(),
        ..Args::default()
    }
}

#[test]
fn e2e_smoke_test_default_demo() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("demo.svg");

    easel_cli::run(&args(output.to_string_lossy().to_string())).expect("demo run");

    let svg = fs::read_to_string(&output).expect("snapshot written");
    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    // 3 x 4 cards, each a body and a label.
    assert_eq!(svg.matches("<text").count(), 12);
    assert!(svg.contains("2:3"));
}

#[test]
fn e2e_smoke_test_with_gestures_and_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
        [animation]
        duration = 100
        easing = "cubicInOut"

        [interaction]
        zoom_range = [0.5, 2.0]

        [view]
        background_color = "white"
        "#,
    )
    .expect("write config");
    let output = temp_dir.path().join("gestures.svg");

    let mut args = args(output.to_string_lossy().to_string());
    args.config = Some(config_path.to_string_lossy().to_string());
    args.rows = 6;
    args.columns = 10;
    args.drag = Some(vec![-120.0, 40.0]);
    args.zoom = 3;

    easel_cli::run(&args).expect("demo run");

    let svg = fs::read_to_string(&output).expect("snapshot written");
    assert!(svg.contains("scale("), "Zoomed view should be scaled");
}

#[test]
fn e2e_smoke_test_inverted_zoom_range_caps_scale() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[interaction]\nzoom_range = [1.5, 0.5]\n").expect("write config");
    let output = temp_dir.path().join("capped.svg");

    let mut args = args(output.to_string_lossy().to_string());
    args.config = Some(config_path.to_string_lossy().to_string());
    args.zoom = 20;

    easel_cli::run(&args).expect("demo run");

    let svg = fs::read_to_string(&output).expect("snapshot written");
    assert!(svg.contains("scale(1.5 1.5)"), "Zoom should stop at the swapped maximum");
}

#[test]
fn e2e_smoke_test_error_cases() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("never.svg");

    let mut missing_config = args(output.to_string_lossy().to_string());
    missing_config.config = Some(temp_dir.path().join("absent.toml").to_string_lossy().to_string());
    let err = easel_cli::run(&missing_config).unwrap_err();
    assert!(matches!(err, CliError::Config(ConfigError::MissingFile(_))));

    let mut empty_container = args(output.to_string_lossy().to_string());
    empty_container.width = 0.0;
    let err = easel_cli::run(&empty_container).unwrap_err();
    assert!(matches!(err, CliError::InvalidArgument(_)));

    let mut no_cards = args(output.to_string_lossy().to_string());
    no_cards.rows = 0;
    // The global group is always attached, so an empty grid still exports.
    easel_cli::run(&no_cards).expect("empty grid exports");

    assert!(output.exists());
}
