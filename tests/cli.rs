use std::fs;
use std::path::{Path, PathBuf};

use soil_density_lab::app::{execute, max_min_report, AppError, Session};
use soil_density_lab::cli::Command;
use soil_density_lab::config::{Config, OutputFormat};
use soil_density_lab::density::CompactionCriteria;
use soil_density_lab::i18n::Translator;
use soil_density_lab::input::{load_input, MaxMinFile, ScaleFile};
use soil_density_lab::output::render;
use soil_density_lab::TestStatus;

const MAX_MIN_WITH_TOP: &str = r#"
dry_density_top = 1.6

[[max_determinations]]
mold_plus_soil_mass = 5750.0
mold_mass = 4000.0
volume = 1000.0

[[min_determinations]]
mold_plus_soil_mass = 5450.0
mold_mass = 4000.0
volume = 1000.0
"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run(command: Command, config: &mut Config, config_path: &Path) -> Result<(), AppError> {
    let mut session = Session {
        config,
        config_path,
        tr: Translator::new("en-us"),
        format: OutputFormat::Json,
    };
    execute(command, &mut session)
}

#[test]
fn max_min_file_with_in_situ_density_reports_compaction() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "maxmin.toml", MAX_MIN_WITH_TOP);
    let file: MaxMinFile = load_input(&path).unwrap();

    let report = max_min_report(&file, &Config::default()).unwrap();
    assert_eq!(report.densities.max.average, 1.75);
    assert_eq!(report.densities.min.average, 1.45);
    let compaction = report.compaction.expect("compaction computed");
    assert_eq!(compaction.void_ratio_max, 0.1182);
    assert_eq!(compaction.top.expect("top").relative_compactness_percent, 54.7);
    assert_eq!(compaction.status, TestStatus::Aprovado);
}

#[test]
fn configured_criteria_decide_the_verdict() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "maxmin.toml", MAX_MIN_WITH_TOP);
    let file: MaxMinFile = load_input(&path).unwrap();
    let config = Config {
        compaction: CompactionCriteria {
            min_relative_compactness_percent: 60.0,
            max_relative_compactness_percent: 100.0,
        },
        ..Config::default()
    };

    let report = max_min_report(&file, &config).unwrap();
    let json = render(OutputFormat::Json, &Translator::new("en-us"), &report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["compaction"]["status"], "REPROVADO");
    assert_eq!(value["compaction"]["top"]["status"], "REPROVADO");
    assert_eq!(value["compaction"]["void_ratio_max"], serde_json::json!(0.1182));
}

#[test]
fn max_min_file_without_in_situ_density_skips_compaction() {
    let dir = tempfile::tempdir().unwrap();
    let content = MAX_MIN_WITH_TOP.replace("dry_density_top = 1.6", "");
    let path = write(dir.path(), "maxmin.toml", &content);
    let file: MaxMinFile = load_input(&path).unwrap();

    let report = max_min_report(&file, &Config::default()).unwrap();
    assert!(report.compaction.is_none());
}

#[test]
fn scale_files_route_by_points_table() {
    let dir = tempfile::tempdir().unwrap();
    let single = write(
        dir.path(),
        "single.toml",
        r#"
accuracy_class = "III"
verification_scale_interval = 1.0
evaluation_type = "verification"
reference_weight = 9.9
measured_result = 9.905
"#,
    );
    let series = write(
        dir.path(),
        "series.toml",
        r#"
accuracy_class = "III"
verification_scale_interval = 1.0
evaluation_type = "verification"

[[points]]
reference_weight = 9.9
measured_result = 9.901
"#,
    );
    assert!(matches!(load_input::<ScaleFile>(&single).unwrap(), ScaleFile::Single(_)));
    assert!(matches!(load_input::<ScaleFile>(&series).unwrap(), ScaleFile::Series(_)));

    let config_path = dir.path().join("config.toml");
    let mut config = Config::default();
    run(Command::Scale { input: single }, &mut config, &config_path).unwrap();
    run(Command::Scale { input: series }, &mut config, &config_path).unwrap();
}

#[test]
fn real_density_command_accepts_fahrenheit() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "real.toml",
        r#"
moisture_percent = 0.0
temperature_unit = "F"

[[determinations]]
picnometer_mass = 150.0
picnometer_plus_soil_plus_water_mass = 681.13
picnometer_plus_water_mass = 650.0
temperature = 68.0
wet_soil_mass = 50.0
"#,
    );
    let config_path = dir.path().join("config.toml");
    let mut config = Config::default();
    run(Command::RealDensity { input }, &mut config, &config_path).unwrap();
}

#[test]
fn unknown_temperature_unit_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "real.toml",
        r#"
moisture_percent = 0.0
temperature_unit = "R"

[[determinations]]
picnometer_mass = 150.0
picnometer_plus_soil_plus_water_mass = 681.13
picnometer_plus_water_mass = 650.0
wet_soil_mass = 50.0
"#,
    );
    let config_path = dir.path().join("config.toml");
    let mut config = Config::default();
    let err = run(Command::RealDensity { input }, &mut config, &config_path).unwrap_err();
    assert!(matches!(err, AppError::Conversion(_)));
}

#[test]
fn missing_input_file_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    let mut config = Config::default();
    let err = run(
        Command::Moisture {
            input: dir.path().join("absent.toml"),
        },
        &mut config,
        &config_path,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::InputFile(_)));
}

#[test]
fn degenerate_envelope_surfaces_as_density_error() {
    let dir = tempfile::tempdir().unwrap();
    let content = MAX_MIN_WITH_TOP.replace("5450.0", "5750.0");
    let path = write(dir.path(), "maxmin.toml", &content);
    let config_path = dir.path().join("config.toml");
    let mut config = Config::default();
    let err = run(Command::MaxMin { input: path }, &mut config, &config_path).unwrap_err();
    match err {
        AppError::Density(e) => assert!(e.is_computation_error()),
        other => panic!("unexpected {other:?}"),
    }
}
