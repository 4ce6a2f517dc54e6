use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE: &str = r##"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [8.5, 47.3] },
      "properties": { "color": "#ff0000", "symbol": "circle", "elevation": 412.0 }
    },
    {
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [8.6, 47.4] },
      "properties": { "elevation": null }
    },
    {
      "type": "Feature",
      "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [0.0, 0.01]] },
      "properties": { "elevations": [null, 5.0] }
    },
    {
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [8.55, 47.35] },
      "properties": { "type": "text", "text": "Summit" }
    },
    {
      "type": "Feature",
      "geometry": { "type": "MultiPoint", "coordinates": [[1.0, 1.0]] },
      "properties": {}
    }
  ]
}"##;

fn geoscribe_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("geoscribe").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd
}

fn write_sample(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("sample.geojson");
    std::fs::write(&path, SAMPLE).unwrap();
    path
}

#[test]
fn geoscribe_help_prints_usage() {
    let temp = TempDir::new().unwrap();
    geoscribe_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Geographic annotation editing engine"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("normalize"));
}

#[test]
fn subcommand_is_required() {
    let temp = TempDir::new().unwrap();
    geoscribe_cmd(&temp).assert().failure();
}

#[test]
fn inspect_reports_counts_and_measurements() {
    let temp = TempDir::new().unwrap();
    let sample = write_sample(&temp);

    geoscribe_cmd(&temp)
        .arg("inspect")
        .arg(&sample)
        .assert()
        .success()
        .stdout(predicate::str::contains("points: 2"))
        .stdout(predicate::str::contains("polyline: 1"))
        .stdout(predicate::str::contains("text: 1"))
        .stdout(predicate::str::contains("total: 4"))
        .stdout(predicate::str::contains("skipped: 1"))
        .stdout(predicate::str::contains("line length: 1.11 km"))
        .stdout(predicate::str::contains("polygon area: 0 m²"))
        .stdout(predicate::str::contains("-0").not());
}

#[test]
fn inspect_rejects_bare_feature() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("feature.geojson");
    std::fs::write(
        &path,
        r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[1.0,2.0]},"properties":{}}"#,
    )
    .unwrap();

    geoscribe_cmd(&temp)
        .arg("inspect")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected a FeatureCollection"));
}

#[test]
fn inspect_reports_missing_file() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.geojson");

    geoscribe_cmd(&temp)
        .arg("inspect")
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.geojson"));
}

#[test]
fn normalize_prints_canonical_document() {
    let temp = TempDir::new().unwrap();
    let sample = write_sample(&temp);

    geoscribe_cmd(&temp)
        .arg("normalize")
        .arg(&sample)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"FeatureCollection\""))
        .stdout(predicate::str::contains("\"generator\""))
        .stdout(predicate::str::contains("Summit"))
        .stdout(predicate::str::contains("MultiPoint").not());
}

#[test]
fn normalize_writes_output_file_that_reimports() {
    let temp = TempDir::new().unwrap();
    let sample = write_sample(&temp);
    let output = temp.path().join("normalized.geojson");

    geoscribe_cmd(&temp)
        .arg("normalize")
        .arg(&sample)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"exportedAt\""));

    geoscribe_cmd(&temp)
        .arg("inspect")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("total: 4"))
        .stdout(predicate::str::contains("skipped").not());
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("geoscribe");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "styles = [not toml").unwrap();
    let sample = write_sample(&temp);

    geoscribe_cmd(&temp)
        .arg("inspect")
        .arg(&sample)
        .assert()
        .success()
        .stdout(predicate::str::contains("total: 4"));
}

#[test]
fn schema_dump_describes_config_sections() {
    let mut cmd = Command::cargo_bin("dump_config_schema").expect("binary exists");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("picking"))
        .stdout(predicate::str::contains("elevation"));
}
