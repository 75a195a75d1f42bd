#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

const LISTINGS: &str = "\
city,price,surface_total,bedrooms,bathrooms
Bogota,100,10,1,1
Medellin,300,10,2,1
Cali,200,10,3,2
Bogota,400,10,2,2
Cali,50,10,1,0
";

struct Fixture {
    dir: TempDir,
    data: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().expect("tempdir");
    let data = dir.path().join("listings.csv");
    fs::write(&data, LISTINGS).expect("write dataset");
    Fixture { dir, data }
}

impl Fixture {
    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("cli");
        cmd.env("LISTING_INDEX_CONFIG", self.dir.path().join("cli.toml"))
            .env_remove("RUST_LOG")
            .arg("--data")
            .arg(&self.data)
            .arg("--quiet");
        cmd
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(["--format", "json"])
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json output")
    }
}

#[test]
fn find_returns_listing_as_json() {
    let fx = fixture();
    let value = fx.json(&["find", "--metric", "30"]);
    assert_eq!(value["metric"], 30.0);
    assert_eq!(value["listing"]["city"], "Medellin");

    let missing = fx.json(&["find", "--metric", "31"]);
    assert!(missing["listing"].is_null());
}

#[test]
fn search_applies_filters_in_key_order() {
    let fx = fixture();
    let value = fx.json(&["search", "--min-bedrooms", "2", "--max-metric", "40"]);
    let hits = value.as_array().expect("array");
    let metrics: Vec<f64> = hits.iter().map(|hit| hit["metric"].as_f64().unwrap()).collect();
    assert_eq!(metrics, vec![20.0, 30.0]);

    let bogota = fx.json(&["search", "--city", "Bogota"]);
    assert_eq!(bogota.as_array().unwrap().len(), 2);
}

#[test]
fn relation_subcommands_report_relatives() {
    let fx = fixture();
    let level = fx.json(&["relation", "level", "--metric", "5"]);
    assert_eq!(level["level"], 3);

    let uncle = fx.json(&["relation", "uncle", "--metric", "5"]);
    assert_eq!(uncle["relation"], "uncle");
    assert_eq!(uncle["listing"]["city"], "Medellin");

    let sibling = fx.json(&["relation", "sibling", "--metric", "5"]);
    assert!(sibling.get("listing").is_none());
}

#[test]
fn show_prints_outline_in_text_mode() {
    let fx = fixture();
    let output = fx
        .cmd()
        .args(["--theme", "plain", "show"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("20, city=Cali"));
    assert!(lines[1].starts_with("├── 10, city=Bogota"));
    assert!(lines[2].starts_with("│   └── 5, city=Cali"));
    assert!(lines[3].starts_with("└── 30, city=Medellin"));
}

#[test]
fn stats_and_verify_describe_loaded_tree() {
    let fx = fixture();
    let stats = fx.json(&["stats"]);
    assert_eq!(stats["tree"]["nodes"], 5);
    assert_eq!(stats["tree"]["height"], 3);
    assert_eq!(stats["import"]["inserted"], 5);

    let report = fx.json(&["verify"]);
    assert_eq!(report["success"], true);
    assert_eq!(report["counts"]["distinct_records"], 5);
}

#[test]
fn export_writes_csv() {
    let fx = fixture();
    let out = fx.dir.path().join("out.csv");
    fx.cmd()
        .arg("export")
        .arg("--out")
        .arg(&out)
        .assert()
        .success();
    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().count(), 6);
    assert!(text.starts_with("metric,city,price"));
}

#[test]
fn strict_mode_fails_on_bad_rows() {
    let fx = fixture();
    fs::write(
        &fx.data,
        "city,price,surface_total,bedrooms,bathrooms\nCali,100,0,1,1\n",
    )
    .unwrap();

    fx.cmd().arg("stats").assert().success();
    let output = fx
        .cmd()
        .args(["--strict", "stats"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8(output).unwrap().contains("row 2"));
}

#[test]
fn config_file_supplies_dataset_and_columns() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("precios.csv");
    fs::write(&data, "ciudad,price,surface_total,bedrooms,bathrooms\nPasto,90,9,1,1\n").unwrap();
    let config = dir.path().join("cli.toml");
    fs::write(
        &config,
        format!(
            "[dataset]\ndefault = {:?}\n\n[columns]\ncity = \"ciudad\"\n",
            data.display().to_string()
        ),
    )
    .unwrap();

    let output = cargo_bin_cmd!("cli")
        .env_remove("RUST_LOG")
        .args(["--config"])
        .arg(&config)
        .args(["--format", "json", "find", "--metric", "10"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["listing"]["city"], "Pasto");
}

#[test]
fn shell_reads_commands_from_stdin() {
    let fx = fixture();
    let output = fx
        .cmd()
        .arg("shell")
        .write_stdin("3\n20\n6\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("20, city=Cali"));
}
