use deltaik::{
    cli::{build_table::BuildTableArgs, solve::SolveArgs},
    config::{Config, SolverMode},
    solver::{Solver, TableFormat, read_table},
};
use deltaik_core::{InverseKinematics, Point, table::AxisRange};
use std::fs;

const SMALL_TABLE: &str = r#"
[table.x]
min = -2.0
max = 2.0
resolution = 0.5

[table.y]
min = -2.0
max = 2.0
resolution = 0.5

[table.z]
min = -11.0
max = -9.0
resolution = 0.5
"#;

#[test]
fn sample_config_is_the_default_robot() {
    let sample = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/deltaik.toml"));
    let config = Config::from_toml(sample).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn build_table_then_solve_against_it() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("robot.toml");
    fs::write(&config_path, SMALL_TABLE).unwrap();
    let table_path = dir.path().join("out/table.json");

    BuildTableArgs {
        config: Some(config_path.clone()),
        format: None,
        output: Some(table_path.clone()),
    }
    .run()
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    let table = read_table(&table_path, config.table).unwrap();
    assert_eq!(table.axes().x, AxisRange::new(-2.0, 2.0, 0.5));
    assert_eq!(table.cells().len(), 9 * 9 * 5);
    assert_eq!(table.reachable(), table.cells().len());

    let report = SolveArgs {
        x: 0.3,
        y: -0.2,
        z: -10.1,
        config: Some(config_path),
        table: Some(table_path),
    }
    .report(&config)
    .unwrap();
    let lines: Vec<_> = report.lines().collect();
    assert_eq!(lines[0], "target: (0.3000, -0.2000, -10.1000)");
    assert!(lines[1].starts_with("exact: ["), "{report}");
    assert!(lines[2].starts_with("table: ["), "{report}");
    let diff: f64 = lines[3]
        .strip_prefix("max difference: ")
        .unwrap()
        .parse()
        .unwrap();
    assert!(diff < 0.05, "{report}");
}

#[test]
fn literal_table_drives_table_mode() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("robot.toml");
    let table_path = dir.path().join("table.inc");
    fs::write(&config_path, SMALL_TABLE).unwrap();

    BuildTableArgs {
        config: Some(config_path.clone()),
        format: Some(TableFormat::Literal),
        output: Some(table_path.clone()),
    }
    .run()
    .unwrap();
    assert!(fs::read_to_string(&table_path).unwrap().starts_with("{\n  {\n    {{"));

    let mut config = Config::load(Some(&config_path)).unwrap();
    config.solver.mode = SolverMode::Table;
    config.solver.table_path = Some(table_path);
    let solver = Solver::from_config(&config).unwrap();

    let p = Point::new(1.1, 0.4, -9.8);
    let exact = Solver::Exact(Default::default()).solve(p).unwrap();
    let approx = solver.solve(p).unwrap();
    assert!(exact.max_abs_diff(&approx) < 0.05);
}

#[test]
fn solve_reports_unreachable_and_outside() {
    let args = SolveArgs {
        x: 0.0,
        y: 0.0,
        z: -3.0,
        config: None,
        table: None,
    };
    let report = args.report(&Config::default()).unwrap();
    assert_eq!(
        report,
        "target: (0.0000, 0.0000, -3.0000)\n\
         warning: outside the workspace\n\
         exact: point is out of reach for actuator 1\n"
    );
}

#[test]
fn invalid_config_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[servo]\nids = [1, 2]\n").unwrap();
    let err = Config::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("servo.ids"), "{err}");
}
