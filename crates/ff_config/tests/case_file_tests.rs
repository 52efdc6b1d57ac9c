// crates/ff_config/tests/case_file_tests.rs

//! 算例文件加载测试

use std::io::Write;

use ff_config::{CaseConfig, ConfigError, ConstantEntry};
use ff_field::prelude::*;

const CASE: &str = r#"{
    "constants": [
        { "name": "p0", "dimensions": "dimPressure", "value": 101325.0,
          "description": "reference pressure" },
        { "name": "rho", "dimensions": [1, -3, 0, 0, 0, 0, 0], "value": 1000.0 },
        { "name": "g", "dimensions": "[0 1 -2 0 0 0 0]", "value": [0.0, -9.81, 0.0] }
    ],
    "bench": { "n_elements": 1000, "repeats": 3 }
}"#;

fn write_case(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn load_constants_from_file() {
    let file = write_case(CASE);
    let config = CaseConfig::from_file(file.path()).unwrap();
    assert_eq!(config.constants.len(), 3);
    assert_eq!(config.bench.n_elements, 1000);
    assert_eq!(config.bench.inputs, [1.1, 2.2, 3.3, 4.4]);

    let table = config.constant_table().unwrap();
    let p0 = table.lookup_scalar("p0").unwrap();
    let rho = table.lookup_scalar("rho").unwrap();
    let g = table.lookup_vector("g").unwrap();
    assert_eq!(*rho.dimensions(), dims::DENSITY);
    assert_eq!(*g.dimensions(), dims::ACCELERATION);

    // 加载的常量参与场表达式
    let p = VolScalarField::uniform("p", dims::PRESSURE, 3, 2.0);
    let ratio = &p / p0;
    assert!(ratio.dimensions().is_dimensionless());
    assert!(ratio.internal_field().iter().all(|&v| (v - 2.0 / 101325.0).abs() < 1e-18));

    let h = VolVectorField::uniform("h", dims::LENGTH, 3, Vector::new(0.0, 1.0, 0.0));
    let p_hyd = rho * (g & &h);
    assert_eq!(*p_hyd.dimensions(), dims::PRESSURE);
    assert!(p_hyd.internal_field().iter().all(|&v| (v + 9810.0).abs() < 1e-9));
}

#[test]
fn save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("case.json");

    let mut config = CaseConfig::default();
    config.constants.push(ConstantEntry::scalar("nu", dims::VISCOSITY, 1e-5));
    config.bench.repeats = 7;
    config.save_to_file(&path).unwrap();

    let back = CaseConfig::from_file(&path).unwrap();
    assert_eq!(back, config);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CaseConfig::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn malformed_json_is_rejected() {
    let file = write_case("{ \"constants\": [ ");
    assert!(matches!(CaseConfig::from_file(file.path()), Err(ConfigError::Json(_))));
}

#[test]
fn duplicate_constant_is_rejected() {
    let file = write_case(
        r#"{ "constants": [
            { "name": "rho", "dimensions": "dimDensity", "value": 1000.0 },
            { "name": "rho", "dimensions": "dimDensity", "value": 998.0 }
        ] }"#,
    );
    let err = CaseConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Duplicate(name) if name == "rho"));
}
