// crates/ff_field/tests/dimensioned_tests.rs

//! 量纲传播测试
//!
//! 在表达式中组合有量纲值与几何场，检查数值与结果量纲集。

use ff_field::geometric;
use ff_field::prelude::*;

fn vol_scalar(name: &str, dimensions: DimensionSet, value: f64) -> VolScalarField {
    VolScalarField::uniform(name, dimensions, 4, value)
        .with_patch("top", Field::uniform(2, value))
        .expect("fresh patch name")
}

#[test]
fn product_carries_combined_dimensions() {
    let p = DimensionedScalar::new("p", dims::PRESSURE, 3.0);
    let area = DimensionedScalar::new("A", dims::AREA, 2.0);
    let force = &p * &area;
    assert_eq!(*force.dimensions(), dims::PRESSURE * dims::AREA);
    assert_eq!(*force.dimensions(), dims::FORCE);
    assert_eq!(dims::FORCE / dims::AREA, dims::PRESSURE);
    assert!((force.value() - 6.0).abs() < 1e-15);
}

#[test]
fn pressure_minus_velocity_is_rejected() {
    let p = vol_scalar("p", dims::PRESSURE, 1.0e5);
    let u = vol_scalar("magU", dims::VELOCITY, 2.0);
    let err = geometric::sub(&p, &u).unwrap_err();
    assert!(err.is_mismatch());
    assert!(matches!(err, FieldError::DimensionMismatch { operation: "-", .. }));
}

#[test]
fn pressure_over_reference_pressure() {
    let p = VolScalarField::uniform("p", dims::PRESSURE, 3, 2.0);
    let p0 = DimensionedScalar::new("p0", dims::PRESSURE, 101325.0);
    let ratio = &p / &p0;
    assert!(ratio.dimensions().is_dimensionless());
    for &v in ratio.internal_field().iter() {
        assert!((v - 2.0 / 101325.0).abs() < 1e-18);
    }
}

#[test]
fn scaled_pressure() {
    let p_rgh = vol_scalar("p_rgh", dims::PRESSURE, 3.0);
    let scale = DimensionedScalar::dimless("scale", 2.0);
    let scaled = &p_rgh * &scale;
    assert_eq!(*scaled.dimensions(), dims::PRESSURE);
    assert!(scaled.internal_field().iter().all(|&v| (v - 6.0).abs() < 1e-12));
    assert!(scaled.field("top").unwrap().iter().all(|&v| (v - 6.0).abs() < 1e-12));
}

#[test]
fn shifted_and_rescaled_pressure() {
    let p = vol_scalar("p", dims::PRESSURE, 5.0);
    let offset = DimensionedScalar::new("offset", dims::PRESSURE, 2.0);
    let scale1 = DimensionedScalar::dimless("scale1", 4.0);
    let scale2 = DimensionedScalar::dimless("scale2", 6.0);

    let r = &scale1 * (&p - &offset) / &scale2;
    assert_eq!(r.name(), "((scale1*(p-offset))/scale2)");
    assert_eq!(*r.dimensions(), dims::PRESSURE);
    assert!(r.internal_field().iter().all(|&v| (v - 2.0).abs() < 1e-12));
}

#[test]
fn buoyancy_term() {
    let g = DimensionedVector::new("g", dims::ACCELERATION, Vector::new(0.0, -9.81, 0.0));
    let h = VolVectorField::uniform("C", dims::LENGTH, 3, Vector::new(0.0, 2.0, 0.0));
    let gh = &g & &h;
    assert_eq!(*gh.dimensions(), dims::ACCELERATION * dims::LENGTH);
    assert!(gh.internal_field().iter().all(|&v| (v + 19.62).abs() < 1e-12));

    let rho = VolScalarField::uniform("rho", dims::DENSITY, 3, 1000.0);
    let p_hyd = &rho * gh;
    assert_eq!(*p_hyd.dimensions(), dims::PRESSURE);
}

#[test]
fn dimensioned_text_form() {
    let nu: DimensionedScalar = "nu [0 2 -1 0 0 0 0] 1e-05".parse().unwrap();
    assert_eq!(*nu.dimensions(), dims::VISCOSITY);
    assert_eq!(nu.to_string(), "nu [0 2 -1 0 0 0 0] 0.00001");

    let g: DimensionedVector = "g [0 1 -2 0 0] (0 -9.81 0);".parse().unwrap();
    assert_eq!(*g.dimensions(), dims::ACCELERATION);
    assert_eq!(*g.value(), Vector::new(0.0, -9.81, 0.0));
}

#[test]
fn mismatched_sum_panics_in_operator() {
    let result = std::panic::catch_unwind(|| {
        let p = DimensionedScalar::new("p", dims::PRESSURE, 1.0);
        let t = DimensionedScalar::new("T", dims::TEMPERATURE, 1.0);
        let _ = &p + &t;
    });
    assert!(result.is_err());
}
