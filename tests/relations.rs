// Spot checks of the closed-form relations against published values
// (gamma = 1.4 throughout; NACA 1135 / Anderson tables).

use shockflow::{
    compressibility, isentropic, shock, skin_friction, DomainError, FlowError, FlowRegime,
    ShockBranch,
};

const DEG: f64 = std::f64::consts::PI / 180.0;

#[test]
fn normal_shock_table_row_mach_2() {
    assert!((shock::normal_shock_mach(2.0, 1.4).unwrap() - 0.57735).abs() < 1e-5);
    assert!((shock::normal_shock_pressure_ratio(2.0, 1.4).unwrap() - 4.5).abs() < 1e-12);
    assert!((shock::normal_shock_density_ratio(2.0, 1.4).unwrap() - 2.66667).abs() < 1e-5);
    assert!((shock::normal_shock_stagnation_pressure_ratio(2.0, 1.4).unwrap() - 0.72087).abs() < 1e-3);
}

#[test]
fn subsonic_mach_is_a_domain_error() {
    assert!(matches!(
        shock::normal_shock_mach(0.9, 1.4),
        Err(DomainError::SubsonicMach(_))
    ));
}

#[test]
fn oblique_shock_mach_2_twenty_degrees() {
    // The weak planar solution for M = 2, theta = 20 deg is near 53.4 deg.
    let beta = shock::oblique_beta(2.0, 20.0 * DEG, 1.4, 1e-9, ShockBranch::Weak).unwrap();
    assert!((beta - 53.4 * DEG).abs() < 0.5 * DEG, "beta = {}", beta / DEG);

    // And the relation inverts back to the Mach number.
    let m1 = shock::oblique_mach(20.0 * DEG, beta, 1.4, 1e-9).unwrap();
    assert!((m1 - 2.0).abs() < 1e-4, "M1 = {m1}");
}

#[test]
fn excessive_deflection_is_a_domain_error() {
    let err = shock::oblique_beta(2.0, 89.0 * DEG, 1.4, 1e-9, ShockBranch::Strong).unwrap_err();
    assert!(matches!(err, FlowError::Domain(DomainError::DetachedShock)));
}

#[test]
fn area_ratio_round_trip_supersonic() {
    for &m in &[1.1, 1.5, 2.0, 3.0, 5.0] {
        let a = isentropic::area_ratio(m, 1.4);
        let back = isentropic::mach_from_area_ratio(a, 1.4, 1e-6, FlowRegime::Supersonic).unwrap();
        assert!((back - m).abs() < 1e-4, "M = {m}: got {back}");
    }
}

#[test]
fn area_ratio_below_one_is_a_domain_error() {
    assert!(matches!(
        isentropic::mach_from_area_ratio(0.8, 1.4, 1e-6, FlowRegime::Supersonic),
        Err(FlowError::Domain(DomainError::AreaRatioBelowUnity(_)))
    ));
}

#[test]
fn prandtl_meyer_expansion_to_known_mach() {
    // nu(M=2) + 10 degrees of expansion lands near M = 2.38.
    let nu1 = shock::prandtl_meyer(2.0, 1.4).unwrap();
    let m2 = shock::prandtl_meyer_mach(nu1 + 10.0 * DEG, 1.4, 1e-9).unwrap();
    assert!((m2 - 2.385).abs() < 0.02, "M2 = {m2}");
}

#[test]
fn skin_friction_soft_failure_sentinel() {
    // At very low Reynolds number the model is inapplicable and signals it
    // with NaN instead of an error.
    assert!(skin_friction::turbulent_skin_friction(0.0, 1.0, 500.0).is_nan());

    // In its valid range it produces a plausible coefficient.
    let cf = skin_friction::turbulent_skin_friction(0.0, 1.0, 1e7);
    assert!(cf > 0.002 && cf < 0.004, "cf = {cf}");
}

#[test]
fn critical_mach_against_karman_tsien_crossing() {
    let mcr = compressibility::critical_mach(-0.5, 1.4, 1e-6).unwrap();
    assert!(mcr > 0.5 && mcr < 0.8, "Mcr = {mcr}");

    // Above the threshold Cp the fixed maximum is returned.
    assert_eq!(compressibility::critical_mach(-0.05, 1.4, 1e-6).unwrap(), 0.86);
}
