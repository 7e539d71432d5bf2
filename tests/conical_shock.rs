// Integration tests for the Taylor-Maccoll conical-shock solver.

use shockflow::{shock, ConicalShockSolver, DomainError, FlowError, ShockBranch};

const DEG: f64 = std::f64::consts::PI / 180.0;
const HALF_PI: f64 = std::f64::consts::FRAC_PI_2;

#[test]
fn normal_shock_boundary() {
    let mut solver = ConicalShockSolver::new();
    for &m1 in &[1.2, 2.0, 5.0] {
        assert_eq!(solver.cone_angle(m1, HALF_PI).unwrap(), 0.0);
        let mc = solver.cone_mach(m1, HALF_PI).unwrap();
        let m2 = shock::normal_shock_mach(m1, 1.4).unwrap();
        assert!((mc - m2).abs() < 1e-12, "M1 = {m1}");
    }
}

#[test]
fn mach_wave_boundary() {
    let mut solver = ConicalShockSolver::new();
    for &m1 in &[1.2, 2.0, 5.0] {
        let mu = shock::mach_angle(m1).unwrap();
        assert_eq!(solver.cone_angle(m1, mu).unwrap(), 0.0);
        assert_eq!(solver.cone_mach(m1, mu).unwrap(), m1);
    }
}

#[test]
fn cone_angle_monotonic_in_shock_angle() {
    // Between the Mach wave and the critical angle the cone angle grows
    // with the shock angle.
    let mut solver = ConicalShockSolver::new();
    let mut previous = 0.0;
    for deg in [35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0] {
        let theta_c = solver.cone_angle(2.0, deg * DEG).unwrap();
        assert!(
            theta_c >= previous,
            "cone angle fell from {previous} at shock angle {deg} deg"
        );
        previous = theta_c;
    }
}

#[test]
fn known_cone_solution_at_mach_2() {
    // Taylor-Maccoll charts (e.g. NACA 1135): a 20 degree half-angle cone
    // at M = 2 carries a shock at roughly 37.8 degrees with a supersonic
    // surface Mach number.
    let mut solver = ConicalShockSolver::new();
    let theta_s = solver
        .shock_angle(2.0, 20.0 * DEG, ShockBranch::Weak)
        .unwrap();
    assert!(
        (theta_s - 37.8 * DEG).abs() < 1.0 * DEG,
        "shock angle = {} deg",
        theta_s / DEG
    );

    let mc = solver.cone_mach(2.0, theta_s).unwrap();
    assert!(mc > 1.0 && mc < 2.0, "Mc = {mc}");
}

#[test]
fn cone_shock_is_weaker_than_wedge_shock() {
    // Three-dimensional relief: the conical shock for a given incline lies
    // closer to the Mach wave than the planar oblique shock.
    let mut solver = ConicalShockSolver::new();
    let theta = 15.0 * DEG;
    let cone = solver.shock_angle(2.0, theta, ShockBranch::Weak).unwrap();
    let wedge = shock::oblique_beta(2.0, theta, 1.4, 1e-9, ShockBranch::Weak).unwrap();
    assert!(cone < wedge);
}

#[test]
fn shock_angle_round_trip() {
    let mut solver = ConicalShockSolver::new();
    for &(m1, shock_deg) in &[(1.25, 60.0), (2.0, 45.0), (3.0, 35.0), (5.0, 25.0)] {
        let theta_s = shock_deg * DEG;
        let theta_c = solver.cone_angle(m1, theta_s).unwrap();
        let back = solver
            .shock_angle(m1, theta_c, ShockBranch::Weak)
            .unwrap();
        assert!(
            (back - theta_s).abs() < 1e-5,
            "M1 = {m1}: {} deg -> {} deg",
            shock_deg,
            back / DEG
        );
    }
}

#[test]
fn free_stream_mach_round_trip() {
    let mut solver = ConicalShockSolver::new();
    for &(m1, shock_deg) in &[(1.5, 50.0), (2.0, 45.0), (4.0, 30.0)] {
        let theta_s = shock_deg * DEG;
        let theta_c = solver.cone_angle(m1, theta_s).unwrap();
        let back = solver.free_stream_mach(theta_c, theta_s).unwrap();
        assert!(
            (back - m1).abs() < 1e-4,
            "shock angle {shock_deg} deg: M1 = {m1} -> {back}"
        );
    }
}

#[test]
fn free_stream_mach_mach_wave_case() {
    let mut solver = ConicalShockSolver::new();
    let m1 = solver.free_stream_mach(0.0, 30.0 * DEG).unwrap();
    assert!((m1 - 2.0).abs() < 1e-12);
}

#[test]
fn shock_angle_zero_cone_special_cases() {
    let mut solver = ConicalShockSolver::new();
    let weak = solver.shock_angle(2.0, 0.0, ShockBranch::Weak).unwrap();
    assert!((weak - shock::mach_angle(2.0).unwrap()).abs() < 1e-12);
    let strong = solver.shock_angle(2.0, 0.0, ShockBranch::Strong).unwrap();
    assert!((strong - HALF_PI).abs() < 1e-12);
}

#[test]
fn detached_cone_rejected() {
    // No Mach number supports an 80 degree cone behind a 45 degree shock.
    let mut solver = ConicalShockSolver::new();
    let err = solver.free_stream_mach(80.0 * DEG, 45.0 * DEG).unwrap_err();
    assert!(matches!(
        err,
        FlowError::Domain(DomainError::DetachedConeShock)
    ));
}

#[test]
fn surface_pressure_rises_with_cone_angle() {
    let mut solver = ConicalShockSolver::new();
    let shallow = solver.cone_p_p0(2.0, 40.0 * DEG).unwrap();
    let steep = solver.cone_p_p0(2.0, 55.0 * DEG).unwrap();
    assert!(shallow > 1.0);
    assert!(steep > shallow);
}

#[test]
fn total_pressure_loss_grows_with_shock_strength() {
    let mut solver = ConicalShockSolver::new();
    let weak = solver.solve(3.0, 25.0 * DEG).unwrap();
    let strong = solver.solve(3.0, 60.0 * DEG).unwrap();
    assert!(weak.pt_ratio <= 1.0 + 1e-12);
    assert!(strong.pt_ratio < weak.pt_ratio);
}

#[test]
fn derived_temperature_ratio_uses_constant_total_temperature() {
    let mut solver = ConicalShockSolver::new();
    let m1 = 2.5;
    let theta_s = 40.0 * DEG;
    let mc = solver.cone_mach(m1, theta_s).unwrap();
    let t_t0 = solver.cone_t_t0(m1, theta_s).unwrap();
    let expected = (1.0 + 0.2 * m1 * m1) / (1.0 + 0.2 * mc * mc);
    assert!((t_t0 - expected).abs() < 1e-12);
}
