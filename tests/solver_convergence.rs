//! Convergence tests for numerical solvers
//!
//! These tests verify that the fixed-step solver converges at its expected
//! rate and that the adaptive solver honours its tolerances.

use chrom_twin::physics::PhysicalQuantity;
use chrom_twin::solver::{DormandPrinceSolver, RK4Solver, Scenario, Solver, SolverConfiguration};

mod common;
use common::{relative_error, ExponentialDecay};

fn final_value(solver: &dyn Solver, model: ExponentialDecay, config: &SolverConfiguration) -> f64 {
    let scenario = Scenario::from_model(Box::new(model));
    let result = solver.solve(&scenario, config).unwrap();

    result.final_state.get(PhysicalQuantity::Concentration).unwrap().as_slice()[0]
}

#[test]
fn test_rk4_fourth_order_convergence() {
    // error ~ O(dt^4): halving dt divides the error by ~16
    let decay_rate = 0.3;
    let total_time = 5.0;
    let exact = ExponentialDecay::new(1, decay_rate).analytical_solution(total_time, 1.0);

    let errors: Vec<f64> = [10, 20, 40, 80]
        .iter()
        .map(|&steps| {
            let config = SolverConfiguration::time_evolution(total_time, steps);
            let value = final_value(&RK4Solver::new(), ExponentialDecay::new(5, decay_rate), &config);
            (value - exact).abs()
        })
        .collect();

    for pair in errors.windows(2) {
        let ratio = pair[0] / pair[1];
        assert!(ratio > 12.0 && ratio < 20.0, "Convergence ratio {ratio} not fourth-order");
    }
}

#[test]
fn test_dopri5_error_follows_tolerance() {
    let decay_rate = 0.7;
    let model = ExponentialDecay::new(3, decay_rate);
    let exact = model.analytical_solution(10.0, 1.0);

    let error_at = |rtol: f64| {
        // one output sample at t = 10
        let config = SolverConfiguration::adaptive_time_evolution(10.0, 2, 10.0, rtol, rtol * 1e-3);
        let value = final_value(&DormandPrinceSolver::new(), ExponentialDecay::new(3, decay_rate), &config);
        relative_error(value, exact)
    };

    let loose = error_at(1e-4);
    let tight = error_at(1e-9);

    assert!(loose < 1e-3, "loose error {loose}");
    assert!(tight < 1e-6, "tight error {tight}");
    assert!(tight < loose);
}

#[test]
fn test_solvers_agree() {
    let total_time = 4.0;
    let model = || ExponentialDecay::new(2, 1.2);

    let rk4 = final_value(&RK4Solver::new(), model(), &SolverConfiguration::time_evolution(total_time, 400));
    let dopri = final_value(
        &DormandPrinceSolver::new(),
        model(),
        &SolverConfiguration::adaptive_time_evolution(total_time, 2, 0.5, 1e-10, 1e-12),
    );

    assert!((rk4 - dopri).abs() < 1e-7, "rk4 {rk4} vs dopri {dopri}");
    assert!(relative_error(dopri, model().analytical_solution(total_time, 1.0)) < 1e-7);
}

#[test]
fn test_solver_detects_invalid_config() {
    let scenario = Scenario::from_model(Box::new(ExponentialDecay::new(1, 1.0)));

    assert!(RK4Solver::new().solve(&scenario, &SolverConfiguration::time_evolution(-1.0, 10)).is_err());
    assert!(RK4Solver::new().solve(&scenario, &SolverConfiguration::time_evolution(1.0, 0)).is_err());

    let adaptive = SolverConfiguration::adaptive_time_evolution(0.1, 10, 0.05, 1e-6, 1e-9);
    assert!(RK4Solver::new().solve(&scenario, &adaptive).is_err());
    assert!(DormandPrinceSolver::new().solve(&scenario, &SolverConfiguration::time_evolution(1.0, 10)).is_err());
}
