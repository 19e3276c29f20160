#![allow(dead_code)]

use conic_partition::program::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random program over orthant and second order cones (and rotated cones
/// if `rotated`), with small integer data.
pub fn random_program(seed: u64, rotated: bool) -> ConicProgram<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut program = ConicProgram::new();

    let ncones = rng.gen_range(2..12);
    let mut vars = Vec::new();
    for _ in 0..ncones {
        let roll: f64 = rng.gen();
        let (kind, dim) = if roll < 0.65 {
            (ConeKind::NonNegativeOrthant, 1)
        } else if roll < 0.9 || !rotated {
            (ConeKind::SecondOrder, rng.gen_range(2..5))
        } else {
            (ConeKind::RotatedSecondOrder, rng.gen_range(3..5))
        };
        let objective: Vec<f64> = (0..dim).map(|_| rng.gen_range(-5..=5) as f64).collect();
        let k = program.add_cone(kind, &objective).unwrap();
        vars.extend(program.cone(k).unwrap().variables().iter().map(|v| v.id()));
    }

    let ncons = rng.gen_range(1..2 * ncones);
    for _ in 0..ncons {
        let len = rng.gen_range(1..5);
        let coefficients: Vec<(VariableId, f64)> = (0..len)
            .map(|_| {
                let v = vars[rng.gen_range(0..vars.len())];
                let a = [-3.0, -2.0, -1.0, 1.0, 2.0, 3.0][rng.gen_range(0..6)];
                (v, a)
            })
            .collect();
        let rhs = rng.gen_range(-4..=4) as f64;
        // repeated variables may cancel
        match program.add_constraint(&coefficients, rhs) {
            Ok(_) | Err(ProgramError::EmptyConstraint) => {}
            Err(e) => panic!("unexpected error {e}"),
        }
    }
    program
}

/// Orthant cones with the given objective coefficients, returning each
/// cone with its variable.
pub fn orthants(program: &mut ConicProgram<f64>, objective: &[f64]) -> Vec<(ConeId, VariableId)> {
    objective
        .iter()
        .map(|&c| {
            let k = program.add_cone(ConeKind::NonNegativeOrthant, &[c]).unwrap();
            (k, program.cone(k).unwrap().variables()[0].id())
        })
        .collect()
}
