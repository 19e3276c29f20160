#![allow(non_snake_case)]

mod common;

use conic_partition::program::*;

#[test]
fn test_matrix_entries_match_coefficients() {
    for seed in 0..50 {
        let mut program = common::random_program(seed, true);
        let reference = program.clone();

        program.check_out_matrices().unwrap();
        let matrices = program.matrices().unwrap();
        let A = &matrices.A;
        assert_eq!(A.size(), (reference.num_constraints(), reference.num_variables()));

        for con in reference.constraints() {
            let row = program.constraint_index(con.id()).unwrap();
            assert_eq!(matrices.b[row], con.rhs());
            for var in reference.variables() {
                let col = program.variable_index(var.id()).unwrap();
                let expected = con.coefficient(var.id()).unwrap_or(0.0);
                assert_eq!(A.get_entry((row, col)).unwrap_or(0.0), expected);
            }
        }
        for var in reference.variables() {
            let col = program.variable_index(var.id()).unwrap();
            assert_eq!(matrices.c[col], var.objective_coefficient());
        }

        program.check_in_matrices().unwrap();
        assert!(!program.is_checked_out());
    }
}

#[test]
fn test_index_requires_check_out() {
    let mut program = ConicProgram::<f64>::new();
    let v = common::orthants(&mut program, &[1.0, 2.0]);
    let c = program.add_constraint(&[(v[0].1, 1.0), (v[1].1, -1.0)], 0.0).unwrap();

    assert_eq!(program.constraint_index(c), Err(ProgramError::MatricesNotCheckedOut));
    assert!(program.matrices().is_err());

    program.check_out_matrices().unwrap();
    assert_eq!(program.variable_index(v[1].1), Ok(1));
    assert_eq!(program.cone_index(v[1].0), Ok(1));
    assert_eq!(
        program.add_constraint(&[(v[0].1, 1.0)], 0.0),
        Err(ProgramError::MatricesCheckedOut)
    );
    program.check_in_matrices().unwrap();

    program.remove_constraint(c).unwrap();
    assert_eq!(
        program.constraint_index(c),
        Err(ProgramError::MatricesNotCheckedOut)
    );
    program.check_out_matrices().unwrap();
    assert_eq!(
        program.constraint_index(c),
        Err(ProgramError::NotRegistered(Entity::Constraint(c)))
    );
}
