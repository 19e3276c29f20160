use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// An error attributable to one of the fields
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}

/// Problem form a backend should solve
#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolveForm {
    Primal,
    Dual,
    /// backend decides
    #[default]
    Free,
}

/// Settings forwarded to a [`ConicProgramSolver`](super::ConicProgramSolver).
///
/// None of these are interpreted outside of a solver backend, and a backend
/// may ignore those it has no counterpart for.

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverSettings<T: FloatT> {
    ///relative duality gap tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_gap_rel: T,

    ///primal feasibility tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_feas_primal: T,

    ///dual feasibility tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_feas_dual: T,

    ///number of worker threads (0 = backend decides)
    #[builder(default = "0")]
    pub num_threads: u32,

    ///primal, dual or free solve form
    #[builder(default = "SolveForm::Free")]
    pub solve_form: SolveForm,

    ///verbose printing
    #[builder(default = "false")]
    pub verbose: bool,
}

impl<T> Default for SolverSettings<T>
where
    T: FloatT,
{
    fn default() -> SolverSettings<T> {
        SolverSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> SolverSettings<T>
where
    T: FloatT,
{
    /// Checks that every tolerance is positive and finite.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_tolerance("tol_gap_rel", self.tol_gap_rel)?;
        validate_tolerance("tol_feas_primal", self.tol_feas_primal)?;
        validate_tolerance("tol_feas_dual", self.tol_feas_dual)?;
        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for SolverSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        SolverSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> SolverSettingsBuilder<T>
where
    T: FloatT,
{
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(tol) = self.tol_gap_rel {
            validate_tolerance("tol_gap_rel", tol)?;
        }
        if let Some(tol) = self.tol_feas_primal {
            validate_tolerance("tol_feas_primal", tol)?;
        }
        if let Some(tol) = self.tol_feas_dual {
            validate_tolerance("tol_feas_dual", tol)?;
        }
        Ok(())
    }
}

fn validate_tolerance<T: FloatT>(field: &'static str, tol: T) -> Result<(), SettingsError> {
    if tol.is_finite() && tol > T::zero() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue(field))
    }
}

#[test]
fn test_settings_validate() {
    let settings = SolverSettings::<f64>::default();
    assert_eq!(settings.tol_gap_rel, 1e-8);
    assert_eq!(settings.solve_form, SolveForm::Free);
    assert_eq!(settings.num_threads, 0);
    assert!(!settings.verbose);
    assert!(settings.validate().is_ok());

    // builder rejects bad tolerances
    assert!(SolverSettingsBuilder::<f64>::default()
        .tol_feas_dual(-1.0)
        .build()
        .is_err());
    assert!(SolverSettingsBuilder::<f64>::default()
        .tol_gap_rel(f64::NAN)
        .build()
        .is_err());

    let mut settings = settings;
    settings.tol_feas_primal = f64::INFINITY;
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("tol_feas_primal"))
    );
}
