use super::{WeightContext, WeightingStrategy};
use crate::algebra::*;
use crate::partition::{AcceptedSplit, PartitionError};
use crate::program::{Cone, LinearConstraint, ProgramCone};

/// Prices a cut by the objective magnitude of the cone next to it.
///
/// A constraint is only eligible once its second singleton (orthant)
/// variable is reached.  The magnitude `m` of the candidate cone is the
/// absolute objective coefficient of an orthant cone, or the absolute sum
/// of objective coefficients of a second order cone, and the weight is
/// `base^(m+1)` in an odd regime and `1/base^(m+1)` in an even one.
///
/// Restricted constraints weigh `restricted_scale / |always cut|`.
#[derive(Debug, Clone)]
pub struct ObjectiveCoefficientWeighting<T = f64> {
    pub base: T,
    pub restricted_scale: T,
}

impl<T> Default for ObjectiveCoefficientWeighting<T>
where
    T: FloatT,
{
    fn default() -> Self {
        Self {
            base: (2.).as_T(),
            restricted_scale: (300000.).as_T(),
        }
    }
}

impl<T> ObjectiveCoefficientWeighting<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn magnitude(cone: &Cone<T>) -> Result<T, PartitionError> {
        match cone {
            Cone::NonNegativeOrthantCone(k) => Ok(k.variable().objective_coefficient().abs()),
            Cone::SecondOrderCone(k) => {
                let sum = k
                    .variables()
                    .iter()
                    .fold(T::zero(), |acc, v| acc + v.objective_coefficient());
                Ok(sum.abs())
            }
            Cone::RotatedSecondOrderCone(k) => Err(PartitionError::UnsupportedCone(k.kind())),
        }
    }
}

impl<T> WeightingStrategy<T> for ObjectiveCoefficientWeighting<T>
where
    T: FloatT,
{
    fn weight(
        &self,
        ctx: &WeightContext<'_, T>,
        constraint: &LinearConstraint<T>,
        cone: &Cone<T>,
    ) -> Result<T, PartitionError> {
        if ctx.restricted.contains(&constraint.id()) {
            return Ok(self.restricted_scale / ctx.always_cut.len().as_T());
        }

        let mut seen_singleton = false;
        for var in constraint.variables() {
            if !ctx.program.cone_of(var)?.is_singleton() {
                continue;
            }
            if !seen_singleton {
                seen_singleton = true;
                continue;
            }
            let w = self.base.powf(Self::magnitude(cone)? + T::one());
            return Ok(if ctx.is_odd_regime() { w } else { w.recip() });
        }

        Ok(T::infinity())
    }

    fn process_accepted_partition(&mut self, _split: &AcceptedSplit<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::*;
    use std::collections::HashSet;

    #[test]
    fn second_singleton_sets_weight() {
        let mut p = ConicProgram::<f64>::new();
        let k1 = p.add_cone(ConeKind::NonNegativeOrthant, &[3.0]).unwrap();
        let k2 = p.add_cone(ConeKind::NonNegativeOrthant, &[-5.0]).unwrap();
        let v1 = p.cone(k1).unwrap().variables()[0].id();
        let v2 = p.cone(k2).unwrap().variables()[0].id();
        let c = p.add_constraint(&[(v1, 1.0), (v2, 1.0)], 1.0).unwrap();

        let none = HashSet::new();
        let strategy = ObjectiveCoefficientWeighting::new();
        let con = p.constraint(c).unwrap();

        let even = WeightContext::new(&p, &none, &none).with_regime(2);
        let odd = even.with_regime(3);
        let w = strategy.weight(&even, con, p.cone(k2).unwrap()).unwrap();
        assert!((w - 1.0 / 64.0).abs() < 1e-15);
        let w = strategy.weight(&odd, con, p.cone(k2).unwrap()).unwrap();
        assert!((w - 64.0).abs() < 1e-12);

        // the candidate cone supplies the magnitude
        let w = strategy.weight(&odd, con, p.cone(k1).unwrap()).unwrap();
        assert!((w - 16.0).abs() < 1e-12);
    }

    #[test]
    fn rotated_cone_is_unsupported() {
        let mut p = ConicProgram::<f64>::new();
        let k1 = p.add_cone(ConeKind::NonNegativeOrthant, &[1.0]).unwrap();
        let k2 = p.add_cone(ConeKind::NonNegativeOrthant, &[1.0]).unwrap();
        let r = p.add_cone(ConeKind::RotatedSecondOrder, &[1.0, 1.0, 1.0]).unwrap();
        let v1 = p.cone(k1).unwrap().variables()[0].id();
        let v2 = p.cone(k2).unwrap().variables()[0].id();
        let w = p.cone(r).unwrap().variables()[0].id();
        let c = p.add_constraint(&[(v1, 1.0), (v2, 1.0), (w, 1.0)], 0.0).unwrap();

        let none = HashSet::new();
        let ctx = WeightContext::new(&p, &none, &none);
        let err = ObjectiveCoefficientWeighting::new()
            .weight(&ctx, p.constraint(c).unwrap(), p.cone(r).unwrap())
            .unwrap_err();
        assert_eq!(err, PartitionError::UnsupportedCone(ConeKind::RotatedSecondOrder));
    }
}
