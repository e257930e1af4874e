//! Definition of the factor module
//!
//! A `Factor` is a table over an ordered scope of `Variable`s. The network has two kinds: the
//! prior of a hidden cause, with scope `[cause]`, and the conditional probability distribution
//! (CPD) of an effect, with scope `[PPH, PPR, effect]`. Both are stored as tables of
//! `P(child = s | parents)`, so every slice along the child axis sums to one by construction.

use crate::util::{check_probability, ValidationError};
use crate::variable::{Assignment, Effect, HiddenCause, Variable};

use itertools::iproduct;
use ndarray::prelude as nd;

/// Alias f64 ndarray::Array as Table
pub type Table = nd::ArrayD<f64>;

/// Tolerance used when checking that a table is normalized
const NORMALIZATION_TOLERANCE: f64 = 1e-9;


#[derive(Clone, Debug, PartialEq)]
pub struct Factor {
    /// The scope of the `Factor`. The last `Variable` is the child whose distribution this
    /// `Factor` defines; any preceding `Variable`s are its parents.
    scope: Vec<Variable>,

    /// The values of the `Factor` table, one axis per scope variable.
    table: Table
}


impl Factor {

    /// Create the prior `[P(c=0), P(c=1)]` of a hidden cause.
    ///
    /// # Errors
    /// * `ValidationError::ProbabilityOutOfRange` if ```p_true``` is not in [0, 1]
    pub fn prior(cause: HiddenCause, p_true: f64) -> Result<Self, ValidationError> {
        let p = check_probability(cause.name(), p_true)?;

        Ok(Factor {
            scope: vec![Variable::Cause(cause)],
            table: nd::arr1(&[1.0 - p, p]).into_dyn()
        })
    }


    /// Create the CPD of an effect from ```p_true[pph][ppr] = P(effect=1 | pph, ppr)```.
    ///
    /// # Errors
    /// * `ValidationError::ProbabilityOutOfRange` if any entry is not in [0, 1]
    pub fn cpd(effect: Effect, p_true: &[[f64; 2]; 2]) -> Result<Self, ValidationError> {
        let mut table = nd::Array3::<f64>::zeros((2, 2, 2));

        for (pph, ppr) in iproduct!(0..2, 0..2) {
            let context = format!("{} | PPH={}, PPR={}", effect, pph, ppr);
            let p = check_probability(&context, p_true[pph][ppr])?;
            table[[pph, ppr, 0]] = 1.0 - p;
            table[[pph, ppr, 1]] = p;
        }

        Ok(Factor {
            scope: vec![
                Variable::Cause(HiddenCause::Pph),
                Variable::Cause(HiddenCause::Ppr),
                Variable::Effect(effect)
            ],
            table: table.into_dyn()
        })
    }


    /// Retrieve the scope of the `Factor`.
    pub fn scope(&self) -> &[Variable] {
        &self.scope
    }


    /// The `Variable` whose distribution this `Factor` defines
    pub fn child(&self) -> Variable {
        // scope is never empty; both constructors push at least the child
        self.scope[self.scope.len() - 1]
    }


    /// The raw table, one axis per scope `Variable`
    pub fn table(&self) -> &Table {
        &self.table
    }


    /// ```P(child = 1 | parents)``` for the given parent states, in scope order. Pass no states for
    /// a prior.
    ///
    /// # Errors
    /// * `ValidationError::InvalidParentConfig` if there is not exactly one state per parent
    /// * `ValidationError::InvalidObservation` if a state is not 0 or 1
    pub fn p_true(&self, parent_states: &[usize]) -> Result<f64, ValidationError> {
        let child = self.child();
        let parents = &self.scope[..self.scope.len() - 1];
        if parent_states.len() != parents.len() {
            let msg = format!("{}: {:?}", child, parent_states);
            return Err(ValidationError::InvalidParentConfig(msg));
        }

        let mut assn = Assignment::new().with(child, 1);
        for (&v, &s) in parents.iter().zip(parent_states) {
            assn.set(v, s);
        }
        self.value(&assn)
    }


    /// Check whether ```assignment``` assigns every `Variable` in the scope of this `Factor`.
    pub fn is_covered_by(&self, assignment: &Assignment) -> bool {
        self.scope.iter().all(|v| assignment.contains(v))
    }


    /// Retrieve the value for a complete assignment over the scope of this `Factor`
    ///
    /// # Args
    /// * `assignment`: a full assignment to the scope of the `Factor`. The assignment's scope may
    ///   be a superset of the `Factor`s scope.
    ///
    /// # Errors
    /// * `ValidationError::IncompleteAssignment` if a scope variable is unassigned
    /// * `ValidationError::InvalidObservation` if an assigned state is not 0 or 1
    pub fn value(&self, assignment: &Assignment) -> Result<f64, ValidationError> {
        let missing: Vec<String> = self.scope.iter()
                                             .filter(|v| ! assignment.contains(v))
                                             .map(|v| String::from(v.name()))
                                             .collect();
        if ! missing.is_empty() {
            return Err(ValidationError::IncompleteAssignment(missing));
        }

        let mut idxs = Vec::with_capacity(self.scope.len());
        for v in self.scope.iter() {
            match assignment.get(v) {
                Some(s) if s < v.cardinality() => idxs.push(s),
                other => {
                    return Err(ValidationError::InvalidObservation(format!("{}={:?}", v, other)))
                }
            }
        }

        Ok(self.table[nd::IxDyn(&idxs)])
    }


    /// Check that the table is a conditional distribution over its child: non-negative, and
    /// summing to one along the child axis for every parent configuration.
    pub fn is_normalized(&self) -> bool {
        let child_axis = nd::Axis(self.scope.len() - 1);

        self.table.iter().all(|&v| v >= 0.0)
            && self.table
                   .sum_axis(child_axis)
                   .iter()
                   .all(|&z| (z - 1.0).abs() < NORMALIZATION_TOLERANCE)
    }

}


#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn prior() {
        let f = Factor::prior(HiddenCause::Pph, 0.3).unwrap();

        assert_eq!(&[Variable::Cause(HiddenCause::Pph)], f.scope());
        assert_eq!(Variable::Cause(HiddenCause::Pph), f.child());
        assert!(f.is_normalized());

        let a = Assignment::new().with(HiddenCause::Pph, 0);
        assert!((0.7 - f.value(&a).unwrap()).abs() < EPS);
        let a = Assignment::new().with(HiddenCause::Pph, 1);
        assert!((0.3 - f.value(&a).unwrap()).abs() < EPS);
        assert!((0.3 - f.p_true(&[]).unwrap()).abs() < EPS);
    }

    #[test]
    fn prior_errs() {
        for &p in [-0.5, 1.5, f64::NAN].iter() {
            match Factor::prior(HiddenCause::Ppr, p) {
                Err(ValidationError::ProbabilityOutOfRange { .. }) => (),
                other => panic!("unexpected result {:?}", other)
            }
        }
    }

    #[test]
    fn cpd() {
        let f = Factor::cpd(Effect::Pmd, &[[0.05, 0.3], [0.4, 0.6]]).unwrap();
        assert_eq!(3, f.scope().len());
        assert_eq!(Variable::Effect(Effect::Pmd), f.child());
        assert_eq!(&[2, 2, 2], f.table().shape());
        assert!(f.is_normalized());

        let expected = [[0.05, 0.3], [0.4, 0.6]];
        for (pph, ppr, e) in iproduct!(0..2, 0..2, 0..2) {
            let a = Assignment::new()
                        .with(HiddenCause::Pph, pph)
                        .with(HiddenCause::Ppr, ppr)
                        .with(Effect::Pmd, e);
            let p_true = expected[pph][ppr];
            let want = if e == 1 { p_true } else { 1.0 - p_true };
            assert!((want - f.value(&a).unwrap()).abs() < EPS);
            assert!((p_true - f.p_true(&[pph, ppr]).unwrap()).abs() < EPS);
        }
    }

    #[test]
    fn cpd_out_of_range() {
        let res = Factor::cpd(Effect::Gps, &[[0.05, 0.3], [1.2, 0.6]]);
        match res {
            Err(ValidationError::ProbabilityOutOfRange { context, value }) => {
                assert_eq!("GPS | PPH=1, PPR=0", context);
                assert_eq!(1.2, value);
            },
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn p_true_wrong_parents() {
        let f = Factor::cpd(Effect::Gps, &[[0.05, 0.3], [0.4, 0.6]]).unwrap();

        assert_eq!(
            Err(ValidationError::InvalidParentConfig(String::from("GPS: []"))),
            f.p_true(&[])
        );
        assert!(f.p_true(&[1, 0, 1]).is_err());
        match f.p_true(&[0, 2]) {
            Err(ValidationError::InvalidObservation(_)) => (),
            other => panic!("unexpected result {:?}", other)
        }

        let prior = Factor::prior(HiddenCause::Pph, 0.3).unwrap();
        assert!(prior.p_true(&[1]).is_err());
    }

    #[test]
    fn value_incomplete() {
        let f = Factor::cpd(Effect::Pc, &[[0.5, 0.5], [0.5, 0.5]]).unwrap();
        let a = Assignment::new().with(HiddenCause::Pph, 1).with(Effect::Gps, 1);

        assert!(! f.is_covered_by(&a));
        match f.value(&a) {
            Err(ValidationError::IncompleteAssignment(names)) => {
                assert_eq!(vec![String::from("PPR"), String::from("PC")], names);
            },
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn value_bad_state() {
        let f = Factor::prior(HiddenCause::Pph, 0.5).unwrap();
        let a = Assignment::new().with(HiddenCause::Pph, 2);
        assert!(f.value(&a).is_err());
    }

    #[test]
    fn superset_assignment() {
        let f = Factor::prior(HiddenCause::Ppr, 0.25).unwrap();
        let a = Assignment::new()
                    .with(HiddenCause::Pph, 1)
                    .with(HiddenCause::Ppr, 1)
                    .with(Effect::Pr, 0);
        assert!(f.is_covered_by(&a));
        assert!((0.25 - f.value(&a).unwrap()).abs() < EPS);
    }
}
