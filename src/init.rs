//! Module containing the ways the distribution of a `Variable` can be specified when it is added
//! to a `Model`.

use crate::factor::Factor;
use crate::util::ValidationError;
use crate::variable::Variable;

use indexmap::IndexMap;
use itertools::iproduct;

/// The entries of an effect's CPT: ```(pph, ppr) -> P(effect = true | pph, ppr)```.
pub type CptEntries = IndexMap<(u8, u8), f64>;

/// Defines possible ways to initialize a `Variable`s CPD.
#[derive(Clone, Debug)]
pub enum Initialization {
    /// Every state equally likely, regardless of the parents
    Uniform,

    /// ```P(cause = true) = p```.
    /// Note that this `Initialization` is valid only for a hidden cause.
    Bernoulli(f64),

    /// User defined CPT. All four parent configurations must be present.
    /// Note that this `Initialization` is valid only for an effect.
    Table(CptEntries)
}


impl Initialization {

    /// Build a `Table` initialization from ```p_true[pph][ppr]```
    pub fn table(p_true: [[f64; 2]; 2]) -> Self {
        let entries = iproduct!(0..2u8, 0..2u8)
                          .map(|(pph, ppr)| ((pph, ppr), p_true[pph as usize][ppr as usize]))
                          .collect();
        Initialization::Table(entries)
    }


    /// Construct the CPD of ```var```, initialized based on ```self```
    ///
    /// # Errors
    /// * `ValidationError::InvalidInitialization` if the kind of `Initialization` does not fit
    ///   the kind of `Variable`
    /// * `ValidationError::InvalidParentConfig` if a table key is not a pair of states in {0, 1}
    /// * `ValidationError::MissingParentConfig` if a table lacks one of the four configurations
    /// * `ValidationError::ProbabilityOutOfRange` if any probability is not in [0, 1]
    pub fn build_cpd(self, var: Variable) -> Result<Factor, ValidationError> {
        match (var, self) {
            (Variable::Cause(c), Initialization::Uniform) => Factor::prior(c, 0.5),
            (Variable::Cause(c), Initialization::Bernoulli(p)) => Factor::prior(c, p),
            (Variable::Effect(e), Initialization::Uniform) => Factor::cpd(e, &[[0.5; 2]; 2]),
            (Variable::Effect(e), Initialization::Table(entries)) => {
                let p_true = parent_table(var, &entries)?;
                Factor::cpd(e, &p_true)
            },
            (v, _) => Err(ValidationError::InvalidInitialization(String::from(v.name())))
        }
    }
}


/// Lay out CPT entries as ```[pph][ppr]```, checking that the keys are exactly the four parent
/// configurations.
fn parent_table(var: Variable, entries: &CptEntries) -> Result<[[f64; 2]; 2], ValidationError> {
    if let Some(&(pph, ppr)) = entries.keys().find(|&&(pph, ppr)| pph > 1 || ppr > 1) {
        return Err(ValidationError::InvalidParentConfig(format!("{}: ({}, {})", var, pph, ppr)));
    }

    let mut p_true = [[0.0; 2]; 2];
    for (pph, ppr) in iproduct!(0..2u8, 0..2u8) {
        match entries.get(&(pph, ppr)) {
            Some(&p) => p_true[pph as usize][ppr as usize] = p,
            None => {
                return Err(ValidationError::MissingParentConfig {
                    effect: String::from(var.name()),
                    pph,
                    ppr
                });
            }
        }
    }

    Ok(p_true)
}
