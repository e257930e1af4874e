//! Defines the `Model`, the Bayesian network over two hidden causes and four observed effects.
//!
//! The structure is fixed: `PPH` and `PPR` are independent roots, and every effect (`GPS`, `PC`,
//! `PMD`, `PR`) has exactly those two causes as parents. A `Model` therefore only carries
//! parameters, and the joint distribution factorizes as
//!
//! ```text
//! P(PPH, PPR, GPS, PC, PMD, PR) = P(PPH) P(PPR) Π_e P(e | PPH, PPR)
//! ```

use crate::evidence::Evidence;
use crate::factor::{Factor, Table};
use crate::inference::{ConditionalInferenceEngine, EnumerationEngine, HiddenState,
                       MapInferenceEngine, Posterior};
use crate::init::{CptEntries, Initialization};
use crate::util::{Result, ValidationError};
use crate::variable::{all_assignments, Assignment, Effect, HiddenCause, Variable};

use indexmap::IndexMap;
use itertools::iproduct;
use tracing::debug;

use std::fmt;

/// Priors keyed by hidden cause name: ```name -> P(cause = true)```
pub type Priors = IndexMap<String, f64>;

/// CPTs keyed by effect name
pub type Cpts = IndexMap<String, CptEntries>;


/// The immutable set of factors defining the joint distribution.
///
/// # Representation
/// A traditional graph data structure is not used; the scope of each `Factor` implicitly defines
/// the edges. The `Variable`s are held in topological order (causes first) regardless of the
/// order in which they were added to the `ModelBuilder`.
pub struct Model {

    /// Every `Variable` in the network and its CPD. Always holds all six variables.
    graph: IndexMap<Variable, Factor>

}


impl Model {

    /// Start building a `Model`
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }


    /// ```P(cause = true)```
    pub fn prior(&self, cause: HiddenCause) -> f64 {
        let idx: &[usize] = &[1];
        self.graph[&Variable::Cause(cause)].table()[idx]
    }


    /// The CPT of an effect laid out as ```[pph][ppr] -> P(effect = true | pph, ppr)```
    pub fn cpt(&self, effect: Effect) -> [[f64; 2]; 2] {
        let factor = &self.graph[&Variable::Effect(effect)];
        let mut p_true = [[0.0; 2]; 2];
        for (pph, ppr) in iproduct!(0..2, 0..2) {
            let idx: &[usize] = &[pph, ppr, 1];
            p_true[pph][ppr] = factor.table()[idx];
        }
        p_true
    }


    /// Get the CPD `Factor` of a variable
    pub fn cpd(&self, var: &Variable) -> Option<&Factor> {
        self.graph.get(var)
    }


    /// All CPD `Factor`s, in topological order
    pub fn factors(&self) -> impl Iterator<Item = &Factor> {
        self.graph.values()
    }


    /// Get a topological order of the `Model`
    pub fn topological_order(&self) -> Vec<Variable> {
        self.graph.keys().cloned().collect()
    }


    /// Determine the probability of a full `Assignment` to the `Variable`s in the `Model`.
    ///
    /// Specifically, this computes ```P(zeta)```, where ```zeta``` is a full assignment.
    ///
    /// # Errors
    /// * `ValidationError::IncompleteAssignment` if any variable is unassigned
    pub fn probability(&self, assignment: &Assignment) -> Result<f64> {
        let missing: Vec<String> = Variable::ALL.iter()
                                                .filter(|v| ! assignment.contains(v))
                                                .map(|v| String::from(v.name()))
                                                .collect();
        if ! missing.is_empty() {
            return Err(ValidationError::IncompleteAssignment(missing).into());
        }

        // chain rule over the CPDs
        self.graph
            .values()
            .try_fold(1.0, |acc, cpd| cpd.value(assignment).map(|v| acc * v))
            .map_err(|e| e.into())
    }


    /// Materialize the full joint distribution as a table with one axis per `Variable`, in the
    /// order of `Variable::ALL`. The 64 entries sum to one.
    pub fn joint_table(&self) -> Result<Table> {
        let mut table = Table::zeros(vec![2; Variable::ALL.len()]);

        for assn in all_assignments(&Variable::ALL) {
            let idx: Vec<usize> = Variable::ALL.iter()
                                               .map(|v| assn.get(v).unwrap_or(0))
                                               .collect();
            table[idx.as_slice()] = self.probability(&assn)?;
        }

        Ok(table)
    }


    /// Compute the posterior of both hidden causes given ```evidence```, using the
    /// `EnumerationEngine`.
    pub fn infer(&self, evidence: &Evidence) -> Result<Posterior> {
        EnumerationEngine.infer(self, evidence)
    }


    /// Compute the most probable joint state of the hidden causes given ```evidence```, using the
    /// `EnumerationEngine`.
    pub fn most_probable(&self, evidence: &Evidence) -> Result<HiddenState> {
        EnumerationEngine.most_probable(self, evidence)
    }

}


impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
         .entries(self.graph.iter().map(|(v, cpd)| (v.name(), cpd.table())))
         .finish()
    }
}


/// An implementation of the [builder pattern] for creating a `Model`.
///
/// Variables may be added in any order. The first error encountered is held and reported by
/// `build`, so calls can be chained without checking each step.
///
/// [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern
pub struct ModelBuilder {

    /// The `Variable`s and their associated CPDs
    factors: IndexMap<Variable, Factor>,

    /// The error state of the builder
    err: Option<ValidationError>

}


impl ModelBuilder {

    /// Construct a new `ModelBuilder` with no variables
    pub fn new() -> Self {
        ModelBuilder {
            factors: IndexMap::new(),
            err: None
        }
    }


    /// Add a `Variable` to the `Model`.
    ///
    /// # Args
    /// * `var`: the variable to add to the model
    /// * `init`: the initialization mechanism for the CPD of `var` in the model.
    pub fn with_variable(mut self, var: Variable, init: Initialization) -> Self {
        ///////////////////////////////////////////////////////////////////////
        // 1) if we are in an error state, do nothing
        if self.err.is_some() {
            return self;
        }

        ///////////////////////////////////////////////////////////////////////
        // 2) Build the factor based on the initialization
        let factor = match init.build_cpd(var) {
            Ok(factor) => factor,
            Err(e) => {
                self.err = Some(e);
                return self;
            }
        };

        ///////////////////////////////////////////////////////////////////////
        // 3) Add to current model, unless the variable is already present
        if self.factors.contains_key(&var) {
            self.err = Some(ValidationError::DuplicateVariable(String::from(var.name())));
        } else {
            self.factors.insert(var, factor);
        }

        self
    }


    /// Add a hidden cause with ```P(cause = true) = p```
    pub fn with_prior(self, cause: HiddenCause, p: f64) -> Self {
        self.with_variable(Variable::Cause(cause), Initialization::Bernoulli(p))
    }


    /// Add an effect with ```P(effect = true | pph, ppr) = p_true[pph][ppr]```
    pub fn with_cpt(self, effect: Effect, p_true: [[f64; 2]; 2]) -> Self {
        self.with_variable(Variable::Effect(effect), Initialization::table(p_true))
    }


    /// Complete building the model.
    ///
    /// # Returns
    /// the `Model`, or the first error generated during the building process
    ///
    /// # Errors
    /// * `ValidationError::MissingPrior` / `ValidationError::MissingCpt` if any of the six
    ///   variables was never added
    pub fn build(mut self) -> Result<Model> {
        if let Some(e) = self.err {
            return Err(e.into());
        }

        let mut graph = IndexMap::with_capacity(Variable::ALL.len());

        for var in Variable::ALL.iter() {
            match self.factors.swap_remove(var) {
                Some(factor) => {
                    graph.insert(*var, factor);
                },
                None => {
                    let name = String::from(var.name());
                    let err = match *var {
                        Variable::Cause(_) => ValidationError::MissingPrior(name),
                        Variable::Effect(_) => ValidationError::MissingCpt(name),
                    };
                    return Err(err.into());
                }
            }
        }

        let model = Model { graph };
        debug!(
            pph = model.prior(HiddenCause::Pph),
            ppr = model.prior(HiddenCause::Ppr),
            "built model"
        );

        Ok(model)
    }
}


impl Default for ModelBuilder {
    fn default() -> Self {
        ModelBuilder::new()
    }
}


/// Build a `Model` from name-keyed priors and CPTs.
///
/// # Errors
/// `OracleError::Validation` if
/// * a key does not name a variable, or names a variable of the wrong kind (a CPT for a hidden
///   cause, a prior for an effect)
/// * a prior or CPT is missing
/// * a CPT lacks one of the four parent configurations, or has an extra one
/// * any probability is outside [0, 1]
pub fn build_model(priors: &Priors, cpts: &Cpts) -> Result<Model> {
    let mut builder = ModelBuilder::new();

    for (name, &p) in priors.iter() {
        let var: Variable = name.parse()?;
        builder = builder.with_variable(var, Initialization::Bernoulli(p));
    }

    for (name, entries) in cpts.iter() {
        let var: Variable = name.parse()?;
        builder = builder.with_variable(var, Initialization::Table(entries.clone()));
    }

    builder.build()
}
