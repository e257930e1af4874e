//! Defines the interface to inference engines and the values they return

use crate::evidence::Evidence;
use crate::model::Model;
use crate::util::Result;
use crate::variable::{Assignment, HiddenCause};

use itertools::iproduct;
use serde::Serialize;

mod enumeration;

pub use self::enumeration::EnumerationEngine;


/// A `ConditionalInferenceEngine` is capable of answering Conditional Probability Queries of the
/// form:
///     ```P(PPH, PPR | E = e)```
///
/// Engines are stateless: the `Model` and evidence are passed to every query, and queries may run
/// concurrently against the same `Model`.
pub trait ConditionalInferenceEngine {

    /// Infer the posterior of the hidden causes given ```evidence```
    ///
    /// # Errors
    /// * `OracleError::DegenerateEvidence` if the evidence has zero probability under the model
    fn infer(&self, model: &Model, evidence: &Evidence) -> Result<Posterior>;

}


/// A `MapInferenceEngine` is capable of answering Maximum a posteriori queries:
///     ```MAP(PPH, PPR | E = e) = argmax_h P(PPH, PPR = h | E = e)```
pub trait MapInferenceEngine {

    /// Infer the most probable joint state of the hidden causes given ```evidence```
    fn most_probable(&self, model: &Model, evidence: &Evidence) -> Result<HiddenState>;

}


/// A joint state of both hidden causes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct HiddenState {
    #[serde(rename = "PPH")]
    pub pph: bool,

    #[serde(rename = "PPR")]
    pub ppr: bool
}

impl HiddenState {

    /// Every joint state, in the order `(0,0), (0,1), (1,0), (1,1)`
    pub const ALL: [HiddenState; 4] = [
        HiddenState { pph: false, ppr: false },
        HiddenState { pph: false, ppr: true },
        HiddenState { pph: true, ppr: false },
        HiddenState { pph: true, ppr: true },
    ];

    /// The state of one cause
    pub fn get(&self, cause: HiddenCause) -> bool {
        match cause {
            HiddenCause::Pph => self.pph,
            HiddenCause::Ppr => self.ppr,
        }
    }

    /// Assign this state to both causes in ```assn```
    pub fn assign(&self, assn: &mut Assignment) {
        assn.set(HiddenCause::Pph, self.pph as usize);
        assn.set(HiddenCause::Ppr, self.ppr as usize);
    }

    fn index(&self) -> (usize, usize) {
        (self.pph as usize, self.ppr as usize)
    }
}


/// The unnormalized weight ```P(pph, ppr, E = e)``` of every hidden-state hypothesis, held as
/// natural logarithms. Their sum is the partition function ```Z = P(E = e)```.
///
/// A hypothesis ruled out by an exact zero factor has log weight `-inf`. Weights far below the
/// smallest positive `f64` stay finite in log space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HiddenWeights {
    log_weights: [[f64; 2]; 2]
}

impl HiddenWeights {

    fn impossible() -> Self {
        HiddenWeights { log_weights: [[f64::NEG_INFINITY; 2]; 2] }
    }

    fn set_log(&mut self, state: HiddenState, log_w: f64) {
        let (pph, ppr) = state.index();
        self.log_weights[pph][ppr] = log_w;
    }

    /// ```ln P(pph, ppr, E = e)```
    pub fn log_weight(&self, state: HiddenState) -> f64 {
        let (pph, ppr) = state.index();
        self.log_weights[pph][ppr]
    }

    /// ```P(pph, ppr, E = e)```. May underflow to zero for very unlikely evidence.
    pub fn get(&self, state: HiddenState) -> f64 {
        self.log_weight(state).exp()
    }

    /// ```ln Z```, or `-inf` if every hypothesis is ruled out
    pub fn log_partition(&self) -> f64 {
        let logs: Vec<f64> = HiddenState::ALL.iter().map(|s| self.log_weight(*s)).collect();
        log_sum_exp(&logs)
    }

    /// Sum of the weights over all four hypotheses
    pub fn partition(&self) -> f64 {
        self.log_partition().exp()
    }

    /// Sum of the weights of the hypotheses in which ```cause``` is true
    pub fn marginal(&self, cause: HiddenCause) -> f64 {
        HiddenState::ALL.iter()
                        .filter(|s| s.get(cause))
                        .map(|s| self.get(*s))
                        .sum()
    }

    /// Check whether every hypothesis has an exact zero factor
    pub fn is_impossible(&self) -> bool {
        HiddenState::ALL.iter().all(|s| self.log_weight(*s) == f64::NEG_INFINITY)
    }
}


/// ```ln Σ exp(x_i)```, shifted by the maximum so that no term overflows or underflows to zero
/// unless it is negligible against the largest.
fn log_sum_exp(logs: &[f64]) -> f64 {
    let max = logs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }

    max + logs.iter().map(|x| (x - max).exp()).sum::<f64>().ln()
}


/// Posterior of the hidden causes. Serializes as ```{"PPH": p, "PPR": p}```.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Posterior {
    /// ```P(PPH = true | e)```
    #[serde(rename = "PPH")]
    pph: f64,

    /// ```P(PPR = true | e)```
    #[serde(rename = "PPR")]
    ppr: f64,

    /// ```P(PPH = pph, PPR = ppr | e)```, indexed `[pph][ppr]`
    #[serde(skip)]
    joint: [[f64; 2]; 2]
}

impl Posterior {

    /// Normalize ```weights``` with a softmax over the log weights. The caller guarantees that at
    /// least one hypothesis is possible.
    pub(crate) fn from_weights(weights: &HiddenWeights) -> Self {
        let max = HiddenState::ALL.iter()
                                  .map(|s| weights.log_weight(*s))
                                  .fold(f64::NEG_INFINITY, f64::max);

        // the largest shifted weight is exactly one
        let mut shifted = [[0.0; 2]; 2];
        for state in HiddenState::ALL.iter() {
            let (pph, ppr) = state.index();
            shifted[pph][ppr] = (weights.log_weight(*state) - max).exp();
        }

        let z = shifted[0][0] + shifted[0][1] + shifted[1][0] + shifted[1][1];
        let mut joint = [[0.0; 2]; 2];
        for (pph, ppr) in iproduct!(0..2, 0..2) {
            joint[pph][ppr] = shifted[pph][ppr] / z;
        }

        Posterior {
            pph: (shifted[1][0] + shifted[1][1]) / z,
            ppr: (shifted[0][1] + shifted[1][1]) / z,
            joint
        }
    }

    pub fn pph(&self) -> f64 {
        self.pph
    }

    pub fn ppr(&self) -> f64 {
        self.ppr
    }

    /// ```P(cause = true | e)```
    pub fn probability(&self, cause: HiddenCause) -> f64 {
        match cause {
            HiddenCause::Pph => self.pph,
            HiddenCause::Ppr => self.ppr,
        }
    }

    /// ```P(PPH = state.pph, PPR = state.ppr | e)```
    pub fn joint(&self, state: HiddenState) -> f64 {
        let (pph, ppr) = state.index();
        self.joint[pph][ppr]
    }
}
