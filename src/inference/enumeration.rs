//! Defines an inference engine that answers queries exactly, by enumerating the four joint states
//! of the hidden causes.
//!
//! With two binary causes there are only four hypotheses, so summing the joint directly is both
//! exact and cheaper than building an elimination order. For each hypothesis `(pph, ppr)` the
//! unnormalized weight is
//!
//! ```text
//! w(pph, ppr) = P(pph) P(ppr) Π_{e observed} P(e = e_obs | pph, ppr)
//! ```
//!
//! Unobserved effects are left out of the product: their CPD sums to one over the child for any
//! fixed parents, so omitting the factor is the same as summing the effect out.
//!
//! Products are accumulated as sums of logarithms and normalized with a shifted softmax, so
//! evidence whose probability is below the smallest positive `f64` still yields a posterior.

use crate::evidence::Evidence;
use crate::model::Model;
use crate::util::{OracleError, Result};
use super::{ConditionalInferenceEngine, HiddenState, HiddenWeights, MapInferenceEngine, Posterior};

use tracing::{debug, warn};


/// Exact inference by enumeration. Holds no state, so one engine (or the `Model::infer`
/// shortcut) can serve any number of concurrent queries.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnumerationEngine;


impl EnumerationEngine {

    /// Compute the unnormalized weight of every hidden-state hypothesis under ```evidence```.
    pub fn hidden_weights(&self, model: &Model, evidence: &Evidence) -> Result<HiddenWeights> {
        let observed = evidence.to_assignment();
        let mut weights = HiddenWeights::impossible();

        for state in HiddenState::ALL.iter() {
            let mut assn = observed.clone();
            state.assign(&mut assn);

            // factors of unobserved effects are not covered by the assignment. ln(0) = -inf
            // absorbs the rest of the sum, since every other term is at most zero.
            let log_w = model.factors()
                             .filter(|cpd| cpd.is_covered_by(&assn))
                             .try_fold(0.0, |acc, cpd| cpd.value(&assn).map(|v| acc + v.ln()))?;

            weights.set_log(*state, log_w);
        }

        Ok(weights)
    }


    /// Compute the weights and check that at least one hypothesis is possible
    fn normalizable_weights(&self, model: &Model, evidence: &Evidence) -> Result<HiddenWeights> {
        let weights = self.hidden_weights(model, evidence)?;

        if weights.is_impossible() {
            warn!(%evidence, "evidence has zero probability under every hidden state");
            Err(OracleError::DegenerateEvidence { evidence: evidence.to_string() })
        } else {
            Ok(weights)
        }
    }

}


impl ConditionalInferenceEngine for EnumerationEngine {

    fn infer(&self, model: &Model, evidence: &Evidence) -> Result<Posterior> {
        let weights = self.normalizable_weights(model, evidence)?;
        let posterior = Posterior::from_weights(&weights);

        debug!(
            %evidence,
            pph = posterior.pph(),
            ppr = posterior.ppr(),
            log_z = weights.log_partition(),
            "computed posterior"
        );

        Ok(posterior)
    }

}


impl MapInferenceEngine for EnumerationEngine {

    fn most_probable(&self, model: &Model, evidence: &Evidence) -> Result<HiddenState> {
        let weights = self.normalizable_weights(model, evidence)?;

        // strict comparison keeps the first state in enumeration order on ties
        let mut best = HiddenState::ALL[0];
        for state in HiddenState::ALL.iter().skip(1) {
            if weights.log_weight(*state) > weights.log_weight(best) {
                best = *state;
            }
        }

        debug!(%evidence, pph = best.pph, ppr = best.ppr, "most probable hidden state");
        Ok(best)
    }

}
