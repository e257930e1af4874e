//! Defines `Evidence`, a partial assignment of boolean values to the observed effects.
//!
//! Effects that are not listed are unobserved and get summed out during inference. Hidden causes
//! can never be part of the evidence.

use crate::util::ValidationError;
use crate::variable::{Assignment, Effect, Variable};

use indexmap::IndexMap;

use std::fmt;


#[derive(Clone, Debug, Default, PartialEq)]
pub struct Evidence {
    /// Observed effects, in the order they were observed
    observed: IndexMap<Effect, bool>
}


impl Evidence {

    /// Construct empty `Evidence`, which leaves every effect unobserved
    pub fn new() -> Self {
        Evidence { observed: IndexMap::new() }
    }


    /// Record that ```effect``` was observed as ```value```.
    ///
    /// Observing the same value twice is a no-op.
    ///
    /// # Errors
    /// * `ValidationError::ConflictingEvidence` if ```effect``` was already observed with the
    ///   opposite value. The `Evidence` is left unchanged.
    pub fn observe(&mut self, effect: Effect, value: bool) -> Result<&mut Self, ValidationError> {
        match self.observed.get(&effect) {
            Some(&prev) if prev != value => {
                Err(ValidationError::ConflictingEvidence(String::from(effect.name())))
            },
            Some(_) => Ok(self),
            None => {
                self.observed.insert(effect, value);
                Ok(self)
            }
        }
    }


    /// Builder-style variant of `observe`
    pub fn with(mut self, effect: Effect, value: bool) -> Result<Self, ValidationError> {
        self.observe(effect, value)?;
        Ok(self)
    }


    /// Record an observation of the effect called ```name```.
    ///
    /// # Errors
    /// * `ValidationError::UnknownVariable` if no variable is called ```name```
    /// * `ValidationError::HiddenCauseObserved` if ```name``` is a hidden cause
    /// * `ValidationError::ConflictingEvidence` as for `observe`
    pub fn observe_named(&mut self, name: &str, value: bool) -> Result<&mut Self, ValidationError> {
        let effect: Effect = name.parse()?;
        self.observe(effect, value)
    }


    /// Build `Evidence` from ```(name, value)``` pairs, as supplied by a caller that identifies
    /// variables by name.
    pub fn from_named<I, S>(pairs: I) -> Result<Self, ValidationError>
        where I: IntoIterator<Item = (S, bool)>,
              S: AsRef<str>
    {
        let mut evidence = Evidence::new();
        for (name, value) in pairs {
            evidence.observe_named(name.as_ref(), value)?;
        }
        Ok(evidence)
    }


    /// Parse a single ```NAME=VALUE``` observation, where ```VALUE``` is one of `true`, `false`,
    /// `1` or `0`.
    pub fn parse_observation(s: &str) -> Result<(Effect, bool), ValidationError> {
        let (name, value) = s.split_once('=')
                             .ok_or_else(|| ValidationError::InvalidObservation(String::from(s)))?;

        let effect: Effect = name.trim().parse()?;
        let value = match value.trim() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => return Err(ValidationError::InvalidObservation(String::from(s)))
        };

        Ok((effect, value))
    }


    /// The observed value of ```effect```, or `None` if it is unobserved
    pub fn get(&self, effect: Effect) -> Option<bool> {
        self.observed.get(&effect).cloned()
    }


    /// Iterate over the observations in the order they were made
    pub fn iter(&self) -> impl Iterator<Item = (Effect, bool)> + '_ {
        self.observed.iter().map(|(&e, &v)| (e, v))
    }


    pub fn len(&self) -> usize {
        self.observed.len()
    }


    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }


    /// Convert to an `Assignment` over the observed effects (`true` is state `1`)
    pub fn to_assignment(&self) -> Assignment {
        let mut assn = Assignment::new();
        for (e, v) in self.iter() {
            assn.set(Variable::Effect(e), v as usize);
        }
        assn
    }

}


impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (e, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", e, v)?;
        }
        write!(f, "}}")
    }
}
