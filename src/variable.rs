//! Definition of the variable module
//!
//! The network has exactly six binary random variables: two hidden causes that are only ever
//! queried and four observed effects that may be supplied as evidence. Every variable takes the
//! states `0` (`false`) and `1` (`true`).

use crate::util::ValidationError;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// An unobservable cause whose posterior is the object of inference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HiddenCause {
    #[serde(rename = "PPH")]
    Pph,
    #[serde(rename = "PPR")]
    Ppr,
}

/// A boolean signal that may be observed. Each effect depends on both hidden causes and nothing
/// else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Effect {
    #[serde(rename = "GPS")]
    Gps,
    #[serde(rename = "PC")]
    Pc,
    #[serde(rename = "PMD")]
    Pmd,
    #[serde(rename = "PR")]
    Pr,
}

/// Any of the six variables in the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    Cause(HiddenCause),
    Effect(Effect),
}

impl HiddenCause {

    /// The hidden causes, in parent order. Every CPD is indexed `[PPH, PPR, effect]`.
    pub const ALL: [HiddenCause; 2] = [HiddenCause::Pph, HiddenCause::Ppr];

    pub fn name(&self) -> &'static str {
        match *self {
            HiddenCause::Pph => "PPH",
            HiddenCause::Ppr => "PPR",
        }
    }
}

impl Effect {

    pub const ALL: [Effect; 4] = [Effect::Gps, Effect::Pc, Effect::Pmd, Effect::Pr];

    pub fn name(&self) -> &'static str {
        match *self {
            Effect::Gps => "GPS",
            Effect::Pc => "PC",
            Effect::Pmd => "PMD",
            Effect::Pr => "PR",
        }
    }
}

impl Variable {

    /// All variables in topological order: causes first, then effects.
    pub const ALL: [Variable; 6] = [
        Variable::Cause(HiddenCause::Pph),
        Variable::Cause(HiddenCause::Ppr),
        Variable::Effect(Effect::Gps),
        Variable::Effect(Effect::Pc),
        Variable::Effect(Effect::Pmd),
        Variable::Effect(Effect::Pr),
    ];

    /// Get the name of the `Variable`
    pub fn name(&self) -> &'static str {
        match *self {
            Variable::Cause(ref c) => c.name(),
            Variable::Effect(ref e) => e.name(),
        }
    }

    /// The number of states the `Variable` can take. Every variable in the network is binary.
    pub fn cardinality(&self) -> usize {
        2
    }

    pub fn is_hidden(&self) -> bool {
        match *self {
            Variable::Cause(_) => true,
            Variable::Effect(_) => false,
        }
    }
}

impl From<HiddenCause> for Variable {
    fn from(c: HiddenCause) -> Self {
        Variable::Cause(c)
    }
}

impl From<Effect> for Variable {
    fn from(e: Effect) -> Self {
        Variable::Effect(e)
    }
}

impl FromStr for Variable {
    type Err = ValidationError;

    /// Names are matched exactly, so `"gps"` is not a variable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::ALL.iter()
                     .find(|v| v.name() == s)
                     .cloned()
                     .ok_or_else(|| ValidationError::UnknownVariable(String::from(s)))
    }
}

impl FromStr for HiddenCause {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Variable>()? {
            Variable::Cause(c) => Ok(c),
            Variable::Effect(_) => Err(ValidationError::UnknownVariable(String::from(s))),
        }
    }
}

impl FromStr for Effect {
    type Err = ValidationError;

    /// Naming a hidden cause here is reported as an observation of a hidden cause, since effects
    /// are only parsed when reading evidence or CPTs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Variable>()? {
            Variable::Effect(e) => Ok(e),
            Variable::Cause(_) => Err(ValidationError::HiddenCauseObserved(String::from(s))),
        }
    }
}

impl fmt::Display for HiddenCause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}


/// A (possibly partial) assignment of states to `Variable`s, used to address `Factor` tables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignment {
    values: IndexMap<Variable, usize>
}

impl Assignment {

    pub fn new() -> Self {
        Assignment { values: IndexMap::new() }
    }

    /// Assign ```state``` to ```var```, replacing any previous state.
    pub fn set<V: Into<Variable>>(&mut self, var: V, state: usize) {
        self.values.insert(var.into(), state);
    }

    /// Builder-style variant of `set`
    pub fn with<V: Into<Variable>>(mut self, var: V, state: usize) -> Self {
        self.set(var, state);
        self
    }

    /// The state assigned to ```var```, if any
    pub fn get(&self, var: &Variable) -> Option<usize> {
        self.values.get(var).cloned()
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.values.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check whether every `Variable` in the network is assigned
    pub fn is_complete(&self) -> bool {
        Variable::ALL.iter().all(|v| self.contains(v))
    }
}

/// Enumerate every complete assignment to ```scope```, in row-major order over the scope.
pub fn all_assignments(scope: &[Variable]) -> Vec<Assignment> {
    scope.iter()
         .map(|v| 0..v.cardinality())
         .multi_cartesian_product()
         .map(|states| {
             let mut assn = Assignment::new();
             for (&v, s) in scope.iter().zip(states) {
                 assn.set(v, s);
             }
             assn
         })
         .collect()
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn names_round_trip() {
        for v in Variable::ALL.iter() {
            assert_eq!(*v, v.name().parse::<Variable>().unwrap());
            assert_eq!(v.name(), v.to_string());
        }
    }

    #[test]
    fn unknown_names() {
        assert_eq!(
            "gps".parse::<Variable>(),
            Err(ValidationError::UnknownVariable(String::from("gps")))
        );
        assert!("".parse::<Variable>().is_err());
        assert_eq!(
            "PPH".parse::<Effect>(),
            Err(ValidationError::HiddenCauseObserved(String::from("PPH")))
        );
        assert!("GPS".parse::<HiddenCause>().is_err());
    }

    #[test]
    fn hidden() {
        assert_eq!(2, Variable::ALL.iter().filter(|v| v.is_hidden()).count());
        assert!(Variable::ALL.iter().all(|v| v.cardinality() == 2));
    }

    #[test]
    fn assignment() {
        let mut a = Assignment::new();
        assert!(a.is_empty());
        a.set(HiddenCause::Pph, 1);
        a.set(Effect::Gps, 0);
        assert_eq!(Some(1), a.get(&Variable::Cause(HiddenCause::Pph)));
        assert_eq!(Some(0), a.get(&Variable::Effect(Effect::Gps)));
        assert_eq!(None, a.get(&Variable::Effect(Effect::Pc)));
        assert!(! a.is_complete());

        a.set(HiddenCause::Pph, 0);
        assert_eq!(Some(0), a.get(&Variable::Cause(HiddenCause::Pph)));
        assert_eq!(2, a.len());
    }

    #[test]
    fn enumerate_assignments() {
        let scope = vec![Variable::Cause(HiddenCause::Pph), Variable::Cause(HiddenCause::Ppr)];
        let all = all_assignments(&scope);
        assert_eq!(4, all.len());

        // parent configurations come out as (0,0), (0,1), (1,0), (1,1)
        let order: Vec<(usize, usize)> = all.iter()
                                            .map(|a| (a.get(&scope[0]).unwrap(), a.get(&scope[1]).unwrap()))
                                            .collect();
        assert_eq!(vec![(0, 0), (0, 1), (1, 0), (1, 1)], order);

        let all = all_assignments(&Variable::ALL);
        assert_eq!(64, all.len());
        assert!(all.iter().all(|a| a.is_complete()));
    }
}
