//! Exact posterior inference over a fixed Bayesian network with two hidden causes (`PPH`, `PPR`)
//! and four observed effects (`GPS`, `PC`, `PMD`, `PR`), each effect depending on both causes.
//!
//! ```
//! use bn_oracle::{Evidence, Model};
//! use bn_oracle::variable::{Effect, HiddenCause};
//!
//! let table = [[0.05, 0.3], [0.3, 0.6]];
//! let model = Model::builder().with_prior(HiddenCause::Pph, 0.1)
//!                             .with_prior(HiddenCause::Ppr, 0.1)
//!                             .with_cpt(Effect::Gps, table)
//!                             .with_cpt(Effect::Pc, table)
//!                             .with_cpt(Effect::Pmd, table)
//!                             .with_cpt(Effect::Pr, table)
//!                             .build()
//!                             .unwrap();
//!
//! let evidence = Evidence::from_named(vec![("GPS", true), ("PC", true)]).unwrap();
//! let posterior = model.infer(&evidence).unwrap();
//! assert!(posterior.pph() > 0.1);
//! ```

pub mod config;
pub mod evidence;
pub mod factor;
pub mod inference;
pub mod init;
pub mod model;
pub mod util;
pub mod variable;

pub use config::ModelConfig;
pub use evidence::Evidence;
pub use inference::{ConditionalInferenceEngine, EnumerationEngine, MapInferenceEngine, Posterior};
pub use model::{build_model, Model, ModelBuilder};
pub use util::{OracleError, Result, ValidationError};
