//! Walk through a few queries against the reference model.
//!
//! Run with `cargo run --example posterior`.

use bn_oracle::variable::Effect;
use bn_oracle::{Evidence, ModelConfig};

fn main() -> anyhow::Result<()> {
    let model = ModelConfig::example().to_model()?;

    let queries: Vec<Vec<(&str, bool)>> = vec![
        vec![],
        vec![("GPS", true)],
        vec![("GPS", true), ("PC", true)],
        vec![("GPS", true), ("PC", true), ("PMD", true), ("PR", true)],
        vec![("GPS", false), ("PC", false), ("PMD", false), ("PR", false)],
    ];

    for query in queries {
        let evidence = Evidence::from_named(query)?;
        let posterior = model.infer(&evidence)?;
        let best = model.most_probable(&evidence)?;

        println!("{:<40} P(PPH=1)={:.4}  P(PPR=1)={:.4}  MAP=(PPH={}, PPR={})",
                 evidence.to_string(), posterior.pph(), posterior.ppr(), best.pph, best.ppr);
    }

    // every effect stays at zero probability of firing
    let mut config = ModelConfig::example();
    for entries in config.cpts.values_mut() {
        entries.values_mut().for_each(|p| *p = 0.0);
    }
    let silent = config.to_model()?;
    let evidence = Evidence::new().with(Effect::Pr, true)?;
    match silent.infer(&evidence) {
        Ok(posterior) => println!("unexpected posterior {:?}", posterior),
        Err(e) => println!("{:<40} {}", evidence.to_string(), e),
    }

    Ok(())
}
