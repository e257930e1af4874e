//! Property-based tests for posterior invariants.

use bn_oracle::variable::{Effect, HiddenCause};
use bn_oracle::{EnumerationEngine, Evidence, Model, OracleError};
use proptest::prelude::*;

type Tables = [[[f64; 2]; 2]; 4];

fn probability() -> impl Strategy<Value = f64> {
    0.0f64..=1.0
}

fn tables_strategy() -> impl Strategy<Value = Tables> {
    prop::array::uniform4(prop::array::uniform2(prop::array::uniform2(probability())))
}

fn evidence_strategy() -> impl Strategy<Value = Evidence> {
    prop::array::uniform4(prop::option::of(any::<bool>())).prop_map(|observed| {
        let mut evidence = Evidence::new();
        for (effect, value) in Effect::ALL.iter().zip(observed.iter()) {
            if let Some(v) = value {
                evidence.observe(*effect, *v).expect("fresh effect");
            }
        }
        evidence
    })
}

fn build(pph: f64, ppr: f64, tables: &Tables) -> Model {
    let mut builder = Model::builder().with_prior(HiddenCause::Pph, pph)
                                      .with_prior(HiddenCause::Ppr, ppr);
    for (effect, table) in Effect::ALL.iter().zip(tables.iter()) {
        builder = builder.with_cpt(*effect, *table);
    }
    builder.build().expect("valid model")
}

/// ```P(E = e)``` summed directly from the joint table
fn evidence_mass(model: &Model, evidence: &Evidence) -> f64 {
    let joint = model.joint_table().expect("joint table");
    joint.indexed_iter()
         .filter(|(idx, _)| {
             Effect::ALL.iter().enumerate().all(|(i, e)| {
                 evidence.get(*e).map_or(true, |v| idx[2 + i] == v as usize)
             })
         })
         .map(|(_, &p)| p)
         .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn posteriors_are_probabilities(
        pph in probability(),
        ppr in probability(),
        tables in tables_strategy(),
        evidence in evidence_strategy(),
    ) {
        let model = build(pph, ppr, &tables);
        match model.infer(&evidence) {
            Ok(posterior) => {
                prop_assert!((0.0..=1.0).contains(&posterior.pph()));
                prop_assert!((0.0..=1.0).contains(&posterior.ppr()));
            },
            Err(OracleError::DegenerateEvidence { .. }) => {
                let weights = EnumerationEngine.hidden_weights(&model, &evidence).unwrap();
                prop_assert!(weights.is_impossible());
            },
            Err(e) => prop_assert!(false, "unexpected error {}", e),
        }
    }

    #[test]
    fn empty_evidence_recovers_priors(
        pph in probability(),
        ppr in probability(),
        tables in tables_strategy(),
    ) {
        let model = build(pph, ppr, &tables);
        let posterior = model.infer(&Evidence::new()).unwrap();
        prop_assert!((pph - posterior.pph()).abs() < 1e-9);
        prop_assert!((ppr - posterior.ppr()).abs() < 1e-9);
    }

    #[test]
    fn weights_sum_to_evidence_mass(
        pph in probability(),
        ppr in probability(),
        tables in tables_strategy(),
        evidence in evidence_strategy(),
    ) {
        let model = build(pph, ppr, &tables);
        let weights = EnumerationEngine.hidden_weights(&model, &evidence).unwrap();
        prop_assert!((evidence_mass(&model, &evidence) - weights.partition()).abs() < 1e-9);
    }

    #[test]
    fn positive_association_raises_posterior(
        pph in 0.01f64..0.99,
        ppr in probability(),
        base in prop::array::uniform2(0.0f64..0.5),
        lift in prop::array::uniform2(0.01f64..0.5),
        tables in tables_strategy(),
    ) {
        // P(GPS=1 | PPH=1, r) > P(GPS=1 | PPH=0, r) for both values of r
        let mut tables = tables;
        tables[0] = [[base[0], base[1]], [base[0] + lift[0], base[1] + lift[1]]];

        let model = build(pph, ppr, &tables);
        let evidence = Evidence::new().with(Effect::Gps, true).unwrap();
        let posterior = model.infer(&evidence).unwrap();
        prop_assert!(posterior.pph() >= pph - 1e-12);
    }

    #[test]
    fn symmetric_models_give_symmetric_posteriors(
        prior in probability(),
        diag in prop::array::uniform4(prop::array::uniform2(probability())),
        cross in prop::array::uniform4(probability()),
        evidence in evidence_strategy(),
    ) {
        let mut tables: Tables = [[[0.0; 2]; 2]; 4];
        for i in 0..4 {
            tables[i] = [[diag[i][0], cross[i]], [cross[i], diag[i][1]]];
        }

        let model = build(prior, prior, &tables);
        if let Ok(posterior) = model.infer(&evidence) {
            prop_assert!((posterior.pph() - posterior.ppr()).abs() < 1e-9);
        }
    }

    #[test]
    fn impossible_observation_is_degenerate(
        pph in probability(),
        ppr in probability(),
        tables in tables_strategy(),
        evidence in evidence_strategy(),
        which in 0usize..4,
    ) {
        let mut tables = tables;
        tables[which] = [[0.0; 2]; 2];
        let model = build(pph, ppr, &tables);

        let effect = Effect::ALL[which];
        let mut impossible = Evidence::new().with(effect, true).unwrap();
        for (other, value) in evidence.iter().filter(|(e, _)| *e != effect) {
            impossible.observe(other, value).unwrap();
        }

        let err = model.infer(&impossible).unwrap_err();
        prop_assert!(err.is_degenerate());
    }

    #[test]
    fn rescaled_likelihoods_give_the_same_posterior(
        pph in 0.01f64..0.99,
        ppr in 0.01f64..0.99,
        tables in prop::array::uniform4(prop::array::uniform2(prop::array::uniform2(0.01f64..=1.0))),
        scale in 1e-120f64..1e-90,
    ) {
        // every effect observed true, so scaling P(e=1 | .) by a constant cancels in Z
        let mut tiny = tables;
        for table in tiny.iter_mut() {
            for row in table.iter_mut() {
                for p in row.iter_mut() {
                    *p *= scale;
                }
            }
        }

        let evidence = Evidence::from_named(vec![("GPS", true), ("PC", true), ("PMD", true), ("PR", true)])
            .unwrap();
        let expected = build(pph, ppr, &tables).infer(&evidence).unwrap();
        let posterior = build(pph, ppr, &tiny).infer(&evidence).unwrap();

        prop_assert!((expected.pph() - posterior.pph()).abs() < 1e-9);
        prop_assert!((expected.ppr() - posterior.ppr()).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_prior_is_rejected(
        p in prop_oneof![-10.0f64..-1e-9, (1.0f64 + 1e-9)..10.0],
        tables in tables_strategy(),
    ) {
        let mut builder = Model::builder().with_prior(HiddenCause::Pph, 0.5)
                                          .with_prior(HiddenCause::Ppr, p);
        for (effect, table) in Effect::ALL.iter().zip(tables.iter()) {
            builder = builder.with_cpt(*effect, *table);
        }
        prop_assert!(builder.build().unwrap_err().is_validation());
    }
}
