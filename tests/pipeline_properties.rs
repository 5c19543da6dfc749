//! Property-based tests for pipeline composition

use proptest::prelude::*;
use verdict::{ValuePipeline, convert, pipeline::RawPipeline};

fn occurrences(values: &[i64]) -> Vec<Vec<String>> {
    values.iter().map(|value| vec![value.to_string()]).collect()
}

fn integers() -> ValuePipeline<Option<i64>, i64, i64> {
    RawPipeline::new().convert(convert::parsed::<i64>)
}

/// With no occurrences, `default(v)` always resolves to exactly `v`
#[test]
fn test_default_with_no_occurrences_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&any::<i64>(), |value| {
            let pipeline = integers().default(value);
            prop_assert_eq!(pipeline.resolve(&[]), Ok(value));
            Ok(())
        })
        .unwrap();
}

/// With at least one occurrence, `default` never hides the last value
#[test]
fn test_default_yields_last_occurrence_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(any::<i64>(), prop::collection::vec(any::<i64>(), 1..16)),
            |(fallback, values)| {
                let pipeline = integers().default(fallback);
                prop_assert_eq!(
                    pipeline.resolve(&occurrences(&values)),
                    Ok(values[values.len() - 1])
                );
                Ok(())
            },
        )
        .unwrap();
}

/// `multiple` keeps every occurrence, in order
#[test]
fn test_multiple_preserves_order_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(any::<i64>(), 0..32), |values| {
            let pipeline = integers().multiple();
            prop_assert_eq!(pipeline.resolve(&occurrences(&values)), Ok(values));
            Ok(())
        })
        .unwrap();
}

/// A validator sees the value every earlier stage produced
#[test]
fn test_validate_sees_aggregated_value_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(0i64..100, 0..16), 0i64..1600),
            |(values, limit)| {
                let pipeline = integers()
                    .multiple()
                    .transform_all(|each| Ok(each.iter().sum::<i64>()))
                    .validate(move |sum: &i64| {
                        if *sum <= limit {
                            Ok(())
                        } else {
                            Err(format!("{sum} is over {limit}"))
                        }
                    });

                let sum: i64 = values.iter().sum();
                let resolved = pipeline.resolve(&occurrences(&values));

                if sum <= limit {
                    prop_assert_eq!(resolved, Ok(sum));
                } else {
                    prop_assert!(resolved.is_err());
                }
                Ok(())
            },
        )
        .unwrap();
}
