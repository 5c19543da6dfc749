/*!
The three-stage transform from raw strings to a typed value.

A [`ValuePipeline`] turns the raw occurrences of an option into its final
value in three steps:

1. `convert` turns each raw string into a `Tvalue`.
2. `aggregate_occurrence` turns the `Tvalue`s of one occurrence into a
   `Teach`.
3. `aggregate_all` turns the `Teach` of every occurrence into the final
   `Tall`.

Pipelines are immutable values. Every composer (like [`default`],
[`multiple`], or [`validate`]) returns a *new* pipeline sharing the earlier
stages, so a pipeline that's already in use is never affected by later
chaining.

[`default`]: ValuePipeline::default
[`multiple`]: ValuePipeline::multiple
[`validate`]: ValuePipeline::validate
 */

use std::{fmt, rc::Rc};

use crate::errors::ValueError;

type Convert<Tvalue> = Rc<dyn Fn(&str) -> Result<Tvalue, ValueError>>;
type AggregateOccurrence<Teach, Tvalue> = Rc<dyn Fn(Vec<Tvalue>) -> Result<Teach, ValueError>>;
type AggregateAll<Tall, Teach> = Rc<dyn Fn(Vec<Teach>) -> Result<Tall, ValueError>>;

pub struct ValuePipeline<Tall, Teach, Tvalue> {
    nargs: usize,
    split_envvar: bool,
    convert: Convert<Tvalue>,
    aggregate_occurrence: AggregateOccurrence<Teach, Tvalue>,
    aggregate_all: AggregateAll<Tall, Teach>,
}

/// A pipeline whose final value is absent when the option never appeared
pub type NullablePipeline<Teach, Tvalue> = ValuePipeline<Option<Teach>, Teach, Tvalue>;

/// The pipeline every option starts with: one string per occurrence, last
/// occurrence wins.
pub type RawPipeline = NullablePipeline<String, String>;

impl<Tall, Teach, Tvalue> Clone for ValuePipeline<Tall, Teach, Tvalue> {
    fn clone(&self) -> Self {
        Self {
            nargs: self.nargs,
            split_envvar: self.split_envvar,
            convert: Rc::clone(&self.convert),
            aggregate_occurrence: Rc::clone(&self.aggregate_occurrence),
            aggregate_all: Rc::clone(&self.aggregate_all),
        }
    }
}

impl<Tall, Teach, Tvalue> fmt::Debug for ValuePipeline<Tall, Teach, Tvalue> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuePipeline")
            .field("nargs", &self.nargs)
            .field("split_envvar", &self.split_envvar)
            .finish_non_exhaustive()
    }
}

/// The default `aggregate_occurrence`: exactly one value, returned as-is
fn single<T>(values: Vec<T>) -> Result<T, ValueError> {
    let got = values.len();
    let mut values = values.into_iter();

    match (values.next(), values.next()) {
        (Some(value), None) => Ok(value),
        _ => Err(ValueError::Arity { expected: 1, got }),
    }
}

/// The default `aggregate_all`: the last occurrence wins
fn last<T>(each: Vec<T>) -> Result<Option<T>, ValueError> {
    Ok(each.into_iter().next_back())
}

fn fixed<T, const N: usize>(values: Vec<T>) -> Result<[T; N], ValueError> {
    <[T; N]>::try_from(values).map_err(|values| ValueError::Arity {
        expected: N,
        got: values.len(),
    })
}

impl<Tvalue: 'static> NullablePipeline<Tvalue, Tvalue> {
    /// A single-valued pipeline using `convert` for each raw string.
    pub fn from_convert(convert: impl Fn(&str) -> Result<Tvalue, ValueError> + 'static) -> Self {
        Self {
            nargs: 1,
            split_envvar: false,
            convert: Rc::new(convert),
            aggregate_occurrence: Rc::new(single::<Tvalue>),
            aggregate_all: Rc::new(last::<Tvalue>),
        }
    }
}

impl RawPipeline {
    /// The identity pipeline: each occurrence is a single string, and the last
    /// one wins.
    pub fn new() -> Self {
        Self::from_convert(|raw| Ok(raw.to_owned()))
    }

    /// Replace the `convert` stage, keeping the default aggregate stages.
    pub fn convert<T: 'static>(
        &self,
        convert: impl Fn(&str) -> Result<T, ValueError> + 'static,
    ) -> NullablePipeline<T, T> {
        ValuePipeline {
            nargs: self.nargs,
            ..NullablePipeline::from_convert(convert)
        }
    }
}

impl Default for RawPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tall, Teach, Tvalue> ValuePipeline<Tall, Teach, Tvalue> {
    /// The number of raw values each occurrence must have
    #[inline]
    #[must_use]
    pub fn nargs(&self) -> usize {
        self.nargs
    }

    /// If true, an environment variable value is a list that should be split
    /// into one occurrence per item.
    #[inline]
    #[must_use]
    pub fn splits_envvar(&self) -> bool {
        self.split_envvar
    }

    /**
    Run the pipeline over a set of raw occurrences.

    Each occurrence must contain exactly [`nargs`][Self::nargs] strings. Any
    error from any stage is returned unchanged; no stage gets a chance to
    swallow an error from an earlier one.
     */
    pub fn resolve(&self, raw: &[Vec<String>]) -> Result<Tall, ValueError> {
        let each = raw
            .iter()
            .map(|occurrence| {
                if occurrence.len() != self.nargs {
                    return Err(ValueError::Arity {
                        expected: self.nargs,
                        got: occurrence.len(),
                    });
                }

                let values = occurrence
                    .iter()
                    .map(|raw| (self.convert)(raw))
                    .collect::<Result<Vec<Tvalue>, ValueError>>()?;

                (self.aggregate_occurrence)(values)
            })
            .collect::<Result<Vec<Teach>, ValueError>>()?;

        (self.aggregate_all)(each)
    }
}

impl<Tall: 'static, Teach: 'static, Tvalue: 'static> ValuePipeline<Tall, Teach, Tvalue> {
    /**
    Replace the `aggregate_all` stage outright. Every other composer that
    changes the final value type is built on this one.

    Whatever `aggregate_all` was before is discarded, along with any
    [`default`][NullablePipeline::default], [`validate`][Self::validate] or
    [`multiple`][NullablePipeline::multiple] wrapped into it. Add those after
    this call if they should still apply.
     */
    pub fn transform_all<T>(
        &self,
        transform: impl Fn(Vec<Teach>) -> Result<T, ValueError> + 'static,
    ) -> ValuePipeline<T, Teach, Tvalue> {
        ValuePipeline {
            nargs: self.nargs,
            split_envvar: self.split_envvar,
            convert: Rc::clone(&self.convert),
            aggregate_occurrence: Rc::clone(&self.aggregate_occurrence),
            aggregate_all: Rc::new(transform),
        }
    }

    /**
    Add a check that runs on the fully resolved value. The value passes
    through unchanged if `check` succeeds; if it fails, its error becomes a
    [`ValueError::Invalid`].

    The check sees the output of every stage added before it, including other
    validators.
     */
    pub fn validate<E>(&self, check: impl Fn(&Tall) -> Result<(), E> + 'static) -> Self
    where
        E: fmt::Display + 'static,
    {
        let aggregate_all = Rc::clone(&self.aggregate_all);

        self.transform_all(move |each| {
            let value = aggregate_all(each)?;
            check(&value).map_err(ValueError::invalid)?;
            Ok(value)
        })
    }
}

impl<Teach: 'static, Tvalue: 'static> NullablePipeline<Teach, Tvalue> {
    /// Use `value` when there were no occurrences at all. Otherwise the last
    /// occurrence wins, so a repeated option overrides earlier ones.
    pub fn default(&self, value: Teach) -> ValuePipeline<Teach, Teach, Tvalue>
    where
        Teach: Clone,
    {
        let aggregate_all = Rc::clone(&self.aggregate_all);

        self.transform_all(move |each| {
            aggregate_all(each).map(|resolved| resolved.unwrap_or_else(|| value.clone()))
        })
    }

    /// Keep every occurrence, in order, instead of only the last one. An
    /// environment variable for this pipeline is treated as a list.
    pub fn multiple(&self) -> ValuePipeline<Vec<Teach>, Teach, Tvalue> {
        ValuePipeline {
            split_envvar: true,
            ..self.transform_all(Ok)
        }
    }

    /**
    Change the arity to `nargs`, and aggregate the values of each occurrence
    with `transform`. The `aggregate_all` stage goes back to the default of
    taking the last occurrence.
     */
    pub fn transform_nargs<T: 'static>(
        &self,
        nargs: usize,
        transform: impl Fn(Vec<Tvalue>) -> Result<T, ValueError> + 'static,
    ) -> NullablePipeline<T, Tvalue> {
        ValuePipeline {
            nargs,
            split_envvar: false,
            convert: Rc::clone(&self.convert),
            aggregate_occurrence: Rc::new(transform),
            aggregate_all: Rc::new(last::<T>),
        }
    }

    /// Take two values per occurrence
    pub fn paired(&self) -> NullablePipeline<(Tvalue, Tvalue), Tvalue> {
        self.transform_nargs(2, |values| fixed(values).map(|[a, b]| (a, b)))
    }

    /// Take three values per occurrence
    pub fn triple(&self) -> NullablePipeline<(Tvalue, Tvalue, Tvalue), Tvalue> {
        self.transform_nargs(3, |values| fixed(values).map(|[a, b, c]| (a, b, c)))
    }
}
