/*!
Raw occurrences of options, as handed to us by a tokenizer.

The tokenizer is responsible for matching command-line arguments to options
and for consuming the right number of values for each one. It records each
match in an [`OccurrenceSet`], which is append-only. Once tokenizing is done
the set is frozen into [`Occurrences`], which is what options read from during
finalize.
 */

use crate::parameter::Names;

/**
A single appearance of an option on the command line.

`name` is the name that matched (such as `--output`, `-o`, or `--no-color`),
and `values` are the raw tokens consumed for it. For an option with an arity
of `n`, a well-formed occurrence has exactly `n` values; flags have none.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    name: String,
    values: Vec<String>,
}

impl Occurrence {
    pub fn new<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// The in-progress set of occurrences for one command, built up during the
/// tokenizing pass.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceSet {
    occurrences: Vec<Occurrence>,
}

impl OccurrenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the option `name` appeared with these raw `values`
    pub fn record<I>(&mut self, name: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.push(Occurrence::new(name, values))
    }

    pub fn push(&mut self, occurrence: Occurrence) -> &mut Self {
        self.occurrences.push(occurrence);
        self
    }

    /// Finish tokenizing. No more occurrences may be added after this.
    #[must_use]
    pub fn freeze(self) -> Occurrences {
        Occurrences {
            occurrences: self.occurrences,
        }
    }
}

/// The frozen, read-only set of occurrences for one command.
#[derive(Debug, Clone, Default)]
pub struct Occurrences {
    occurrences: Vec<Occurrence>,
}

impl Occurrences {
    /// No occurrences at all, as for a command invoked with no arguments
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Occurrence> {
        self.occurrences.iter()
    }

    /// All the occurrences matching any of `names`, in command-line order
    pub fn matching<'a>(&'a self, names: &'a Names) -> impl Iterator<Item = &'a Occurrence> {
        self.iter()
            .filter(move |occurrence| names.contains(occurrence.name()))
    }

    /// The raw values of each occurrence matching `names`, in command-line
    /// order. This is the input to a value pipeline.
    pub fn raw_values(&self, names: &Names) -> Vec<Vec<String>> {
        self.matching(names)
            .map(|occurrence| occurrence.values().to_vec())
            .collect()
    }
}

impl FromIterator<Occurrence> for Occurrences {
    fn from_iter<I: IntoIterator<Item = Occurrence>>(iter: I) -> Self {
        Self {
            occurrences: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_keeps_order_across_aliases() {
        let mut set = OccurrenceSet::new();
        set.record("--output", ["a"])
            .record("--verbose", None::<&str>)
            .record("-o", ["b"]);
        let occurrences = set.freeze();

        let names = Names::new(["--output", "-o"]);
        assert_eq!(occurrences.raw_values(&names), [["a"], ["b"]]);
        assert_eq!(occurrences.len(), 3);
    }

    #[test]
    fn absent_option_has_no_raw_values() {
        let occurrences = Occurrences::empty();
        assert!(occurrences.raw_values(&Names::new(["--output"])).is_empty());
    }
}
