/*!
The [`Parameter`] trait, which every kind of option implements, along with the
pieces of an option declaration that are shared between kinds.

Options are used in two phases. First they're *declared*, by calling
[`option`][crate::option] and chaining composers like
[`default`][crate::option::ValueOption::default] or
[`multiple`][crate::option::ValueOption::multiple]. Then they're *attached* to
a command with [`Parameter::attach`], which fixes their names (deriving one
from the name hint if none were declared) and makes them eligible for
[`finalize`][Parameter::finalize].
 */

use std::fmt::{self, Display};

use heck::ToKebabCase;

use crate::context::Context;
use crate::errors::{Error, ProgrammerError};
use crate::occurrences::Occurrences;
use crate::printers::printable_names;

/**
The set of names that identify an option, such as `--verbose` and `-v`.

Names keep their declaration order and are de-duplicated. The *primary* name,
used to synthesize environment variable names, is the longest one.
 */
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Names(Vec<String>);

impl Names {
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        names.into_iter().collect()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + Clone {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|candidate| candidate == name)
    }

    /// The longest name; on ties, the first one declared.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        self.iter()
            .reduce(|best, name| if name.len() > best.len() { name } else { best })
    }

    fn push(&mut self, name: String) {
        if !self.contains(&name) {
            self.0.push(name);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Names {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut names = Names(Vec::new());
        iter.into_iter().for_each(|name| names.push(name.into()));
        names
    }
}

impl Display for Names {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("<unnamed>")
        } else {
            write!(f, "{}", printable_names(self.iter()))
        }
    }
}

/// The user-facing attributes of an option declaration.
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    pub(crate) names: Names,
    pub(crate) help: String,
    pub(crate) metavar: Option<String>,
    pub(crate) envvar: Option<String>,
}

impl Declaration {
    pub fn new(names: Names) -> Self {
        Self {
            names,
            ..Self::default()
        }
    }

    /**
    Derive a name from `hint` if none were declared. The hint is typically
    the name of the field or variable the option is bound to, so it's
    converted to kebab case: `output_dir` becomes `--output-dir`.
     */
    pub(crate) fn name_from_hint(&mut self, hint: &str) {
        if self.names.is_empty() && !hint.is_empty() {
            self.names.push(format!("--{}", hint.to_kebab_case()));
        }
    }
}

/**
A declared command-line option, as seen by the command that owns it.

This trait is object safe, so that a command can hand out its options as a
list of `&mut dyn Parameter` without caring about their value types.
 */
pub trait Parameter {
    /// The names of this option. Empty until attached if none were declared.
    fn names(&self) -> &Names;

    /// Additional names that switch this option *off*. Only flags have these.
    fn off_names(&self) -> Option<&Names> {
        None
    }

    /// The number of raw values each occurrence of this option consumes
    fn nargs(&self) -> usize;

    fn help(&self) -> &str;

    /// The placeholder for this option's value in usage messages, if it has
    /// a value.
    fn metavar(&self) -> Option<&str>;

    /// The explicitly declared environment variable for this option
    fn envvar(&self) -> Option<&str>;

    /**
    Attach this option to a command. If the option was declared without
    names, a default name is derived from `name_hint`. This may only happen
    once per option.
     */
    fn attach(&mut self, name_hint: &str) -> Result<(), ProgrammerError>;

    /**
    Resolve this option's value for one parse pass and cache it.

    This must be called after the command's raw arguments were tokenized into
    `occurrences`, and before the command runs. Calling it again starts a new
    parse pass, overwriting the previously cached value.
     */
    fn finalize(&mut self, context: &Context<'_>, occurrences: &Occurrences) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_deduplicated_in_order() {
        let names = Names::new(["--verbose", "-v", "--verbose"]);
        assert_eq!(names.iter().collect::<Vec<_>>(), ["--verbose", "-v"]);
        assert_eq!(names.to_string(), "--verbose/-v");
    }

    #[test]
    fn primary_name_is_the_longest() {
        assert_eq!(Names::new(["-o", "--output"]).primary(), Some("--output"));
        assert_eq!(Names::new(["--ab", "--cd"]).primary(), Some("--ab"));
        assert_eq!(Names::default().primary(), None);
    }

    #[test]
    fn name_hint_only_applies_without_names() {
        let mut declaration = Declaration::new(Names::default());
        declaration.name_from_hint("output_dir");
        assert_eq!(declaration.names, Names::new(["--output-dir"]));

        let mut declaration = Declaration::new(Names::new(["-o"]));
        declaration.name_from_hint("output_dir");
        assert_eq!(declaration.names, Names::new(["-o"]));
    }
}
