/*!
The option kinds: [`ValueOption`], [`FlagOption`], and [`EagerOption`].

Every option pairs a [`Declaration`] (names, help, metavar, envvar) with a way
of producing its value, and caches that value in a [`Binding`] once its
command finalizes it. Composers like [`ValueOption::multiple`] take `&self`
and return a brand new, unattached option, so declaring a variation of an
option never disturbs the original.
 */

use std::{borrow::Cow, fmt, rc::Rc};

use crate::context::Context;
use crate::convert::{self, ParsedValue};
use crate::env::{self, EnvValue};
use crate::errors::{Error, ProgrammerError, UsageError, ValueError, ValueSource};
use crate::occurrences::Occurrences;
use crate::parameter::{Declaration, Names, Parameter};
use crate::pipeline::{RawPipeline, ValuePipeline};
use crate::state::Binding;

/// Declare an option with the given names. With no names, a name is derived
/// when the option is [attached][Parameter::attach].
pub fn option<I>(names: I) -> RawOption
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    ValueOption {
        declaration: Declaration::new(Names::new(names)),
        default_metavar: Cow::Borrowed("TEXT"),
        pipeline: RawPipeline::new(),
        binding: Binding::default(),
    }
}

/// Shared implementation of the read accessors for every option kind
fn read<'a, T>(binding: &'a Binding<T>, names: &Names) -> Result<&'a T, ProgrammerError> {
    binding.get().ok_or_else(|| ProgrammerError::NotFinalized {
        names: names.clone(),
    })
}

/// Shared implementation of `attach` for every option kind
fn attach<T>(
    declaration: &mut Declaration,
    binding: &mut Binding<T>,
    name_hint: &str,
) -> Result<(), ProgrammerError> {
    if !binding.attach() {
        return Err(ProgrammerError::AlreadyAttached {
            names: declaration.names.clone(),
        });
    }

    declaration.name_from_hint(name_hint);
    tracing::trace!(names = %declaration.names, "attached option");
    Ok(())
}

/// Shared precondition of `finalize` for every option kind: the option is
/// attached and has a name. Starts a new parse pass on success.
fn begin_finalize<T>(declaration: &Declaration, binding: &mut Binding<T>) -> Result<(), ProgrammerError> {
    if !binding.begin_pass() {
        return Err(ProgrammerError::Unbound {
            names: declaration.names.clone(),
        });
    }

    if declaration.names.is_empty() {
        return Err(ProgrammerError::EmptyNames);
    }

    Ok(())
}

macro_rules! declaration_builders {
    () => {
        /// Set the help text
        #[must_use]
        pub fn with_help(mut self, help: impl Into<String>) -> Self {
            self.declaration.help = help.into();
            self
        }

        #[must_use]
        pub fn declaration(&self) -> &Declaration {
            &self.declaration
        }
    };
}

/**
An option that takes values, resolved through a [`ValuePipeline`].

The type parameters are those of the pipeline: `Tall` is the final value,
`Teach` the value of each occurrence, and `Tvalue` the converted value of
each raw string.
 */
pub struct ValueOption<Tall, Teach, Tvalue> {
    declaration: Declaration,
    default_metavar: Cow<'static, str>,
    pipeline: ValuePipeline<Tall, Teach, Tvalue>,
    binding: Binding<Tall>,
}

/// An option whose value is `None` when it's absent
pub type NullableOption<Teach, Tvalue> = ValueOption<Option<Teach>, Teach, Tvalue>;

/// An option as first declared: a single string, or `None`
pub type RawOption = NullableOption<String, String>;

impl<Tall: fmt::Debug, Teach, Tvalue> fmt::Debug for ValueOption<Tall, Teach, Tvalue> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueOption")
            .field("declaration", &self.declaration)
            .field("pipeline", &self.pipeline)
            .field("binding", &self.binding)
            .finish()
    }
}

impl<Tall, Teach, Tvalue> ValueOption<Tall, Teach, Tvalue> {
    declaration_builders!();

    /// Read this option from the environment variable `name` when it's
    /// absent from the command line
    #[must_use]
    pub fn with_envvar(mut self, name: impl Into<String>) -> Self {
        self.declaration.envvar = Some(name.into());
        self
    }

    /// Set the placeholder used for this option's value in usage messages
    #[must_use]
    pub fn with_metavar(mut self, metavar: impl Into<String>) -> Self {
        self.declaration.metavar = Some(metavar.into());
        self
    }

    #[must_use]
    pub fn pipeline(&self) -> &ValuePipeline<Tall, Teach, Tvalue> {
        &self.pipeline
    }

    /**
    Get the resolved value of this option.

    # Panics

    Panics if this option hasn't been finalized for the current parse pass.
    That's always a bug in the program: values may only be read after the
    owning command's arguments were parsed.
     */
    #[must_use]
    pub fn value(&self) -> &Tall {
        match self.try_value() {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    /// Get the resolved value of this option, or an error if it hasn't been
    /// finalized yet.
    pub fn try_value(&self) -> Result<&Tall, ProgrammerError> {
        read(&self.binding, &self.declaration.names)
    }

    /// Build a new, unattached option with this declaration and a new
    /// pipeline
    fn with_pipeline<A, B, C>(&self, pipeline: ValuePipeline<A, B, C>) -> ValueOption<A, B, C> {
        ValueOption {
            declaration: self.declaration.clone(),
            default_metavar: self.default_metavar.clone(),
            pipeline,
            binding: Binding::default(),
        }
    }
}

impl RawOption {
    /**
    Convert each raw value with `convert`. `metavar` is the default
    placeholder for the value in usage messages (an explicit
    [`with_metavar`][ValueOption::with_metavar] overrides it).
     */
    pub fn convert<T: 'static>(
        &self,
        metavar: impl Into<Cow<'static, str>>,
        convert: impl Fn(&str) -> Result<T, ValueError> + 'static,
    ) -> NullableOption<T, T> {
        ValueOption {
            default_metavar: metavar.into(),
            ..self.with_pipeline(self.pipeline.convert(convert))
        }
    }

    /// Convert each raw value with its [`FromStr`][std::str::FromStr]
    /// implementation
    pub fn parse<T>(&self) -> NullableOption<T, T>
    where
        T: ParsedValue + 'static,
        T::Err: fmt::Display,
    {
        self.convert(T::METAVAR, convert::parsed::<T>)
    }

    /// Treat each value as a file path
    pub fn file(&self) -> NullableOption<std::path::PathBuf, std::path::PathBuf> {
        self.parse()
    }

    /// Turn this into a boolean flag that takes no values. It's `default`
    /// when absent.
    pub fn flag(&self, default: bool) -> FlagOption<bool> {
        FlagOption::new(
            self.declaration.clone(),
            FlagKind::Switch,
            move |seen| Ok(seen.last.unwrap_or(default)),
        )
    }

    /// Turn this into a flag that counts how many times it appeared, as for
    /// `-vvv`.
    pub fn counted(&self) -> FlagOption<usize> {
        FlagOption::new(self.declaration.clone(), FlagKind::Count, |seen| {
            Ok(seen.count)
        })
    }
}

impl<Tall: 'static, Teach: 'static, Tvalue: 'static> ValueOption<Tall, Teach, Tvalue> {
    /// See [`ValuePipeline::transform_all`]
    pub fn transform_all<T>(
        &self,
        transform: impl Fn(Vec<Teach>) -> Result<T, ValueError> + 'static,
    ) -> ValueOption<T, Teach, Tvalue> {
        self.with_pipeline(self.pipeline.transform_all(transform))
    }

    /// See [`ValuePipeline::validate`]
    pub fn validate<E>(&self, check: impl Fn(&Tall) -> Result<(), E> + 'static) -> Self
    where
        E: fmt::Display + 'static,
    {
        self.with_pipeline(self.pipeline.validate(check))
    }
}

impl<Teach: 'static, Tvalue: 'static> NullableOption<Teach, Tvalue> {
    /// See [`ValuePipeline::default`]. A repeated option still resolves to
    /// its last occurrence.
    pub fn default(&self, value: Teach) -> ValueOption<Teach, Teach, Tvalue>
    where
        Teach: Clone,
    {
        self.with_pipeline(self.pipeline.default(value))
    }

    /// See [`ValuePipeline::multiple`]
    pub fn multiple(&self) -> ValueOption<Vec<Teach>, Teach, Tvalue> {
        self.with_pipeline(self.pipeline.multiple())
    }

    /// See [`ValuePipeline::transform_nargs`]
    pub fn transform_nargs<T: 'static>(
        &self,
        nargs: usize,
        transform: impl Fn(Vec<Tvalue>) -> Result<T, ValueError> + 'static,
    ) -> NullableOption<T, Tvalue> {
        self.with_pipeline(self.pipeline.transform_nargs(nargs, transform))
    }

    /// See [`ValuePipeline::paired`]
    pub fn paired(&self) -> NullableOption<(Tvalue, Tvalue), Tvalue> {
        self.with_pipeline(self.pipeline.paired())
    }

    /// See [`ValuePipeline::triple`]
    pub fn triple(&self) -> NullableOption<(Tvalue, Tvalue, Tvalue), Tvalue> {
        self.with_pipeline(self.pipeline.triple())
    }
}

impl<Tall, Teach, Tvalue> Parameter for ValueOption<Tall, Teach, Tvalue> {
    fn names(&self) -> &Names {
        &self.declaration.names
    }

    fn nargs(&self) -> usize {
        self.pipeline.nargs()
    }

    fn help(&self) -> &str {
        &self.declaration.help
    }

    fn metavar(&self) -> Option<&str> {
        Some(
            self.declaration
                .metavar
                .as_deref()
                .unwrap_or(&self.default_metavar),
        )
    }

    fn envvar(&self) -> Option<&str> {
        self.declaration.envvar.as_deref()
    }

    fn attach(&mut self, name_hint: &str) -> Result<(), ProgrammerError> {
        attach(&mut self.declaration, &mut self.binding, name_hint)
    }

    fn finalize(&mut self, context: &Context<'_>, occurrences: &Occurrences) -> Result<(), Error> {
        begin_finalize(&self.declaration, &mut self.binding)?;

        let names = &self.declaration.names;
        let raw = occurrences.raw_values(names);

        let (raw, origin) = if !raw.is_empty() {
            (raw, ValueSource::CommandLine)
        } else {
            match env::lookup(self.declaration.envvar.as_deref(), names, context) {
                Some(EnvValue { name, value }) => (
                    env::fallback_occurrences(
                        &value,
                        self.pipeline.nargs(),
                        self.pipeline.splits_envvar(),
                        context.platform(),
                    ),
                    ValueSource::Environment(name),
                ),
                None => (raw, ValueSource::Absent),
            }
        };

        let value = self.pipeline.resolve(&raw).map_err(|error| UsageError {
            names: names.clone(),
            origin,
            error,
        })?;

        tracing::debug!(
            command = context.command_name(),
            option = %names,
            occurrences = raw.len(),
            "finalized option"
        );

        self.binding.resolve(value);
        Ok(())
    }
}

/// How a flag reads its environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagKind {
    /// The variable is a boolean; see [`convert::boolean`]
    Switch,

    /// The variable is a count; see [`convert::count`]
    Count,
}

/// The on/off states a flag saw during one parse pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Switches {
    /// The most recent state, if there was one
    last: Option<bool>,

    /// How many states there were
    count: usize,
}

impl Switches {
    fn push(&mut self, on: bool) {
        self.last = Some(on);
        self.count += 1;
    }
}

/**
An option that takes no values, like `--verbose`.

Each occurrence of a flag is recorded as `true`, or as `false` if it matched
one of the flag's [off names][FlagOption::off_names], and these are
aggregated into the final value. A boolean flag takes the last one; a counted
flag counts them.
 */
pub struct FlagOption<T> {
    declaration: Declaration,
    off_names: Names,
    kind: FlagKind,
    aggregate: Rc<dyn Fn(Switches) -> Result<T, ValueError>>,
    binding: Binding<T>,
}

impl<T: fmt::Debug> fmt::Debug for FlagOption<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagOption")
            .field("declaration", &self.declaration)
            .field("off_names", &self.off_names)
            .field("kind", &self.kind)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

impl<T> FlagOption<T> {
    declaration_builders!();

    /// Read this option from the environment variable `name` when it's
    /// absent from the command line
    #[must_use]
    pub fn with_envvar(mut self, name: impl Into<String>) -> Self {
        self.declaration.envvar = Some(name.into());
        self
    }

    fn new(
        declaration: Declaration,
        kind: FlagKind,
        aggregate: impl Fn(Switches) -> Result<T, ValueError> + 'static,
    ) -> Self {
        Self {
            declaration,
            off_names: Names::default(),
            kind,
            aggregate: Rc::new(aggregate),
            binding: Binding::default(),
        }
    }

    /// Add names that switch this flag off, like `--no-color`
    #[must_use]
    pub fn off_names<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.off_names = self
            .off_names
            .iter()
            .map(str::to_owned)
            .chain(names.into_iter().map(Into::into))
            .collect();
        self
    }

    /// See [`ValueOption::value`]
    #[must_use]
    pub fn value(&self) -> &T {
        match self.try_value() {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn try_value(&self) -> Result<&T, ProgrammerError> {
        read(&self.binding, &self.declaration.names)
    }

    /// Read the flag's environment variable as the states it stands for. A
    /// count of `n` is `n` occurrences.
    fn from_env(&self, value: &str) -> Result<Switches, ValueError> {
        match self.kind {
            FlagKind::Switch => convert::boolean(value).map(|on| Switches {
                last: Some(on),
                count: 1,
            }),
            FlagKind::Count => convert::count(value).map(|count| Switches {
                last: (count > 0).then_some(true),
                count,
            }),
        }
    }

    /// Check the name set for conflicts that make this flag ambiguous
    fn check_names(&self) -> Result<(), ProgrammerError> {
        if self.kind == FlagKind::Count && !self.off_names.is_empty() {
            return Err(ProgrammerError::CountedOffNames {
                names: self.declaration.names.clone(),
            });
        }

        match self
            .off_names
            .iter()
            .find(|name| self.declaration.names.contains(name))
        {
            Some(name) => Err(ProgrammerError::ConflictingNames {
                name: name.to_owned(),
                command: String::new(),
            }),
            None => Ok(()),
        }
    }
}

impl<T: 'static> FlagOption<T> {
    /// Add a check that runs on the resolved value; see
    /// [`ValuePipeline::validate`].
    pub fn validate<E>(&self, check: impl Fn(&T) -> Result<(), E> + 'static) -> Self
    where
        E: fmt::Display + 'static,
    {
        let aggregate = Rc::clone(&self.aggregate);

        Self {
            declaration: self.declaration.clone(),
            off_names: self.off_names.clone(),
            kind: self.kind,
            aggregate: Rc::new(move |seen| {
                let value = aggregate(seen)?;
                check(&value).map_err(ValueError::invalid)?;
                Ok(value)
            }),
            binding: Binding::default(),
        }
    }
}

impl<T> Parameter for FlagOption<T> {
    fn names(&self) -> &Names {
        &self.declaration.names
    }

    fn off_names(&self) -> Option<&Names> {
        Some(&self.off_names)
    }

    fn nargs(&self) -> usize {
        0
    }

    fn help(&self) -> &str {
        &self.declaration.help
    }

    fn metavar(&self) -> Option<&str> {
        None
    }

    fn envvar(&self) -> Option<&str> {
        self.declaration.envvar.as_deref()
    }

    fn attach(&mut self, name_hint: &str) -> Result<(), ProgrammerError> {
        attach(&mut self.declaration, &mut self.binding, name_hint)
    }

    fn finalize(&mut self, context: &Context<'_>, occurrences: &Occurrences) -> Result<(), Error> {
        begin_finalize(&self.declaration, &mut self.binding)?;
        self.check_names().map_err(|error| match error {
            ProgrammerError::ConflictingNames { name, .. } => ProgrammerError::ConflictingNames {
                name,
                command: context.command_name().to_owned(),
            },
            error => error,
        })?;

        let names = &self.declaration.names;
        let usage_error = |origin, error| UsageError {
            names: names.clone(),
            origin,
            error,
        };

        let mut seen = Switches::default();
        for occurrence in occurrences.iter() {
            let on = names.contains(occurrence.name());
            if !on && !self.off_names.contains(occurrence.name()) {
                continue;
            }

            if !occurrence.values().is_empty() {
                return Err(usage_error(
                    ValueSource::CommandLine,
                    ValueError::Arity {
                        expected: 0,
                        got: occurrence.values().len(),
                    },
                )
                .into());
            }

            seen.push(on);
        }

        let origin = if seen.count > 0 {
            ValueSource::CommandLine
        } else {
            match env::lookup(self.declaration.envvar.as_deref(), names, context) {
                Some(EnvValue { name, value }) => {
                    seen = self
                        .from_env(&value)
                        .map_err(|error| usage_error(ValueSource::Environment(name.clone()), error))?;
                    ValueSource::Environment(name)
                }
                None => ValueSource::Absent,
            }
        };

        let value = (self.aggregate)(seen).map_err(|error| usage_error(origin, error))?;

        tracing::debug!(
            command = context.command_name(),
            option = %names,
            "finalized flag"
        );

        self.binding.resolve(value);
        Ok(())
    }
}

type EagerCallback = Rc<dyn Fn(&Context<'_>, &EagerOption) -> Result<(), Error>>;

/**
An option that runs a callback as soon as it's finalized, if it appeared on
the command line. This is how options like `--version` are built: the
callback does its work (and usually ends the program) before any other part
of the command cares about its arguments.
 */
pub struct EagerOption {
    declaration: Declaration,
    callback: EagerCallback,
    binding: Binding<bool>,
}

impl fmt::Debug for EagerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EagerOption")
            .field("declaration", &self.declaration)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

/// Declare an [`EagerOption`]
pub fn eager_option<I>(
    names: I,
    callback: impl Fn(&Context<'_>, &EagerOption) -> Result<(), Error> + 'static,
) -> EagerOption
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    EagerOption {
        declaration: Declaration::new(Names::new(names)),
        callback: Rc::new(callback),
        binding: Binding::default(),
    }
}

impl EagerOption {
    declaration_builders!();

    /// Whether the callback ran during the most recent parse pass
    pub fn fired(&self) -> Result<bool, ProgrammerError> {
        read(&self.binding, &self.declaration.names).copied()
    }
}

impl Parameter for EagerOption {
    fn names(&self) -> &Names {
        &self.declaration.names
    }

    fn nargs(&self) -> usize {
        0
    }

    fn help(&self) -> &str {
        &self.declaration.help
    }

    fn metavar(&self) -> Option<&str> {
        None
    }

    fn envvar(&self) -> Option<&str> {
        None
    }

    fn attach(&mut self, name_hint: &str) -> Result<(), ProgrammerError> {
        attach(&mut self.declaration, &mut self.binding, name_hint)
    }

    fn finalize(&mut self, context: &Context<'_>, occurrences: &Occurrences) -> Result<(), Error> {
        begin_finalize(&self.declaration, &mut self.binding)?;

        let present = occurrences
            .matching(&self.declaration.names)
            .next()
            .is_some();

        if present {
            tracing::debug!(option = %self.declaration.names, "running eager option");
            (self.callback)(context, self)?;
        }

        self.binding.resolve(present);
        Ok(())
    }
}
