use std::{
    fmt::Display,
    io::{self, Write},
};

use joinery::JoinableIterator;
use lazy_format::lazy_format;

use crate::errors::{Error, ValueSource};

/// Describe where a value came from, as a suffix for an option's names.
/// Command line values need no description.
pub fn printable_origin(origin: &ValueSource) -> impl Display + '_ {
    lazy_format! {
        match (origin) {
            ValueSource::Environment(name) => " (from environment variable {name})",
            ValueSource::CommandLine | ValueSource::Absent => "",
        }
    }
}

/// Join a list of names for display, like `--verbose/-v`
pub fn printable_names<'a>(names: impl Iterator<Item = &'a str> + Clone) -> impl Display {
    names.join_with('/')
}

/// Write an error as a dispatcher would at the end of a failed parse pass.
/// Usage errors are phrased for the user; programmer errors are flagged as
/// internal, since there's nothing the user can do about them.
pub fn write_error(out: &mut impl Write, command: &str, error: &Error) -> io::Result<()> {
    let message = lazy_format! {
        match (error) {
            Error::Usage(error) => "{command}: {error}",
            Error::Programmer(error) => "{command}: internal error: {error}",
        }
    };

    writeln!(out, "{message}")
}
