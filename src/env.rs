/*!
Environment variable fallback.

When an option doesn't appear on the command line, its value can come from an
environment variable instead. The variable is either declared explicitly on
the option, or synthesized from the context's auto-envvar prefix and the
option's primary name: an option `--log-level` in a context with the
effective prefix `APP_SERVE` reads `APP_SERVE_LOG_LEVEL`.
 */

use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

use crate::context::Context;
use crate::parameter::Names;

/// A source of environment variables, queried by exact name.
pub trait Environment {
    fn var(&self, name: &str) -> Option<String>;
}

impl<E: Environment + ?Sized> Environment for &E {
    #[inline]
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// The environment of the current process, via [`std::env::var`]. Variables
/// that aren't valid unicode are treated as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<S: BuildHasher> Environment for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Environment for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Which path-list convention the host follows. This decides how
/// list-valued environment variables are split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Lists are separated by `;`
    Windows,

    /// Lists are separated by `:`
    Unix,
}

impl Platform {
    /// The platform this program was built for
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Unix }
    }

    /// Identify a platform from an OS name, like `"Microsoft Windows 10 PRO"`
    /// or `"OpenBSD"`.
    #[must_use]
    pub fn from_os_name(name: &str) -> Self {
        if name.to_ascii_lowercase().contains("windows") {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    #[must_use]
    pub const fn list_separator(self) -> char {
        match self {
            Self::Windows => ';',
            Self::Unix => ':',
        }
    }
}

/// Upper-case a name for use in an environment variable, replacing anything
/// that isn't an ASCII letter or digit with `_`.
pub(crate) fn envvar_segment(name: &str) -> String {
    name.chars()
        .map(|c| match c.is_ascii_alphanumeric() {
            true => c.to_ascii_uppercase(),
            false => '_',
        })
        .collect()
}

/**
Get the name of the environment variable an option would read from.

An explicitly declared name always wins. Otherwise, if `context` has an
auto-envvar prefix, the name is the prefix and the option's primary name
(without leading dashes) joined with `_`. If neither applies, the option has
no environment variable.
 */
#[must_use]
pub fn envvar_name(explicit: Option<&str>, names: &Names, context: &Context<'_>) -> Option<String> {
    if let Some(explicit) = explicit {
        return Some(explicit.to_owned());
    }

    let prefix = context.auto_envvar_prefix()?;
    let name = names.primary()?.trim_start_matches('-');

    Some(format!("{prefix}_{}", envvar_segment(name)))
}

/// An environment variable that was found for an option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvValue {
    pub name: String,
    pub value: String,
}

/// Look up the environment variable for an option, if it has one and it's
/// set.
pub fn lookup(explicit: Option<&str>, names: &Names, context: &Context<'_>) -> Option<EnvValue> {
    let name = envvar_name(explicit, names, context)?;
    let value = context.environment().var(&name);

    tracing::debug!(
        command = context.command_name(),
        envvar = %name,
        found = value.is_some(),
        "environment fallback"
    );

    value.map(|value| EnvValue { name, value })
}

/**
Turn an environment variable's value into synthetic raw occurrences, as
though they'd been given on the command line.

If `split` is set, the value is a list, split on the platform's list
separator into one single-value occurrence per (non-empty) item. Otherwise
it's a single occurrence: the whole value when `nargs` is 1, or the value
split on whitespace for options that take several values at once.
 */
#[must_use]
pub fn fallback_occurrences(
    value: &str,
    nargs: usize,
    split: bool,
    platform: Platform,
) -> Vec<Vec<String>> {
    if split {
        value
            .split(platform.list_separator())
            .filter(|item| !item.is_empty())
            .map(|item| vec![item.to_owned()])
            .collect()
    } else if nargs == 1 {
        vec![vec![value.to_owned()]]
    } else {
        vec![value.split_whitespace().map(str::to_owned).collect()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextTree;

    #[test]
    fn list_separator_follows_the_platform() {
        assert_eq!(
            Platform::from_os_name("Microsoft Windows 10 PRO"),
            Platform::Windows
        );
        assert_eq!(Platform::from_os_name("OpenBSD"), Platform::Unix);

        assert_eq!(
            fallback_occurrences("/bar;/baz", 1, true, Platform::Windows),
            [["/bar"], ["/baz"]]
        );
        assert_eq!(
            fallback_occurrences("/bar:/baz", 1, true, Platform::Unix),
            [["/bar"], ["/baz"]]
        );
    }

    #[test]
    fn unsplit_values_are_one_occurrence() {
        assert_eq!(
            fallback_occurrences("/bar:/baz", 1, false, Platform::Unix),
            [["/bar:/baz"]]
        );
        assert_eq!(
            fallback_occurrences("1  2", 2, false, Platform::Unix),
            [["1", "2"]]
        );
        assert!(fallback_occurrences("::", 1, true, Platform::Unix).is_empty());
    }

    #[test]
    fn segments_are_ascii_only() {
        assert_eq!(envvar_segment("sub-2"), "SUB_2");
        assert_eq!(envvar_segment("ünï-x2"), "_N__X2");
        assert_eq!(envvar_segment("ß"), "_");
    }

    #[test]
    fn explicit_names_win_over_prefixes() {
        let mut tree = ContextTree::with_environment(HashMap::<String, String>::new());
        let root = tree.add_root("c");
        tree.set_auto_envvar_prefix(root, "C");
        let context = tree.context(root);

        let names = Names::new(["-l", "--log-level"]);
        assert_eq!(
            envvar_name(None, &names, &context).as_deref(),
            Some("C_LOG_LEVEL")
        );
        assert_eq!(
            envvar_name(Some("LOG"), &names, &context).as_deref(),
            Some("LOG")
        );
    }

    #[test]
    fn lookup_reads_the_tree_environment() {
        let environment = HashMap::from([("FO".to_owned(), "foo".to_owned())]);
        let mut tree = ContextTree::with_environment(environment);
        let root = tree.add_root("c");
        let context = tree.context(root);
        let names = Names::new(["--foo"]);

        assert_eq!(
            lookup(Some("FO"), &names, &context),
            Some(EnvValue {
                name: "FO".to_owned(),
                value: "foo".to_owned()
            })
        );
        assert_eq!(lookup(None, &names, &context), None);
        assert_eq!(lookup(Some("BAR"), &names, &context), None);
    }
}
