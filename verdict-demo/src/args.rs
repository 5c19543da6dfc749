/*!
A deliberately small tokenizer: `--name value`, `--name=value`, and bare
subcommand names. Each option consumes exactly as many values as its arity.
 */

use verdict::{Command, OccurrenceSet, Occurrences};

use crate::error::DispatchError;

/// The occurrences for one command, and the subcommand that ended them, if
/// any.
#[derive(Debug)]
pub struct Collected {
    pub occurrences: Occurrences,
    pub subcommand: Option<String>,
}

/// Match arguments against `command`'s options until the first argument
/// that isn't an option, which is taken as the name of a subcommand.
pub fn collect(
    command: &mut dyn Command,
    args: &mut impl Iterator<Item = String>,
) -> Result<Collected, DispatchError> {
    let parameters = command.parameters();
    let mut set = OccurrenceSet::new();

    while let Some(arg) = args.next() {
        if !arg.starts_with('-') || arg == "-" {
            return Ok(Collected {
                occurrences: set.freeze(),
                subcommand: Some(arg),
            });
        }

        let (name, inline) = match arg.split_once('=') {
            Some((name, value)) => (name.to_owned(), Some(value.to_owned())),
            None => (arg, None),
        };

        let (_, parameter) = parameters
            .iter()
            .find(|(_, parameter)| {
                parameter.names().contains(&name)
                    || parameter
                        .off_names()
                        .is_some_and(|off_names| off_names.contains(&name))
            })
            .ok_or_else(|| DispatchError::UnknownOption(name.clone()))?;

        let nargs = parameter.nargs();
        let mut values: Vec<String> = inline.into_iter().collect();

        while values.len() < nargs {
            let value = args.next().ok_or_else(|| DispatchError::MissingValue {
                option: name.clone(),
                expected: nargs,
            })?;
            values.push(value);
        }

        tracing::trace!(option = %name, values = values.len(), "matched option");
        set.record(name, values);
    }

    Ok(Collected {
        occurrences: set.freeze(),
        subcommand: None,
    })
}

#[cfg(test)]
mod tests {
    use verdict::attach_command;

    use super::*;
    use crate::commands::Serve;

    fn args(args: &[&str]) -> impl Iterator<Item = String> + use<> {
        args.iter()
            .map(|&arg| arg.to_owned())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn options_consume_their_arity() {
        let mut serve = Serve::new();
        attach_command(&mut serve).unwrap();

        let mut args = args(&["--window", "3", "4", "--port=80", "extra", "-p"]);
        let collected = collect(&mut serve, &mut args).unwrap();

        assert_eq!(collected.occurrences.len(), 2);
        assert_eq!(collected.subcommand.as_deref(), Some("extra"));
        assert_eq!(args.next().as_deref(), Some("-p"));
    }

    #[test]
    fn missing_values_are_reported() {
        let mut serve = Serve::new();
        attach_command(&mut serve).unwrap();

        assert!(matches!(
            collect(&mut serve, &mut args(&["--window", "3"])),
            Err(DispatchError::MissingValue { expected: 2, .. })
        ));
        assert!(matches!(
            collect(&mut serve, &mut args(&["--nope"])),
            Err(DispatchError::UnknownOption(name)) if name == "--nope"
        ));
    }
}
