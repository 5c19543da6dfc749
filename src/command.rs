/*!
Glue between options and the commands that own them.

A [`Command`] hands out its options as a list of `&mut dyn Parameter`, each
with a name hint. [`attach_command`] attaches all of them once, after the
command is declared; [`finalize_command`] resolves all of them for a single
parse pass; and [`finalize_chain`] does that for a whole chain of nested
subcommands, outermost first.
 */

use std::collections::HashSet;

use crate::context::{Context, ContextId, ContextTree};
use crate::errors::{Error, ProgrammerError};
use crate::occurrences::Occurrences;
use crate::parameter::Parameter;

/// A command that owns a set of options.
pub trait Command {
    /// Every option of this command, along with a name hint (usually the
    /// name of the field that holds it) for options declared without names.
    fn parameters(&mut self) -> Vec<(&'static str, &mut dyn Parameter)>;
}

/// Attach every option of a command.
pub fn attach_command(command: &mut dyn Command) -> Result<(), ProgrammerError> {
    command
        .parameters()
        .into_iter()
        .try_for_each(|(hint, parameter)| parameter.attach(hint))
}

/// Make sure no name is claimed twice among a command's options, counting
/// the off names of flags.
fn check_names(
    parameters: &[(&'static str, &mut dyn Parameter)],
    context: &Context<'_>,
) -> Result<(), ProgrammerError> {
    let mut seen = HashSet::new();

    let names = parameters.iter().flat_map(|(_, parameter)| {
        parameter
            .names()
            .iter()
            .chain(parameter.off_names().into_iter().flat_map(|names| names.iter()))
    });

    for name in names {
        if !seen.insert(name) {
            return Err(ProgrammerError::ConflictingNames {
                name: name.to_owned(),
                command: context.command_name().to_owned(),
            });
        }
    }

    Ok(())
}

/**
Finalize every option of a command for one parse pass.

Options are finalized in the order the command lists them, and the first
error aborts the rest. Options that were already finalized keep their new
values; the ones after the failure keep nothing.
 */
pub fn finalize_command(
    command: &mut dyn Command,
    context: &Context<'_>,
    occurrences: &Occurrences,
) -> Result<(), Error> {
    let mut parameters = command.parameters();
    check_names(&parameters, context)?;

    tracing::debug!(
        command = context.command_name(),
        options = parameters.len(),
        occurrences = occurrences.len(),
        "finalizing command"
    );

    parameters
        .iter_mut()
        .try_for_each(|(_, parameter)| parameter.finalize(context, occurrences))
}

/// One command in a chain of subcommand invocations, with the occurrences
/// the tokenizer attributed to it.
pub struct Invocation<'a> {
    pub command: &'a mut dyn Command,
    pub context: ContextId,
    pub occurrences: Occurrences,
}

/**
Finalize a chain of nested commands. Outer commands are always finalized
before their subcommands, regardless of the order of `chain`; commands at the
same depth keep their relative order. The first error stops the chain.
 */
pub fn finalize_chain(tree: &ContextTree, chain: &mut [Invocation<'_>]) -> Result<(), Error> {
    chain.sort_by_key(|invocation| tree.context(invocation.context).ancestors().count());

    chain.iter_mut().try_for_each(|invocation| {
        finalize_command(
            &mut *invocation.command,
            &tree.context(invocation.context),
            &invocation.occurrences,
        )
    })
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap, rc::Rc};

    use super::*;
    use crate::occurrences::OccurrenceSet;
    use crate::option::{EagerOption, FlagOption, RawOption, eager_option, option};

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        marker: EagerOption,
        name: RawOption,
    }

    impl Recorder {
        fn new(log: &Log, label: &'static str) -> Self {
            let log = Rc::clone(log);
            Self {
                marker: eager_option(["--mark"], move |_, _| {
                    log.borrow_mut().push(label.to_owned());
                    Ok(())
                }),
                name: option(None::<&str>),
            }
        }
    }

    impl Command for Recorder {
        fn parameters(&mut self) -> Vec<(&'static str, &mut dyn Parameter)> {
            vec![
                ("mark", &mut self.marker as &mut dyn Parameter),
                ("name", &mut self.name),
            ]
        }
    }

    struct Clashing {
        color: FlagOption<bool>,
        colour: RawOption,
    }

    impl Command for Clashing {
        fn parameters(&mut self) -> Vec<(&'static str, &mut dyn Parameter)> {
            vec![
                ("color", &mut self.color as &mut dyn Parameter),
                ("colour", &mut self.colour),
            ]
        }
    }

    fn marked() -> Occurrences {
        let mut set = OccurrenceSet::new();
        set.record("--mark", None::<&str>);
        set.freeze()
    }

    #[test]
    fn attach_derives_names_from_hints() {
        let log = Log::default();
        let mut recorder = Recorder::new(&log, "recorded");
        attach_command(&mut recorder).unwrap();

        assert!(recorder.name.names().contains("--name"));
        assert!(attach_command(&mut recorder).is_err());
    }

    #[test]
    fn outer_commands_finalize_first() {
        let log = Log::default();
        let mut tree = ContextTree::with_environment(HashMap::<String, String>::new());
        let root = tree.add_root("outer");
        let child = tree.add_child(root, "inner");

        let mut outer = Recorder::new(&log, "outer");
        let mut inner = Recorder::new(&log, "inner");
        attach_command(&mut outer).unwrap();
        attach_command(&mut inner).unwrap();

        let mut chain = [
            Invocation {
                command: &mut inner,
                context: child,
                occurrences: marked(),
            },
            Invocation {
                command: &mut outer,
                context: root,
                occurrences: marked(),
            },
        ];
        finalize_chain(&tree, &mut chain).unwrap();

        assert_eq!(*log.borrow(), ["outer", "inner"]);
        assert_eq!(outer.name.value(), &None);
    }

    #[test]
    fn conflicting_names_are_rejected() {
        let mut tree = ContextTree::with_environment(HashMap::<String, String>::new());
        let root = tree.add_root("paint");

        let mut command = Clashing {
            color: option(["--color"]).flag(true).off_names(["--no-color"]),
            colour: option(["--colour", "--no-color"]),
        };
        attach_command(&mut command).unwrap();

        assert_eq!(
            finalize_command(&mut command, &tree.context(root), &Occurrences::empty()),
            Err(Error::Programmer(ProgrammerError::ConflictingNames {
                name: "--no-color".to_owned(),
                command: "paint".to_owned(),
            }))
        );
    }
}
