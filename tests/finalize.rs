//! The finalize lifecycle, end to end through a command

use std::collections::HashMap;

use verdict::{
    Command, ContextTree, Error, NullableOption, OccurrenceSet, Occurrences, Parameter,
    ProgrammerError, ValueError, ValueOption, attach_command, finalize_command, option,
};

struct Resize {
    size: NullableOption<(u32, u32), u32>,
    scale: ValueOption<f64, f64, f64>,
    tags: ValueOption<Vec<String>, String, String>,
}

impl Resize {
    fn new() -> Self {
        Self {
            size: option(["-s", "--size"]).parse::<u32>().paired(),
            scale: option(["--scale"])
                .parse::<f64>()
                .default(1.0)
                .validate(|scale| {
                    if *scale > 0.0 {
                        Ok(())
                    } else {
                        Err(format!("scale must be positive, got {scale}"))
                    }
                }),
            tags: option(["-t", "--tag"]).multiple(),
        }
    }
}

impl Command for Resize {
    fn parameters(&mut self) -> Vec<(&'static str, &mut dyn Parameter)> {
        vec![
            ("size", &mut self.size as &mut dyn Parameter),
            ("scale", &mut self.scale),
            ("tags", &mut self.tags),
        ]
    }
}

fn tree() -> (ContextTree, verdict::ContextId) {
    let mut tree = ContextTree::with_environment(HashMap::<String, String>::new());
    let root = tree.add_root("resize");
    (tree, root)
}

fn finalize(command: &mut Resize, occurrences: Occurrences) -> Result<(), Error> {
    let (tree, root) = tree();
    finalize_command(command, &tree.context(root), &occurrences)
}

#[test]
fn values_resolve_after_finalize() {
    let mut command = Resize::new();
    attach_command(&mut command).unwrap();

    let mut set = OccurrenceSet::new();
    set.record("--size", ["640", "480"])
        .record("-t", ["a"])
        .record("--scale", ["0.5"])
        .record("--tag", ["b"]);
    finalize(&mut command, set.freeze()).unwrap();

    assert_eq!(command.size.value(), &Some((640, 480)));
    assert_eq!(*command.scale.value(), 0.5);
    assert_eq!(command.tags.value(), &["a", "b"]);

    // Reads are repeatable
    assert_eq!(command.size.value(), &Some((640, 480)));
}

#[test]
fn defaults_apply_when_absent() {
    let mut command = Resize::new();
    attach_command(&mut command).unwrap();
    finalize(&mut command, Occurrences::empty()).unwrap();

    assert_eq!(command.size.value(), &None);
    assert_eq!(*command.scale.value(), 1.0);
    assert!(command.tags.value().is_empty());
}

#[test]
fn reads_before_finalize_fail() {
    let mut command = Resize::new();
    assert!(matches!(
        command.scale.try_value(),
        Err(ProgrammerError::NotFinalized { .. })
    ));

    attach_command(&mut command).unwrap();
    assert!(matches!(
        command.scale.try_value(),
        Err(ProgrammerError::NotFinalized { .. })
    ));
}

#[test]
#[should_panic(expected = "cannot read from option --scale before parsing command line")]
fn value_before_finalize_panics() {
    let command = Resize::new();
    let _ = command.scale.value();
}

#[test]
fn unattached_options_cannot_finalize() {
    let mut command = Resize::new();

    assert!(matches!(
        finalize(&mut command, Occurrences::empty()),
        Err(Error::Programmer(ProgrammerError::Unbound { .. }))
    ));
}

#[test]
fn wrong_arity_is_a_usage_error() {
    let mut command = Resize::new();
    attach_command(&mut command).unwrap();

    let mut set = OccurrenceSet::new();
    set.record("-s", ["640"]);
    let error = finalize(&mut command, set.freeze()).unwrap_err();

    let usage = error.usage().unwrap();
    assert_eq!(usage.error, ValueError::Arity { expected: 2, got: 1 });
    assert_eq!(
        usage.to_string(),
        "invalid value for -s/--size: expected 2 value(s) per occurrence, got 1"
    );
}

#[test]
fn validators_see_the_resolved_value() {
    let mut command = Resize::new();
    attach_command(&mut command).unwrap();

    let mut set = OccurrenceSet::new();
    set.record("--scale", ["2"]).record("--scale", ["-1"]);
    let error = finalize(&mut command, set.freeze()).unwrap_err();

    assert_eq!(
        error.usage().map(|usage| &usage.error),
        Some(&ValueError::invalid("scale must be positive, got -1"))
    );
    assert!(command.scale.try_value().is_err());
}

#[test]
fn a_new_pass_overwrites_the_last() {
    let mut command = Resize::new();
    attach_command(&mut command).unwrap();

    let mut set = OccurrenceSet::new();
    set.record("--tag", ["a"]);
    finalize(&mut command, set.freeze()).unwrap();
    assert_eq!(command.tags.value(), &["a"]);

    finalize(&mut command, Occurrences::empty()).unwrap();
    assert!(command.tags.value().is_empty());
}

#[test]
fn composing_leaves_the_original_alone() {
    let base = option(["--level"]).parse::<u8>();
    let mut defaulted = base.default(3);
    let mut listed = base.multiple();

    let (tree, root) = tree();
    let context = tree.context(root);
    let mut set = OccurrenceSet::new();
    set.record("--level", ["1"]).record("--level", ["2"]);
    let occurrences = set.freeze();

    defaulted.attach("level").unwrap();
    listed.attach("level").unwrap();
    defaulted.finalize(&context, &occurrences).unwrap();
    listed.finalize(&context, &occurrences).unwrap();

    assert_eq!(*defaulted.value(), 2);
    assert_eq!(listed.value(), &[1, 2]);
    assert_eq!(base.pipeline().nargs(), 1);
    assert!(base.try_value().is_err());
}
