/*!
Typed, environment-aware value resolution for command-line options.

verdict is the part of a command-line framework that sits between the
tokenizer and your program: it takes the raw strings each option received
(or, failing that, the value of an environment variable) and turns them into
a typed, validated value, once per parse pass.

Options are declared with [`option`] and shaped with composers that each
return a new option, leaving the original untouched:

```
use verdict::option;

let port = option(["-p", "--port"]).parse::<u16>().default(8080);
let includes = option(["-I", "--include"]).file().multiple();
let size = option(["--size"]).parse::<u32>().paired();
```

A command owns its options and lists them through the [`Command`] trait.
Once the tokenizer has collected each command's [`Occurrences`],
[`finalize_chain`] resolves every option, outermost command first, consulting
environment variables through the [`ContextTree`] when an option is absent.
Reading an option before that happens is a bug in the program; see
[`ValueOption::value`].
*/

pub mod command;
pub mod context;
pub mod convert;
pub mod env;
pub mod errors;
pub mod occurrences;
pub mod option;
pub mod parameter;
pub mod pipeline;
pub mod printers;
pub mod state;

pub use command::{Command, Invocation, attach_command, finalize_chain, finalize_command};
pub use context::{Context, ContextId, ContextTree};
pub use env::{Environment, Platform, ProcessEnvironment};
pub use errors::{Error, ProgrammerError, UsageError, ValueError, ValueSource};
pub use occurrences::{Occurrence, OccurrenceSet, Occurrences};
pub use option::{
    EagerOption, FlagOption, NullableOption, RawOption, ValueOption, eager_option, option,
};
pub use parameter::{Names, Parameter};
pub use pipeline::ValuePipeline;
