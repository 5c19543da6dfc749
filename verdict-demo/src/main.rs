mod args;
mod commands;
mod error;

use std::{fmt::Display, io, process::ExitCode};

use anyhow::Context as _;
use lazy_format::lazy_format;
use tracing_subscriber::EnvFilter;
use verdict::{ContextTree, Invocation, attach_command, finalize_chain, printers};

use crate::args::collect;
use crate::commands::{Demo, Serve, Watch};
use crate::error::DispatchError;

const NAME: &str = "demo";

enum Subcommand {
    Serve(Serve),
    Watch(Watch),
}

fn heading(title: &str, color: bool) -> impl Display + '_ {
    lazy_format!(match (color) {
        true => "\x1b[1m{title}\x1b[0m",
        false => "{title}",
    })
}

fn dispatch(args: impl IntoIterator<Item = String>) -> Result<(), DispatchError> {
    let mut args = args.into_iter();

    let mut tree = ContextTree::new();
    let root = tree.add_root(NAME);
    tree.set_auto_envvar_prefix(root, "DEMO");

    let mut demo = Demo::new();
    attach_command(&mut demo).map_err(verdict::Error::from)?;
    let outer = collect(&mut demo, &mut args)?;

    let (mut subcommand, child) = match outer.subcommand.as_deref() {
        None => (None, None),
        Some("serve") => (
            Some(Subcommand::Serve(Serve::new())),
            Some(tree.add_child(root, "serve")),
        ),
        Some("watch") => {
            let child = tree.add_child(root, "watch");
            tree.set_auto_envvar_prefix(child, "WATCH");
            (Some(Subcommand::Watch(Watch::new())), Some(child))
        }
        Some(other) => return Err(DispatchError::UnknownCommand(other.to_owned())),
    };

    let inner = match &mut subcommand {
        None => None,
        Some(Subcommand::Serve(serve)) => {
            attach_command(serve).map_err(verdict::Error::from)?;
            Some(collect(serve, &mut args)?)
        }
        Some(Subcommand::Watch(watch)) => {
            attach_command(watch).map_err(verdict::Error::from)?;
            Some(collect(watch, &mut args)?)
        }
    };

    if let Some(extra) = inner.as_ref().and_then(|inner| inner.subcommand.as_ref()) {
        return Err(DispatchError::UnknownCommand(extra.clone()));
    }

    {
        let mut chain = vec![Invocation {
            command: &mut demo,
            context: root,
            occurrences: outer.occurrences,
        }];

        if let (Some(subcommand), Some(child), Some(inner)) = (&mut subcommand, child, inner) {
            let command: &mut dyn verdict::Command = match subcommand {
                Subcommand::Serve(serve) => serve,
                Subcommand::Watch(watch) => watch,
            };

            chain.push(Invocation {
                command,
                context: child,
                occurrences: inner.occurrences,
            });
        }

        finalize_chain(&tree, &mut chain)?;
    }

    if demo.version.fired().map_err(verdict::Error::from)? {
        return Ok(());
    }

    let color = *demo.color.value();

    println!("{}: verbosity {}", heading(NAME, color), demo.verbose.value());

    match subcommand {
        None => {}
        Some(Subcommand::Serve(serve)) => {
            println!(
                "{}: {}:{}",
                heading("serve", color),
                serve.bind.value(),
                serve.port.value()
            );

            for path in serve.include.value() {
                println!("  include {}", path.display());
            }

            if let Some((width, height)) = serve.window.value() {
                println!("  window {width}x{height}");
            }
        }
        Some(Subcommand::Watch(watch)) => {
            println!(
                "{}: every {}s",
                heading("watch", color),
                watch.interval.value()
            );

            for path in watch.path.value() {
                println!("  watching {}", path.display());
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_env("VERDICT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match dispatch(std::env::args().skip(1)) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(DispatchError::Finalize(error)) if error.usage().is_some() => {
            printers::write_error(&mut io::stderr().lock(), NAME, &error)
                .context("failed to write the error message")?;
            Ok(ExitCode::from(2))
        }
        Err(error) if error.is_usage() => {
            eprintln!("{NAME}: {error}");
            Ok(ExitCode::from(2))
        }
        Err(error) => Err(error).context("option declarations are broken"),
    }
}
