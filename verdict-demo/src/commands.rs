use std::{net::IpAddr, path::PathBuf};

use verdict::{
    Command, EagerOption, FlagOption, NullableOption, Parameter, ValueError, ValueOption,
    eager_option, option,
};

pub struct Demo {
    pub verbose: FlagOption<usize>,
    pub color: FlagOption<bool>,
    pub version: EagerOption,
}

impl Demo {
    pub fn new() -> Self {
        Self {
            verbose: option(["-v", "--verbose"])
                .with_help("Log more; repeat for even more")
                .counted(),
            color: option(["--color"])
                .with_help("Colorize output")
                .flag(true)
                .off_names(["--no-color"]),
            version: eager_option(["-V", "--version"], |context, _| {
                println!("{} {}", context.command_name(), env!("CARGO_PKG_VERSION"));
                Ok(())
            })
            .with_help("Print the version and exit"),
        }
    }
}

impl Default for Demo {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for Demo {
    fn parameters(&mut self) -> Vec<(&'static str, &mut dyn Parameter)> {
        vec![
            ("verbose", &mut self.verbose as &mut dyn Parameter),
            ("color", &mut self.color),
            ("version", &mut self.version),
        ]
    }
}

pub struct Serve {
    pub port: ValueOption<u16, u16, u16>,
    pub bind: ValueOption<IpAddr, IpAddr, IpAddr>,
    pub include: ValueOption<Vec<PathBuf>, PathBuf, PathBuf>,
    pub window: NullableOption<(u32, u32), u32>,
}

impl Serve {
    pub fn new() -> Self {
        Self {
            port: option(["-p", "--port"])
                .with_help("Port to listen on")
                .parse::<u16>()
                .default(8080)
                .validate(|&port| match port {
                    0 => Err("port 0 is reserved"),
                    _ => Ok(()),
                }),
            bind: option(None::<&str>)
                .with_help("Address to bind")
                .parse::<IpAddr>()
                .default(IpAddr::from([127, 0, 0, 1])),
            include: option(["-I", "--include"])
                .with_help("Directories to serve; may be repeated")
                .file()
                .multiple(),
            window: option(None::<&str>)
                .with_metavar("WIDTH HEIGHT")
                .convert("INT", |raw| {
                    raw.parse()
                        .map_err(|err| ValueError::conversion(raw, "dimension", err))
                })
                .paired(),
        }
    }
}

impl Default for Serve {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for Serve {
    fn parameters(&mut self) -> Vec<(&'static str, &mut dyn Parameter)> {
        vec![
            ("port", &mut self.port as &mut dyn Parameter),
            ("bind", &mut self.bind),
            ("include", &mut self.include),
            ("window", &mut self.window),
        ]
    }
}

pub struct Watch {
    pub interval: ValueOption<u64, u64, u64>,
    pub path: ValueOption<Vec<PathBuf>, PathBuf, PathBuf>,
}

impl Watch {
    pub fn new() -> Self {
        Self {
            interval: option(["-n", "--interval"])
                .with_help("Seconds between polls")
                .parse::<u64>()
                .default(5),
            path: option(None::<&str>).with_help("Paths to watch").file().multiple(),
        }
    }
}

impl Default for Watch {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for Watch {
    fn parameters(&mut self) -> Vec<(&'static str, &mut dyn Parameter)> {
        vec![
            ("interval", &mut self.interval as &mut dyn Parameter),
            ("path", &mut self.path),
        ]
    }
}
