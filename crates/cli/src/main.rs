mod config;
mod pretty;

use config::Config;

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use clap::{Parser, Subcommand};
use colored::{control::set_override, Colorize};
use spicebridge_core::diagnostics::{spice_berto, spice_test};
use spicebridge_core::{
    shape_infos, Cell, ConvertError, EkAttDsc, EkSegSum, Ellipse, Marshaller, Object, Plane,
    ShapeKind, TypeRegistry, Value,
};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use crate::pretty::{pretty_json, pretty_object, PrettyConfig};

const LONG_ABOUT: &str = r##"
SpiceBridge converts between SPICE toolkit records and the Python objects
of the `spice` package, and runs the diagnostic round trips.

SHAPES:
  ellipse     center, semi_major, semi_minor (3 numbers each)
  plane       normal (3 numbers), constant
  cell, ekattdsc, eksegsum   known, conversion not supported yet

INPUT:
  Inline JSON, or use @path to read a file:
    spiceb berto @ellipse.json     Read object from file
    spiceb test @-                 Read object from stdin

  Objects are JSON maps. Either give the full form
    {"type": "Plane", "attrs": {"normal": [0, 0, 1], "constant": 2.5}}
  or just the attributes, in which case the command decides the type:
    {"normal": [0, 0, 1], "constant": 2.5}

EXAMPLES:
  spiceb berto '{"center": [0,0,0], "semi_major": [1,0,0], "semi_minor": [0,1,0]}'
  spiceb test '{"normal": [0, 0, 1], "constant": 2.5}'
  spiceb encode plane '{"normal": [0, 0, 1], "constant": 2.5}'
  spiceb decode ellipse @ellipse.json
  spiceb shapes

CONFIGURATION:
  Precedence: CLI args > Environment vars > Config file > Defaults

  Setting      | CLI flag         | Env var            | Default
  -------------|------------------|--------------------|---------
  module       | --module         | SPICEB_MODULE      | spice
  precision    | --precision      | SPICEB_PRECISION   | 6
  no_color     | -C, --no-color   | SPICEB_NO_COLOR    | false

  Config file location: spiceb --config-path
  Generate default config: spiceb --config-init"##;

#[derive(Parser)]
#[command(name = "spiceb")]
#[command(version)]
#[command(about = "Convert between SPICE toolkit records and Python objects")]
#[command(long_about = LONG_ABOUT)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Output results as JSON (for scripting/piping)
    #[arg(long, short = 'j', global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, short = 'C', global = true)]
    no_color: bool,

    /// Module the record types are looked up in
    #[arg(long, value_name = "NAME", global = true)]
    module: Option<String>,

    /// Digits after the decimal point in human-readable output
    #[arg(long, value_name = "N", global = true)]
    precision: Option<usize>,

    /// Verbose logging to stderr (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print the config file path and exit
    #[arg(long)]
    config_path: bool,

    /// Write a default config file and exit
    #[arg(long)]
    config_init: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Ellipse round trip that overwrites the ellipse with fixed test values
    Berto {
        /// Ellipse object (JSON or @path)
        input: String,
    },
    /// Plane round trip
    Test {
        /// Plane object (JSON or @path)
        input: String,
    },
    /// Convert a native record (JSON) to an object
    Encode {
        /// ellipse, plane, cell, ekattdsc or eksegsum
        shape: ShapeKind,
        /// Native record (JSON or @path)
        input: String,
    },
    /// Convert an object to a native record (JSON)
    Decode {
        /// ellipse, plane, cell, ekattdsc or eksegsum
        shape: ShapeKind,
        /// Object (JSON or @path)
        input: String,
    },
    /// List the known shapes and their attribute layouts
    Shapes,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Input(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("no command given (try --help)")]
    NoCommand,
}

/// Settings resolved from CLI args, environment, and config file.
struct Settings {
    json: bool,
    module: String,
    pretty: PrettyConfig,
}

fn main() {
    let cli = Cli::parse();

    // Handle --config-path
    if cli.config_path {
        match Config::path() {
            Some(path) => println!("{}", path.display()),
            None => {
                eprintln!(
                    "{}: Cannot determine config directory",
                    "error".red().bold()
                );
                std::process::exit(1);
            }
        }
        return;
    }

    // Handle --config-init
    if cli.config_init {
        match config::init_config() {
            Ok(path) => println!("Created config file: {}", path.display()),
            Err(e) => {
                eprintln!("{}: {}", "error".red().bold(), e);
                std::process::exit(1);
            }
        }
        return;
    }

    let level = match cli.verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    if level != LevelFilter::OFF {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let settings = resolve_settings(&cli);

    if let Err(e) = run(cli.command, &settings) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Merge CLI args over config, with source logging.
fn resolve_settings(cli: &Cli) -> Settings {
    let file_config = Config::load();

    if let Some(path) = Config::path() {
        if path.exists() {
            tracing::debug!("Loaded config from: {}", path.display());
        } else {
            tracing::trace!("No config file at: {}", path.display());
        }
    }

    let module = match &cli.module {
        Some(m) => {
            tracing::debug!("module = {} (from CLI)", m);
            m.clone()
        }
        None => {
            let m = file_config.module();
            tracing::debug!("module = {} (from env/config/default)", m);
            m
        }
    };

    let precision = cli.precision.unwrap_or_else(|| file_config.precision());
    let no_color = cli.no_color || file_config.no_color();
    if no_color {
        set_override(false);
    }

    Settings {
        json: cli.json,
        module,
        pretty: PrettyConfig {
            color: !no_color && io::stdout().is_terminal(),
            precision,
            ..Default::default()
        },
    }
}

fn run(command: Option<Command>, settings: &Settings) -> Result<(), CliError> {
    let marshaller = Marshaller::with_registry(TypeRegistry::spice(), settings.module.clone());

    match command.ok_or(CliError::NoCommand)? {
        Command::Berto { input } => {
            let arg = parse_object(&read_input(&input)?, &settings.module, ShapeKind::Ellipse)?;
            let out = spice_berto(&marshaller, &[arg])?;
            print_object(&out, settings)
        }
        Command::Test { input } => {
            let arg = parse_object(&read_input(&input)?, &settings.module, ShapeKind::Plane)?;
            let out = spice_test(&marshaller, &[arg])?;
            print_object(&out, settings)
        }
        Command::Encode { shape, input } => {
            let text = read_input(&input)?;
            let out = match shape {
                ShapeKind::Ellipse => {
                    marshaller.ellipse_to_object(&serde_json::from_str::<Ellipse>(&text)?)?
                }
                ShapeKind::Plane => {
                    marshaller.plane_to_object(&serde_json::from_str::<Plane>(&text)?)?
                }
                ShapeKind::Cell => marshaller.cell_to_object(&serde_json::from_str::<Cell>(&text)?)?,
                ShapeKind::EkAttDsc => {
                    marshaller.ekattdsc_to_object(&serde_json::from_str::<EkAttDsc>(&text)?)?
                }
                ShapeKind::EkSegSum => {
                    marshaller.eksegsum_to_object(&serde_json::from_str::<EkSegSum>(&text)?)?
                }
            };
            print_object(&out, settings)
        }
        Command::Decode { shape, input } => {
            let arg = parse_object(&read_input(&input)?, &settings.module, shape)?;
            let obj = arg.as_object().ok_or_else(|| ConvertError::ArgumentType {
                function: "decode",
                found: arg.kind().to_string(),
            })?;
            let record = match shape {
                ShapeKind::Ellipse => serde_json::to_value(marshaller.object_to_ellipse(obj)?)?,
                ShapeKind::Plane => serde_json::to_value(marshaller.object_to_plane(obj)?)?,
                ShapeKind::Cell => serde_json::to_value(marshaller.object_to_cell(obj)?)?,
                ShapeKind::EkAttDsc => serde_json::to_value(marshaller.object_to_ekattdsc(obj)?)?,
                ShapeKind::EkSegSum => serde_json::to_value(marshaller.object_to_eksegsum(obj)?)?,
            };
            if settings.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", pretty_json(&record, &settings.pretty));
            }
            Ok(())
        }
        Command::Shapes => {
            let infos = shape_infos();
            if settings.json {
                println!("{}", serde_json::to_string_pretty(&infos)?);
                return Ok(());
            }
            for info in infos {
                let status = if info.supported {
                    "supported".green()
                } else {
                    "not supported".yellow()
                };
                println!("{:<10} {}.{} ({})", info.id.bold(), settings.module, info.type_name, status);
                for (name, offset, width) in info.fields {
                    println!("    {:<12} slots {}..{}", name, offset, offset + width);
                }
            }
            Ok(())
        }
    }
}

/// Read input, handling @path syntax for file reading.
fn read_input(input: &str) -> Result<String, CliError> {
    let Some(path) = input.strip_prefix('@') else {
        return Ok(input.to_string());
    };

    // Handle @- for stdin
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| CliError::Input(format!("Failed to read stdin: {}", e)))?;
        return Ok(buffer);
    }

    let file_path = Path::new(path);
    if !file_path.exists() {
        return Err(CliError::Input(format!("File not found: {}", path)));
    }

    fs::read_to_string(file_path)
        .map_err(|e| CliError::Input(format!("Failed to read file '{}': {}", path, e)))
}

/// Parse an argument value.
///
/// A JSON map without a `type` key is taken as the attributes of an object
/// of the default shape; anything else is parsed as a full value.
fn parse_object(text: &str, module: &str, default: ShapeKind) -> Result<Value, CliError> {
    let json: serde_json::Value = serde_json::from_str(text)?;

    if let serde_json::Value::Object(map) = &json {
        if !map.contains_key("type") {
            let mut obj = Object::new(module, default.type_name());
            for (name, value) in map {
                obj.setattr(name.as_str(), serde_json::from_value::<Value>(value.clone())?);
            }
            return Ok(Value::Object(obj));
        }
    }

    Ok(serde_json::from_value(json)?)
}

fn print_object(obj: &Object, settings: &Settings) -> Result<(), CliError> {
    if settings.json {
        println!("{}", serde_json::to_string_pretty(obj)?);
    } else {
        println!("{}", pretty_object(obj, &settings.pretty));
    }
    Ok(())
}
