//! Command-line interface for photon
//! Transpiles a photon source file to one of the registered targets.
//!
//! Usage:
//!   photon `<path>` [--target `<target>`] [--out-dir `<dir>`]   - Write `{dir}/{target}/main.*`
//!   photon `<path>` --stdout                                   - Print the transpiled main unit
//!   photon `<path>` --ast | --tokens                           - Dump parser output as JSON
//!   photon --list-targets                                      - List the available targets

use std::path::Path;

use clap::{Arg, ArgAction, ArgMatches, Command};
use photon_babel::{publish, BackendRegistry, PublishArtifact, PublishSpec, SourceDirResolver};
use photon_config::{Loader, PhotonConfig};
use photon_parser::photon::loader::UnitLoader;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("photon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Transpile photon source files")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the photon source file")
                .required_unless_present("list-targets")
                .index(1),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .short('t')
                .help("Target language (see --list-targets)"),
        )
        .arg(
            Arg::new("out-dir")
                .long("out-dir")
                .short('o')
                .help("Output directory; files land in <out-dir>/<target>/"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over photon.toml"),
        )
        .arg(
            Arg::new("stdout")
                .long("stdout")
                .help("Print the transpiled unit instead of writing files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ast")
                .long("ast")
                .help("Print the parsed translation unit as JSON")
                .action(ArgAction::SetTrue)
                .conflicts_with("tokens"),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .help("Print the tokens of every line as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-targets")
                .long("list-targets")
                .help("List available targets")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-targets") {
        handle_list_targets_command();
        return;
    }

    let config = load_config(&matches);
    init_logging(&config);

    let Some(path) = matches.get_one::<String>("path") else {
        fail("a source path is required");
    };
    if matches.get_flag("tokens") {
        handle_tokens_command(path);
    } else if matches.get_flag("ast") {
        handle_ast_command(path);
    } else {
        handle_transpile_command(path, &config, matches.get_flag("stdout"));
    }
}

fn load_config(matches: &ArgMatches) -> PhotonConfig {
    let cwd = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let mut loader = Loader::for_project(cwd);
    if let Some(file) = matches.get_one::<String>("config") {
        loader = loader.with_file(file);
    }
    let overrides = [
        ("transpile.target", matches.get_one::<String>("target")),
        ("transpile.output_dir", matches.get_one::<String>("out-dir")),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            loader = loader
                .set_override(key, value.as_str())
                .unwrap_or_else(|err| fail(&format!("Invalid option for {}: {}", key, err)));
        }
    }
    loader
        .build()
        .unwrap_or_else(|err| fail(&format!("Error loading configuration: {}", err)))
}

/// `RUST_LOG` wins over `diagnostics.log_level`.
fn init_logging(config: &PhotonConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.diagnostics.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_list_targets_command() {
    let registry = BackendRegistry::with_defaults();
    println!("Available targets:\n");
    for name in registry.list_targets() {
        match registry.get(&name) {
            Ok(target) => println!("  {} - {}", name, target.description()),
            Err(_) => println!("  {}", name),
        }
    }
}

fn handle_transpile_command(path: &str, config: &PhotonConfig, to_stdout: bool) {
    let unit = open(path)
        .parse()
        .unwrap_or_else(|err| fail(&err.to_string()));
    let resolver = SourceDirResolver::for_file(Path::new(path));
    let target = config.transpile.target.as_str();
    debug!(path, target, "transpiling");

    let mut spec = PublishSpec::new(&unit, target)
        .with_option("platform", config.js.platform.as_str())
        .with_indent_width(config.transpile.indent_width)
        .with_resolver(&resolver);
    if !to_stdout {
        spec = spec.with_output_dir(Path::new(&config.transpile.output_dir));
    }

    match publish(spec) {
        Ok(result) => match result.artifact {
            PublishArtifact::InMemory(text) => print!("{}", text),
            PublishArtifact::Files(paths) => {
                for path in paths {
                    println!("{}", path.display());
                }
            }
        },
        Err(err) => fail(&err.to_string()),
    }
}

fn handle_ast_command(path: &str) {
    let unit = open(path)
        .parse()
        .unwrap_or_else(|err| fail(&err.to_string()));
    let value = serde_json::to_value(&unit).unwrap_or_else(|err| fail(&err.to_string()));
    print_json(&value);
}

fn handle_tokens_command(path: &str) {
    let stream = open(path)
        .tokenize()
        .unwrap_or_else(|err| fail(&err.to_string()));
    let mut lines = Vec::with_capacity(stream.lines.len());
    for line in &stream.lines {
        let tokens =
            serde_json::to_value(&line.tokens).unwrap_or_else(|err| fail(&err.to_string()));
        lines.push(serde_json::json!({ "line": line.number, "tokens": tokens }));
    }
    print_json(&serde_json::json!({ "file": stream.file, "lines": lines }));
}

fn open(path: &str) -> UnitLoader {
    UnitLoader::from_path(path).unwrap_or_else(|err| fail(&err.to_string()))
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(err) => fail(&err.to_string()),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
