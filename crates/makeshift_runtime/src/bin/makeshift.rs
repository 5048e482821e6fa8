//! Makeshift CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use makeshift_runtime::{compile_file, emit_all};

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    source: Option<PathBuf>,
    target: Option<String>,
    debug: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    for arg in args.into_iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--debug" => config.debug = true,
            a if a.starts_with('-') => {
                return Err(format!("unknown option: {a}").into());
            }
            a if config.source.is_none() => config.source = Some(PathBuf::from(a)),
            a if config.target.is_none() => config.target = Some(a.to_string()),
            a => return Err(format!("unexpected argument: {a}").into()),
        }
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    if config.show_version {
        println!("makeshift {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let Some(source) = config.source else {
        eprintln!("usage: makeshift [--debug] <source-file> [<target-name>]");
        return Ok(ExitCode::FAILURE);
    };

    let rules = compile_file(&source, config.target.as_deref())?;

    if !config.debug {
        print!("{}", emit_all(&rules));
    }

    Ok(ExitCode::SUCCESS)
}

fn print_help() {
    println!("makeshift - compile a build description into Makefile rules");
    println!();
    println!("USAGE:");
    println!("    makeshift [--debug] <source-file> [<target-name>]");
    println!();
    println!("ARGS:");
    println!("    <source-file>    Build description to compile");
    println!("    <target-name>    Emit only the rules whose target matches");
    println!();
    println!("OPTIONS:");
    println!("    --debug          Run the full pipeline but print nothing");
    println!("    -h, --help       Print this help");
    println!("    -V, --version    Print version");
}
