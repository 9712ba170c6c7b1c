// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Command-line interface for the k8s-to-kro binary.
//!
//! Reads a YAML stream of Kubernetes manifests and prints the equivalent Kro
//! `ResourceGroup` document.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process
};

use clap::{ArgAction, Parser};
use k8s_to_kro::{
    ConversionOptions, DEFAULT_RESOURCE_GROUP_NAME, Error, OutputFormat, ResourceGroup,
    convert_file, logging, write_error, write_resource_group
};
use tracing::info;

const USAGE: &str = "Usage: k8s-to-kro <kubernetes-manifest.yaml>";

/// Command line interface for converting manifests into a resource group.
#[derive(Debug, Parser)]
#[command(
    name = "k8s-to-kro",
    version,
    about = "Convert Kubernetes manifests into a Kro ResourceGroup"
)]
struct Cli {
    /// Path to a file holding one or more YAML manifests.
    #[arg(value_name = "PATH")]
    manifests: Option<PathBuf>,

    /// Write the resource group to this file instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "PATH", env = "K8S_TO_KRO_OUTPUT")]
    output: Option<PathBuf>,

    /// Name given to the generated resource group.
    #[arg(
        long = "name",
        value_name = "NAME",
        env = "K8S_TO_KRO_NAME",
        default_value = DEFAULT_RESOURCE_GROUP_NAME
    )]
    name: String,

    /// Output encoding.
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Populate `dependsOn` from Service selectors and Ingress backends.
    #[arg(long = "detect-dependencies", action = ArgAction::SetTrue)]
    detect_dependencies: bool,

    /// Increase log verbosity, may be repeated.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8
}

impl Cli {
    fn options(&self) -> ConversionOptions {
        ConversionOptions {
            name:                self.name.clone(),
            detect_dependencies: self.detect_dependencies
        }
    }
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main() {
    let cli = Cli::parse();
    logging::initialize_logging(cli.verbose);

    let Some(manifests) = cli.manifests.as_deref() else {
        println!("{USAGE}");
        process::exit(1);
    };

    if let Err(error) = run(&cli, manifests) {
        eprintln!("{}", error.to_display_string());
        process::exit(1);
    }
}

/// Converts the manifests at `path` and writes the result.
///
/// # Errors
///
/// Propagates loading, conversion and rendering errors.
fn run(cli: &Cli, path: &Path) -> Result<(), Error> {
    let group = convert_file(path, &cli.options())?;

    match cli.output.as_deref() {
        Some(destination) => write_to_file(destination, &group, cli.format),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_resource_group(&mut handle, &group, cli.format)
        }
    }
}

fn write_to_file(path: &Path, group: &ResourceGroup, format: OutputFormat) -> Result<(), Error> {
    let file = File::create(path).map_err(|source| write_error(path, source))?;
    let mut writer = BufWriter::new(file);

    write_resource_group(&mut writer, group, format)?;
    writer.flush().map_err(|source| write_error(path, source))?;

    info!("Wrote resource group to {}", path.display());
    Ok(())
}
