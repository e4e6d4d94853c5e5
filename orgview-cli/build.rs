use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the transforms from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &[
    "syntax-json",
    "normalized-json",
    "render-json",
    "sanitized-json",
    "html",
    "toc-json",
    "file-refs-json",
];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input org file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output file path (defaults to stdout)")
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("orgview")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render org documents to HTML and navigable views")
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an orgview.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Render an org document to HTML (default command)")
                .arg(input_arg())
                .arg(output_arg())
                .arg(
                    Arg::new("fragment")
                        .long("fragment")
                        .help("Emit the markup fragment instead of a full page")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("view")
                .about("Render the navigable view of an org document")
                .arg(input_arg())
                .arg(output_arg())
                .arg(
                    Arg::new("messages")
                        .long("messages")
                        .help("Print host requests as JSON lines instead of the page")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("open")
                        .long("open")
                        .value_name("PATH")
                        .help("Click the first file reference to PATH (with --messages)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect intermediate pipeline stages")
                .arg(
                    Arg::new("path")
                        .help("Path to the org file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (stage-format)")
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("generate-css").about("Output the stylesheet embedded in rendered pages"),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "orgview", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "orgview", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "orgview", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
