// Command-line interface for orgview
//
// This binary renders org documents to HTML, either as a plain page or as the navigable view
// (collapsible sections, sticky headings, table of contents, clickable file references).
//
// The rendering itself lives in the orgview-render crate. This binary reads files, layers
// configuration from orgview-config and writes the results.
//
// Usage:
//  orgview <input> [--output <file>]            - Render to HTML (default)
//  orgview convert <input> [--output <file>]    - Same as above (explicit)
//  orgview view <input> [--output <file>]       - Render the navigable view
//  orgview inspect <path> [<transform>]         - Execute a transform (defaults to "syntax-json")
//  orgview generate-css                         - Print the built-in stylesheet
//  orgview --list-transforms                    - List available transforms
//
// Extra Parameters:
//
// Configuration keys can be overridden with --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and applies them on top of the loaded config;
// anything it does not recognize is passed on to the transform.
// Example:
//  orgview view notes.org --extra-toc false --extra-title "Field Notes"

use orgview_cli::transforms;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use orgview_config::{Loader, OrgviewConfig, PROJECT_FILE};
use orgview_render::view::JsonLines;
use orgview_render::{
    render_document, render_fragment, standalone_page, RenderOptions, ViewOptions, ViewSession,
};
use std::collections::HashMap;
use std::fs;
use std::io;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let has_value = i + 1 < args.len() && !args[i + 1].starts_with('-');

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

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

fn build_cli() -> Command {
    Command::new("orgview")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render org documents to HTML and navigable views")
        .long_about(
            "orgview renders org-mode documents.\n\n\
            Commands:\n  \
            - convert: Render a document to HTML (default command)\n  \
            - view:    Render the navigable view (sections, TOC, file links)\n  \
            - inspect: View intermediate pipeline stages\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override configuration keys.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            orgview notes.org                        # HTML page to stdout\n  \
            orgview notes.org -o notes.html          # HTML page to a file\n  \
            orgview view notes.org --extra-toc false # Navigable view without a TOC\n  \
            orgview inspect notes.org toc-json       # Table of contents as JSON",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
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
                .long_about(
                    "Render an org document to HTML.\n\n\
                    By default the output is a complete page with the built-in stylesheet.\n\
                    Use --fragment (or render.standalone = false) for the bare markup.\n\n\
                    Examples:\n  \
                    orgview convert notes.org -o notes.html\n  \
                    orgview notes.org --fragment            # 'convert' is optional",
                )
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
                .long_about(
                    "Render the document, then rebuild it as nested collapsible sections with\n\
                    sticky headings, a table of contents and classified file references.\n\n\
                    With --messages, host requests are written to stdout as JSON lines\n\
                    (one per line) instead of the page; --open <PATH> simulates a click on\n\
                    the first reference to that file.",
                )
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
                        .requires("messages"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect intermediate pipeline stages")
                .long_about(
                    "View a document at different stages of the rendering pipeline.\n\n\
                    Transforms (stage-format):\n  \
                    - syntax-json:     Syntax tree as parsed (default)\n  \
                    - normalized-json: Syntax tree after the metadata passes\n  \
                    - render-json:     Render tree before sanitizing\n  \
                    - sanitized-json:  Render tree handed to the serializer\n  \
                    - html:            Markup fragment\n  \
                    - toc-json:        Table of contents entries\n  \
                    - file-refs-json:  Classified file references\n\n\
                    Extra Parameters:\n  \
                    --extra-compact    Single-line JSON",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the org file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (stage-format). Defaults to 'syntax-json'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("generate-css")
                .about("Output the stylesheet embedded in rendered pages")
                .long_about(
                    "Outputs the built-in stylesheet.\n\n\
                    Use it as a starting point for custom styling; point render.custom_css\n\
                    (or --extra-css) at your file to append rules after the defaults.\n\n\
                    Examples:\n  \
                    orgview generate-css > custom.css",
                ),
        )
}

fn main() {
    env_logger::init();

    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !["convert", "view", "inspect", "generate-css", "help"]
                    .contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let mut options = render_options(&config);
            if sub_matches.get_flag("fragment") {
                options.standalone = false;
            }
            let input = required(sub_matches, "input");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, output, &options);
        }
        Some(("view", sub_matches)) => {
            let input = required(sub_matches, "input");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            let view = ViewOptions::from(&config.view);
            if sub_matches.get_flag("messages") {
                let open = sub_matches.get_one::<String>("open").map(|s| s.as_str());
                handle_view_messages_command(input, open, view);
            } else {
                handle_view_command(input, output, &render_options(&config), view);
            }
        }
        Some(("inspect", sub_matches)) => {
            let path = required(sub_matches, "path");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or("syntax-json");
            let view = ViewOptions::from(&config.view);
            handle_inspect_command(path, transform, &view, &extra_params);
        }
        Some(("generate-css", _)) => {
            print!("{}", orgview_render::VIEW_CSS);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .unwrap_or_else(|| {
            eprintln!("Error: missing required argument '{name}'");
            std::process::exit(2);
        })
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn write_output(output: Option<&str>, data: &str) {
    match output {
        Some(path) => fs::write(path, data).unwrap_or_else(|e| {
            eprintln!("Error writing file '{path}': {e}");
            std::process::exit(1);
        }),
        None => print!("{data}"),
    }
}

/// Handle the convert command
fn handle_convert_command(input: &str, output: Option<&str>, options: &RenderOptions) {
    let source = read_source(input);
    let html = render_document(&source, options);
    write_output(output, &html);
}

/// Handle the view command
fn handle_view_command(
    input: &str,
    output: Option<&str>,
    options: &RenderOptions,
    view: ViewOptions,
) {
    let source = read_source(input);
    let mut session = ViewSession::new(Vec::new(), view);
    session.load(&render_fragment(&source));
    log::info!(
        "{}: {} sections, {} file references",
        input,
        session.sections().len(),
        session.file_refs().len()
    );

    let body = session.to_html();
    let html = if options.standalone {
        standalone_page(&body, &source, options)
    } else {
        body
    };
    write_output(output, &html);
}

/// Handle `view --messages`: drive a session whose host channel is stdout.
fn handle_view_messages_command(input: &str, open: Option<&str>, view: ViewOptions) {
    let source = read_source(input);
    let mut session = ViewSession::new(JsonLines(io::stdout()), view);
    let generation = session.load(&render_fragment(&source));

    let result = session.request_doc_map().and_then(|()| {
        let Some(path) = open else {
            return Ok(());
        };
        let target = session
            .file_refs()
            .iter()
            .find(|r| r.path == path)
            .map(|r| r.element.clone());
        match target {
            Some(element) => session.click(generation, &element).map(|_| ()),
            None => {
                eprintln!("No file reference to '{path}' in {input}");
                std::process::exit(1);
            }
        }
    });

    if let Err(e) = result {
        eprintln!("Host channel error: {e}");
        std::process::exit(1);
    }
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    transform: &str,
    view: &ViewOptions,
    extra_params: &HashMap<String, String>,
) {
    let source = read_source(path);
    let output = transforms::execute_transform(&source, transform, view, extra_params)
        .unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });
    print!("{output}");
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    println!("Stages:");
    println!("  syntax      - Syntax tree as parsed");
    println!("  normalized  - Syntax tree after the metadata passes");
    println!("  render      - Render tree before sanitizing");
    println!("  sanitized   - Render tree handed to the serializer");
    println!("  toc         - Table of contents of the navigable view");
    println!("  file-refs   - File references of the navigable view\n");

    println!("Available transform combinations:");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> OrgviewConfig {
    let loader = Loader::new().with_optional_file(PROJECT_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn render_options(config: &OrgviewConfig) -> RenderOptions {
    let options = RenderOptions::from(&config.render);
    let Some(path) = &config.render.custom_css else {
        return options;
    };
    match fs::read_to_string(path) {
        Ok(css) => options.with_custom_css(css),
        Err(e) => {
            eprintln!("Error reading stylesheet '{}': {e}", path.display());
            std::process::exit(1);
        }
    }
}

fn apply_config_overrides(config: &mut OrgviewConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("standalone") {
        config.render.standalone = parse_bool_arg("standalone", &raw);
    }
    if let Some(raw) = extra_params.remove("title") {
        config.render.title = raw;
    }
    if let Some(path) = take_override(extra_params, &["css", "custom-css"]) {
        config.render.custom_css = Some(path.into());
    }

    if let Some(raw) = extra_params.remove("toc") {
        config.view.toc = parse_bool_arg("toc", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["link-file-references", "file-links"]) {
        config.view.link_file_references = parse_bool_arg("link-file-references", &raw);
    }
    if let Some(raw) = extra_params.remove("spy-tolerance") {
        config.view.spy_tolerance = raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid value for --extra-spy-tolerance: '{raw}' (expected a number)");
            std::process::exit(1);
        });
    }
    if let Some(raw) = extra_params.remove("expanded-glyph") {
        config.view.expanded_glyph = raw;
    }
    if let Some(raw) = extra_params.remove("collapsed-glyph") {
        config.view.collapsed_glyph = raw;
    }
}

fn take_override(params: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| params.remove(*key))
}

fn parse_bool_arg(name: &str, raw: &str) -> bool {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => {
            eprintln!("Invalid value for --extra-{name}: '{raw}' (expected true or false)");
            std::process::exit(1);
        }
    }
}
