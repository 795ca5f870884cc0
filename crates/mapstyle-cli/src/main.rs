use mapstyle::profile::{BUILTIN_PROFILES, DEFAULT_PROFILE};
use mapstyle::render::{RenderError, StyleDeriver, StyleLayer, StyleOptions};
use mapstyle::{Feature, FeatureAttributes, GeometryKind, Rgb, StyleProfile};
use serde::Serialize;
use serde_json::Value;
use std::io::{Read, Write};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Profile(mapstyle::Error),
    Render(RenderError),
    Json(serde_json::Error),
    Input(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Profile(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Input(msg) => write!(f, "Invalid input: {msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<mapstyle::Error> for CliError {
    fn from(value: mapstyle::Error) -> Self {
        Self::Profile(value)
    }
}

impl From<RenderError> for CliError {
    fn from(value: RenderError) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Colour,
    Wrap,
    Pattern,
    Style,
    Palette,
    Profiles,
}

#[derive(Debug)]
struct Args {
    command: Command,
    positional: Vec<String>,
    pretty: bool,
    labels: bool,
    data_url: bool,
    profile: Option<String>,
    config: Option<String>,
    classification: Option<String>,
    code: Option<String>,
    out: Option<String>,
    width: usize,
    separator: String,
    hues: usize,
}

#[derive(Serialize)]
struct ColourOut<'a> {
    code: &'a str,
    hash: i32,
    colour: Rgb,
    opposite: Rgb,
    hex: String,
}

#[derive(Serialize)]
struct StyledFeature {
    feature: Feature,
    layers: Vec<StyleLayer>,
}

fn usage() -> &'static str {
    "mapstyle-cli\n\
\n\
USAGE:\n\
  mapstyle-cli colour [--pretty] <code>...\n\
  mapstyle-cli wrap [--width <n>] [--separator <s>] <text>...\n\
  mapstyle-cli pattern [--profile <name>] [--config <path>] --classification <tag> --code <code> [--out <path>] [--data-url]\n\
  mapstyle-cli style [--profile <name>] [--config <path>] [--labels] [--pretty] [<path>|-]\n\
  mapstyle-cli palette [--hues <n>] [<path>|-]\n\
  mapstyle-cli profiles\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - --config loads a JSON profile; without a \"base\" key it extends --profile (default: geocode).\n\
  - style reads a JSON array of attribute objects; a \"geometry\" of \"Point\" styles a point.\n\
  - pattern writes ./pattern.png unless --out or --data-url is given.\n\
  - wrap understands the escape \\n in --separator.\n\
  - Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostics on stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<String, CliError> {
    it.next().cloned().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut it = argv.iter().skip(1);
    let command = match it.next().map(String::as_str) {
        Some("colour" | "color") => Command::Colour,
        Some("wrap") => Command::Wrap,
        Some("pattern") => Command::Pattern,
        Some("style") => Command::Style,
        Some("palette") => Command::Palette,
        Some("profiles") => Command::Profiles,
        _ => return Err(CliError::Usage(usage())),
    };

    let mut args = Args {
        command,
        positional: Vec::new(),
        pretty: false,
        labels: false,
        data_url: false,
        profile: None,
        config: None,
        classification: None,
        code: None,
        out: None,
        width: 16,
        separator: "\n".to_string(),
        hues: mapstyle::palette::DEFAULT_HUES,
    };

    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => args.pretty = true,
            "--labels" => args.labels = true,
            "--data-url" => args.data_url = true,
            "--profile" => args.profile = Some(next_value(&mut it)?),
            "--config" => args.config = Some(next_value(&mut it)?),
            "--classification" => args.classification = Some(next_value(&mut it)?),
            "--code" => args.code = Some(next_value(&mut it)?),
            "--out" => args.out = Some(next_value(&mut it)?),
            "--width" => {
                args.width = next_value(&mut it)?
                    .parse::<usize>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--separator" => args.separator = next_value(&mut it)?.replace("\\n", "\n"),
            "--hues" => {
                args.hues = next_value(&mut it)?
                    .parse::<usize>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if args.hues == 0 {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--" => args.positional.extend(it.by_ref().cloned()),
            "-" => args.positional.push(a.clone()),
            other if other.starts_with("--") => return Err(CliError::Usage(usage())),
            value => args.positional.push(value.to_string()),
        }
    }

    let max_positional = match args.command {
        Command::Colour | Command::Wrap => usize::MAX,
        Command::Style | Command::Palette => 1,
        Command::Pattern | Command::Profiles => 0,
    };
    if args.positional.len() > max_positional {
        return Err(CliError::Usage(usage()));
    }
    if args.command == Command::Colour && args.positional.is_empty() {
        return Err(CliError::Usage(usage()));
    }
    if args.command == Command::Pattern && (args.classification.is_none() || args.code.is_none())
    {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // stdout carries the command output; diagnostics go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// `--config` overlays a JSON profile; `--profile` alone picks a built-in one.
fn load_profile(args: &Args) -> Result<StyleProfile, CliError> {
    let Some(path) = args.config.as_deref() else {
        let name = args.profile.as_deref().unwrap_or(DEFAULT_PROFILE);
        return Ok(StyleProfile::builtin(name)?);
    };

    let mut value: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    if let (Some(name), Some(obj)) = (args.profile.as_deref(), value.as_object_mut()) {
        obj.entry("base")
            .or_insert_with(|| Value::String(name.to_string()));
    }
    let profile = StyleProfile::from_json_value(&value)?;
    tracing::debug!(path, profile = %profile.name, "loaded profile config");
    Ok(profile)
}

fn run_colour(args: &Args) -> Result<(), CliError> {
    let out: Vec<ColourOut<'_>> = args
        .positional
        .iter()
        .map(|code| {
            let pair = mapstyle::colour_pair(code);
            ColourOut {
                code,
                hash: mapstyle::colour::code_hash(code),
                colour: pair.colour,
                opposite: pair.opposite,
                hex: pair.colour.to_hex(),
            }
        })
        .collect();
    write_json(&out, args.pretty)
}

fn run_wrap(args: &Args) -> Result<(), CliError> {
    let text = args.positional.join(" ");
    println!(
        "{}",
        mapstyle::string_divider(&text, args.width, &args.separator)
    );
    Ok(())
}

fn run_pattern(args: &Args) -> Result<(), CliError> {
    let (Some(classification), Some(code)) = (args.classification.as_deref(), args.code.as_deref())
    else {
        return Err(CliError::Usage(usage()));
    };
    let deriver = StyleDeriver::new(load_profile(args)?);
    let tile = deriver.pattern(classification, code)?;

    if args.data_url {
        println!("{}", tile.to_data_url()?);
        return Ok(());
    }

    let out = std::path::PathBuf::from(args.out.as_deref().unwrap_or("pattern.png"));
    std::fs::write(&out, tile.encode_png()?)?;
    tracing::info!(
        path = %out.display(),
        kind = tile.spec().kind().as_str(),
        size = tile.width(),
        "wrote pattern"
    );
    Ok(())
}

fn run_style(args: &Args) -> Result<(), CliError> {
    let input = read_input(args.positional.first().map(String::as_str))?;
    let Value::Array(items) = serde_json::from_str::<Value>(&input)? else {
        return Err(CliError::Input(
            "expected a JSON array of feature attribute objects".to_string(),
        ));
    };

    let deriver = StyleDeriver::new(load_profile(args)?).with_cache();
    let options = StyleOptions {
        labels: args.labels,
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let Value::Object(mut map) = item else {
            return Err(CliError::Input(format!("item {i} is not a JSON object")));
        };
        let geometry = match map.remove("geometry") {
            Some(Value::String(kind)) => GeometryKind::from_geometry_type(&kind),
            _ => GeometryKind::Area,
        };
        let attributes = FeatureAttributes::from_map(map);
        let feature = attributes.resolve(&deriver.profile().attributes, geometry);
        let layers = deriver.derive(&feature, options)?;
        out.push(StyledFeature { feature, layers });
    }
    write_json(&out, args.pretty)
}

fn run_palette(args: &Args) -> Result<(), CliError> {
    let input = read_input(args.positional.first().map(String::as_str))?;
    let ids: Vec<&str> = input
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    for (id, colour) in mapstyle::palette::assign_colours(&ids, args.hues) {
        println!("#{id} {{ fill: {}; }}", colour.to_hex());
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Colour => run_colour(&args),
        Command::Wrap => run_wrap(&args),
        Command::Pattern => run_pattern(&args),
        Command::Style => run_style(&args),
        Command::Palette => run_palette(&args),
        Command::Profiles => {
            for name in BUILTIN_PROFILES {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
