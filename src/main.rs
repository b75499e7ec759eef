//! Simple SVG CLI
//!
//! Usage:
//!   simple-svg [OPTIONS] [FILE]
//!
//! Options:
//!   -p, --params <PARAMS>  Render parameters, `key:value;...`
//!   -s, --sprite <ID>      Select a sprite (repeat to descend)
//!   -c, --config <FILE>    Configuration file (TOML format)
//!   --markup               Print rendered markup instead of the data URI
//!   --catalog              List the colors found in the asset
//!   --value <DECL>         Rewrite a CSS declaration value
//!   -I, --dir <DIR>        Asset search directory for --value
//!   -d, --debug            Timing output, raise instead of warn
//!   -h, --help             Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use simple_svg::{rewrite_value, Asset, AssetCache, AssetError, Config};

#[derive(Parser)]
#[command(name = "simple-svg")]
#[command(about = "Compile SVG assets into themeable data URIs")]
struct Cli {
    /// Input SVG file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Render parameters, e.g. "[fill]: red; size: 16px"
    #[arg(short, long, default_value = "")]
    params: String,

    /// Sprite id to select; repeat for nested sprites
    #[arg(short, long = "sprite", value_name = "ID")]
    sprites: Vec<String>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the rendered markup instead of the data URI
    #[arg(long)]
    markup: bool,

    /// List the color catalog instead of rendering
    #[arg(long)]
    catalog: bool,

    /// Rewrite every svg(...) call in a CSS declaration value
    #[arg(long, value_name = "DECL")]
    value: Option<String>,

    /// Directory searched for named assets
    #[arg(short = 'I', long = "dir", value_name = "DIR")]
    dirs: Vec<PathBuf>,

    /// Debug mode: timing output, failures are raised
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    if cli.debug {
        config.debug = true;
    }
    config.dirs.extend(cli.dirs.iter().cloned());

    if let Some(value) = &cli.value {
        rewrite(value, &config);
        return;
    }

    let (filename, source) = read_input(&cli);
    let asset = match Asset::from_markup(&source, config.asset_options()) {
        Ok(asset) => asset,
        Err(AssetError::Parse(e)) => {
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let target = match asset.resolve(cli.sprites.as_slice()) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.catalog {
        print_catalog(target);
        return;
    }

    if cli.markup {
        println!("{}", target.markup(cli.params.as_str()));
        return;
    }

    match target.render(cli.params.as_str()) {
        Ok(uri) => println!("{}", uri),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(debug: bool) {
    let fallback = if debug { "simple_svg=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(cli: &Cli) -> (String, String) {
    match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (path.display().to_string(), content),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => ("<stdin>".to_string(), buffer),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn rewrite(value: &str, config: &Config) {
    let mut cache = AssetCache::from_config(config);
    match rewrite_value(value, &mut cache, config) {
        Ok(rewrite) => {
            for warning in &rewrite.warnings {
                eprintln!("Warning: {}", warning);
            }
            println!("{}", rewrite.value);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_catalog(asset: &Asset) {
    let catalog = asset.catalog();
    if catalog.is_empty() {
        println!("no colors (monochrome: style hook on [fill] / [stroke])");
        return;
    }

    for entry in catalog.entries() {
        println!("colorGroup{}  {}  x{}", entry.index, entry.key, entry.count);
        for selector in &entry.selectors {
            println!("    {}", selector);
        }
    }

    println!();
    for occurrence in catalog.occurrences() {
        println!(
            "{} = {}  ({})",
            occurrence.keys.join(" > "),
            occurrence.original,
            occurrence.color
        );
    }

    let sprites: Vec<&str> = asset.sprite_ids().collect();
    if !sprites.is_empty() {
        println!();
        println!("sprites: {}", sprites.join(", "));
    }
}
