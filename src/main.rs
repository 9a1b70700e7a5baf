//! svg-layers CLI
//!
//! Usage:
//!   svg-layers [OPTIONS] [FILE]
//!
//! Options:
//!   -l, --list             List the document's layers instead of rendering
//!   -c, --colors <MAP>     Color mapping, e.g. "#FFAA00=#112233,#000=#fff"
//!       --show <ID>        Force a layer visible (repeatable)
//!       --hide <ID>        Force a layer hidden (repeatable)
//!   -i, --ignore-case      Match color tokens ignoring ASCII case
//!   -p, --profile <FILE>   Render profile (TOML format)
//!   -h, --help             Print help

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::LevelFilter;

use svg_layers::resource::{check_vector_source, decode_document};
use svg_layers::{
    data_uri, Compositor, CompositorError, FsResources, Layer, Overrides, Profile,
    ResourceResolver,
};

#[derive(Parser)]
#[command(name = "svg-layers")]
#[command(about = "Recolor SVG documents and toggle their top-level layers")]
struct Cli {
    /// Input SVG file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// List layers (index, id, visibility, path count, bounds) and exit
    #[arg(short, long)]
    list: bool,

    /// Color mapping applied to the raw document text, as from=to pairs
    #[arg(short, long, value_name = "MAP")]
    colors: Option<String>,

    /// Layer id to force visible
    #[arg(long, value_name = "ID")]
    show: Vec<String>,

    /// Layer id to force hidden
    #[arg(long, value_name = "ID")]
    hide: Vec<String>,

    /// Match color tokens ignoring ASCII case
    #[arg(short, long)]
    ignore_case: bool,

    /// Skip unparsable layer paths instead of failing
    #[arg(long)]
    lenient_paths: bool,

    /// Render profile (TOML format)
    #[arg(short, long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Emit a base64 `data:` URI instead of raw SVG
    #[arg(long)]
    data_uri: bool,

    /// Log compositor decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    // Load profile
    let profile = match &cli.profile {
        Some(path) => match Profile::from_file(path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error loading profile '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Profile::default(),
    };

    // Read input
    let (name, bytes) = match &cli.input {
        Some(path) => match read_file(path) {
            Ok(bytes) => (path.display().to_string(), bytes),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = Vec::new();
            match io::stdin().read_to_end(&mut buffer) {
                Ok(_) => ("<stdin>".to_string(), buffer),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let document = match decode_document(bytes) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let overrides = Overrides {
        colors: cli.colors.clone(),
        show: cli.show.clone(),
        hide: cli.hide.clone(),
        ignore_case: cli.ignore_case,
        lenient_paths: cli.lenient_paths,
    };
    let profile = profile.with_overrides(&overrides);
    let compositor = Compositor::new(profile.config.clone());

    if cli.list {
        match compositor.extract_layers(&document) {
            Ok(layers) => print_layers(&layers),
            Err(e) => fail(&e, &document, &name),
        }
        return;
    }

    match compositor.render(&document, &profile.colors, &profile.layers) {
        Ok(out) => {
            if cli.data_uri {
                println!("{}", data_uri(&out));
            } else {
                print!("{}", String::from_utf8_lossy(&out));
            }
        }
        Err(e) => fail(&e, &document, &name),
    }
}

/// Read `path` through a filesystem resolver rooted at its directory
fn read_file(path: &Path) -> Result<Vec<u8>, CompositorError> {
    let source = path.to_string_lossy();
    check_vector_source(&source)?;

    let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(FsResources::new(root).resolve(&file_name)?)
}

fn print_layers(layers: &[Layer]) {
    for (index, layer) in layers.iter().enumerate() {
        let bounds = match layer.bounds() {
            Some(r) => format!("{} {} {} {}", r.x0, r.y0, r.width(), r.height()),
            None => "-".to_string(),
        };
        println!(
            "{}\t{}\t{}\t{} paths\t{}",
            index,
            layer.id().unwrap_or("-"),
            if layer.visible { "visible" } else { "hidden" },
            layer.paths.len(),
            bounds
        );
    }
}

fn fail(error: &CompositorError, document: &str, name: &str) -> ! {
    match error {
        CompositorError::Parse(e) => eprint!("{}", e.format(document, name)),
        other => eprintln!("Error: {}", other),
    }
    std::process::exit(1);
}
