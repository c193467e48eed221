use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::Shell;
use log::{LevelFilter, error, info};
use sct_diagram::export::{self, RasterOptions};
use sct_diagram::{
    Concept, CosmicTextMeasure, DiagramOptions, Error, Theme, UngroupedAttributeIndex, View,
};

/// Render SNOMED CT concept definitions as diagrams
#[derive(Parser, Debug)]
#[command(name = "sct-diagram")]
#[command(version)]
#[command(about = "Render SNOMED CT concept diagrams to SVG, PNG or PDF", long_about = None)]
struct Args {
    /// Concept JSON in the browser API shape (use "-" for stdin)
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<PathBuf>,

    /// Output file path (extension determines format: .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT", required_unless_present = "completions")]
    output: Option<PathBuf>,

    /// Reference set members page listing attributes drawn without a group
    #[arg(long, value_name = "MEMBERS")]
    ungrouped: Option<PathBuf>,

    /// Which definition to draw
    #[arg(long, value_enum, default_value_t = ViewArg::Inferred)]
    view: ViewArg,

    /// Language code used to pick display terms
    #[arg(short, long, default_value = "en")]
    language: String,

    /// Theme file (TOML or YAML) or built-in theme name
    #[arg(short, long, value_name = "THEME")]
    theme: Option<String>,

    /// Raster scale multiplier for PNG output (e.g. 2.0 for sharper output)
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewArg {
    Stated,
    Inferred,
}

impl From<ViewArg> for View {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Stated => View::Stated,
            ViewArg::Inferred => View::Inferred,
        }
    }
}

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", args.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "sct-diagram", &mut io::stdout());
        return;
    }

    if let Err(err) = run(&args) {
        error!(err:err; "Render failed");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let (Some(input), Some(output)) = (&args.input, &args.output) else {
        return Err(Error::Usage("INPUT and --output are required".to_string()));
    };

    let concept = Concept::from_json(&read_input(input)?)?;
    let ungrouped = match &args.ungrouped {
        Some(path) => {
            UngroupedAttributeIndex::from_members_json(&std::fs::read_to_string(path)?)?
        }
        None => UngroupedAttributeIndex::new(),
    };
    let theme = match &args.theme {
        Some(theme) => Theme::load(theme)?,
        None => Theme::default(),
    };
    let options = DiagramOptions::default()
        .with_view(args.view.into())
        .with_language(args.language.as_str());
    info!(
        concept_id = concept.concept_id.as_str(),
        view = options.view.as_str(),
        ungrouped = ungrouped.len();
        "Rendering concept"
    );

    let mut measure = CosmicTextMeasure::new();
    let drawing = sct_diagram::render(&concept, &options, &ungrouped, &mut measure);

    let artifact = match output_extension(output)?.as_str() {
        "svg" => export::export_vector(&drawing, &theme)?,
        "png" => export::export_raster(
            &drawing,
            &theme,
            RasterOptions {
                bounds: None,
                scale: args.png_scale,
            },
        )?,
        "pdf" => export::export_pdf(&drawing, &theme)?,
        other => {
            return Err(Error::Usage(format!(
                "Unsupported output format: .{} (use .svg, .png or .pdf)",
                other
            )));
        }
    };

    std::fs::write(output, &artifact.bytes)?;
    info!(output:? = output, artifact = artifact.file_name.as_str(); "Diagram saved");
    Ok(())
}

fn read_input(input: &Path) -> Result<String, Error> {
    if input.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

fn output_extension(output: &Path) -> Result<String, Error> {
    output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| Error::Usage("Output file has no extension".to_string()))
}
