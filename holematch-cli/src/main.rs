use clap::Parser;
use holematch::io::load_png;
use holematch::lowlevel::{ReservedColor, ReservedPalette};
use holematch::{
    DetectConfig, DetectionWarning, Detector, HoleMatchError, TemplateDefinition, TemplateMeta,
    TemplateRegistry, ValidationReport,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "HoleMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for detection stages.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
struct ColorJson {
    r: u8,
    g: u8,
    b: u8,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectConfigJson {
    colors: Vec<ColorJson>,
    tolerance: u8,
    alpha_threshold: u8,
    min_hole_size: u32,
    speckle_size: u32,
    row_band: u32,
    split_min_extent: u32,
    split_stride: u32,
    parallel: bool,
}

impl Default for DetectConfigJson {
    fn default() -> Self {
        let cfg = DetectConfig::default();
        Self {
            colors: cfg
                .palette
                .colors()
                .iter()
                .map(|c| ColorJson {
                    r: c.r,
                    g: c.g,
                    b: c.b,
                })
                .collect(),
            tolerance: cfg.palette.tolerance(),
            alpha_threshold: cfg.palette.alpha_threshold(),
            min_hole_size: cfg.min_hole_size,
            speckle_size: cfg.speckle_size,
            row_band: cfg.row_band,
            split_min_extent: cfg.split_min_extent,
            split_stride: cfg.split_stride,
            parallel: cfg.parallel,
        }
    }
}

impl From<DetectConfigJson> for DetectConfig {
    fn from(value: DetectConfigJson) -> Self {
        let colors = value
            .colors
            .iter()
            .map(|c| ReservedColor::new(c.r, c.g, c.b))
            .collect();
        Self {
            palette: ReservedPalette::new(colors, value.tolerance, value.alpha_threshold),
            min_hole_size: value.min_hole_size,
            speckle_size: value.speckle_size,
            row_band: value.row_band,
            split_min_extent: value.split_min_extent,
            split_stride: value.split_stride,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    template_id: Option<String>,
    print_size: String,
    name_hint: Option<String>,
    cache_path: Option<String>,
    output_path: Option<String>,
    detect: DetectConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            template_id: None,
            print_size: String::new(),
            name_hint: None,
            cache_path: None,
            output_path: None,
            detect: DetectConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct WarningRecord {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    components: usize,
    holes: usize,
}

impl From<&DetectionWarning> for WarningRecord {
    fn from(value: &DetectionWarning) -> Self {
        match value {
            DetectionWarning::AmbiguousSplit {
                region,
                components,
                holes,
            } => Self {
                x: region.min_x,
                y: region.min_y,
                width: region.width(),
                height: region.height(),
                components: *components,
                holes: *holes,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Output<'a> {
    Valid {
        template: &'a TemplateDefinition,
        warnings: Vec<WarningRecord>,
        cached: bool,
    },
    Invalid {
        violations: Vec<String>,
        report: &'a ValidationReport,
    },
}

fn file_name_of(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

fn modified_millis(path: &str) -> Result<u64, Box<dyn std::error::Error>> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(modified.duration_since(UNIX_EPOCH)?.as_millis() as u64)
}

fn load_registry(path: Option<&str>) -> Result<TemplateRegistry, Box<dyn std::error::Error>> {
    match path {
        Some(path) if Path::new(path).exists() => {
            let text = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        _ => Ok(TemplateRegistry::new()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("holematch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }

    let detector = Detector::new(config.detect.into())?;
    let name = config
        .name_hint
        .clone()
        .or_else(|| file_name_of(&config.image_path));
    let meta = TemplateMeta {
        id: config
            .template_id
            .clone()
            .unwrap_or_else(|| config.image_path.clone()),
        print_size: config.print_size.clone(),
        name,
    };

    let mut registry = load_registry(config.cache_path.as_deref())?;
    let last_modified = modified_millis(&config.image_path)?;
    let cached = registry
        .lookup(&config.image_path, last_modified)
        .is_some();

    let mut warnings = Vec::new();
    let result = registry.get_or_detect(&config.image_path, last_modified, || {
        let image = load_png(&config.image_path)?;
        let detection = detector.detect(image.view(), meta)?;
        warnings = detection.warnings.iter().map(WarningRecord::from).collect();
        Ok(detection.definition)
    });

    let json = match result {
        Ok(template) => serde_json::to_string_pretty(&Output::Valid {
            template,
            warnings,
            cached,
        })?,
        Err(HoleMatchError::InvalidTemplate(report)) => {
            serde_json::to_string_pretty(&Output::Invalid {
                violations: report.messages(),
                report: &report,
            })?
        }
        Err(err) => return Err(err.into()),
    };

    if let Some(path) = config.cache_path.as_deref() {
        fs::write(path, serde_json::to_string(&registry)?)?;
    }

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
