use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use trackmatch::io::{load_rgba_image, save_png};
use trackmatch::{
    BoxedRegion, EllipseRegion, LineConstraint, MatchConfig, MatchResult, Matcher, PeakModel,
    Point, RectRegion, SearchKind, SearchRect, USABLE_PEAK_HEIGHT,
};

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "TrackMatch CLI (JSON config driven)")]
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
    /// Enable tracing output for template builds and searches.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MaskShape {
    Rect,
    Ellipse,
}

#[derive(Debug, Deserialize)]
struct MaskConfig {
    shape: MaskShape,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl MaskConfig {
    fn region(&self) -> BoxedRegion {
        match self.shape {
            MaskShape::Rect => Box::new(RectRegion::new(self.x, self.y, self.width, self.height)),
            MaskShape::Ellipse => Box::new(EllipseRegion::inscribed(
                self.x,
                self.y,
                self.width,
                self.height,
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateConfig {
    sample_path: String,
    #[serde(default = "full_weight")]
    weight_sample: u8,
    #[serde(default)]
    weight_reference: u8,
}

fn full_weight() -> u8 {
    255
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RectConfig {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LineConfig {
    x: f64,
    y: f64,
    angle_deg: f64,
    #[serde(default)]
    spread: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PeakModelConfig {
    Gaussian,
    Parabola,
}

impl From<PeakModelConfig> for PeakModel {
    fn from(value: PeakModelConfig) -> Self {
        match value {
            PeakModelConfig::Gaussian => PeakModel::Gaussian,
            PeakModelConfig::Parabola => PeakModel::Parabola,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    peak_model: PeakModelConfig,
    parallel: bool,
    fit_tolerance: f64,
    fit_max_iterations: usize,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            peak_model: PeakModelConfig::Gaussian,
            parallel: cfg.parallel,
            fit_tolerance: cfg.fit_tolerance,
            fit_max_iterations: cfg.fit_max_iterations,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Config {
    reference_path: String,
    target_path: String,
    #[serde(default)]
    mask: Option<MaskConfig>,
    #[serde(default)]
    update: Option<UpdateConfig>,
    search: RectConfig,
    #[serde(default)]
    line: Option<LineConfig>,
    #[serde(default, rename = "match")]
    match_cfg: MatchConfigJson,
    #[serde(default = "default_min_peak_height")]
    min_peak_height: f64,
    #[serde(default)]
    preview_path: Option<String>,
    #[serde(default)]
    output_path: Option<String>,
}

fn default_min_peak_height() -> f64 {
    USABLE_PEAK_HEIGHT
}

#[derive(Debug, Serialize)]
struct LocationRecord {
    x: f64,
    y: f64,
}

#[derive(Debug, Serialize)]
struct TemplateRecord {
    width: usize,
    height: usize,
    trim_left: usize,
    trim_top: usize,
}

#[derive(Debug, Serialize)]
struct Output {
    search: &'static str,
    location: Option<LocationRecord>,
    /// `null` when not finite; see `perfect_match`.
    peak_height: Option<f64>,
    peak_width: Option<f64>,
    perfect_match: bool,
    line_missed: bool,
    usable: bool,
    template: TemplateRecord,
}

impl Output {
    fn new(result: &MatchResult, min_peak_height: f64, template: TemplateRecord) -> Self {
        let finite = |v: f64| v.is_finite().then_some(v);
        Self {
            search: match result.kind {
                SearchKind::Grid => "grid",
                SearchKind::Line => "line",
            },
            location: result.location.map(|p| LocationRecord { x: p.x, y: p.y }),
            peak_height: finite(result.peak_height),
            peak_width: finite(result.peak_width),
            perfect_match: result.peak_height == f64::INFINITY,
            line_missed: result.peak_width < 0.0,
            usable: result.is_usable(min_peak_height),
            template,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("trackmatch=debug".parse()?),
            )
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
    if config.reference_path.is_empty() || config.target_path.is_empty() {
        return Err("reference_path and target_path must be set in the config".into());
    }
    if !(config.match_cfg.fit_tolerance > 0.0) || config.match_cfg.fit_max_iterations == 0 {
        return Err("fit_tolerance and fit_max_iterations must be positive".into());
    }

    let reference = load_rgba_image(&config.reference_path)?;
    let mask = config.mask.as_ref().map(MaskConfig::region);
    let mut matcher = Matcher::new(reference, mask).with_config(MatchConfig {
        peak_model: config.match_cfg.peak_model.into(),
        parallel: config.match_cfg.parallel,
        fit_tolerance: config.match_cfg.fit_tolerance,
        fit_max_iterations: config.match_cfg.fit_max_iterations,
    });

    if let Some(update) = &config.update {
        let sample = load_rgba_image(&update.sample_path)?;
        matcher.build_template(sample.view(), update.weight_sample, update.weight_reference)?;
    }

    let target = load_rgba_image(&config.target_path)?;
    let rect = SearchRect::new(
        config.search.x,
        config.search.y,
        config.search.width,
        config.search.height,
    );
    let result = match config.line {
        Some(line) => {
            let point = Point::new(line.x, line.y);
            let constraint =
                LineConstraint::new(point, line.angle_deg.to_radians()).with_spread(line.spread);
            matcher.find_match_along_line(target.view(), rect, constraint)
        }
        None => matcher.find_match(target.view(), rect),
    };

    tracing::info!(
        found = result.is_match(),
        peak_height = result.peak_height,
        peak_width = result.peak_width,
        "search finished"
    );

    if let (Some(path), Some(preview)) = (&config.preview_path, &result.preview) {
        save_png(preview, path)?;
    }

    let template = matcher.template();
    let (trim_left, trim_top) = template.trim_offsets();
    let output = Output::new(
        &result,
        config.min_peak_height,
        TemplateRecord {
            width: template.width(),
            height: template.height(),
            trim_left,
            trim_top,
        },
    );
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
