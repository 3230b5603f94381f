//! coilcad CLI - generate coil drawings from parameter files
//!
//! Set `RUST_LOG=coilcad=debug` for pipeline tracing.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use coilcad::{generate_from_raw, DrawingConfig, ExportFormat, Layer, ViewKind};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "coilcad")]
#[command(about = "Parametric finned-tube coil drawings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one drawing
    Generate {
        /// Output file (format determined by extension: .dxf, .svg, .json)
        output: PathBuf,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Generate a drawing for every config file, in parallel
    Batch {
        /// Config files
        #[arg(required = true)]
        configs: Vec<PathBuf>,
        /// Directory for the outputs, one per config, named after it
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Dxf)]
        format: Format,
    },
    /// Check parameters and list every violation
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print derived quantities and sheet statistics
    Info {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the default configuration as TOML
    Defaults,
}

#[derive(clap::Args)]
struct InputArgs {
    /// TOML config with [parameters] and [title_block] tables
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override a parameter (repeatable)
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Dxf,
    Svg,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Dxf => ExportFormat::Dxf,
            Format::Svg => ExportFormat::Svg,
            Format::Json => ExportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coilcad=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { output, input } => generate(&input, &output),
        Commands::Batch {
            configs,
            out_dir,
            format,
        } => batch(&configs, &out_dir, format.into()),
        Commands::Validate { input } => validate(&input),
        Commands::Info { input } => show_info(&input),
        Commands::Defaults => {
            print!("{}", DrawingConfig::default().to_toml_string()?);
            Ok(())
        }
    }
}

fn load_config(input: &InputArgs) -> Result<DrawingConfig> {
    let mut config = match &input.config {
        Some(path) => DrawingConfig::load(path)?,
        None => DrawingConfig::default(),
    };
    config.apply_overrides(input.overrides.iter().map(String::as_str))?;
    Ok(config)
}

fn generate(input: &InputArgs, output: &Path) -> Result<()> {
    let config = load_config(input)?;
    let drawing = generate_from_raw(&config.parameters, &config.title_block)?;
    drawing.write(output)?;
    println!("{} -> {}", drawing.sheet.title, output.display());
    Ok(())
}

fn batch(configs: &[PathBuf], out_dir: &Path, format: ExportFormat) -> Result<()> {
    tracing::info!(count = configs.len(), out_dir = %out_dir.display(), "batch start");
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;

    let results: Vec<(PathBuf, Result<PathBuf>)> = configs
        .par_iter()
        .map(|path| {
            let run = || -> Result<PathBuf> {
                let config = DrawingConfig::load(path)?;
                let drawing = generate_from_raw(&config.parameters, &config.title_block)?;
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "drawing".to_string());
                let out = out_dir.join(format!("{stem}.{}", format.extension()));
                coilcad::export_sheet(&drawing.sheet, &out, format)?;
                Ok(out)
            };
            (path.clone(), run())
        })
        .collect();

    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(out) => {
                tracing::info!(config = %path.display(), output = %out.display(), "generated")
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(config = %path.display(), "failed: {e:#}");
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} drawings failed", configs.len());
    }
    Ok(())
}

fn validate(input: &InputArgs) -> Result<()> {
    let config = load_config(input)?;
    match config.parameters.validate() {
        Ok(params) => {
            println!("OK: {}", params.drawing_title());
            Ok(())
        }
        Err(err) => {
            for v in err.violations() {
                println!("  {}: {}", v.field, v.rule);
            }
            bail!("{} invalid parameter(s)", err.violations().len());
        }
    }
}

fn show_info(input: &InputArgs) -> Result<()> {
    let config = load_config(input)?;
    let drawing = generate_from_raw(&config.parameters, &config.title_block)?;
    let p = &drawing.params;
    let sheet = &drawing.sheet;

    println!("{}", sheet.title);
    println!("  Casing: {:.1} x {:.1} mm", p.casing_width(), p.casing_height());
    println!("  Vertical pitch: {:.3} mm", p.vertical_pitch());
    println!("  Row pitch: {:.3} mm", p.row_pitch());
    println!("  Fin spacing: {:.3} mm", p.fin_spacing());
    println!("  Tubes: {}", u64::from(p.no_of_rows()) * u64::from(p.tubes_per_row()));
    println!(
        "  Sheet: {:.1} x {:.1} mm",
        sheet.bounds.width(),
        sheet.bounds.height()
    );

    println!("\nViews:");
    for kind in [ViewKind::Header, ViewKind::Front, ViewKind::Return, ViewKind::Top] {
        if let Some(view) = sheet.view(kind) {
            let ext = view.extent();
            println!(
                "  {}: {} primitives, {} dimensions, at ({:.1}, {:.1})",
                kind.caption(),
                view.view.primitives.len(),
                view.dimensions.len(),
                ext.min_x,
                ext.min_y
            );
        }
    }

    println!("\nLayers:");
    for layer in Layer::ALL {
        let count = sheet.primitives().filter(|pr| pr.layer == layer).count();
        if count > 0 {
            println!("  {}: {}", layer.name(), count);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_batch_reports_failures_and_keeps_going() {
        let dir = PathBuf::from("/tmp/test_coilcad_batch");
        fs::create_dir_all(&dir).unwrap();
        let good = dir.join("four_row.toml");
        fs::write(&good, "[parameters]\nno_of_rows = 4\n").unwrap();
        let bad = dir.join("bad.toml");
        fs::write(&bad, "[parameters]\ntubes_per_row = 1\n").unwrap();

        let out_dir = dir.join("out");
        let err = batch(&[good, bad], &out_dir, ExportFormat::Svg).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 drawings failed");
        assert!(out_dir.join("four_row.svg").exists());
        assert!(!out_dir.join("bad.svg").exists());
    }

    #[test]
    fn test_format_maps_to_export_format() {
        assert_eq!(ExportFormat::from(Format::Dxf), ExportFormat::Dxf);
        assert_eq!(ExportFormat::from(Format::Json).extension(), "json");
    }
}
