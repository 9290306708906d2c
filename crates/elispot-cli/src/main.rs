//! elispot CLI - spot counting for ELISpot well images.

use clap::{Args, Parser, Subcommand, ValueEnum};
use elispot::{AnalysisParams, ArtifactOptions, ImageFormat, ThresholdMethod};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "elispot")]
#[command(about = "Detect and count spots in ELISpot assay images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count the spots of an image and write the annotated results.
    Analyze(CliAnalyzeArgs),

    /// Print the default parameter set as JSON.
    Params,

    /// Print format and geometry of an image.
    Info {
        /// Path to the image.
        #[arg(long)]
        image: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    /// Path to the input image (PNG, JPEG or TIFF).
    #[arg(long)]
    image: PathBuf,

    /// Directory for the annotated image, tables and summary.
    #[arg(long)]
    out_dir: PathBuf,

    /// JSON parameter file; flags below override its values.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Side of the thresholding window (odd).
    #[arg(long)]
    block_size: Option<u32>,

    /// Offset subtracted from the local mean.
    #[arg(long)]
    constant: Option<f32>,

    /// Smallest spot area kept, in pixels.
    #[arg(long)]
    min_area: Option<u32>,

    /// Largest spot area kept, in pixels.
    #[arg(long)]
    max_area: Option<u32>,

    /// Largest accepted image width or height.
    #[arg(long)]
    max_image_size: Option<u32>,

    /// Width the image is rescaled to before analysis.
    #[arg(long, conflicts_with = "no_resize")]
    display_width: Option<u32>,

    /// Analyse the image at its own size.
    #[arg(long)]
    no_resize: bool,

    /// Number of bins of the area histogram.
    #[arg(long)]
    histogram_bins: Option<usize>,

    /// Local-mean weighting of the threshold.
    #[arg(long, value_enum)]
    method: Option<MethodArg>,

    /// Format of the annotated and comparison images.
    #[arg(long, value_enum, default_value_t = FormatArg::Png)]
    format: FormatArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    Gaussian,
    Mean,
}

impl MethodArg {
    fn to_params(self) -> ThresholdMethod {
        match self {
            Self::Gaussian => ThresholdMethod::Gaussian,
            Self::Mean => ThresholdMethod::Mean,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Jpeg,
    Tiff,
}

impl FormatArg {
    fn to_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Tiff => ImageFormat::Tiff,
        }
    }
}

impl CliAnalyzeArgs {
    fn to_params(&self) -> CliResult<AnalysisParams> {
        let mut params = match &self.params {
            Some(path) => AnalysisParams::load(path).map_err(|e| -> CliError {
                format!("Failed to read parameters {}: {}", path.display(), e).into()
            })?,
            None => AnalysisParams::default(),
        };

        if let Some(v) = self.block_size {
            params.block_size = v;
        }
        if let Some(v) = self.constant {
            params.constant = v;
        }
        if let Some(v) = self.min_area {
            params.min_area = v;
        }
        if let Some(v) = self.max_area {
            params.max_area = v;
        }
        if let Some(v) = self.max_image_size {
            params.max_image_size = v;
        }
        if let Some(v) = self.histogram_bins {
            params.histogram_bins = v;
        }
        if let Some(m) = self.method {
            params.method = m.to_params();
        }
        if self.no_resize {
            params.display_width = None;
        } else if let Some(w) = self.display_width {
            params.display_width = Some(w);
        }

        params.validate()?;
        Ok(params)
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::Params => run_params(),
        Commands::Info { image } => run_info(&image),
    }
}

// ── analyze ────────────────────────────────────────────────────────────

fn run_analyze(args: &CliAnalyzeArgs) -> CliResult<()> {
    let params = args.to_params()?;
    tracing::info!("Loading image: {}", args.image.display());

    let image = elispot::load_image(&args.image, &params)?;
    tracing::info!(
        "Image size: {}x{} (analysed at {}x{})",
        image.input_width,
        image.input_height,
        image.gray.width(),
        image.gray.height()
    );

    let result = elispot::analyze(&image, &params)?;

    let options = ArtifactOptions {
        format: args.format.to_format(),
        image_name: args
            .image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned()),
        ..Default::default()
    };
    let paths = elispot::write_artifacts(&result, &args.out_dir, &options)?;
    tracing::info!("Results written to {}", args.out_dir.display());
    tracing::debug!("Annotated image: {}", paths.annotated.display());

    println!("{} spots detected.", result.count);
    Ok(())
}

// ── params ─────────────────────────────────────────────────────────────

fn run_params() -> CliResult<()> {
    println!("{}", AnalysisParams::default().to_json()?);
    Ok(())
}

// ── info ───────────────────────────────────────────────────────────────

fn run_info(path: &Path) -> CliResult<()> {
    let pix = elispot::io::read_image(path).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", path.display(), e).into()
    })?;

    println!("{}", path.display());
    println!("  format:  {:?}", pix.informat());
    println!("  size:    {}x{}", pix.width(), pix.height());
    println!("  depth:   {} bpp", pix.depth().bits());
    println!("  samples: {}", pix.spp());
    Ok(())
}
