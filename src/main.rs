use clap::{Parser, Subcommand};
use double_avatar::imaging::{self, Dimensions};
use double_avatar::{batch, config, logging, output};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "double-avatar")]
#[command(about = "Circular avatars and double-avatar composites from image files")]
#[command(long_about = "\
Circular avatars and double-avatar composites from image files

Inputs: JPEG, PNG, TIFF, WebP (format sniffed from content).
Outputs: PNG, WebP (lossless) or TIFF, chosen by extension. Formats
without an alpha channel are refused, since everything outside the
circle is transparent.

Settings come from ./double-avatar.toml or --config <file>; command-line
flags override them.

Run 'double-avatar gen-config' to print a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./double-avatar.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone)]
struct SizeArgs {
    /// Output diameter in pixels (overrides config)
    #[arg(long, allow_negative_numbers = true)]
    size: Option<i64>,

    /// Hard circle edge instead of a smoothed one
    #[arg(long)]
    no_antialias: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Cut the inscribed circle out of an image
    Circle {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        size: SizeArgs,
    },
    /// Cut the centered square out of an image
    Square {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Compose two overlapping circular avatars
    Double {
        front: PathBuf,
        back: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        size: SizeArgs,
        /// Fraction of the diameter both avatars share, 0 <= overlap < 1
        #[arg(long)]
        overlap: Option<f32>,
    },
    /// Print image format and dimensions
    Identify {
        input: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Circle-crop every supported image under a directory
    Batch {
        source: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        size: SizeArgs,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let load_config = || config::load_config(cli.config.as_deref());

    match cli.command {
        Command::Circle {
            input,
            output,
            size,
        } => {
            let mut cfg = load_config()?;
            apply_size_args(&mut cfg, &size);
            let params = cfg.circle_params()?;
            info!(input = %input.display(), diameter = params.diameter.get(), "circle");

            let img = imaging::load_file(&input)?;
            let avatar = imaging::circle_crop(&img, &params);
            imaging::save_image(&avatar, &output)?;
            println!(
                "{}",
                output::format_conversion(
                    "circle",
                    &input,
                    dims_of(img.width(), img.height()),
                    &output,
                    dims_of(avatar.width(), avatar.height()),
                )
            );
        }
        Command::Square { input, output } => {
            info!(input = %input.display(), "square");
            let img = imaging::load_file(&input)?;
            let square = imaging::crop_center(&img)?;
            imaging::save_image(&square, &output)?;
            println!(
                "{}",
                output::format_conversion(
                    "square",
                    &input,
                    dims_of(img.width(), img.height()),
                    &output,
                    dims_of(square.width(), square.height()),
                )
            );
        }
        Command::Double {
            front,
            back,
            output,
            size,
            overlap,
        } => {
            let mut cfg = load_config()?;
            apply_size_args(&mut cfg, &size);
            if let Some(overlap) = overlap {
                cfg.double.overlap = overlap;
            }
            let params = cfg.double_params()?;
            info!(front = %front.display(), back = %back.display(), "double");

            let front_img = imaging::load_file(&front)?;
            let back_img = imaging::load_file(&back)?;
            let composite = imaging::compose_double_avatar(&front_img, &back_img, &params)?;
            imaging::save_image(&composite, &output)?;
            for line in output::format_double(
                &front,
                &back,
                &output,
                dims_of(composite.width(), composite.height()),
            ) {
                println!("{}", line);
            }
        }
        Command::Identify { input, json } => {
            let dims = imaging::identify(&input)?;
            let format = sniff_file_format(&input)?;
            let line = if json {
                output::format_identify_json(&input, dims, format.as_deref())
            } else {
                output::format_identify(&input, dims, format.as_deref())
            };
            println!("{}", line);
        }
        Command::Batch {
            source,
            output,
            size,
        } => {
            let mut cfg = load_config()?;
            apply_size_args(&mut cfg, &size);
            let params = cfg.circle_params()?;
            init_thread_pool(&cfg.processing);

            let jobs = batch::plan_batch(&source, &output)?;
            info!(count = jobs.len(), source = %source.display(), "batch");

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    println!("{}", output::format_batch_event(&event));
                }
            });
            let summary = batch::run_batch(&jobs, &params, Some(tx));
            printer
                .join()
                .map_err(|_| "batch output thread panicked")?;
            println!("{}", output::format_batch_summary(&summary));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Fold command-line size flags into the loaded config.
///
/// The size is validated later, when parameters are built from the config.
fn apply_size_args(cfg: &mut config::AvatarConfig, args: &SizeArgs) {
    if let Some(size) = args.size {
        cfg.avatar.size = size;
    }
    if args.no_antialias {
        cfg.avatar.antialias = false;
    }
}

fn dims_of(width: u32, height: u32) -> Dimensions {
    Dimensions { width, height }
}

/// Format name sniffed from the first bytes of the file.
fn sniff_file_format(path: &Path) -> Result<Option<String>, std::io::Error> {
    use std::io::Read;
    let mut header = [0u8; 32];
    let read = std::fs::File::open(path)?.read(&mut header)?;
    Ok(imaging::sniff_format(&header[..read]).map(|f| format!("{:?}", f)))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. Config can lower the count, not raise it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
