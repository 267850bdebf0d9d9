use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thumbcrop::batch::Batch;
use thumbcrop::imaging::{Quality, RustBackend};
use thumbcrop::library::Library;
use thumbcrop::types::{CropRect, CropRequest, ImageId};
use thumbcrop::{config, output};

#[derive(Parser)]
#[command(name = "thumbcrop")]
#[command(about = "Regenerate image sizes from a crop selection")]
#[command(long_about = "\
Regenerate image sizes from a crop selection

Every size in the catalog is derived from the same selection on the original:
fixed-crop sizes get exactly their box, proportional sizes keep the
selection's aspect ratio.

Without --save the derivatives are previews rendered into batch.temp_dir.
With --save they are written next to the original, recorded in the library
and the files they replace are deleted.

Library format (library.json):

  {
    \"version\": 1,
    \"images\": {
      \"42\": { \"file\": \"uploads/photo.jpg\", \"url\": \"https://example.com/uploads/photo.jpg\" }
    }
  }

Run 'thumbcrop gen-config' to generate a documented thumbcrop.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "thumbcrop.toml", global = true)]
    config: PathBuf,

    /// Media library file
    #[arg(long, default_value = "library.json", global = true)]
    library: PathBuf,

    /// Log pipeline steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render sizes of an image from a crop selection
    Resize(ResizeArgs),
    /// List the size catalog
    Sizes,
    /// Print a stock thumbcrop.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ResizeArgs {
    /// Image id in the library
    image_id: ImageId,

    /// Left edge of the selection, in source pixels
    #[arg(long)]
    x: u32,

    /// Top edge of the selection, in source pixels
    #[arg(long)]
    y: u32,

    /// Selection width
    #[arg(long)]
    width: u32,

    /// Selection height
    #[arg(long)]
    height: u32,

    /// Only render these sizes (repeatable; default: all)
    #[arg(long = "size", value_name = "NAME")]
    sizes: Vec<String>,

    /// Replace the stored sizes instead of rendering previews
    #[arg(long)]
    save: bool,

    /// Letterbox mismatched aspect ratios with this colour (#rrggbb)
    #[arg(long)]
    border_color: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Resize(args) => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let library = Library::load(&cli.library)?;
            let backend = RustBackend::new();

            let request = CropRequest {
                image_id: args.image_id,
                rect: CropRect {
                    x: args.x,
                    y: args.y,
                    width: args.width,
                    height: args.height,
                },
                sizes: args.sizes.into(),
                save: args.save,
                border_color: args.border_color,
            };

            let result = Batch::new(&backend, &library, &config.sizes, &config.batch)
                .quality(Quality::new(config.images.quality))
                .run(&request)?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                output::print_batch_result(request.image_id, request.save, &result);
            }
        }
        Command::Sizes => {
            let config = config::load_config(&cli.config)?;
            output::print_sizes(&config.sizes, &config.batch);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let default = if verbose { "thumbcrop=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
