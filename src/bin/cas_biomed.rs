//! # Command-Line Entry Point
//!
//! Runs one biomedical image operation against the compute server.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin cas-biomed -- --config config/client.toml \
//!   sphericity --input lesions --output lesion_sph --use-spacing --connectivity face
//!
//! cargo run --bin cas-biomed -- --config config/client.toml \
//!   mask --image scans --mask segmentations --output masked --output-background 0
//!
//! cargo run --bin cas-biomed -- --config config/client.toml \
//!   --metrics-output ./metrics/gradient.json \
//!   gradient --input volumes --kernel-width 5 --kernel-height 5
//! ```
//!
//! The client will:
//! 1. Load configuration from the specified TOML file
//! 2. Connect to the server and load the required action sets
//! 3. Run the requested operation
//! 4. Export per-action metrics (if metrics-output specified)

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::sync::{Arc, Mutex};

use cas_biomed::common::config::{load_config, ClientConfig};
use cas_biomed::logging::init_logger;
use cas_biomed::{
    ActionMetrics, BiomedImage, CasTable, ImageTable, LabelConnectivity, MaskOptions,
    NaturalImage, ProcessOptions, RemoteSession, Session,
};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the client configuration file (TOML format)
    ///
    /// Example: config/client.toml
    #[arg(short, long)]
    config: String,

    /// Path to write per-action metrics JSON (optional)
    #[arg(long)]
    metrics_output: Option<String>,

    /// Caslib holding the input and output tables
    #[arg(long)]
    caslib: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sphericity of every connected component
    Sphericity {
        #[arg(long)]
        input: String,
        #[arg(long)]
        output: String,
        /// Use image spacing when measuring content
        #[arg(long)]
        use_spacing: bool,
        /// Background intensity of the input images
        #[arg(long, default_value_t = 0.0)]
        background: f64,
        #[arg(long, value_enum, default_value_t = Connectivity::Face)]
        connectivity: Connectivity,
    },
    /// Mask images with a mask image table
    Mask {
        #[arg(long)]
        image: String,
        #[arg(long)]
        mask: String,
        /// Output table; generated when omitted with --natural
        #[arg(long)]
        output: Option<String>,
        #[arg(long, default_value_t = 0)]
        input_background: i64,
        #[arg(long, default_value_t = 0)]
        output_background: i64,
        #[arg(long)]
        decode: bool,
        /// Columns to copy to the output table (repeatable)
        #[arg(long = "copy-var")]
        copy_vars: Vec<String>,
        /// Mask 2-D natural images through the image action set
        #[arg(long)]
        natural: bool,
    },
    /// Morphological gradient of 3-D grayscale images
    Gradient {
        #[arg(long)]
        input: String,
        #[arg(long)]
        output: Option<String>,
        #[arg(long, default_value_t = 3)]
        kernel_width: u32,
        #[arg(long, default_value_t = 3)]
        kernel_height: u32,
        #[arg(long = "copy-var")]
        copy_vars: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Connectivity {
    Face,
    Vertex,
}

impl From<Connectivity> for LabelConnectivity {
    fn from(value: Connectivity) -> Self {
        match value {
            Connectivity::Face => LabelConnectivity::Face,
            Connectivity::Vertex => LabelConnectivity::Vertex,
        }
    }
}

fn table(name: &str, caslib: &Option<String>) -> CasTable {
    match caslib {
        Some(caslib) => CasTable::new(name).in_caslib(caslib.as_str()),
        None => CasTable::new(name),
    }
}

fn non_empty(vars: Vec<String>) -> Option<Vec<String>> {
    if vars.is_empty() {
        None
    } else {
        Some(vars)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config: ClientConfig = load_config(&args.config)?;

    init_logger(&config.logging.level);

    let metrics = Arc::new(Mutex::new(ActionMetrics::new(config.server.address.clone())));
    let mut session = RemoteSession::connect(&config.server.address)
        .await?
        .with_metrics(metrics.clone());
    for action_set in &config.session.action_sets {
        session.load_action_set(action_set).await?;
    }

    let caslib = args.caslib;
    let session = match args.command {
        Command::Sphericity {
            input,
            output,
            use_spacing,
            background,
            connectivity,
        } => {
            let mut biomed = BiomedImage::new(session).await?;
            let output = table(&output, &caslib).replacing();
            biomed
                .quantify_sphericity(
                    &ImageTable::new(table(&input, &caslib)),
                    use_spacing,
                    background,
                    connectivity.into(),
                    &output,
                )
                .await?;
            info!("Sphericity table: {}", output.name);
            biomed.into_session()
        }
        Command::Mask {
            image,
            mask,
            output,
            input_background,
            output_background,
            decode,
            copy_vars,
            natural,
        } => {
            let image = ImageTable::new(table(&image, &caslib));
            let mask = ImageTable::new(table(&mask, &caslib));
            let process = ProcessOptions {
                decode,
                add_columns: None,
                copy_vars: non_empty(copy_vars),
            };
            let output = output.map(|name| table(&name, &caslib).replacing());

            if natural {
                let mut images = NaturalImage::new(session).await?;
                let outcome = images.mask_image(&image, &mask, &process, output).await?;
                info!("Masked images: {}", outcome.output.name());
                images.into_session()
            } else {
                let casout = output.unwrap_or_else(|| CasTable::generated().replacing());
                let mut biomed = BiomedImage::new(session).await?;
                let options = MaskOptions {
                    input_background,
                    output_background,
                    process,
                };
                let outcome = biomed.mask_image(&image, &mask, &casout, &options).await?;
                info!(
                    "Masked images: {} (mask image column now {})",
                    outcome.output.name(),
                    outcome.mask.image
                );
                biomed.into_session()
            }
        }
        Command::Gradient {
            input,
            output,
            kernel_width,
            kernel_height,
            copy_vars,
        } => {
            let mut biomed = BiomedImage::new(session).await?;
            let copy_vars = non_empty(copy_vars);
            let gradient = biomed
                .morphological_gradient(
                    &ImageTable::new(table(&input, &caslib)),
                    kernel_width,
                    kernel_height,
                    copy_vars.as_deref(),
                    output.map(|name| table(&name, &caslib).replacing()),
                )
                .await?;
            info!("Gradient images: {}", gradient.name());
            biomed.into_session()
        }
    };

    session.close().await?;

    if let Some(output_path) = args.metrics_output {
        if let Ok(metrics) = metrics.lock() {
            metrics.export_to_json(&output_path)?;
            println!("Metrics exported to: {}", output_path);
        }
    }

    Ok(())
}
