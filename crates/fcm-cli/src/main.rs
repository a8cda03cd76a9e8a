//! fcm: encode, decode and interpolate triangle surfaces in fundamental
//! coordinates.

use clap::{Parser, Subcommand};
use fcm_types::constants::DEFAULT_PROJECTION_MAX_ITER;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "fcm")]
#[command(version, about = "Fundamental coordinates shape space for triangle surfaces")]
struct Cli {
    /// Shape-space config (TOML). Defaults plus FCM_* environment overrides otherwise.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a mesh as fundamental coordinates of a reference.
    Encode {
        /// Reference mesh (JSON).
        #[arg(short, long)]
        reference: String,

        /// Mesh to encode (JSON), same faces as the reference.
        #[arg(short, long)]
        shape: String,

        /// Output coordinates file (JSON). Printed to stdout if omitted.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Decode fundamental coordinates into a mesh.
    Decode {
        /// Reference mesh (JSON).
        #[arg(short, long)]
        reference: String,

        /// Coordinates file (JSON) written by `fcm encode`.
        #[arg(long)]
        coords: String,

        /// Output mesh file (JSON). Printed to stdout if omitted.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Walk the shape-space geodesic between two meshes.
    Interpolate {
        /// Reference mesh (JSON).
        #[arg(short, long)]
        reference: String,

        /// Start mesh (JSON).
        #[arg(long)]
        from: String,

        /// End mesh (JSON).
        #[arg(long)]
        to: String,

        /// Geodesic parameter (0 = start, 1 = end).
        #[arg(short, long, default_value_t = 0.5)]
        t: f64,

        /// Output mesh file (JSON). Printed to stdout if omitted.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Project a mesh onto the shape-space geodesic between two meshes.
    Project {
        /// Reference mesh (JSON).
        #[arg(short, long)]
        reference: String,

        /// Geodesic start mesh (JSON).
        #[arg(long)]
        from: String,

        /// Geodesic end mesh (JSON).
        #[arg(long)]
        to: String,

        /// Mesh to project (JSON).
        #[arg(short, long)]
        shape: String,

        /// Iteration cap of the projection.
        #[arg(long, default_value_t = DEFAULT_PROJECTION_MAX_ITER)]
        max_iter: usize,

        /// Output mesh file (JSON). Printed to stdout if omitted.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate a mesh (.json) or config (.toml).
    Validate {
        /// Path to mesh or config file.
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Encode {
            reference,
            shape,
            output,
        } => commands::encode(&reference, &shape, output.as_deref(), config),
        Commands::Decode {
            reference,
            coords,
            output,
        } => commands::decode(&reference, &coords, output.as_deref(), config),
        Commands::Interpolate {
            reference,
            from,
            to,
            t,
            output,
        } => commands::interpolate(&reference, &from, &to, t, output.as_deref(), config),
        Commands::Project {
            reference,
            from,
            to,
            shape,
            max_iter,
            output,
        } => commands::project(
            &reference,
            &from,
            &to,
            &shape,
            max_iter,
            output.as_deref(),
            config,
        ),
        Commands::Validate { path } => commands::validate(&path, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
