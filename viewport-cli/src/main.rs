use clap::{Parser, Subcommand};
use mercator_viewport::{ProjectOptions, Viewport, ViewportConfig};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "viewport-cli")]
#[command(about = "Project coordinates through a Web Mercator viewport")]
struct Cli {
    /// JSON viewport config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, allow_negative_numbers = true)]
    width: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    height: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    longitude: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    latitude: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    zoom: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    bearing: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pitch: Option<f64>,
    #[arg(long)]
    altitude: Option<f64>,
    /// World width in pixels at zoom 0
    #[arg(long)]
    tile_size: Option<f64>,

    /// Reject out-of-range config instead of clamping it
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Geographic coordinate to screen pixel
    #[command(allow_negative_numbers = true)]
    Project {
        longitude: f64,
        latitude: f64,
        /// Meters above the map plane; adds a depth component to the output
        altitude: Option<f64>,
        /// Measure pixel y from the bottom edge
        #[arg(long)]
        bottom_left: bool,
    },
    /// Screen pixel to geographic coordinate
    #[command(allow_negative_numbers = true)]
    Unproject {
        x: f64,
        y: f64,
        /// Depth from a previous 3D projection; without it the pixel resolves on the ground
        depth: Option<f64>,
        #[arg(long)]
        bottom_left: bool,
    },
    /// Print the distance scales at the viewport center
    Scales,
    /// Print the camera matrices as flat column-major arrays
    Matrices,
}

impl Cli {
    fn viewport_config(&self) -> anyhow::Result<ViewportConfig> {
        let mut config = match &self.config {
            Some(path) => ViewportConfig::from_json_file(path)?,
            None => ViewportConfig::default(),
        };

        let overrides = [
            (self.width, &mut config.width),
            (self.height, &mut config.height),
            (self.longitude, &mut config.longitude),
            (self.latitude, &mut config.latitude),
            (self.zoom, &mut config.zoom),
            (self.bearing, &mut config.bearing),
            (self.pitch, &mut config.pitch),
            (self.altitude, &mut config.altitude),
            (self.tile_size, &mut config.tile_size),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }

        if self.strict {
            config.validate()?;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let viewport = Viewport::new(cli.viewport_config()?);
    let report = viewport.clamp_report();
    if report.any() {
        log::warn!("viewport config was adjusted: {report:?}");
    }

    let output = match cli.command {
        Commands::Project {
            longitude,
            latitude,
            altitude,
            bottom_left,
        } => {
            let options = ProjectOptions { top_left: !bottom_left };
            match altitude {
                Some(altitude) => json!(viewport.project_with([longitude, latitude, altitude], options)),
                None => json!(viewport.project_with([longitude, latitude], options)),
            }
        }
        Commands::Unproject {
            x,
            y,
            depth,
            bottom_left,
        } => {
            let options = ProjectOptions { top_left: !bottom_left };
            match depth {
                Some(depth) => json!(viewport.unproject_with([x, y, depth], options)),
                None => json!(viewport.unproject_with([x, y], options)),
            }
        }
        Commands::Scales => serde_json::to_value(viewport.get_distance_scales())?,
        Commands::Matrices => {
            let matrices = viewport.matrices();
            json!({
                "view": matrices.view.as_slice(),
                "projection": matrices.projection.as_slice(),
                "viewProjection": matrices.view_projection.as_slice(),
                "pixelProjection": matrices.pixel_projection.as_slice(),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
