pub mod charts;
pub mod config;
pub mod data;
pub mod render;
pub mod server;
pub mod types;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::AppConfig;
use std::fs;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the static site: map, charts and the page binding them
    Generate {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Serve the generated site with the region lookup API
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate { config } => {
            println!("Generating site with config: {:?}", config);
            let app_config = AppConfig::load_from_file(config)?;
            generate(&app_config)?;
            println!("Generation complete!");
        }
        Commands::Serve { config } => {
            println!("Serving site with config: {:?}", config);
            let app_config = AppConfig::load_from_file(config)?;

            let regions = data::load_regions(&app_config.input.boundaries)?;
            server::start_server(app_config, regions).await?;
        }
    }

    Ok(())
}

fn generate(config: &AppConfig) -> Result<()> {
    let out = &config.output.site_dir;
    fs::create_dir_all(out)?;

    // The charts do not depend on the boundary data. Render them first so a
    // boundary failure degrades the map only.
    let (cw, ch) = (config.output.chart_width, config.output.chart_height);
    charts::render_bar_chart(&charts::funding_chart(), &out.join("funding.svg"), cw, ch)?;
    charts::render_bar_chart(&charts::students_chart(), &out.join("students.svg"), cw, ch)?;

    let map_svg = match build_map(config) {
        Ok(svg) => {
            fs::write(out.join("map.svg"), &svg)?;
            Some(svg)
        }
        Err(err) => {
            error!("Error loading boundary data: {:?}", err);
            eprintln!(
                "Could not load India state boundaries. Please check {:?}.",
                config.input.boundaries
            );
            None
        }
    };

    let funding_svg = fs::read_to_string(out.join("funding.svg"))?;
    let students_svg = fs::read_to_string(out.join("students.svg"))?;
    let page = render::render_page(map_svg.as_deref(), &funding_svg, &students_svg);
    fs::write(out.join("index.html"), page)?;

    println!("Site written to {:?}", out);
    Ok(())
}

// Load, filter and classify the boundary layer, then draw it and the marker
// pins. Markers only go on once the boundary layer succeeded.
fn build_map(config: &AppConfig) -> Result<String> {
    let regions = data::load_regions(&config.input.boundaries)?;
    let markers = data::markers();
    render::render_map_svg(
        &regions,
        &markers,
        config.output.map_width,
        config.output.map_height,
    )
}
