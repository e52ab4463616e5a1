use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use trigon_view::ViewFace;

#[derive(Parser)]
#[command(name = "trigon-view")]
#[command(about = "Trigon orthographic mesh viewer, headless commands")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Pick the face under a cursor position given in NDC.
    Pick(PickArgs),
    /// Animate to a view preset and report the camera pose per step.
    Orient(OrientArgs),
}

#[derive(Args)]
pub struct ViewportArgs {
    #[arg(long = "in")]
    pub input: PathBuf,
    #[arg(long)]
    pub width: Option<f64>,
    #[arg(long)]
    pub height: Option<f64>,
    /// JSON viewer configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct PickArgs {
    #[command(flatten)]
    pub viewport: ViewportArgs,
    #[arg(long, allow_hyphen_values = true)]
    pub x: f64,
    #[arg(long, allow_hyphen_values = true)]
    pub y: f64,
    /// Move to this preset before picking.
    #[arg(long, value_enum, conflicts_with = "request")]
    pub view: Option<ViewFace>,
    /// Orientation request as JSON, e.g. {"offsetFactor":{..},"axisAngle":{..}}.
    #[arg(long)]
    pub request: Option<String>,
}

#[derive(Args)]
pub struct OrientArgs {
    #[command(flatten)]
    pub viewport: ViewportArgs,
    #[arg(long, value_enum)]
    pub view: ViewFace,
    /// Frames to log while the transition runs.
    #[arg(long, default_value_t = 4)]
    pub steps: usize,
}
