use std::fs;

use anyhow::{Context, Result, bail};
use tracing::info;
use trigon_io::load_geometry;
use trigon_view::{OrientationRequest, ViewerConfig, ViewerContext};

use crate::cli::{OrientArgs, PickArgs, ViewportArgs};

const FRAME_DT: f64 = 1.0 / 60.0;
const MAX_FRAMES: usize = 600;

pub fn run_pick(args: PickArgs) -> Result<()> {
    let mut ctx = open_context(&args.viewport)?;

    let request = match (&args.view, &args.request) {
        (Some(face), _) => Some(OrientationRequest::from_face(*face)),
        (None, Some(json)) => Some(OrientationRequest::from_json(json).context("invalid --request")?),
        (None, None) => None,
    };
    if let Some(request) = request {
        ctx.request_orientation(&request);
        settle(&mut ctx)?;
    }

    ctx.set_tool_active(true);
    match ctx.pointer_moved([args.x, args.y]) {
        Some(hit) => info!(
            face = hit.face_index,
            distance = hit.distance,
            x = hit.point.x,
            y = hit.point.y,
            z = hit.point.z,
            "hit"
        ),
        None => info!(x = args.x, y = args.y, "no face under cursor"),
    }
    Ok(())
}

pub fn run_orient(args: OrientArgs) -> Result<()> {
    let mut ctx = open_context(&args.viewport)?;
    ctx.request_orientation(&OrientationRequest::from_face(args.view));

    let every = (settle_frames(&ctx) / args.steps.max(1)).max(1);
    let mut frame = 0;
    while ctx.is_transitioning() {
        if frame >= MAX_FRAMES {
            bail!("transition did not finish within {MAX_FRAMES} frames");
        }
        ctx.frame(FRAME_DT);
        frame += 1;
        if frame % every == 0 || !ctx.is_transitioning() {
            let p = ctx.camera().position;
            info!(frame, x = p.x, y = p.y, z = p.z, "camera");
        }
    }
    let q = ctx.camera().orientation;
    info!(view = ?args.view, w = q.s, x = q.v.x, y = q.v.y, z = q.v.z, "orientation");
    Ok(())
}

fn open_context(args: &ViewportArgs) -> Result<ViewerContext> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            ViewerConfig::from_json(&text)?
        }
        None => ViewerConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }

    let geometry = load_geometry(&args.input)?;
    let ctx = ViewerContext::new(geometry, config)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    Ok(ctx)
}

fn settle_frames(ctx: &ViewerContext) -> usize {
    let duration = ctx.transition_duration();
    (duration / FRAME_DT).ceil() as usize
}

fn settle(ctx: &mut ViewerContext) -> Result<()> {
    for _ in 0..MAX_FRAMES {
        if !ctx.is_transitioning() {
            return Ok(());
        }
        ctx.frame(FRAME_DT);
    }
    bail!("transition did not finish within {MAX_FRAMES} frames")
}
