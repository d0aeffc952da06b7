use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use field_core::{
    AssetSource, CosmicShaper, DirSource, Field, FieldConfig, FrameClock, MessageList, ViewSample,
};
use glam::{Vec2, Vec3};

const FRAME_DT: f32 = 1.0 / 60.0; // pacing target
const DEFAULT_FRAMES: u64 = 600;
const STATS_EVERY: u64 = 60;
const SEED: u64 = 0x5eed_f1e1d;

const GLYPHS: [(&str, &str); 3] = [
    ("rose", "shape/rose.svg"),
    ("kneeling", "shape/kneeling.svg"),
    ("heart-text", "shape/heart_t.svg"),
];
const HEART_TEMPLATE: &str = "shape/heart.svg";

const MESSAGES: [&str; 8] = [
    "still here :heart:",
    "every night a little brighter",
    ":rose: for you :rose:",
    "i would cross it all again",
    "here :kneel: asking",
    "you are the quiet part",
    "always :heart: always",
    "fall slowly with me",
];

struct Args {
    assets: PathBuf,
    frames: u64,
    png_out: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut it = std::env::args().skip(1);
    let assets = it.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("assets"));
    let frames = match it.next() {
        Some(s) => s
            .parse()
            .with_context(|| format!("frame count must be an integer, got '{s}'"))?,
        None => DEFAULT_FRAMES,
    };
    let png_out = it.next().map(PathBuf::from);
    if it.next().is_some() {
        bail!("usage: field-native [assets_dir] [frames] [png_out]");
    }
    Ok(Args {
        assets,
        frames,
        png_out,
    })
}

/// Scripted camera: slow orbit that pulls back and returns.
fn camera_at(time: f32) -> ViewSample {
    let distance = 200.0 + (1.0 - (time * 0.15).cos()) * 1800.0;
    let angle = time * 0.1;
    let eye = Vec3::new(
        angle.sin() * distance * 0.3,
        (time * 0.2).sin() * 40.0,
        angle.cos() * distance,
    );
    ViewSample::new(eye, Vec3::ZERO)
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = parse_args()?;
    let source: Arc<dyn AssetSource> = Arc::new(DirSource::new(args.assets.clone()));

    let messages = MessageList::new(MESSAGES).context("building message list")?;
    let mut field = Field::new(
        FieldConfig::default(),
        Box::new(CosmicShaper::new()),
        messages,
        SEED,
        &camera_at(0.0),
    )
    .context("creating field")?;

    for (key, path) in GLYPHS {
        field.request_glyph(key, path, Arc::clone(&source));
    }
    field.request_heart_template(HEART_TEMPLATE, Arc::clone(&source));

    log::info!(
        "[native] running {} frames from {}",
        args.frames,
        args.assets.display()
    );
    let mut clock = FrameClock::new();
    for n in 0..args.frames {
        let (delta, time) = clock.tick();
        if n % 90 == 45 {
            field.on_wheel(if (n / 90) % 2 == 0 { 240.0 } else { -120.0 });
        }
        field.on_pointer(Vec2::new((time * 0.7).sin(), (time * 0.3).cos() * 0.5));

        let view = camera_at(time);
        let frame = field.frame(delta, time, &view);
        let stats = frame.stats;
        let uploads = frame.uploads.len();
        let instance_bytes = frame.text_bytes().len() + frame.heart_bytes().len();
        if n % STATS_EVERY == 0 {
            log::info!(
                "[native] frame {:>5}: text {}/{} visible, hearts {}, uploads {}, spawn queue {}, refresh queue {}, crowded {}, {} instance bytes",
                n,
                stats.text_visible,
                stats.text_total,
                stats.hearts,
                uploads,
                stats.pending_spawns,
                stats.pending_refreshes,
                stats.exhausted_placements,
                instance_bytes,
            );
        }
        field.mark_all_uploaded();

        let idle = FRAME_DT - clock.since_tick();
        if idle > 0.0 {
            std::thread::sleep(Duration::from_secs_f32(idle));
        }
    }

    let pool = field.text_pool();
    log::info!(
        "[native] done: {} recycles, {} placements, {} exhausted",
        pool.recycles(),
        pool.separation().placements(),
        pool.separation().exhausted()
    );

    if let Some(out) = args.png_out {
        let (_, particle) = pool
            .iter()
            .find(|(_, p)| p.visible)
            .or_else(|| pool.iter().next())
            .context("text pool is empty")?;
        particle
            .raster()
            .save_png(&out)
            .with_context(|| format!("writing {}", out.display()))?;
        log::info!("[native] wrote '{}' to {}", particle.text(), out.display());
    }
    Ok(())
}
