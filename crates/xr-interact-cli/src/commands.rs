//! Subcommand implementations

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tokio::runtime::Handle;
use xr_interact_core::pose::{source_for_base_url, MatchDebouncer, TemplateCache};
use xr_interact_core::{
    resolve_profile, FrameRunner, HandJoint, Handedness, InteractionConfig, Point3D, PoseTemplate, Quaternion,
    Transform,
};

use crate::matching::MatchSession;
use crate::replay::ReplaySession;
use crate::scenario::{GrabScript, HandShape};

#[derive(Debug, Serialize)]
struct JointSummary {
    index: usize,
    name: String,
    angle_degrees: f32,
    weight: f32,
}

fn summarize(template: &PoseTemplate) -> Vec<JointSummary> {
    template
        .rotations()
        .iter()
        .zip(template.weights())
        .enumerate()
        .map(|(index, (rotation, weight))| JointSummary {
            index,
            name: HandJoint::from_index(index)
                .map(|joint| joint.name().to_string())
                .unwrap_or_else(|| format!("joint-{index}")),
            angle_degrees: rotation.angle_between(&Quaternion::IDENTITY).to_degrees(),
            weight: *weight,
        })
        .collect()
}

pub fn inspect(file: &Path, json: bool) -> Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let template = PoseTemplate::from_bytes(&bytes).with_context(|| format!("decoding {}", file.display()))?;
    let joints = summarize(&template);

    if json {
        println!("{}", serde_json::to_string_pretty(&joints)?);
        return Ok(());
    }

    println!("{}: {} joints", file.display(), template.joint_count());
    for joint in joints {
        println!(
            "{:>3}  {:<36} {:>7.2}°  w={:.3}",
            joint.index, joint.name, joint.angle_degrees, joint.weight
        );
    }
    Ok(())
}

pub fn author(shape: HandShape, hand: Handedness, mirror: bool, output: &Path) -> Result<()> {
    let buffer = shape.joint_buffer(hand);
    let bytes = PoseTemplate::snapshot_bytes(&buffer, mirror);
    std::fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;

    let stored = if mirror { hand.opposite() } else { hand };
    println!(
        "Wrote {} ({} joints, {} bytes, {} hand)",
        output.display(),
        buffer.len(),
        bytes.len(),
        stored.as_str()
    );
    Ok(())
}

pub fn resolve(config: &InteractionConfig, paths: &[String], base_url: Option<&str>) {
    let base_url = base_url.unwrap_or(&config.poses.base_url);
    for path in paths {
        println!("{}", xr_interact_core::pose::resolve_template_url(base_url, path));
    }
}

pub fn profile(config: &InteractionConfig, candidates: &[String]) -> Result<()> {
    let profile = resolve_profile(candidates, &config.profiles.supported, &config.profiles.default)?;
    println!("{profile}");
    Ok(())
}

fn template_cache(config: &InteractionConfig) -> Result<Arc<TemplateCache>> {
    let timeout = Duration::from_millis(config.poses.request_timeout_ms);
    let source = source_for_base_url(&config.poses.base_url, timeout)?;
    Ok(Arc::new(TemplateCache::new(
        config.poses.base_url.clone(),
        Arc::from(source),
        Handle::current(),
    )))
}

pub async fn fetch(config: &InteractionConfig, names: &[String]) -> Result<()> {
    let entries: Vec<_> = if names.is_empty() {
        config.poses.library.iter().collect()
    } else {
        names
            .iter()
            .map(|name| {
                config
                    .poses
                    .library
                    .iter()
                    .find(|entry| &entry.name == name)
                    .with_context(|| format!("no pose named '{name}' in the library"))
            })
            .collect::<Result<_>>()?
    };
    if entries.is_empty() {
        bail!("the pose library is empty; add [[poses.library]] entries to the config");
    }

    let cache = template_cache(config)?;
    let mut failures = 0usize;
    for entry in entries {
        match cache.load(&entry.path).await {
            Ok(template) => println!(
                "{:<16} {} joints  {}",
                entry.name,
                template.joint_count(),
                cache.resolve(&entry.path)
            ),
            Err(e) => {
                failures += 1;
                println!("{:<16} failed: {e}", entry.name);
            }
        }
    }

    if failures > 0 {
        bail!("{failures} template(s) failed to load");
    }
    Ok(())
}

pub async fn match_shape(
    config: &InteractionConfig,
    shape: HandShape,
    hand: Handedness,
    frames: u64,
    tick: Duration,
    min_margin: f32,
) -> Result<()> {
    if config.poses.library.is_empty() {
        bail!("the pose library is empty; add [[poses.library]] entries to the config");
    }

    let cache = template_cache(config)?;
    let mut session = MatchSession::new(
        config.clone(),
        Arc::clone(&cache),
        shape,
        hand,
        MatchDebouncer::new(min_margin, 3),
    );
    FrameRunner::new(tick).run(&mut session, frames).await;

    match session.last_match() {
        Some(result) => println!(
            "{} hand '{}': best match '{}' (margin {:.4}), stable: {}",
            hand.as_str(),
            shape.name(),
            result.name,
            result.confidence_margin,
            session.stable().unwrap_or("none")
        ),
        None => println!(
            "{} hand '{}': no match after {frames} frames ({} without ready templates)",
            hand.as_str(),
            shape.name(),
            session.frames_without_match()
        ),
    }
    for (tick, pose) in session.settled() {
        println!("  tick {tick:>4}: settled on '{pose}'");
    }
    cache.shutdown();
    Ok(())
}

pub async fn replay_grab(config: &InteractionConfig, script: GrabScript, steps: u32, tick: Duration) -> Result<()> {
    let origin = Point3D::new(0.0, 1.2, -0.5);
    let cache = template_cache(config)?;
    let mut session = ReplaySession::new(
        config.clone(),
        Arc::clone(&cache),
        script.build(origin, steps),
        Transform::from_position(origin),
    );

    let frames = session.remaining_frames() as u64;
    FrameRunner::new(tick).run(&mut session, frames).await;

    println!("{:>5}  {:<11} {:<28} {:<28} signals", "tick", "state", "position", "scale");
    for frame in session.frames() {
        let p = frame.transform.position;
        let s = frame.transform.scale;
        println!(
            "{:>5}  {:<11} {:<28} {:<28} {:?}",
            frame.tick,
            format!("{:?}", frame.state),
            format!("({:.3}, {:.3}, {:.3})", p.x, p.y, p.z),
            format!("({:.3}, {:.3}, {:.3})", s.x, s.y, s.z),
            frame.signals
        );
    }
    cache.shutdown();
    Ok(())
}
