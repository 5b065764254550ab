use multiplane_targets::config::targets::{parse_cli, TargetToolConfig};
use multiplane_targets::image::io::{
    ensure_dir, load_channel_f32, load_depth_f32, load_grayscale_f32, save_grayscale_f32,
    write_json_file,
};
use multiplane_targets::image::ImageF32;
use multiplane_targets::MultiplaneLoss;
use std::env;

fn main() {
    let _logger = match flexi_logger::Logger::try_with_env_or_str("info").and_then(|l| l.start()) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err}");
            None
        }
    };
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args
        .next()
        .unwrap_or_else(|| "synthesize_targets".to_string());
    let config = parse_cli(&program, args)?;

    let (image, depth) = load_inputs(&config)?;
    let loss = MultiplaneLoss::new(&image, &depth, config.target.params.clone(), config.device)
        .map_err(|e| format!("Failed to build targets: {e}"))?;
    let (targets, normalized_depth) = loss.get_targets();

    let dir = &config.output.directory;
    ensure_dir(dir)?;
    for (plane_id, target) in targets.iter().enumerate() {
        save_grayscale_f32(target, &dir.join(format!("target_{plane_id:04}.png")), 0.0, 1.0)?;
    }
    save_grayscale_f32(loss.focus_target(), &dir.join("target.png"), 0.0, 1.0)?;
    save_grayscale_f32(&normalized_depth, &dir.join("depth.png"), 0.0, 1.0)?;

    let report = loss.report();
    for plane in &report.planes {
        println!(
            "plane {}: coverage {:.1}% mean {:.4} max {:.4}",
            plane.plane_index,
            plane.coverage_fraction * 100.0,
            plane.target_mean,
            plane.target_max
        );
    }
    println!(
        "Saved {} targets, target.png and depth.png to {} ({:.2} ms)",
        targets.len(),
        dir.display(),
        report.timing.total_ms
    );

    if let Some(path) = &config.output.report_json {
        write_json_file(path, report)?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}

fn load_inputs(config: &TargetToolConfig) -> Result<(ImageF32, ImageF32), String> {
    let image = match config.target.colour_channel {
        Some(channel) => load_channel_f32(&config.target.image, channel)?,
        None => load_grayscale_f32(&config.target.image)?,
    };
    let mut depth = load_depth_f32(&config.target.depth)?;
    if config.target.invert_depth {
        depth = depth.map(|d| 1.0 - d);
    }
    if image.dims() != depth.dims() {
        return Err(format!(
            "Image {} is {}x{} but depth {} is {}x{}",
            config.target.image.display(),
            image.w,
            image.h,
            config.target.depth.display(),
            depth.w,
            depth.h
        ));
    }
    Ok((image, depth))
}
