use multiplane_targets::image::ImageF32;
use multiplane_targets::prelude::*;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

/// Synthetic scene, then a few gradient steps of a blank candidate towards plane 0.
fn run() -> Result<(), MultiplaneError> {
    let (w, h) = (64usize, 48usize);
    let image = ImageF32::from_fn(w, h, |x, y| if (x / 8 + y / 8) % 2 == 0 { 0.2 } else { 0.9 });
    let depth = ImageF32::from_fn(w, h, |x, _| x as f32 / (w - 1) as f32);

    let loss = MultiplaneLoss::new(&image, &depth, MultiplaneParams::default(), Device::Cpu)?
        .to(Device::Parallel);
    let (targets, _) = loss.get_targets();
    let target = targets.plane(0)?;

    let mut candidate = ImageF32::new(w, h);
    for step in 0..5 {
        let value = loss.evaluate(&candidate, target, Some(0))?;
        let grad = loss.gradient(&candidate, target, Some(0))?;
        println!("step={step} loss={:.6}", value.scalar().unwrap_or(f32::NAN));
        candidate = candidate.zip_map(&grad, |c, g| c - 50.0 * g);
    }
    Ok(())
}
