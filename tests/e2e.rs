mod common;

use common::synthetic_image::{checkerboard, quadrant_depth, wavy_ramp};
use multiplane_targets::image::ImageF32;
use multiplane_targets::{
    quantize_depth, synthesize_sharp, Device, LossWeights, MultiplaneError, MultiplaneLoss,
    MultiplaneParams, Reduction, Scheme,
};

fn build(image: &ImageF32, depth: &ImageF32, params: MultiplaneParams) -> MultiplaneLoss {
    MultiplaneLoss::new(image, depth, params, Device::Cpu).expect("target synthesis")
}

#[test]
fn quadrant_depth_splits_into_equal_planes() {
    let image = checkerboard(16, 16, 4);
    let depth = quadrant_depth(16);
    let loss = build(&image, &depth, MultiplaneParams::default());

    let masks = loss.masks();
    assert_eq!(masks.len(), 4);
    let mut total = 0.0;
    for (i, mask) in masks.iter().enumerate() {
        assert_eq!(mask.sum(), 64.0, "plane {i} coverage");
        total += mask.sum();
    }
    assert_eq!(total, 256.0);

    let report = loss.report();
    assert_eq!(report.planes.len(), 4);
    assert!(report.planes.iter().all(|p| p.coverage_px == 64));
    assert!(report
        .planes
        .iter()
        .all(|p| (p.coverage_fraction - 0.25).abs() < 1e-6));
}

#[test]
fn masks_partition_the_image() {
    let (w, h) = (40, 28);
    let image = checkerboard(w, h, 5);
    let depth = wavy_ramp(w, h);
    for planes in [1, 2, 3, 5, 8] {
        let params = MultiplaneParams {
            number_of_planes: planes,
            ..Default::default()
        };
        let loss = build(&image, &depth, params);
        let masks = loss.masks();
        for y in 0..h {
            for x in 0..w {
                let hits: f32 = masks.iter().map(|m| m.get(x, y)).sum();
                assert_eq!(hits, 1.0, "N={planes} pixel ({x}, {y})");
            }
        }
    }
}

#[test]
fn sharp_targets_vanish_outside_their_mask() {
    let (w, h) = (32, 24);
    let image = checkerboard(w, h, 6);
    let depth = wavy_ramp(w, h);
    let params = MultiplaneParams {
        scheme: Scheme::Naive,
        ..Default::default()
    };
    let loss = build(&image, &depth, params);
    let (targets, _) = loss.get_targets();
    for (target, mask) in targets.iter().zip(loss.masks().iter()) {
        for (&t, &m) in target.data.iter().zip(mask.data.iter()) {
            if m == 0.0 {
                assert_eq!(t, 0.0);
            }
        }
    }
}

#[test]
fn target_scores_zero_against_itself() {
    let (w, h) = (24, 24);
    let image = checkerboard(w, h, 4);
    let depth = wavy_ramp(w, h);
    let params = MultiplaneParams {
        weights: LossWeights::from([1.0, 2.1, 0.6, 0.3]),
        ..Default::default()
    };
    let loss = build(&image, &depth, params);
    let (targets, _) = loss.get_targets();
    for i in 0..targets.len() {
        let target = targets.plane(i).unwrap();
        let value = loss.evaluate(target, target, Some(i)).unwrap();
        assert!(value.scalar().unwrap().abs() < 1e-9, "plane {i}");
    }
}

#[test]
fn normalized_depth_round_trips_to_plane_indices() {
    let (w, h) = (30, 20);
    let image = checkerboard(w, h, 5);
    let depth = wavy_ramp(w, h);
    let n = 5;
    let params = MultiplaneParams {
        number_of_planes: n,
        ..Default::default()
    };
    let loss = build(&image, &depth, params);
    let (_, normalized) = loss.get_targets();
    let quantized = loss.quantized_depth();
    for y in 0..h {
        for x in 0..w {
            let v = normalized.get(x, y);
            assert!((0.0..=1.0).contains(&v));
            let back = (v * (n - 1) as f32).round() as u32;
            assert_eq!(back, quantized.index(x, y));
        }
    }
}

#[test]
fn zero_blur_ratio_matches_naive_and_full_ratio_bleeds() {
    let image = ImageF32::filled(16, 16, 0.6);
    let depth = quadrant_depth(16);

    let naive = build(
        &image,
        &depth,
        MultiplaneParams {
            scheme: Scheme::Naive,
            ..Default::default()
        },
    );
    let no_blur = build(
        &image,
        &depth,
        MultiplaneParams {
            blur_ratio: 0.0,
            ..Default::default()
        },
    );
    let full_blur = build(
        &image,
        &depth,
        MultiplaneParams {
            blur_ratio: 1.0,
            ..Default::default()
        },
    );

    let sharp0 = naive.targets().plane(0).unwrap();
    assert_eq!(no_blur.targets().plane(0).unwrap(), sharp0);

    let mask0 = naive.masks().plane(0).unwrap();
    let blurred0 = full_blur.targets().plane(0).unwrap();
    let mut bleed = 0.0f64;
    for (i, (&t, &m)) in blurred0.data.iter().zip(mask0.data.iter()).enumerate() {
        if m == 1.0 {
            assert_eq!(t, sharp0.data[i], "in-focus region changed at {i}");
        } else {
            bleed += t as f64;
        }
    }
    assert!(bleed > 0.0, "expected defocus bleed outside plane 0");
}

#[test]
fn naive_scheme_is_sharp_stack_times_multiplier() {
    let (w, h) = (20, 20);
    let image = checkerboard(w, h, 3);
    let depth = wavy_ramp(w, h);
    let params = MultiplaneParams {
        scheme: Scheme::Naive,
        multiplier: 2.0,
        number_of_planes: 3,
        ..Default::default()
    };
    let loss = build(&image, &depth, params);

    let masks = quantize_depth(&depth, 3).unwrap().masks(Device::Cpu);
    let expected = synthesize_sharp(&image, &masks, Device::Cpu)
        .unwrap()
        .scaled(2.0);
    for (got, want) in loss.targets().iter().zip(expected.iter()) {
        assert!(got.max_abs_diff(want) < 1e-6);
    }
}

#[test]
fn plane_selection_errors() {
    let image = checkerboard(16, 16, 4);
    let depth = quadrant_depth(16);
    let loss = build(&image, &depth, MultiplaneParams::default());
    let target = loss.targets().plane(0).unwrap().clone();

    assert_eq!(
        loss.evaluate(&image, &target, None).unwrap_err(),
        MultiplaneError::MissingPlane
    );
    assert_eq!(
        loss.evaluate(&image, &target, Some(4)).unwrap_err(),
        MultiplaneError::PlaneOutOfRange { plane: 4, planes: 4 }
    );
    assert!(loss.gradient(&image, &target, None).is_err());
}

#[test]
fn construction_rejects_bad_inputs() {
    let image = checkerboard(16, 16, 4);
    let depth = quadrant_depth(16);

    let zero_planes = MultiplaneParams {
        number_of_planes: 0,
        ..Default::default()
    };
    assert_eq!(
        MultiplaneLoss::new(&image, &depth, zero_planes, Device::Cpu).unwrap_err(),
        MultiplaneError::InvalidPlaneCount(0)
    );

    let small = ImageF32::filled(8, 16, 0.5);
    let err = MultiplaneLoss::new(&image, &small, MultiplaneParams::default(), Device::Cpu)
        .unwrap_err();
    assert!(matches!(err, MultiplaneError::ShapeMismatch { .. }));

    let mut nan_depth = depth.clone();
    nan_depth.set(3, 5, f32::NAN);
    let err = MultiplaneLoss::new(&image, &nan_depth, MultiplaneParams::default(), Device::Cpu)
        .unwrap_err();
    assert_eq!(err, MultiplaneError::NonFiniteDepth { x: 3, y: 5 });
}

#[test]
fn parallel_device_matches_cpu() {
    let (w, h) = (48, 36);
    let image = checkerboard(w, h, 6);
    let depth = wavy_ramp(w, h);
    let params = MultiplaneParams {
        weights: LossWeights::from([1.0, 2.1, 0.6, 0.2]),
        ..Default::default()
    };
    let cpu = MultiplaneLoss::new(&image, &depth, params.clone(), Device::Cpu).unwrap();
    let par = MultiplaneLoss::new(&image, &depth, params, Device::Parallel).unwrap();
    for (a, b) in cpu.targets().iter().zip(par.targets().iter()) {
        assert!(a.max_abs_diff(b) < 1e-6);
    }

    let candidate = checkerboard(w, h, 5);
    let target = cpu.targets().plane(1).unwrap();
    let a = cpu.evaluate(&candidate, target, Some(1)).unwrap().scalar().unwrap();
    let b = par.evaluate(&candidate, target, Some(1)).unwrap().scalar().unwrap();
    assert!((a - b).abs() < 1e-6 * a.abs().max(1.0));
}

#[test]
fn moving_devices_is_idempotent() {
    let image = checkerboard(16, 16, 4);
    let depth = quadrant_depth(16);
    let loss = build(&image, &depth, MultiplaneParams::default());
    let target = loss.targets().plane(2).unwrap().clone();
    let before = loss.evaluate(&image, &target, Some(2)).unwrap();

    let moved = loss.to(Device::Parallel).to(Device::Parallel);
    assert_eq!(moved.device(), Device::Parallel);
    let after = moved.evaluate(&image, &target, Some(2)).unwrap();
    let (a, b) = (before.scalar().unwrap(), after.scalar().unwrap());
    assert!((a - b).abs() < 1e-6);

    let back = moved.to(Device::Cpu);
    assert_eq!(back.device(), Device::Cpu);
}

#[test]
fn reductions_relate_by_pixel_count() {
    let (w, h) = (16, 16);
    let image = checkerboard(w, h, 4);
    let depth = quadrant_depth(16);
    let candidate = ImageF32::filled(w, h, 0.3);

    let eval = |reduction| {
        let params = MultiplaneParams {
            reduction,
            ..Default::default()
        };
        let loss = build(&image, &depth, params);
        let target = loss.targets().plane(1).unwrap().clone();
        loss.evaluate(&candidate, &target, Some(1)).unwrap()
    };
    let mean = eval(Reduction::Mean).scalar().unwrap();
    let sum = eval(Reduction::Sum).scalar().unwrap();
    let map = eval(Reduction::None);
    let map = map.map().unwrap();
    assert_eq!(map.dims(), (w, h));

    let n = (w * h) as f32;
    assert!((sum - mean * n).abs() < 1e-3 * sum.abs().max(1.0));
    assert!((map.sum() as f32 - sum).abs() < 1e-3 * sum.abs().max(1.0));
}

#[test]
fn gradient_descent_reduces_the_loss() {
    let (w, h) = (24, 24);
    let image = checkerboard(w, h, 4);
    let depth = wavy_ramp(w, h);
    let loss = build(&image, &depth, MultiplaneParams::default());
    let target = loss.targets().plane(0).unwrap().clone();

    let mut candidate = ImageF32::filled(w, h, 0.5);
    let start = loss.evaluate(&candidate, &target, Some(0)).unwrap().scalar().unwrap();
    for _ in 0..3 {
        let grad = loss.gradient(&candidate, &target, Some(0)).unwrap();
        candidate = candidate.zip_map(&grad, |c, g| c - 20.0 * g);
    }
    let end = loss.evaluate(&candidate, &target, Some(0)).unwrap().scalar().unwrap();
    assert!(end < start, "loss went from {start} to {end}");
}

#[test]
fn focus_target_is_the_unmasked_sharp_composite() {
    let (w, h) = (24, 20);
    let image = checkerboard(w, h, 4);
    let depth = wavy_ramp(w, h);
    let params = MultiplaneParams {
        multiplier: 3.0,
        ..Default::default()
    };
    let loss = build(&image, &depth, params);

    let masks = quantize_depth(&depth, 4).unwrap().masks(Device::Cpu);
    let sharp = synthesize_sharp(&image, &masks, Device::Cpu).unwrap();
    let focus = loss.focus_target();
    assert_eq!(focus.dims(), (w, h));
    assert!(focus.max_abs_diff(&sharp.composite()) < 1e-6);
    // the multiplier only scales the per-plane targets
    let scaled_sum: f64 = loss.targets().iter().map(|t| t.sum()).sum();
    assert!(scaled_sum > focus.sum());
}
