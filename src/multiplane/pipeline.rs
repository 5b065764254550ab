use super::params::{MultiplaneParams, Scheme};
use crate::depth::{quantize_depth, QuantizedDepth};
use crate::device::Device;
use crate::diagnostics::{TargetReport, TimingBreakdown};
use crate::error::{ensure_shape, MultiplaneError, Result};
use crate::image::ImageF32;
use crate::loss::{LossEvaluator, LossTerms, LossValue};
use crate::stack::{MaskStack, TargetStack};
use crate::targets::{apply_defocus, synthesize_sharp};
use log::{debug, info};

/// Frozen target stack plus the loss used to score candidates against it.
///
/// Built once; every query borrows immutably, so a shared reference can be
/// handed to several optimiser threads.
#[derive(Clone, Debug)]
pub struct MultiplaneLoss {
    params: MultiplaneParams,
    device: Device,
    depth: QuantizedDepth,
    masks: MaskStack,
    targets: TargetStack,
    focus: ImageF32,
    evaluator: LossEvaluator,
    report: TargetReport,
}

impl MultiplaneLoss {
    /// Quantize `depth`, synthesize per-plane targets from `image` and, for
    /// the `defocus` scheme, add inter-plane bleed. The stack is finally
    /// scaled by `params.multiplier`.
    pub fn new(
        image: &ImageF32,
        depth: &ImageF32,
        params: MultiplaneParams,
        device: Device,
    ) -> Result<Self> {
        params.validate()?;
        ensure_shape("depth map", image.dims(), depth.dims())?;

        let mut timing = TimingBreakdown::default();
        let quantized = timing.time("quantize", || quantize_depth(depth, params.number_of_planes))?;
        let masks = timing.time("masks", || quantized.masks(device));
        let sharp = timing.time("sharp", || synthesize_sharp(image, &masks, device))?;
        let blurred = match params.scheme {
            Scheme::Defocus => {
                let blur = params.blur();
                timing.time("defocus", || apply_defocus(&sharp, &masks, &blur, device))?
            }
            Scheme::Naive => {
                debug!("MultiplaneLoss::new: naive scheme, defocus skipped");
                sharp.clone()
            }
        };
        let targets = blurred.scaled(params.multiplier);
        let focus = sharp.composite();

        let report = TargetReport::from_stacks(&quantized, &sharp, &targets, &params, timing);
        info!(
            "MultiplaneLoss: {}x{} into {} planes ({:?}) in {:.2} ms",
            image.w, image.h, params.number_of_planes, params.scheme, report.timing.total_ms
        );

        let evaluator = LossEvaluator::new(params.weights, params.reduction).with_device(device);
        Ok(Self {
            params,
            device,
            depth: quantized,
            masks,
            targets,
            focus,
            evaluator,
            report,
        })
    }

    /// Copies of the target stack and of the quantized depth normalised to `[0, 1]`.
    pub fn get_targets(&self) -> (TargetStack, ImageF32) {
        (self.targets.clone(), self.depth.normalized())
    }

    /// Loss of `image` against `target` inside the mask of `plane`.
    ///
    /// `plane` must name a concrete plane; `None` fails with `MissingPlane`.
    pub fn evaluate(
        &self,
        image: &ImageF32,
        target: &ImageF32,
        plane: Option<usize>,
    ) -> Result<LossValue> {
        let mask = self.select_mask(plane)?;
        self.evaluator.evaluate(image, target, mask)
    }

    /// Like [`evaluate`](Self::evaluate) but keeps the four weighted terms apart.
    pub fn evaluate_terms(
        &self,
        image: &ImageF32,
        target: &ImageF32,
        plane: Option<usize>,
    ) -> Result<LossTerms> {
        let mask = self.select_mask(plane)?;
        self.evaluator.evaluate_terms(image, target, mask)
    }

    /// Derivative of the scalar loss with respect to `image`.
    pub fn gradient(
        &self,
        image: &ImageF32,
        target: &ImageF32,
        plane: Option<usize>,
    ) -> Result<ImageF32> {
        let mask = self.select_mask(plane)?;
        self.evaluator.gradient(image, target, mask)
    }

    /// Rebind every later computation to `device`. Idempotent.
    pub fn to(mut self, device: Device) -> Self {
        if device != self.device {
            debug!("MultiplaneLoss: moving from {:?} to {:?}", self.device, device);
        }
        self.device = device;
        self.evaluator = self.evaluator.with_device(device);
        self
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn params(&self) -> &MultiplaneParams {
        &self.params
    }

    pub fn masks(&self) -> &MaskStack {
        &self.masks
    }

    pub fn targets(&self) -> &TargetStack {
        &self.targets
    }

    /// All-in-focus view: the sharpened source before masking and defocus.
    pub fn focus_target(&self) -> &ImageF32 {
        &self.focus
    }

    pub fn quantized_depth(&self) -> &QuantizedDepth {
        &self.depth
    }

    pub fn report(&self) -> &TargetReport {
        &self.report
    }

    fn select_mask(&self, plane: Option<usize>) -> Result<&ImageF32> {
        match plane {
            Some(i) => self.masks.plane(i),
            None => Err(MultiplaneError::MissingPlane),
        }
    }
}
