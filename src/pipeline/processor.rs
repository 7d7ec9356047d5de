//! Pipeline orchestration.

use tracing::debug;

use crate::dither::dither;
use crate::error::PipelineError;
use crate::filter::{
    adjust_colors, box_blur, edge_overlay, erode, gaussian_blur, kuwahara, merge_small_regions,
    mode_filter, outline, posterize, sharpen,
};
use crate::palette::{Matcher, Palette};
use crate::pipeline::PipelineConfig;
use crate::raster::Raster;
use crate::resample::resample;

/// The pipeline result: a fully quantized raster (alpha 0 or 255
/// everywhere) and the count of painted pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub raster: Raster,
    pub valid_pixels: usize,
}

/// One conversion pipeline instance.
///
/// Owns the matcher and therefore the memoization caches, which persist
/// across invocations; call [`reset_caches`](Self::reset_caches) when a
/// new source image is loaded. Not designed for concurrent use - spawn
/// one `Processor` per thread instead of sharing.
#[derive(Debug, Default)]
pub struct Processor {
    matcher: Matcher,
}

impl Processor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all memoized color conversions and match results.
    pub fn reset_caches(&mut self) {
        self.matcher.reset();
    }

    /// Run the fixed stage order on `source`:
    /// resample, pre-filters, dither/quantize, post-filters.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::EmptySource`] if `source` has a zero dimension.
    /// - [`PipelineError::EmptyPalette`] if `palette` has no entries.
    /// - [`PipelineError::InvalidTarget`] if exactly one of the target
    ///   dimensions is zero (both zero means "keep source size").
    pub fn process(
        &mut self,
        source: &Raster,
        palette: &Palette,
        config: &PipelineConfig,
    ) -> Result<PipelineOutput, PipelineError> {
        if source.is_empty() {
            return Err(PipelineError::EmptySource {
                width: source.width(),
                height: source.height(),
            });
        }
        if palette.is_empty() {
            return Err(PipelineError::EmptyPalette);
        }
        let (dst_w, dst_h) = match (config.width, config.height) {
            (0, 0) => (source.width(), source.height()),
            (w, h) if w == 0 || h == 0 => {
                return Err(PipelineError::InvalidTarget {
                    width: w,
                    height: h,
                })
            }
            (w, h) => (w, h),
        };

        debug!(
            src_w = source.width(),
            src_h = source.height(),
            dst_w,
            dst_h,
            method = ?config.resample,
            "resampling"
        );
        let mut working = resample(source, dst_w, dst_h, config.resample);

        let pre = &config.pre;
        if pre.blur_radius > 0 {
            debug!(radius = pre.blur_radius, gaussian = pre.gaussian, "blur");
            working = if pre.gaussian {
                gaussian_blur(&working, pre.blur_radius)
            } else {
                box_blur(&working, pre.blur_radius)
            };
        }
        if pre.kuwahara_radius > 0 {
            debug!(radius = pre.kuwahara_radius, "kuwahara");
            working = kuwahara(&working, pre.kuwahara_radius);
        }
        if let Some(s) = pre.sharpen {
            debug!(amount = s.amount, threshold = s.threshold, "sharpen");
            working = sharpen(&working, s.amount, s.threshold);
        }
        if !pre.adjust.is_identity() {
            debug!("color correction");
            working = adjust_colors(&working, &pre.adjust);
        }
        if pre.posterize_levels >= 2 {
            debug!(levels = pre.posterize_levels, "posterize");
            working = posterize(&working, pre.posterize_levels);
        }

        debug!(method = ?config.dither.method, strength = config.dither.strength, "quantizing");
        let quantized = dither(
            &working,
            palette,
            &mut self.matcher,
            &config.matching,
            &config.transparency,
            config.dither.method,
            config.dither.strength,
        );
        let mut raster = quantized.raster;

        let post = &config.post;
        if post.mode_radius > 0 {
            debug!(radius = post.mode_radius, "mode filter");
            raster = mode_filter(&raster, post.mode_radius);
        }
        if post.simplify_min_size >= 2 {
            debug!(min_size = post.simplify_min_size, "region merge");
            merge_small_regions(&mut raster, post.simplify_min_size as usize);
        }
        if post.erode_iterations > 0 {
            debug!(iterations = post.erode_iterations, "erode");
            raster = erode(&raster, post.erode_iterations);
        }
        if post.outline_thickness > 0 {
            debug!(thickness = post.outline_thickness, "outline");
            raster = outline(&raster, post.outline_thickness);
        }
        if let Some(e) = post.edge_overlay {
            debug!(algorithm = ?e.algorithm, threshold = e.threshold, "edge overlay");
            raster = edge_overlay(&raster, e.algorithm, e.threshold, e.thickness, e.thinning);
        }

        Ok(PipelineOutput {
            raster,
            valid_pixels: quantized.valid_pixels,
        })
    }
}
