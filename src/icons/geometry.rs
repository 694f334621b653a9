//! Per-variant render geometry
//!
//! Square canvases let the content use the whole canvas. Non-square canvases
//! (launch screens) cap the content at half the canvas on each axis so the
//! logo is inset rather than stretched. The source aspect ratio is always
//! preserved and the content is always centered.

use super::catalog::VariantTemplate;

/// Concrete instructions for rendering one variant
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub output_name: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub content_width: u32,
    pub content_height: u32,
    pub offset_left: u32,
    pub offset_top: u32,
    pub filled: bool,
    pub scale_factor: f64,
}

impl RenderPlan {
    /// Compute the plan for one template against a source of the given size
    pub fn for_template(source_width: u32, source_height: u32, template: &VariantTemplate) -> Self {
        let width = f64::from(template.width);
        let height = f64::from(template.height);
        let (max_width, max_height) = if template.is_square() {
            (width, height)
        } else {
            (width / 2.0, height / 2.0)
        };

        let source_width_f = f64::from(source_width);
        let source_height_f = f64::from(source_height);
        let scale_factor = (max_width / source_width_f).min(max_height / source_height_f);

        // Never ask for a zero-sized resize, even for extreme aspect ratios.
        let content_width = ((scale_factor * source_width_f).floor() as u32).max(1);
        let content_height = ((scale_factor * source_height_f).floor() as u32).max(1);

        Self {
            output_name: template.output_name(),
            canvas_width: template.width,
            canvas_height: template.height,
            content_width,
            content_height,
            offset_left: template.width.saturating_sub(content_width) / 2,
            offset_top: template.height.saturating_sub(content_height) / 2,
            filled: template.filled,
            scale_factor,
        }
    }
}

/// Compute one plan per template, in template order
pub fn plan(source_width: u32, source_height: u32, templates: &[VariantTemplate]) -> Vec<RenderPlan> {
    templates
        .iter()
        .map(|template| RenderPlan::for_template(source_width, source_height, template))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::catalog::{self, VariantTemplate as T};
    use proptest::prelude::*;

    #[test]
    fn test_square_favicon_from_square_source() {
        let plans = plan(1024, 1024, &[T::transparent("favicon", 16, 16)]);
        assert_eq!(
            plans[0],
            RenderPlan {
                output_name: "favicon-16x16.png".to_string(),
                canvas_width: 16,
                canvas_height: 16,
                content_width: 16,
                content_height: 16,
                offset_left: 0,
                offset_top: 0,
                filled: false,
                scale_factor: 0.015625,
            }
        );
    }

    #[test]
    fn test_filled_launch_screen_is_inset_and_centered() {
        let plans = plan(1024, 1024, &[T::filled("ios-launchscreen", 640, 960)]);
        let launch = &plans[0];

        assert_eq!(launch.output_name, "ios-launchscreen-640x960.png");
        assert_eq!(launch.scale_factor, 0.3125);
        assert_eq!((launch.content_width, launch.content_height), (320, 320));
        assert_eq!((launch.offset_left, launch.offset_top), (160, 320));
        assert!(launch.filled);
    }

    #[test]
    fn test_wide_source_on_square_canvas_is_letterboxed() {
        let plans = plan(200, 100, &[T::transparent("mstile", 150, 150)]);
        let tile = &plans[0];
        assert_eq!((tile.content_width, tile.content_height), (150, 75));
        assert_eq!((tile.offset_left, tile.offset_top), (0, 37));
    }

    #[test]
    fn test_extreme_aspect_ratio_never_yields_zero_content() {
        let plans = plan(1, 8192, &[T::transparent("favicon", 16, 16)]);
        assert_eq!(plans[0].content_width, 1);
        assert_eq!(plans[0].content_height, 16);
    }

    #[test]
    fn test_zero_sized_canvas_does_not_underflow_offsets() {
        let plans = plan(
            64,
            64,
            &[T::transparent("empty", 0, 0), T::filled("strip", 0, 40)],
        );
        for plan in &plans {
            assert_eq!((plan.content_width, plan.content_height), (1, 1));
            assert_eq!(plan.offset_left, 0);
        }
        assert_eq!(plans[1].offset_top, 19);
    }

    #[test]
    fn test_plan_covers_full_catalog_in_order() {
        let templates = catalog::expand();
        let plans = plan(1024, 1024, &templates);
        assert_eq!(plans.len(), templates.len());
        for (plan, template) in plans.iter().zip(&templates) {
            assert_eq!(plan.output_name, template.output_name());
            assert_eq!(plan.filled, template.filled);
        }
    }

    fn template_strategy() -> impl Strategy<Value = VariantTemplate> {
        (1u32..=3000, 1u32..=3000, any::<bool>())
            .prop_map(|(width, height, filled)| VariantTemplate {
                base_name: "variant",
                width,
                height,
                filled,
            })
            .prop_filter("canvas must fit at least one pixel of content", |t| {
                t.is_square() || (t.width >= 2 && t.height >= 2)
            })
    }

    proptest! {
        #[test]
        fn prop_plan_is_deterministic(
            source_width in 1u32..=4096,
            source_height in 1u32..=4096,
            template in template_strategy(),
        ) {
            let first = plan(source_width, source_height, &[template]);
            let second = plan(source_width, source_height, &[template]);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_content_fits_and_is_centered(
            source_width in 1u32..=4096,
            source_height in 1u32..=4096,
            template in template_strategy(),
        ) {
            let p = RenderPlan::for_template(source_width, source_height, &template);
            prop_assert!(p.content_width <= p.canvas_width);
            prop_assert!(p.content_height <= p.canvas_height);
            prop_assert_eq!(p.offset_left, (p.canvas_width - p.content_width) / 2);
            prop_assert_eq!(p.offset_top, (p.canvas_height - p.content_height) / 2);

            if template.is_square() {
                let expected = (f64::from(template.width) / f64::from(source_width))
                    .min(f64::from(template.height) / f64::from(source_height));
                prop_assert_eq!(p.scale_factor, expected);
            } else {
                prop_assert!(f64::from(p.content_width) <= f64::from(p.canvas_width) / 2.0);
                prop_assert!(f64::from(p.content_height) <= f64::from(p.canvas_height) / 2.0);
            }
        }

        #[test]
        fn prop_aspect_ratio_preserved_within_rounding(
            source_width in 16u32..=4096,
            source_height in 16u32..=4096,
            template in template_strategy(),
        ) {
            let p = RenderPlan::for_template(source_width, source_height, &template);
            let exact_width = p.scale_factor * f64::from(source_width);
            let exact_height = p.scale_factor * f64::from(source_height);
            prop_assert!(exact_width - f64::from(p.content_width) < 1.0 || p.content_width == 1);
            prop_assert!(exact_height - f64::from(p.content_height) < 1.0 || p.content_height == 1);
            prop_assert!(f64::from(p.content_width) <= exact_width.max(1.0));
            prop_assert!(f64::from(p.content_height) <= exact_height.max(1.0));
        }
    }
}
