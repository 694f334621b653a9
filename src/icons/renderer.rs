//! Variant rendering in transparent and filled compositing modes

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, info};

use super::geometry::RenderPlan;
use crate::errors::{IconError, IconResult};
use crate::source::SourceImage;

/// Opaque canvas color for filled-mode variants
///
/// Parsed from `#rgb` or `#rrggbb` (the `#` is optional). Alpha is always 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackgroundColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl BackgroundColor {
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.red, self.green, self.blue, 255])
    }
}

impl FromStr for BackgroundColor {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid =
            || IconError::configuration(format!("Invalid background color \"{s}\" (expected #rgb or #rrggbb)"));

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..=i].repeat(2));
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for BackgroundColor {
    type Error = IconError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackgroundColor> for String {
    fn from(color: BackgroundColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Resampling filter used when scaling the source image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Renders every planned variant of a source image into a directory
#[derive(Debug, Clone)]
pub struct VariantRenderer {
    background: BackgroundColor,
    filter: ResizeFilter,
}

impl VariantRenderer {
    pub fn new(background: BackgroundColor, filter: ResizeFilter) -> Self {
        Self { background, filter }
    }

    /// Transparent variants first, then filled, each ascending by scale factor
    ///
    /// The sort is stable so equal scale factors keep catalog order.
    pub fn processing_order(plans: &[RenderPlan]) -> Vec<&RenderPlan> {
        let mut transparent: Vec<&RenderPlan> = plans.iter().filter(|p| !p.filled).collect();
        let mut filled: Vec<&RenderPlan> = plans.iter().filter(|p| p.filled).collect();
        transparent.sort_by(|a, b| a.scale_factor.total_cmp(&b.scale_factor));
        filled.sort_by(|a, b| a.scale_factor.total_cmp(&b.scale_factor));
        transparent.extend(filled);
        transparent
    }

    /// Render all plans into `output_dir`, stopping at the first failure
    ///
    /// Returns the written file paths in processing order.
    pub async fn render(
        &self,
        source: &SourceImage,
        plans: &[RenderPlan],
        output_dir: &Path,
    ) -> IconResult<Vec<PathBuf>> {
        let ordered = Self::processing_order(plans);
        let transparent_count = ordered.iter().filter(|p| !p.filled).count();
        let mut written = Vec::with_capacity(ordered.len());

        if transparent_count > 0 {
            info!(
                "Transparent icon generation ongoing ({} variants) - please wait ...",
                transparent_count
            );
        }

        for (index, plan) in ordered.into_iter().enumerate() {
            if index == transparent_count {
                info!(
                    "Filled icon generation ongoing ({} variants) - please wait ...",
                    plans.len() - transparent_count
                );
            }

            let canvas = self.render_variant(source.pixels(), plan)?;
            let png_bytes = Self::encode_png(&canvas, &plan.output_name)?;
            let path = output_dir.join(&plan.output_name);
            fs::write(&path, &png_bytes).await.map_err(|e| {
                IconError::render(&plan.output_name, format!("Failed to save icon: {e}"))
            })?;

            debug!(
                "Rendered {} ({}x{} content at {},{} scale {:.6})",
                plan.output_name,
                plan.content_width,
                plan.content_height,
                plan.offset_left,
                plan.offset_top,
                plan.scale_factor
            );
            written.push(path);
        }

        Ok(written)
    }

    /// Produce the full canvas for one plan
    pub fn render_variant(&self, source: &RgbaImage, plan: &RenderPlan) -> IconResult<RgbaImage> {
        if plan.content_width > plan.canvas_width || plan.content_height > plan.canvas_height {
            return Err(IconError::render(
                &plan.output_name,
                format!(
                    "content {}x{} does not fit canvas {}x{}",
                    plan.content_width, plan.content_height, plan.canvas_width, plan.canvas_height
                ),
            ));
        }

        let resized = imageops::resize(
            source,
            plan.content_width,
            plan.content_height,
            self.filter.into(),
        );
        let x = i64::from(plan.offset_left);
        let y = i64::from(plan.offset_top);

        let canvas = if plan.filled {
            let mut canvas = RgbaImage::from_pixel(
                plan.canvas_width,
                plan.canvas_height,
                self.background.to_rgba(),
            );
            imageops::overlay(&mut canvas, &resized, x, y);
            canvas
        } else {
            // Straight copy keeps the source alpha untouched.
            let mut canvas = RgbaImage::new(plan.canvas_width, plan.canvas_height);
            imageops::replace(&mut canvas, &resized, x, y);
            canvas
        };

        Ok(canvas)
    }

    fn encode_png(canvas: &RgbaImage, output_name: &str) -> IconResult<Vec<u8>> {
        let mut png_bytes = Vec::new();
        canvas
            .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|e| IconError::render(output_name, format!("Failed to encode PNG: {e}")))?;
        Ok(png_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::catalog::VariantTemplate as T;
    use crate::icons::geometry::plan;
    use tempfile::TempDir;

    const RED: Rgba<u8> = Rgba([200, 20, 20, 255]);

    fn solid_source(width: u32, height: u32) -> SourceImage {
        SourceImage::from_pixels(RgbaImage::from_pixel(width, height, RED))
    }

    #[test]
    fn test_background_color_parsing() {
        assert_eq!("#ffffff".parse::<BackgroundColor>().unwrap(), BackgroundColor::WHITE);
        assert_eq!(
            "1a2B3c".parse::<BackgroundColor>().unwrap(),
            BackgroundColor::new(0x1a, 0x2b, 0x3c)
        );
        assert_eq!(
            "#f0a".parse::<BackgroundColor>().unwrap(),
            BackgroundColor::new(0xff, 0x00, 0xaa)
        );
        assert_eq!(BackgroundColor::new(0x1a, 0x2b, 0x3c).to_string(), "#1a2b3c");
        assert_eq!(BackgroundColor::new(1, 2, 3).to_rgba(), Rgba([1, 2, 3, 255]));

        for bad in ["", "#12", "#12345", "#gggggg", "#1234567", "+1+2+3"] {
            assert!(bad.parse::<BackgroundColor>().is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_processing_order_groups_transparent_before_filled() {
        let templates = [
            T::filled("ios-icon", 180, 180),
            T::transparent("favicon", 48, 48),
            T::filled("ios-icon", 29, 29),
            T::transparent("favicon", 16, 16),
        ];
        let plans = plan(512, 512, &templates);
        let names: Vec<&str> = VariantRenderer::processing_order(&plans)
            .iter()
            .map(|p| p.output_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "favicon-16x16.png",
                "favicon-48x48.png",
                "ios-icon-29x29.png",
                "ios-icon-180x180.png"
            ]
        );
    }

    #[test]
    fn test_filled_variant_paints_background_and_centers_content() {
        let renderer = VariantRenderer::new(BackgroundColor::new(0, 0, 255), ResizeFilter::Nearest);
        let source = solid_source(64, 64);
        let plans = plan(64, 64, &[T::filled("ios-launchscreen", 40, 60)]);

        let canvas = renderer.render_variant(source.pixels(), &plans[0]).unwrap();
        assert_eq!(canvas.dimensions(), (40, 60));
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*canvas.get_pixel(39, 59), Rgba([0, 0, 255, 255]));
        // 20x20 content at (10, 20)
        assert_eq!(*canvas.get_pixel(10, 20), RED);
        assert_eq!(*canvas.get_pixel(29, 39), RED);
        assert_eq!(*canvas.get_pixel(30, 40), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_transparent_variant_keeps_margins_clear() {
        let renderer = VariantRenderer::new(BackgroundColor::WHITE, ResizeFilter::Nearest);
        let source = solid_source(100, 50);
        let plans = plan(100, 50, &[T::transparent("mstile", 20, 20)]);

        let canvas = renderer.render_variant(source.pixels(), &plans[0]).unwrap();
        assert_eq!(canvas.dimensions(), (20, 20));
        assert_eq!(canvas.get_pixel(0, 0)[3], 0);
        assert_eq!(*canvas.get_pixel(0, 5), RED);
        assert_eq!(*canvas.get_pixel(19, 14), RED);
        assert_eq!(canvas.get_pixel(19, 15)[3], 0);
    }

    #[test]
    fn test_zero_sized_canvas_is_render_error() {
        let renderer = VariantRenderer::new(BackgroundColor::WHITE, ResizeFilter::Nearest);
        let source = solid_source(8, 8);
        let plans = plan(8, 8, &[T::transparent("empty", 0, 0)]);

        let err = renderer.render_variant(source.pixels(), &plans[0]).unwrap_err();
        assert!(matches!(err, IconError::Render { ref variant, .. } if variant == "empty-0x0.png"));
    }

    #[tokio::test]
    async fn test_render_writes_one_png_per_plan() {
        let temp_dir = TempDir::new().unwrap();
        let renderer = VariantRenderer::new(BackgroundColor::WHITE, ResizeFilter::Triangle);
        let source = solid_source(32, 32);
        let templates = [
            T::transparent("favicon", 16, 16),
            T::filled("apple-touch-icon", 24, 24),
            T::filled("launch", 30, 20),
        ];
        let plans = plan(32, 32, &templates);

        let written = renderer.render(&source, &plans, temp_dir.path()).await.unwrap();
        assert_eq!(written.len(), 3);

        for template in &templates {
            let path = temp_dir.path().join(template.output_name());
            let decoded = image::open(&path).unwrap();
            assert_eq!(decoded.width(), template.width);
            assert_eq!(decoded.height(), template.height);
        }
    }

    #[tokio::test]
    async fn test_render_reports_failing_variant() {
        let temp_dir = TempDir::new().unwrap();
        let missing_dir = temp_dir.path().join("does-not-exist");
        let renderer = VariantRenderer::new(BackgroundColor::WHITE, ResizeFilter::Nearest);
        let source = solid_source(8, 8);
        let plans = plan(8, 8, &[T::transparent("favicon", 16, 16)]);

        let err = renderer.render(&source, &plans, &missing_dir).await.unwrap_err();
        match err {
            IconError::Render { variant, .. } => assert_eq!(variant, "favicon-16x16.png"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
