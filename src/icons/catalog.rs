//! Static catalog of icon and launch-screen variants

/// One named output size and compositing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantTemplate {
    pub base_name: &'static str,
    pub width: u32,
    pub height: u32,
    /// Composite onto an opaque background instead of a transparent canvas
    pub filled: bool,
}

impl VariantTemplate {
    pub const fn transparent(base_name: &'static str, width: u32, height: u32) -> Self {
        Self {
            base_name,
            width,
            height,
            filled: false,
        }
    }

    pub const fn filled(base_name: &'static str, width: u32, height: u32) -> Self {
        Self {
            base_name,
            width,
            height,
            filled: true,
        }
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Same template with width and height swapped
    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
            ..*self
        }
    }

    /// `<base_name>-<width>x<height>.png`
    pub fn output_name(&self) -> String {
        format!("{}-{}x{}.png", self.base_name, self.width, self.height)
    }
}

use VariantTemplate as T;

/// Store icons, favicons, touch icons, launch screens and density buckets
pub const CATALOG: &[VariantTemplate] = &[
    T::filled("app-store-icon", 1024, 1024),
    T::transparent("play-store-icon", 512, 512),
    T::filled("apple-touch-icon", 180, 180),
    T::transparent("favicon", 16, 16),
    T::transparent("favicon", 32, 32),
    T::transparent("favicon", 48, 48),
    T::transparent("android-chrome", 192, 192),
    T::transparent("android-chrome", 512, 512),
    T::transparent("mstile", 150, 150),
    T::filled("ios-icon", 180, 180),
    T::filled("ios-icon", 167, 167),
    T::filled("ios-icon", 152, 152),
    T::filled("ios-icon", 144, 144),
    T::filled("ios-icon", 120, 120),
    T::filled("ios-icon", 114, 114),
    T::filled("ios-icon", 100, 100),
    T::filled("ios-icon", 87, 87),
    T::filled("ios-icon", 76, 76),
    T::filled("ios-icon", 72, 72),
    T::filled("ios-icon", 80, 80),
    T::filled("ios-icon", 58, 58),
    T::filled("ios-icon", 57, 57),
    T::filled("ios-icon", 50, 50),
    T::filled("ios-icon", 40, 40),
    T::filled("ios-icon", 29, 29),
    T::filled("ios-launchscreen", 2048, 2732),
    T::filled("ios-launchscreen", 1536, 2048),
    T::filled("ios-launchscreen", 1436, 2048),
    T::filled("ios-launchscreen", 1242, 2208),
    T::filled("ios-launchscreen", 1080, 1920),
    T::filled("ios-launchscreen", 768, 1024),
    T::filled("ios-launchscreen", 750, 1334),
    T::filled("ios-launchscreen", 640, 1136),
    T::filled("ios-launchscreen", 640, 960),
    T::filled("ios-launchscreen", 320, 480),
    T::transparent("android-icon-ldpi", 36, 36),
    T::transparent("android-icon-mdpi", 48, 48),
    T::transparent("android-icon-hdpi", 72, 72),
    T::transparent("android-icon-xhdpi", 96, 96),
    T::transparent("android-icon-xxhdpi", 144, 144),
    T::transparent("android-icon-xxxhdpi", 192, 192),
    T::filled("android-launchscreen-xhdpi", 720, 1280),
    T::filled("android-launchscreen-hdpi", 480, 800),
    T::filled("android-launchscreen-mdpi", 320, 480),
    T::filled("android-launchscreen-ldpi", 200, 320),
];

/// Expand the built-in catalog
pub fn expand() -> Vec<VariantTemplate> {
    expand_from(CATALOG)
}

/// Expand a template list with rotated companions for non-square entries
///
/// Listed entries keep their relative order and come first; companions
/// follow in the order of the entries they were derived from.
pub fn expand_from(templates: &[VariantTemplate]) -> Vec<VariantTemplate> {
    let mut expanded = templates.to_vec();
    expanded.extend(
        templates
            .iter()
            .filter(|template| !template.is_square())
            .map(VariantTemplate::rotated),
    );
    expanded
}
