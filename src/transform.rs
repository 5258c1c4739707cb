//! World-to-screen transforms: composable affines and the pan/zoom view.

use crate::layout::Bounds;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TransformError {
    #[error("Viewport has no measurable size yet ({width}x{height})")]
    DegenerateViewport { width: f64, height: f64 },
    #[error("Nothing to fit: content has zero extent")]
    EmptyContent,
}

/// Uniform scale followed by translation: `p' = p * scale + (tx, ty)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub scale: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        scale: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self { scale: 1.0, tx, ty }
    }

    pub fn scale(scale: f64) -> Self {
        Self {
            scale,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Apply `self` first, then `next`.
    pub fn then(self, next: Affine) -> Affine {
        Affine {
            scale: self.scale * next.scale,
            tx: self.tx * next.scale + next.tx,
            ty: self.ty * next.scale + next.ty,
        }
    }

    pub fn apply(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x * self.scale + self.tx, y * self.scale + self.ty)
    }

    pub fn inverse(&self) -> Affine {
        let inv = 1.0 / self.scale;
        Affine {
            scale: inv,
            tx: -self.tx * inv,
            ty: -self.ty * inv,
        }
    }

    /// Compose an ordered chain, first element applied first.
    pub fn chain(steps: &[Affine]) -> Affine {
        steps.iter().fold(Affine::IDENTITY, |acc, &step| acc.then(step))
    }

    pub fn to_svg(&self) -> String {
        if self.scale == 1.0 {
            format!("translate({}, {})", self.tx, self.ty)
        } else {
            format!("matrix({} 0 0 {} {} {})", self.scale, self.scale, self.tx, self.ty)
        }
    }
}

/// Zoom limits and steps.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Fit never zooms in past this just to fill empty space.
    pub fit_max_scale: f64,
    /// Factor for one zoom-out step (wheel down).
    pub zoom_out_factor: f64,
    /// Factor for one zoom-in step (wheel up).
    pub zoom_in_factor: f64,
    /// World-space margin `Diagram::fit_to_view` adds around content.
    pub fit_padding: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            max_scale: 3.0,
            fit_max_scale: 1.2,
            zoom_out_factor: 0.9,
            zoom_in_factor: 1.1,
            fit_padding: 20.0,
        }
    }
}

/// Pan/zoom map from world space to screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    config: ViewConfig,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl ViewTransform {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn affine(&self) -> Affine {
        Affine {
            scale: self.scale,
            tx: self.translate_x,
            ty: self.translate_y,
        }
    }

    pub fn to_world(&self, screen: (f64, f64)) -> (f64, f64) {
        self.affine().inverse().apply(screen)
    }

    pub fn to_screen(&self, world: (f64, f64)) -> (f64, f64) {
        self.affine().apply(world)
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.config.min_scale, self.config.max_scale)
    }

    /// Rescale by `factor` keeping the world point under the screen point fixed.
    pub fn zoom_by(&mut self, screen_x: f64, screen_y: f64, factor: f64) {
        let new_scale = self.clamp_scale(self.scale * factor);
        let ratio = new_scale / self.scale;
        self.translate_x = screen_x - (screen_x - self.translate_x) * ratio;
        self.translate_y = screen_y - (screen_y - self.translate_y) * ratio;
        self.scale = new_scale;
    }

    /// Wheel zoom: `direction > 0` (wheel down) zooms out.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, direction: f64) {
        let factor = if direction > 0.0 {
            self.config.zoom_out_factor
        } else {
            self.config.zoom_in_factor
        };
        self.zoom_by(screen_x, screen_y, factor);
    }

    /// Unbounded pan.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    pub fn set_translate(&mut self, x: f64, y: f64) {
        self.translate_x = x;
        self.translate_y = y;
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.translate_x = 0.0;
        self.translate_y = 0.0;
    }

    /// Scale and centre `content` in a viewport:
    /// `scale = min(vw / cw, vh / ch, fit_max_scale)`. Callers that want a
    /// margin pad `content` first. Leaves the transform untouched on error.
    pub fn fit_to_content(
        &mut self,
        viewport_width: f64,
        viewport_height: f64,
        content: Bounds,
    ) -> Result<(), TransformError> {
        if !(viewport_width > 0.0 && viewport_height > 0.0) {
            return Err(TransformError::DegenerateViewport {
                width: viewport_width,
                height: viewport_height,
            });
        }
        let (content_width, content_height) = (content.width(), content.height());
        if !(content_width > 0.0 && content_height > 0.0) {
            return Err(TransformError::EmptyContent);
        }

        let scale = (viewport_width / content_width)
            .min(viewport_height / content_height)
            .min(self.config.fit_max_scale);
        let scale = self.clamp_scale(scale);

        self.scale = scale;
        self.translate_x = (viewport_width - content_width * scale) / 2.0 - content.min_x * scale;
        self.translate_y = (viewport_height - content_height * scale) / 2.0 - content.min_y * scale;
        Ok(())
    }

    /// Current zoom as a rounded percentage.
    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }
}
