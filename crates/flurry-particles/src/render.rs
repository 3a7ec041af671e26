//! The drawing capability particles render through

use flurry_core::Rect;

/// Primitive drawn for a particle with no image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Circle,
    Square,
}

/// Opaque reference to an image the renderer knows how to resolve
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub String);

impl ImageHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// A drawing surface.
///
/// The engine clears the surface once per frame and particles draw into
/// their size-scaled bounding box.
pub trait Renderer {
    /// Surface extent in pixels
    fn size(&self) -> (f64, f64);

    /// Clear a rectangular region
    fn clear(&mut self, area: Rect);

    /// Draw a filled primitive inside `bounds`
    fn fill_shape(&mut self, shape: Shape, bounds: Rect);

    /// Draw `image` scaled into `bounds`
    fn draw_image(&mut self, image: &ImageHandle, bounds: Rect);

    fn clear_all(&mut self) {
        let (width, height) = self.size();
        self.clear(Rect::new(0.0, 0.0, width, height));
    }
}

/// One recorded call on a `RecordingRenderer`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Rect),
    Shape { shape: Shape, bounds: Rect },
    Image { image: ImageHandle, bounds: Rect },
}

impl DrawCall {
    /// Bounds of a shape or image draw; `None` for clears
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            DrawCall::Clear(_) => None,
            DrawCall::Shape { bounds, .. } | DrawCall::Image { bounds, .. } => Some(*bounds),
        }
    }
}

/// Surface that records every call in order instead of drawing
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    width: f64,
    height: f64,
    calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of shape and image draws, ignoring clears
    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| !matches!(c, DrawCall::Clear(_)))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self, area: Rect) {
        self.calls.push(DrawCall::Clear(area));
    }

    fn fill_shape(&mut self, shape: Shape, bounds: Rect) {
        self.calls.push(DrawCall::Shape { shape, bounds });
    }

    fn draw_image(&mut self, image: &ImageHandle, bounds: Rect) {
        self.calls.push(DrawCall::Image {
            image: image.clone(),
            bounds,
        });
    }
}
