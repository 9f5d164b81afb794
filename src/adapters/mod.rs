// Adapters layer: concrete implementations for external systems (browser, image API, file formats).

pub mod chromium;
pub mod gemini;
pub mod pdf;
pub mod pptx;
pub mod raster;
pub mod svg;

pub use pdf::PdfRenderer;
pub use pptx::PptxRenderer;
pub use raster::render_png;
