pub mod engine;
pub mod extraction;
pub mod generation;
pub mod profile;
pub mod prompt;
pub mod selectors;
pub mod session;

pub use crate::domain::ports::{BrowserPage, ImageGenerator, Job, PendingFile, Storage};
pub use crate::utils::error::Result;
