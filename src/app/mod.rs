// Application layer: product content, layout helpers and the jobs that emit them.

pub mod jobs;
pub mod layout;
pub mod products;
