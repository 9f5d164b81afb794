// Domain layer: render-neutral models, selector types and ports (interfaces).

pub mod deck;
pub mod figure;
pub mod model;
pub mod ports;
pub mod selector;
