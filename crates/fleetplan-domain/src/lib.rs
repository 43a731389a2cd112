//! Domain layer: route/line models, fleet sizing and table transforms

pub mod model;
pub mod service;

pub use model::*;
