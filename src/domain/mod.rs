// Domain layer: form/plan models and ports (interfaces). No I/O here.

pub mod model;
pub mod ports;
