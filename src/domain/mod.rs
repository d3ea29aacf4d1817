// Domain layer: enrollment models and ports (interfaces). No I/O in here.

pub mod model;
pub mod ports;
