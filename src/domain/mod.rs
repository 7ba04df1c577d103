// Domain layer: core models, input parsing and ports (interfaces). No I/O.

pub mod input;
pub mod model;
pub mod ports;
