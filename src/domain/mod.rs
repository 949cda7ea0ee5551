// Domain layer: cart models and ports. Nothing here knows about HTTP or files.

pub mod model;
pub mod ports;
