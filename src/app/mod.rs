// Application layer: use cases orchestrating the core pipeline behind ports

pub mod extract_use_case;
pub mod ports;
