// Domain layer: lifecycle models and the ports the supervisor is generic over.

pub mod model;
pub mod ports;
