pub mod model;
pub mod navigator;
pub mod readiness;
