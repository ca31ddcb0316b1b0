mod health_check;
pub mod servers;

pub use health_check::*;
