//! Drive motor drivers

pub mod hbridge;

pub use hbridge::{DifferentialDrive, DrivePins};
