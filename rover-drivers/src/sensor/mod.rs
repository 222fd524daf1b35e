//! Range sensor drivers

pub mod ultrasonic;

pub use ultrasonic::UltrasonicSensor;
