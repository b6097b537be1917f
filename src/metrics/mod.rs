pub mod battery;
pub mod collector;
pub mod derive;
pub mod sample;
pub mod snapshot;
