pub mod appointment;
pub mod enums;

pub use appointment::{Appointment, Hospital};
pub use enums::Severity;
