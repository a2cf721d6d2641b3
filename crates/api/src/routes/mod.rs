pub mod bookings;
pub mod notifications;
pub mod schedule;
pub mod slots;
pub mod telemetry;
