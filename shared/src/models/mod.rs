//! Domain models

pub mod availability;
pub mod schedule;
pub mod vendor;

// Re-exports
pub use availability::{AvailabilityOverride, AvailabilityStatus, AvailabilityUpsert};
pub use schedule::{Schedule, ScheduleCreate, ScheduleUpdate, ScheduleWithDistance};
pub use vendor::{Vendor, VendorCreate};
