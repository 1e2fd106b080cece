pub mod lifecycle;
pub mod slots;

pub use lifecycle::{SlotAction, SlotLifecycleService};
pub use slots::SlotStore;
