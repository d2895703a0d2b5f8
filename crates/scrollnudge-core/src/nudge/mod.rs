mod messages;
mod scheduler;
mod timer_slot;

pub use messages::MessagePool;
pub use scheduler::{NudgePhase, NudgeScheduler, NudgeState};
pub use timer_slot::{PendingTimer, TimerId, TimerKind, TimerSlot};
