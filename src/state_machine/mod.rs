//! # Task State Management
//!
//! Status states, the fixed stage sequence, transition events, and the pure
//! state machine that validates every mutation of the persisted task record.

pub mod events;
pub mod machine;
pub mod stages;
pub mod states;

pub use events::TaskEvent;
pub use machine::TaskStateMachine;
pub use stages::PipelineStage;
pub use states::TaskStatus;
