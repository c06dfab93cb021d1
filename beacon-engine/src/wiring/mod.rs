//! Instrumentation wiring: turns host interaction signals and elapsed
//! time into tracked events. Milestones and checkpoints fire at most
//! once per page load.

pub mod milestones;
pub mod runner;
pub mod signal;

pub use milestones::{HoverTimer, SCROLL_MILESTONES, ScrollDepth, TIME_CHECKPOINTS, TimeOnPage};
pub use runner::Instrumentation;
pub use signal::PageSignal;
