//! Scheduled scripted activities driven by the simulation clock.

mod params;
mod rng;
mod scheduler;

pub use params::{ParamMap, ParamSource};
pub use rng::EventRng;
pub use scheduler::{EvalError, Event, EventConfigError, Simulation};
