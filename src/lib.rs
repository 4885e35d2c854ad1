pub mod command;
pub mod config;
pub mod constants;
pub mod cost;
pub mod error;
pub mod location;
pub mod planner;
pub mod queue;
pub mod race;
pub mod snapshot;
pub mod tracker;
pub mod unit_type;

pub use command::*;
pub use config::*;
pub use cost::*;
pub use error::*;
pub use location::*;
pub use planner::*;
pub use race::*;
pub use snapshot::*;
pub use unit_type::*;
