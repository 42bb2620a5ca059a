mod command;
mod config;
mod error;
mod invoke;
mod pipeline;
mod report;
mod stage;
mod walk;

pub use command::*;
pub use config::*;
pub use error::*;
pub use invoke::*;
pub use pipeline::*;
pub use report::*;
pub use stage::*;
pub use walk::*;
