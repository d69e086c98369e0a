mod about;
mod event;
mod execute;
mod log;
mod response;

pub use about::About;
pub use event::Event;
pub use execute::{ActionRequest, ConnectionDescriptor, ExecuteRequest};
pub use log::{LogEntry, LogLevel};
pub use response::{ExecutionResult, ResponseBody, ResponseEnvelope};
