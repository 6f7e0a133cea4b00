mod press;
mod serve;

pub use press::press_command;
pub use serve::serve_command;
