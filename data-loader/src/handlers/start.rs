use command_dispatch::{handler_fn, Command};
use loader_core::CommandOutput;

pub const START_MSG: &str = "Hello, I am a bot for uploading reports for the reporting period.";

pub fn start_command() -> Command {
    Command::new(
        "start",
        "getting to know the bot",
        handler_fn(|_args| async { Ok(CommandOutput::Text(START_MSG.to_string())) }),
    )
}
