mod ui_command;

pub use ui_command::UiCommand;
