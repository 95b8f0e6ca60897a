pub mod help;
pub mod ping;
pub mod set_default_channel;

pub use help::register_help_command;
pub use help::run_help_command;
pub use ping::register_ping_command;
pub use ping::run_ping_command;
pub use set_default_channel::register_set_default_channel_command;
pub use set_default_channel::run_set_default_channel;
