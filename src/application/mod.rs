pub mod background;
pub mod bootstrap;
pub mod commands;
pub mod reminders;
