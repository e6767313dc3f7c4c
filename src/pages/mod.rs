pub mod dialogs;
pub mod settings;
pub mod tasks;
