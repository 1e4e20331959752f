pub mod app;
pub mod game_panel;
pub mod history_panel;
pub mod settings;
pub mod settings_io;
