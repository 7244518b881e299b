pub mod app;
pub mod activity_card;
pub mod mode_panel;
pub mod settings;
pub mod settings_io;
