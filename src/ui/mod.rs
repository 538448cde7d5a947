// src/ui/mod.rs
pub mod analysis;
pub mod chart_panel;
pub mod charts;
pub mod detail;
pub mod fonts;
pub mod history;
pub mod home;
pub mod ranking;
pub mod settings;
pub mod sidebar;
