pub mod app;
mod nav_bar;
mod region_list;
mod settings_panel;
