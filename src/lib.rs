pub mod color;
pub mod components;
pub mod controls;
pub mod favicon;
pub mod gesture;
pub mod hashnav;
pub mod model;
pub mod panels;
pub mod tags;
pub mod util;
