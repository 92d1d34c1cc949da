pub mod config;
pub mod events;
pub mod gui;
pub mod ruler;
pub mod sys;
