pub mod action;
pub mod app;
pub mod client;
pub mod config;
pub mod controller;
pub mod domain;
pub mod event;
pub mod feedback;
pub mod input;
pub mod kinds;
pub mod theme;
pub mod tui;
pub mod widgets;
pub mod worker;
