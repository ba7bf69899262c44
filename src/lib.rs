pub mod app;
pub mod config;
pub mod form_controller;
pub mod form_data;
pub mod logger;
pub mod modal;
pub mod model;
pub mod post_store;
pub mod server;
pub mod storage;
pub mod util;
pub mod view;
mod test_data;
mod text_utils;
