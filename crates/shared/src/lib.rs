pub mod abstract_trait;
pub mod config;
pub mod domain;
pub mod model;
pub mod service;
pub mod utils;
