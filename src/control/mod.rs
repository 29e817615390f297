pub mod config;
pub mod config_builder;
pub mod environment;
pub mod motor_catalog;
