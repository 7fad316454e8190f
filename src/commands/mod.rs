pub mod browse;
pub mod companies;
pub mod config;
pub mod items;
pub mod month;
