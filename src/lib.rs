pub mod analytics;
pub mod db;
pub mod posts;
pub mod schema;
pub mod seed;
pub mod settings;
pub mod utils;
