pub mod default_config;
pub mod search_api_config;
