pub mod search_api_service;
