pub mod cache_control;
pub mod request_log;
pub mod security_headers;
