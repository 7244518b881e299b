pub mod activity;
pub mod static_pool;
pub mod session;
pub mod notice;
pub mod llm_decode;
