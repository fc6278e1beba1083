pub mod api;
pub mod errors;
pub mod helpers;
pub mod storage;
