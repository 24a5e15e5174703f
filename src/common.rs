pub mod error;
pub mod ids;
pub mod money;
pub mod response;
