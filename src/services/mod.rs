pub mod pagination;
pub mod query;
pub mod short_code;
