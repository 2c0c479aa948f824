#[allow(dead_code)]
pub mod spy_store;
