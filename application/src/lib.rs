mod rule;
pub mod service;
pub mod transfer;
