pub mod normalizer;
pub mod symbol_service;
