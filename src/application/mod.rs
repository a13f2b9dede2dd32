//! Application layer: orchestration of domain values and infrastructure capabilities

pub mod use_cases;
