// src/services/mod.rs
pub mod plan_client;
pub mod plan_workflow;
pub mod report;
pub mod seed;
