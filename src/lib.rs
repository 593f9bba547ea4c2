// Library for tests to access modules

pub mod accountant;
pub mod collector;
pub mod config;
pub mod docker_repo;
pub mod labels;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod snapshot_store;
pub mod version;
pub mod worker;
