pub mod buckets;
pub mod config;
pub mod controller;
pub mod fetch;
pub mod lanes;
pub mod markers;
pub mod output;
pub mod stations;
pub mod time;
pub mod traffic;
pub mod trips;
