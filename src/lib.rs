//! # urban-transit
//!
//! Multimodal urban transportation network modeling: road graph
//! construction from raw tables, time-of-day shortest paths, emergency
//! nearest-facility search, minimum-spanning-tree network reduction,
//! transfer-point analysis, DP fleet allocation, and multimodal transit
//! routing with fares.
//!
//! The crate is a pure in-process library: every entry point takes
//! already-parsed tables and returns plain result objects. File I/O,
//! rendering, and user interaction belong to the calling layer.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (locations, road and transit records, demand, itineraries)
//! - [`network`] — Road graph construction and the travel-time model
//! - [`pathfind`] — Dijkstra, A* nearest-facility search, Prim MST
//! - [`transit`] — Multimodal graph, transfer scoring, timetables, route finding
//! - [`allocation`] — Demand-weighted DP fleet allocation
//! - [`error`] — Error taxonomy of the fallible entry points

pub mod allocation;
pub mod error;
pub mod models;
pub mod network;
pub mod pathfind;
pub mod transit;
