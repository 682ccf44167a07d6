//! XML-Import für OSM-Extrakte.
//!
//! Liest Nodes und befahrbare Ways und zerlegt sie in ein Straßennetz.

pub mod osm;

pub use osm::parse_osm_network;
