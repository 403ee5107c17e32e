// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod bing_client;
pub mod downloader;
pub mod http_client;
pub mod ingest_service;
pub mod nasa_client;
pub mod pexels_client;
pub mod photo_feed;
pub mod pipeline;
pub mod translator;
pub mod unsplash_client;

pub use bing_client::*;
pub use downloader::*;
pub use http_client::*;
pub use ingest_service::*;
pub use nasa_client::*;
pub use pexels_client::*;
pub use photo_feed::*;
pub use pipeline::*;
pub use translator::*;
pub use unsplash_client::*;
