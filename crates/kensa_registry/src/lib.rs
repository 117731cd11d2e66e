//! kensa package registry and checksum fetching.

pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod installed;

pub use error::{FetchError, RegistryError};
pub use fetcher::{ChecksumFetcher, ChecksumFetcherBuilder};
pub use http_client::HttpClient;
pub use installed::{PluginDirectory, PluginHeaders};
