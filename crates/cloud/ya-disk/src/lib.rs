//! # ya-disk
//!
//! Pushes byte buffers and chunked streams to Yandex Disk.
//!
//! - [`backend`] – [`RemoteStorage`] trait: the storage operations the pipeline needs
//! - [`client`] – [`YaDiskClient`], the REST implementation (reqwest)
//! - [`name`] – collision-free remote names (`report(1).xlsx`, `report(2).xlsx`, …)
//! - [`gate`] – [`TokenGate`], token check before every privileged call
//! - [`pipeline`] – [`UploadPipeline`], bounded rename-and-retry on path conflicts
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bytes::Bytes;
//! use ya_disk::{UploadPipeline, UploadSource, YaDiskClient, YaDiskConfig};
//!
//! async fn example() -> Result<(), loader_core::StorageError> {
//!     let config = YaDiskConfig::new("oauth-token");
//!     let client = Arc::new(YaDiskClient::new(&config.api_url, &config.token)?);
//!     let pipeline = UploadPipeline::new(client, &config);
//!     pipeline.connect().await?;
//!     let path = pipeline
//!         .upload(&UploadSource::Buffer(Bytes::from_static(b"...")), "report.xlsx")
//!         .await?;
//!     println!("stored at {path}");
//!     pipeline.disconnect().await;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod client;
pub mod config;
pub mod gate;
pub mod name;
pub mod pipeline;

pub use backend::RemoteStorage;
pub use client::YaDiskClient;
pub use config::YaDiskConfig;
pub use gate::TokenGate;
pub use name::{remote_path, resolve, UploadTarget};
pub use pipeline::{UploadPipeline, UploadSource};
