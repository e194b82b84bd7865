pub mod client;
pub use client::{ApiClient, ApiResponse, RequestBody};
pub mod multipart;
pub use multipart::{FormValue, ImageAsset, MultipartSubmitter};
