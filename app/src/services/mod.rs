// src/services/mod.rs

//! Clients for the collaborators the backend does not own: the media host and the
//! authentication provider's session records.

pub mod session;
pub mod upload;

pub use session::{SessionProvider, StoreSessions};
pub use upload::{CloudinaryUploader, DisabledUploader, ImageFile, UploadError, UploadOptions, Uploader};
