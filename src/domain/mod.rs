//! Domain types for the catalog mirror.
//!
//! These types describe the remote catalog as its JSON endpoints present it.

pub mod remote_url;
pub mod work;

pub use remote_url::RemoteUrl;
pub use work::{Format, Tag, WorkDetail, WorkSummary};
