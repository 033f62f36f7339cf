//! Validated value types shared across the workspace.

mod endpoint_url;
mod target;

pub use endpoint_url::EndpointUrl;
pub use target::RequestTarget;
