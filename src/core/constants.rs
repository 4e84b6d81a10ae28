//! Constants for model allow-lists, URL segments and response messages
//!
//! This module defines the fixed strings shared by the service and the HTTP
//! layer.

/// Allowed model identifiers per request kind
pub mod models {
    /// Chat completion models
    pub const CHAT: &[&str] = &["gpt", "llama", "bard"];

    /// Image generation models
    pub const IMAGE: &[&str] = &["art", "photography", "3d"];
}

/// Upstream URL template values
pub mod upstream {
    /// Default upstream base URL template
    pub const DEFAULT_BASE_API: &str = "https://api.biswax.dev/{}";

    /// Placeholder replaced by the request segment
    pub const PLACEHOLDER: &str = "{}";

    /// Segment for chat requests
    pub const CHAT_SEGMENT: &str = "chat";

    /// Segment for image requests
    pub const IMAGE_SEGMENT: &str = "image";
}

/// Error messages returned to clients
pub mod message {
    /// Missing prompt or unknown model
    pub const INVALID_INPUT: &str = "Invalid input";

    /// Upstream could not be reached
    pub const UPSTREAM_FAILED: &str = "An error occurred";

    /// Body could not be decoded as JSON
    pub const INVALID_JSON: &str = "Invalid JSON response";

    /// Payload was neither text nor an object
    pub const INVALID_FORMAT: &str = "Invalid response format";
}
