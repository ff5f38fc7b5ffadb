pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{load_site_graph, open_sink, parse_start_time};
