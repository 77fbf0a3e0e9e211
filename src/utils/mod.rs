pub mod logging;
pub mod paths;

pub use logging::init_logging;
pub use paths::{collect_log_files, output_path};
