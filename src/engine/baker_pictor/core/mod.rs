mod config;
pub use config::*;

mod scan;
pub use scan::*;

mod host;
pub use host::*;

mod batch;
pub use batch::*;
