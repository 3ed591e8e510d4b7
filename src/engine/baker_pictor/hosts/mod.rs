mod software_host;
pub use software_host::*;
