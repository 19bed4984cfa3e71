pub mod encryption;
pub mod utilities;
