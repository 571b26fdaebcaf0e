pub mod config;
pub mod rsa;
pub mod util;
