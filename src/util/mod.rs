// Utilities around the RSA core

pub mod file_ops;
