//! FTP session and the transports it runs on.

pub mod ftp;
pub mod suppa;
pub mod transport;

#[cfg(test)]
pub(crate) mod memory;

pub use ftp::*;
pub use suppa::*;
pub use transport::*;
