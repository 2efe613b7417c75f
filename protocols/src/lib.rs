//! Text formats spoken by the scanner.
//!
//! * [`transcript`]: reading a handshake transcript into an outcome.
//! * [`s_client`]: the command line of the `openssl s_client` probe.
//! * [`summary`]: rows of the summary CSV.
//! * [`debug_log`]: blocks of the debug log.

pub mod debug_log;
pub mod s_client;
pub mod summary;
pub mod transcript;
