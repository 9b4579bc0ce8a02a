//! Helpers for driving TLS interoperability tests against a generated provider.

pub mod artifacts;
pub mod process;

pub use artifacts::{ArtifactSet, client_args, server_args, split_groups};
pub use process::{
    HANDSHAKE_MARKER, SERVER_START_ATTEMPTS, SERVER_START_BACKOFF, handshake_succeeded,
    port_accepts, run_subprocess, wait_for_server,
};
