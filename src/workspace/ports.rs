//! Free-port probing
//!
//! Binding port 0 lets the OS pick a free ephemeral port; the listener is
//! dropped immediately and only the number is kept.

use crate::errors::Result;
use std::net::TcpListener;

/// Probe the OS for a free ephemeral port
pub fn free_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}
