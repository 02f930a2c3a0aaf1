//! Datagram listeners - shared UDP socket, one receive loop per task
//!
//! The worker pool is a set of tasks looping on `recv_from` over one bound
//! socket. Each datagram is decoded as text verbatim (invalid UTF-8 is
//! tolerated, not rejected), forwarded to the coordinator fire-and-forget,
//! and matched against the alert rules synchronously. Neither path blocks
//! the receive loop.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

use crate::alerts::AlertMatcher;

use super::coordinator::CoordinatorHandle;

/// Largest UDP payload we accept; longer datagrams are truncated by the OS
const MAX_DATAGRAM_SIZE: usize = 64 * 1024;

/// Bind the shared UDP socket
///
/// A failed bind (port in use, permission denied) is startup-fatal and never
/// retried.
pub async fn bind_socket(address: IpAddr, port: u16) -> anyhow::Result<UdpSocket> {
    let addr = SocketAddr::new(address, port);
    let socket = UdpSocket::bind(addr)
        .await
        .with_context(|| format!("failed to bind UDP socket on {addr}"))?;

    debug!("UDP server listening on {addr}");
    Ok(socket)
}

/// Spawn `count` listener tasks sharing `socket`
pub fn spawn_listeners(
    socket: Arc<UdpSocket>,
    count: usize,
    coordinator: CoordinatorHandle,
    matcher: Arc<AlertMatcher>,
) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|id| {
            let socket = Arc::clone(&socket);
            let coordinator = coordinator.clone();
            let matcher = Arc::clone(&matcher);

            tokio::spawn(async move {
                debug!("listener {id} started");
                listen(socket, coordinator, matcher).await;
            })
        })
        .collect()
}

/// Log when a listener task exits
///
/// The receive loops are not expected to end; a completed or panicked task
/// means part of the worker pool is gone and the operator should know.
pub fn watch(handles: Vec<JoinHandle<()>>) {
    for (id, handle) in handles.into_iter().enumerate() {
        tokio::spawn(async move {
            match handle.await {
                Ok(()) => error!("listener {id} stopped unexpectedly"),
                Err(e) => error!("listener {id} died: {e}"),
            }
        });
    }
}

async fn listen(socket: Arc<UdpSocket>, coordinator: CoordinatorHandle, matcher: Arc<AlertMatcher>) {
    let mut buf = [0u8; MAX_DATAGRAM_SIZE];

    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, remote)) => {
                trace!("received {len} byte datagram from {remote}");
                let line = String::from_utf8_lossy(&buf[..len]).into_owned();

                coordinator.forward(line.clone());
                matcher.evaluate(&line);
            }
            Err(e) => {
                // transient receive errors are not fatal, keep listening
                error!("error receiving datagram: {e}");
            }
        }
    }
}
