use crate::command;
use crate::config::Config;
use crate::connection::ClientState;
use crate::resp::Request;
use crate::store::SharedStore;
use bytes::BytesMut;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};

pub async fn run_server(store: SharedStore, config: Config) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.bind, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Sable server listening on {addr}");

    // Spawn active expiration background task
    let store_clone = store.clone();
    let hz = config.hz;
    tokio::spawn(async move {
        active_expiration_loop(store_clone, hz).await;
    });

    // Accept loop with graceful shutdown on ctrl-c
    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = result?;
                debug!("New connection from {peer_addr}");

                let store = store.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, store).await {
                        debug!("Connection error from {peer_addr}: {e}");
                    }
                    debug!("Connection closed: {peer_addr}");
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                return Ok(());
            }
        }
    }
}

async fn handle_connection(mut stream: TcpStream, store: SharedStore) -> std::io::Result<()> {
    let client = ClientState::new();
    let mut buf = BytesMut::with_capacity(4096);

    loop {
        // Drain every complete request already buffered before reading again,
        // so pipelined frames are answered in order.
        loop {
            match Request::parse(&mut buf) {
                Ok(Some(request)) => {
                    let reply = command::dispatch(&request, &store).await;
                    stream.write_all(&reply.serialize()).await?;
                }
                Ok(None) => break,
                Err(e) => {
                    // Framing is broken; nothing further from this client can
                    // be trusted. Close without replying.
                    debug!("client {}: protocol error: {e}", client.id);
                    return Ok(());
                }
            }
        }

        match stream.read_buf(&mut buf).await {
            Ok(0) => {
                if !buf.is_empty() {
                    debug!(
                        "client {}: disconnected mid-frame ({} bytes unparsed)",
                        client.id,
                        buf.len()
                    );
                }
                return Ok(());
            }
            Ok(_) => {}
            Err(e) => return Err(e),
        }
    }
}

/// Background task that periodically reaps expired keys.
async fn active_expiration_loop(store: SharedStore, hz: u64) {
    let interval = Duration::from_millis(1000 / hz.max(1));
    loop {
        tokio::time::sleep(interval).await;
        store.write().await.active_expire(20);
    }
}
