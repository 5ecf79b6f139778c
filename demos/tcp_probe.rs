//! Supervise a plain TCP connection
//!
//! The "driver" here just opens a TCP socket; the handle reports a close when
//! the peer hangs up. Point it at any listener, e.g. `nc -lk 9000`, then kill
//! and restart the listener to watch the supervisor reconnect.
//!
//! Run with: RUST_LOG=lazylink=info cargo run --example tcp_probe -- 127.0.0.1:9000

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use lazylink::{ConnectOptions, Driver, Handle, Supervisor};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{lookup_host, TcpSocket};
use tokio::sync::watch;

#[derive(Debug, Clone, thiserror::Error)]
enum ProbeError {
    #[error("io: {0}")]
    Io(Arc<std::io::Error>),
    #[error(transparent)]
    Supervisor(#[from] lazylink::Error),
}

#[derive(Clone)]
struct TcpHandle {
    peer: String,
    closed: watch::Receiver<bool>,
}

impl Handle for TcpHandle {
    fn closed(&self) -> BoxFuture<'static, ()> {
        let mut closed = self.closed.clone();
        async move {
            let _ = closed.wait_for(|c| *c).await;
        }
        .boxed()
    }
}

struct TcpDriver;

#[async_trait]
impl Driver for TcpDriver {
    type Handle = TcpHandle;
    type Error = ProbeError;

    async fn connect(
        &self,
        address: &str,
        options: &ConnectOptions,
    ) -> Result<TcpHandle, ProbeError> {
        let addr = address.trim_start_matches("tcp://");
        let io = |e: std::io::Error| ProbeError::Io(Arc::new(e));

        let target = lookup_host(addr)
            .await
            .map_err(io)?
            .next()
            .ok_or_else(|| {
                io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no address for {}", addr),
                ))
            })?;
        let socket = if target.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(io)?;
        socket.set_keepalive(options.keep_alive).map_err(io)?;

        let mut stream = socket.connect(target).await.map_err(io)?;
        stream.set_nodelay(true).map_err(io)?;

        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            // Drain until EOF or error, then report the close
            while let Ok(n) = stream.read(&mut buf).await {
                if n == 0 {
                    break;
                }
            }
            let _ = tx.send(true);
        });

        Ok(TcpHandle {
            peer: addr.to_string(),
            closed: rx,
        })
    }
}

#[tokio::main]
async fn main() {
    lazylink::logging::init();

    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:9000".to_string());

    let supervisor = Supervisor::new(TcpDriver);
    let options = ConnectOptions::builder()
        .connect_timeout(Duration::from_secs(2))
        .build();
    supervisor.setup(format!("tcp://{}", address), Some(options), true);

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    for _ in 0..30 {
        ticker.tick().await;
        match supervisor.with_connection().await {
            Ok(handle) => println!("using connection to {}", handle.peer),
            Err(e) => println!("no connection: {}", e),
        }
    }
}
