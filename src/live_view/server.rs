use crate::configuration::LiveViewConfig;
use crate::live_view::JsonLineCodec;
use crate::live_view::ViewerSlot;
use crate::FixReceiver;

use futures_util::SinkExt;

use std::io;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use tokio_util::codec::FramedWrite;

use tracing::error;
use tracing::info;

/// Accepts live-view connections and wires each one into the viewer
/// slot.
///
/// Only the most recently accepted connection receives fixes; an
/// earlier connection's channel is dropped on replacement and its
/// writer task ends.
pub struct Server {
    port: u16,
    viewers: ViewerSlot,
}

impl Server {
    pub fn new(config: &LiveViewConfig, viewers: ViewerSlot) -> Self {
        Server {
            port: config.port,
            viewers,
        }
    }

    pub async fn run(self) -> Result<(), io::Error> {
        let listener = TcpListener::bind(("0.0.0.0", self.port)).await?;

        info!("live view listening on port {}", self.port);

        loop {
            let (stream, addr) = listener.accept().await?;

            info!("live viewer connected from {}", addr);

            let (tx, rx) = mpsc::channel(5);

            self.viewers.register(tx);

            start_viewer_tx(stream, addr, rx);
        }
    }
}

fn start_viewer_tx(stream: TcpStream, addr: SocketAddr, rx: FixReceiver) {
    tokio::spawn(async move {
        viewer_tx(stream, addr, rx).await;
    });
}

async fn viewer_tx(stream: TcpStream, addr: SocketAddr, mut rx: FixReceiver) {
    let mut tx = FramedWrite::new(stream, JsonLineCodec::new());

    while let Some(fix) = rx.recv().await {
        match tx.send(fix).await {
            Ok(()) => (),
            Err(e) => {
                error!("error pushing fix to viewer {}: {:?}", addr, e);
                break;
            }
        }
    }

    info!("live viewer {} disconnected", addr);
}
