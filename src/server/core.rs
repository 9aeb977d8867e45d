use log::{error, info, warn};
use std::collections::HashSet;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::protocol::responses::{SERVICE_UNAVAILABLE, format_response};
use crate::provider::DocumentProvider;
use crate::server::session::handle_session;

pub type ClientRegistry = Arc<Mutex<HashSet<SocketAddr>>>;

pub struct Server {
    client_registry: ClientRegistry,
    listener: TcpListener,
    provider: Arc<DocumentProvider>,
    config: Arc<ServerConfig>,
}

impl Server {
    pub async fn bind(config: ServerConfig, provider: DocumentProvider) -> io::Result<Self> {
        let socket = config.socket_addr();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e);
            }
        };

        Ok(Self {
            client_registry: Arc::new(Mutex::new(HashSet::new())),
            listener,
            provider: Arc::new(provider),
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(&self) {
        info!(
            "Serving documents on {} (max {} clients)",
            self.config.socket_addr(),
            self.config.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let client_registry = Arc::clone(&self.client_registry);
                    let provider = Arc::clone(&self.provider);
                    let config = Arc::clone(&self.config);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_new_client(stream, addr, client_registry, provider, config)
                                .await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Registers a new client, refusing it when the server is full, and runs its session.
async fn handle_new_client(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    client_registry: ClientRegistry,
    provider: Arc<DocumentProvider>,
    config: Arc<ServerConfig>,
) -> io::Result<()> {
    {
        let mut clients = client_registry.lock().await;
        if clients.len() >= config.max_clients {
            stream
                .write_all(
                    format_response(SERVICE_UNAVAILABLE, "Too many connections. Try again later.")
                        .as_bytes(),
                )
                .await?;
            return Ok(());
        }
        clients.insert(client_addr);
        info!(
            "Accepted client: {} ({}/{} clients)",
            client_addr,
            clients.len(),
            config.max_clients
        );
    }

    let result = handle_session(stream, client_addr, provider, &config).await;

    client_registry.lock().await.remove(&client_addr);
    info!("Client {} disconnected", client_addr);
    result
}
