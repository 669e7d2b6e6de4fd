/// Peer directory — the set of users available as chat targets
use crate::api::ApiClient;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One selectable chat peer, stored verbatim from the directory fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub id: String,
    pub username: String,
}

impl Peer {
    /// First character of the username, uppercased, for avatar display
    pub fn avatar_initial(&self) -> char {
        self.username
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

/// Fetch the peer list once, on widget mount.
///
/// Any transport or decode error collapses to an empty directory: the
/// widget stays usable and renders its "no peers" placeholder. No retry.
pub async fn load_peers(client: &ApiClient) -> Vec<Peer> {
    match client.list_users().await {
        Ok(peers) => {
            info!("Loaded {} peers from directory", peers.len());
            peers
        }
        Err(e) => {
            warn!("Failed to fetch peer directory: {}", e);
            Vec::new()
        }
    }
}
