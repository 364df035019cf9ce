mod coordinator;
pub(crate) mod payload;
mod peer_link;

pub use {
    coordinator::{TransferCoordinator, TransferStatus},
    payload::ENTRY_DELIMITER,
    peer_link::{
        PeerLink, PeerLinkError, TransferCompletion, TransferHandle, TransferMetadata,
    },
};
