use crate::{
    CollectorError, ENTRY_DELIMITER, SessionCatalog, TransferCompletion, TransferCoordinator,
    TransferStatus,
    tests::{
        catalog::make_session,
        support::{FakePeerLink, file_count},
    },
};

use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::mpsc;

const SESSION_A: &str = "2024_01_01_10_00_00_左手_鼓掌[负]_轻";
const SESSION_B: &str = "2024_01_02_10_00_00_左手_拍打[负]_重";

struct Fixture {
    data: TempDir,
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let data = TempDir::new().unwrap();
        make_session(data.path(), SESSION_A);
        make_session(data.path(), SESSION_B);
        Self {
            data,
            temp: TempDir::new().unwrap(),
        }
    }

    fn catalog(&self) -> SessionCatalog {
        SessionCatalog::new(self.data.path())
    }
}

/// WHAT: Unreachable peer fails fast with no temp writes
/// WHY: Export must not touch storage when it cannot be delivered
#[test]
fn given_unreachable_peer_when_exporting_then_peer_unreachable_and_no_io() {
    // Given: Sessions and an unreachable peer
    let fixture = Fixture::new();
    let link = FakePeerLink::unreachable();
    let coordinator = TransferCoordinator::new(link.clone(), fixture.temp.path());
    let entries = fixture.catalog().list().unwrap();

    // When: Exporting
    let result = coordinator.export(&entries[..1]);

    // Then: PeerUnreachable, still Idle, temp dir untouched, nothing handed off
    assert!(matches!(result, Err(CollectorError::PeerUnreachable { .. })));
    assert_eq!(coordinator.status(), TransferStatus::Idle { message: None });
    assert_eq!(file_count(fixture.temp.path()), 0);
    assert!(link.handoffs().is_empty());
}

/// WHAT: Export hands a merged payload to the peer and becomes Sending
/// WHY: Handoff is fire-and-forget; completion arrives later
#[test]
fn given_reachable_peer_when_exporting_then_sending_with_merged_payload() {
    // Given: Sessions and a reachable peer
    let fixture = Fixture::new();
    let link = FakePeerLink::reachable();
    let coordinator = TransferCoordinator::new(link.clone(), fixture.temp.path());
    let entries = fixture.catalog().list().unwrap();

    // When: Exporting both sessions
    let handle = coordinator.export(&entries).unwrap();

    // Then: One handoff, in catalog order, artifact in temp dir, status Sending
    let handoffs = link.handoffs();
    assert_eq!(handoffs.len(), 1);
    assert_eq!(handoffs[0].handle, handle);
    assert_eq!(handoffs[0].metadata.sessions, vec![SESSION_B, SESSION_A]);
    assert_eq!(handoffs[0].metadata.delimiter, ENTRY_DELIMITER);
    assert!(handoffs[0].path.starts_with(fixture.temp.path()));
    assert!(handoffs[0].path.exists());
    let payload = String::from_utf8(handoffs[0].payload.clone()).unwrap();
    assert_eq!(payload.matches(ENTRY_DELIMITER).count(), 1);
    assert!(coordinator.status().is_sending());
}

/// WHAT: A second export while Sending is rejected
/// WHY: At most one transfer in flight; re-entrant exports are not queued
#[test]
fn given_transfer_in_flight_when_exporting_again_then_rejected_and_first_unchanged() {
    // Given: One export in flight
    let fixture = Fixture::new();
    let link = FakePeerLink::reachable();
    let coordinator = TransferCoordinator::new(link.clone(), fixture.temp.path());
    let entries = fixture.catalog().list().unwrap();
    let first = coordinator.export(&entries).unwrap();

    // When: Exporting again
    let second = coordinator.export(&entries);

    // Then: Rejected, no new handoff, first still completes normally
    assert!(matches!(second, Err(CollectorError::TransferInFlight { .. })));
    assert_eq!(link.handoffs().len(), 1);
    assert_eq!(file_count(fixture.temp.path()), 1);
    coordinator.complete(TransferCompletion {
        handle: first,
        error: None,
    });
    assert_eq!(coordinator.status().message(), Some("Transfer complete"));
}

/// WHAT: Successful completion returns to Idle and deletes the artifact
/// WHY: The merged file is transient and must not leak
#[test]
fn given_sending_when_completion_succeeds_then_idle_and_artifact_removed() {
    // Given: One export in flight
    let fixture = Fixture::new();
    let link = FakePeerLink::reachable();
    let coordinator = TransferCoordinator::new(link.clone(), fixture.temp.path());
    let entries = fixture.catalog().list().unwrap();
    let handle = coordinator.export(&entries).unwrap();

    // When: The peer link reports success
    coordinator.complete(TransferCompletion {
        handle,
        error: None,
    });

    // Then: Idle with message, temp dir empty, export possible again
    assert_eq!(
        coordinator.status(),
        TransferStatus::Idle {
            message: Some("Transfer complete".to_string())
        }
    );
    assert_eq!(file_count(fixture.temp.path()), 0);
    assert!(coordinator.export(&entries).is_ok());
}

/// WHAT: Failed completion surfaces a readable message and cleans up
/// WHY: Transfer errors are reported through status; the user retries
#[test]
fn given_sending_when_completion_fails_then_idle_with_failure_message() {
    // Given: One export in flight
    let fixture = Fixture::new();
    let link = FakePeerLink::reachable();
    let coordinator = TransferCoordinator::new(link.clone(), fixture.temp.path());
    let entries = fixture.catalog().list().unwrap();
    let handle = coordinator.export(&entries).unwrap();

    // When: The peer link reports an error
    coordinator.complete(TransferCompletion {
        handle,
        error: Some("watch session deactivated".to_string()),
    });

    // Then: Idle with the reason, artifact removed
    assert_eq!(
        coordinator.status().message(),
        Some("Transfer failed: watch session deactivated")
    );
    assert_eq!(file_count(fixture.temp.path()), 0);
}

/// WHAT: Completions for unknown handles are ignored
/// WHY: Stale notifications must not end the current transfer
#[test]
fn given_sending_when_unknown_completion_arrives_then_still_sending() {
    // Given: One export in flight
    let fixture = Fixture::new();
    let link = FakePeerLink::reachable();
    let coordinator = TransferCoordinator::new(link.clone(), fixture.temp.path());
    let entries = fixture.catalog().list().unwrap();
    coordinator.export(&entries).unwrap();

    // When: A completion for some other transfer arrives
    coordinator.complete(TransferCompletion {
        handle: crate::TransferHandle::new(),
        error: None,
    });

    // Then: Still sending, artifact kept
    assert!(coordinator.status().is_sending());
    assert_eq!(file_count(fixture.temp.path()), 1);
}

/// WHAT: A refused handoff fails the export and cleans up
/// WHY: No transfer is in flight when the peer link refuses the file
#[test]
fn given_peer_refuses_file_when_exporting_then_transfer_failure_and_idle() {
    // Given: A reachable peer that refuses transfers
    let fixture = Fixture::new();
    let link = FakePeerLink::reachable();
    link.refuse_with("file transfer queue full");
    let coordinator = TransferCoordinator::new(link.clone(), fixture.temp.path());
    let entries = fixture.catalog().list().unwrap();

    // When: Exporting
    let result = coordinator.export(&entries);

    // Then: TransferFailure, Idle with reason, no artifact left
    assert!(matches!(
        result,
        Err(CollectorError::TransferFailure { ref reason, .. }) if reason == "file transfer queue full"
    ));
    assert_eq!(
        coordinator.status().message(),
        Some("Export failed: file transfer queue full")
    );
    assert_eq!(file_count(fixture.temp.path()), 0);
}

/// WHAT: Empty selection is rejected without a handoff
/// WHY: There is nothing to merge
#[test]
fn given_no_entries_when_exporting_then_nothing_to_export() {
    // Given: A reachable peer
    let fixture = Fixture::new();
    let link = FakePeerLink::reachable();
    let coordinator = TransferCoordinator::new(link.clone(), fixture.temp.path());

    // When: Exporting nothing
    let result = coordinator.export(&[]);

    // Then: NothingToExport and still Idle
    assert!(matches!(result, Err(CollectorError::NothingToExport { .. })));
    assert!(!coordinator.status().is_sending());
    assert!(link.handoffs().is_empty());
}

/// WHAT: A completion reported during the handoff call is applied
/// WHY: Peer links may finish before transfer_file returns
#[test]
fn given_link_completing_inline_when_exporting_then_idle_after_export_returns() {
    // Given: A link that completes from inside transfer_file
    let fixture = Fixture::new();
    let link = FakePeerLink::reachable();
    let coordinator = Arc::new(TransferCoordinator::new(link.clone(), fixture.temp.path()));
    link.complete_inline(&coordinator);
    let entries = fixture.catalog().list().unwrap();

    // When: Exporting
    coordinator.export(&entries).unwrap();

    // Then: Already Idle with success, artifact removed
    assert_eq!(coordinator.status().message(), Some("Transfer complete"));
    assert_eq!(file_count(fixture.temp.path()), 0);
}

/// WHAT: Completions fed through a channel reach the coordinator
/// WHY: Peer links report asynchronously from their own threads
#[tokio::test]
async fn given_completion_channel_when_peer_reports_then_status_updates() {
    // Given: An in-flight export and a completion channel
    let fixture = Fixture::new();
    let link = FakePeerLink::reachable();
    let coordinator = Arc::new(TransferCoordinator::new(link.clone(), fixture.temp.path()));
    let entries = fixture.catalog().list().unwrap();
    let handle = coordinator.export(&entries).unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let mut status = coordinator.subscribe();

    let pump = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.run_completions(rx).await })
    };

    // When: The peer reports success and closes the channel
    tx.send(TransferCompletion {
        handle,
        error: None,
    })
    .unwrap();
    drop(tx);
    pump.await.unwrap();

    // Then: Subscribers observe Idle with the success message
    assert!(status.has_changed().unwrap());
    assert_eq!(status.borrow_and_update().message(), Some("Transfer complete"));
}
