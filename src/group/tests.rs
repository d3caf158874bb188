use super::*;
use crate::error::NymphCastError;
use crate::rpc::{RpcCaller, RpcValue, SessionHandle};
use crate::testing::MockTransport;
use crate::types::{MediaFile, MediaFileType, Remote};
use std::sync::Arc;
use std::time::Duration;

fn receiver(name: &str, ip: &str) -> Remote {
    Remote::new(name, ip, "", 4004)
}

fn shared_file() -> MediaFile {
    MediaFile {
        media_server: Remote::new("nas", "192.168.1.2", "", 4005),
        id: 7,
        name: "concert.mkv".to_string(),
        section: "video".to_string(),
        rel_path: String::new(),
        file_type: MediaFileType::Video,
    }
}

fn coordinator() -> (GroupCoordinator, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let caller = RpcCaller::new(mock.clone(), Duration::from_secs(2));
    (GroupCoordinator::new(caller), mock)
}

#[test]
fn test_share_result_codes() {
    assert_eq!(ShareResult::from_code(0), ShareResult::Success);
    assert_eq!(ShareResult::from_code(1), ShareResult::StaleShareList);
    assert_eq!(ShareResult::from_code(9), ShareResult::Failure(9));
    for code in [0u8, 1, 2, 255] {
        assert_eq!(ShareResult::from_code(code).code(), code);
    }
    assert!(ShareResult::Success.is_success());
    assert!(!ShareResult::StaleShareList.is_success());
}

#[test]
fn test_group_master_and_slaves() {
    let group = PlaybackGroup::from_receivers(vec![
        receiver("living", "192.168.1.10"),
        receiver("kitchen", "192.168.1.11"),
        receiver("living", "10.0.0.10"),
        receiver("bedroom", "192.168.1.12"),
    ])
    .unwrap();

    assert_eq!(group.master().name, "living");
    assert_eq!(group.len(), 4);
    let slaves: Vec<&str> = group.slaves().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(slaves, vec!["kitchen", "living", "bedroom"]);
}

#[test]
fn test_group_from_empty_list() {
    assert!(PlaybackGroup::from_receivers(Vec::new()).is_none());
}

#[test]
fn test_group_remove_slave() {
    let mut group = PlaybackGroup::new(receiver("living", "192.168.1.10"));
    assert!(group.add_slave(receiver("kitchen", "192.168.1.11")));
    assert!(!group.add_slave(receiver("kitchen", "192.168.1.11")));

    assert!(group.remove_slave(&receiver("living", "192.168.1.10")).is_none());
    let removed = group.remove_slave(&receiver("kitchen", "192.168.1.11")).unwrap();
    assert_eq!(removed.name, "kitchen");
    assert!(group.slaves().is_empty());
    assert!(!group.is_empty());
}

#[test]
fn test_encode_receivers_keeps_order() {
    let value = encode_receivers(&[receiver("a", "1.1.1.1"), receiver("b", "2.2.2.2")]);
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].field("name").and_then(RpcValue::as_str), Some("a"));
    assert_eq!(items[1].field("ipv4").and_then(RpcValue::as_str), Some("2.2.2.2"));
}

#[tokio::test]
async fn test_play_share_single_call_with_all_members() {
    let (coordinator, mock) = coordinator();
    mock.respond("playMedia", RpcValue::U8(0));

    let group = PlaybackGroup::from_receivers(vec![
        receiver("master", "192.168.1.10"),
        receiver("slave1", "192.168.1.11"),
        receiver("slave2", "192.168.1.12"),
    ])
    .unwrap();

    let result = coordinator.play_share(&shared_file(), &group).await.unwrap();
    assert_eq!(result, ShareResult::Success);

    assert_eq!(mock.connections(), vec![("192.168.1.2".to_string(), 4005)]);
    let calls = mock.calls_to("playMedia");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args[0], RpcValue::U32(7));
    assert_eq!(calls[0].args[1], encode_receivers(group.members()));
    assert_eq!(mock.disconnects(), vec![calls[0].session]);
}

#[tokio::test]
async fn test_play_share_sends_receivers_as_given() {
    let (coordinator, mock) = coordinator();
    mock.respond("playMedia", RpcValue::U8(0));
    let receivers = vec![
        receiver("living", "192.168.1.10"),
        receiver("kitchen", "192.168.1.11"),
        receiver("kitchen", "192.168.1.11"),
    ];

    let group = PlaybackGroup::from_receivers(receivers.clone()).unwrap();
    coordinator.play_share(&shared_file(), &group).await.unwrap();

    let calls = mock.calls_to("playMedia");
    assert_eq!(calls[0].args[1], encode_receivers(&receivers));
    assert_eq!(calls[0].args[1].as_array().map(<[RpcValue]>::len), Some(3));
}

#[tokio::test]
async fn test_play_share_returns_raw_code() {
    let (coordinator, mock) = coordinator();
    mock.respond_once("playMedia", RpcValue::U8(1));
    mock.respond_once("playMedia", RpcValue::U8(5));
    let group = PlaybackGroup::new(receiver("master", "192.168.1.10"));

    let first = coordinator.play_share(&shared_file(), &group).await.unwrap();
    let second = coordinator.play_share(&shared_file(), &group).await.unwrap();

    assert_eq!(first, ShareResult::StaleShareList);
    assert_eq!(second, ShareResult::Failure(5));
}

#[tokio::test]
async fn test_play_share_unreachable_server() {
    let (coordinator, mock) = coordinator();
    mock.fail_connect("connection refused");
    let group = PlaybackGroup::new(receiver("master", "192.168.1.10"));

    let err = coordinator.play_share(&shared_file(), &group).await.unwrap_err();
    assert!(matches!(err, NymphCastError::ConnectionFailed { .. }));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_play_share_call_failure_disconnects_once() {
    let (coordinator, mock) = coordinator();
    mock.fail("playMedia", "reset by peer");
    let group = PlaybackGroup::new(receiver("master", "192.168.1.10"));

    let err = coordinator.play_share(&shared_file(), &group).await.unwrap_err();
    assert!(matches!(err, NymphCastError::Transport { .. }));
    assert_eq!(mock.disconnects().len(), 1);
}

#[tokio::test]
async fn test_play_receiver_share_sends_file_id_only() {
    let (coordinator, mock) = coordinator();

    coordinator
        .play_receiver_share(SessionHandle(3), &shared_file())
        .await
        .unwrap();

    let calls = mock.calls_to("playMedia");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].session, SessionHandle(3));
    assert_eq!(calls[0].args, vec![RpcValue::U32(7)]);
    assert!(mock.connections().is_empty());
}

#[tokio::test]
async fn test_add_slaves() {
    let (coordinator, mock) = coordinator();
    let slaves = vec![receiver("kitchen", "192.168.1.11")];

    coordinator.add_slaves(SessionHandle(2), &slaves).await.unwrap();

    let calls = mock.calls_to("session_add_slave");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, vec![encode_receivers(&slaves)]);
}

#[tokio::test]
async fn test_add_slaves_rejected() {
    let (coordinator, mock) = coordinator();
    mock.respond("session_add_slave", RpcValue::U8(1));

    let err = coordinator
        .add_slaves(SessionHandle(2), &[receiver("kitchen", "192.168.1.11")])
        .await
        .unwrap_err();
    assert!(matches!(err, NymphCastError::Rejected { code: 1, .. }));
    assert!(mock.disconnects().is_empty());
}
