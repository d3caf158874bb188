use super::*;
use crate::error::NymphCastError;
use crate::testing::MockTransport;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

fn caller() -> (RpcCaller, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    (RpcCaller::new(mock.clone(), Duration::from_secs(2)), mock)
}

#[test]
fn test_value_accessors_widen_integers() {
    assert_eq!(RpcValue::U8(7).as_u32(), Some(7));
    assert_eq!(RpcValue::U8(7).as_u64(), Some(7));
    assert_eq!(RpcValue::U32(70_000).as_u64(), Some(70_000));
    assert_eq!(RpcValue::U32(70_000).as_u8(), None);
    assert_eq!(RpcValue::U64(1).as_u32(), None);
    assert_eq!(RpcValue::from("x").as_bool(), None);
}

#[test]
fn test_value_struct_fields() {
    let value = RpcValue::structure([
        ("name", RpcValue::from("kitchen")),
        ("port", RpcValue::from(4004u32)),
    ]);
    assert_eq!(value.field("name").and_then(RpcValue::as_str), Some("kitchen"));
    assert_eq!(value.field("port").and_then(RpcValue::as_u32), Some(4004));
    assert!(value.field("missing").is_none());
    assert!(RpcValue::U8(0).field("name").is_none());
}

#[test]
fn test_value_blob() {
    let value = RpcValue::from(Bytes::from_static(b"abc"));
    assert_eq!(value.as_blob().map(Bytes::len), Some(3));
    assert!(RpcValue::from(vec![value.clone()]).as_array().is_some());
}

#[test]
fn test_session_handle_display() {
    assert_eq!(SessionHandle(12).to_string(), "#12");
}

#[tokio::test]
async fn test_connect_returns_handle() {
    let (caller, mock) = caller();

    let handle = caller.connect("192.168.1.10", 4004).await.unwrap();

    assert_eq!(handle, SessionHandle(1));
    assert_eq!(mock.connections(), vec![("192.168.1.10".to_string(), 4004)]);
}

#[tokio::test]
async fn test_connect_failure() {
    let (caller, mock) = caller();
    mock.fail_connect("no route to host");

    let err = caller.connect("192.168.1.10", 4004).await.unwrap_err();

    match err {
        NymphCastError::ConnectionFailed { address, message } => {
            assert_eq!(address, "192.168.1.10:4004");
            assert_eq!(message, "no route to host");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(mock.disconnects().is_empty());
}

#[tokio::test]
async fn test_call_passes_args_and_result() {
    let (caller, mock) = caller();
    mock.respond("volume_up", RpcValue::U8(0));

    let value = caller
        .call(SessionHandle(4), "volume_up", vec![RpcValue::U8(3)])
        .await
        .unwrap();

    assert_eq!(value, RpcValue::U8(0));
    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].session, SessionHandle(4));
    assert_eq!(calls[0].args, vec![RpcValue::U8(3)]);
}

#[tokio::test]
async fn test_call_failure_disconnects_exactly_once() {
    let (caller, mock) = caller();
    mock.fail("playback_start", "connection reset");

    let err = caller
        .call(SessionHandle(2), "playback_start", Vec::new())
        .await
        .unwrap_err();

    assert!(err.is_session_fatal());
    match err {
        NymphCastError::Transport { method, message } => {
            assert_eq!(method, "playback_start");
            assert_eq!(message, "connection reset");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(mock.disconnects(), vec![SessionHandle(2)]);
}

#[tokio::test(start_paused = true)]
async fn test_call_timeout_disconnects() {
    let (caller, mock) = caller();
    mock.stall("playback_status");

    let err = caller
        .call(SessionHandle(1), "playback_status", Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, NymphCastError::Transport { .. }));
    assert!(err.to_string().contains("timed out"));
    assert_eq!(mock.disconnects(), vec![SessionHandle(1)]);
}

#[tokio::test]
async fn test_call_code_protocol_mismatch() {
    let (caller, mock) = caller();
    mock.respond("volume_set", RpcValue::from("zero"));

    let err = caller
        .call_code(SessionHandle(1), "volume_set", vec![RpcValue::U8(64)])
        .await
        .unwrap_err();

    assert!(matches!(err, NymphCastError::ProtocolMismatch { .. }));
    assert!(mock.disconnects().is_empty());
}

#[tokio::test]
async fn test_call_checked_rejected() {
    let (caller, mock) = caller();
    mock.respond("volume_mute", RpcValue::U8(3));

    let err = caller
        .call_checked(SessionHandle(1), "volume_mute", Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, NymphCastError::Rejected { code: 3, .. }));
    assert!(!err.is_session_fatal());
}

#[tokio::test]
async fn test_call_string() {
    let (caller, mock) = caller();
    mock.respond("app_list", RpcValue::from("SoundCloud\nYouTube"));
    mock.respond("app_send", RpcValue::U8(0));

    let list = caller.call_string(SessionHandle(1), "app_list", Vec::new()).await.unwrap();
    assert_eq!(list, "SoundCloud\nYouTube");

    let err = caller
        .call_string(SessionHandle(1), "app_send", Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, NymphCastError::ProtocolMismatch { .. }));
}
