use super::*;
use crate::discovery::DiscoveryTransport;
use crate::rpc::{RpcTransport, RpcValue, SessionHandle};

#[test]
fn test_service_response_helper() {
    let response = service_response("living", "192.168.1.10", 4004);
    assert_eq!(response.ipv4, 0xC0A8_010A);
    assert_eq!(response.to_remote().ipv4, "192.168.1.10");

    let response = service_response("broken", "not an address", 4004);
    assert_eq!(response.ipv4, 0);
}

#[tokio::test]
async fn test_mock_transport_hands_out_fresh_handles() {
    let mock = MockTransport::new();
    let first = mock.connect("a", 1).await.unwrap();
    let second = mock.connect("b", 2).await.unwrap();
    assert_eq!(first, SessionHandle(1));
    assert_eq!(second, SessionHandle(2));
}

#[tokio::test]
async fn test_mock_transport_response_order() {
    let mock = MockTransport::new();
    mock.respond("volume_up", RpcValue::U8(2));
    mock.respond_once("volume_up", RpcValue::U8(1));

    let session = SessionHandle(1);
    let first = mock.call(session, "volume_up", Vec::new()).await.unwrap();
    let second = mock.call(session, "volume_up", Vec::new()).await.unwrap();
    let other = mock.call(session, "volume_down", Vec::new()).await.unwrap();

    assert_eq!(first, RpcValue::U8(1));
    assert_eq!(second, RpcValue::U8(2));
    assert_eq!(other, RpcValue::U8(0));
    assert_eq!(mock.calls().len(), 3);
    assert_eq!(mock.calls_to("volume_up").len(), 2);
}

#[tokio::test]
async fn test_mock_transport_records_disconnects() {
    let mock = MockTransport::new();
    mock.disconnect(SessionHandle(5)).await.unwrap();
    assert_eq!(mock.disconnects(), vec![SessionHandle(5)]);
}

#[tokio::test]
async fn test_mock_discovery_records_queries() {
    let mock = MockDiscovery::new();
    mock.answer("nymphcast", vec![service_response("living", "192.168.1.10", 4004)]);

    let found = mock.query("nymphcast", 4004).await.unwrap();
    let none = mock.query("nymphcast_mediaserver", 4005).await.unwrap();

    assert_eq!(found.len(), 1);
    assert!(none.is_empty());
    assert_eq!(mock.queries().len(), 2);

    mock.fail("down");
    assert!(mock.query("nymphcast", 4004).await.is_err());
}
