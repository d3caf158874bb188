//! Group playback from a discovered media server

mod common;

use nymphcast_client::discovery::{MEDIA_SERVER_SERVICE, RECEIVER_SERVICE};
use nymphcast_client::group::encode_receivers;
use nymphcast_client::testing::service_response;
use nymphcast_client::{RpcValue, ShareResult};

#[tokio::test]
async fn test_share_to_group_and_retry_when_stale() {
    common::init_logging();
    let (client, transport, discovery) = common::mock_client();
    discovery.answer(
        RECEIVER_SERVICE,
        vec![
            service_response("living", "192.168.1.10", 4004),
            service_response("kitchen", "192.168.1.11", 4004),
            service_response("bedroom", "192.168.1.12", 4004),
        ],
    );
    discovery.answer(
        MEDIA_SERVER_SERVICE,
        vec![service_response("nas", "192.168.1.2", 4005)],
    );
    let file_list = RpcValue::Array(vec![RpcValue::structure([
        ("id", RpcValue::U32(42)),
        ("filename", RpcValue::from("album.flac")),
        ("section", RpcValue::from("music")),
        ("type", RpcValue::U8(0)),
    ])]);
    transport.respond("getFileList", file_list);

    let (receivers, servers) = client.find_all().await;
    let files = client.get_shares(&servers[0]).await.unwrap();
    assert_eq!(files.len(), 1);

    transport.respond_once("playMedia", RpcValue::U8(1));
    let result = client.play_share(&files[0], &receivers).await.unwrap();
    assert_eq!(result, ShareResult::StaleShareList);

    let files = client.get_shares(&servers[0]).await.unwrap();
    let result = client.play_share(&files[0], &receivers).await.unwrap();
    assert_eq!(result, ShareResult::Success);

    let calls = transport.calls_to("playMedia");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].args[0], RpcValue::U32(42));
    assert_eq!(calls[1].args[1], encode_receivers(&receivers));
    assert_eq!(calls[1].args[1].as_array().map(<[RpcValue]>::len), Some(3));
}

#[tokio::test]
async fn test_extend_running_group() {
    common::init_logging();
    let (client, transport, _) = common::mock_client();
    let master = client.connect_server("192.168.1.10", 4004).await.unwrap();
    let slaves = vec![nymphcast_client::Remote::new("kitchen", "192.168.1.11", "", 4004)];

    client.add_slaves(master, &slaves).await.unwrap();

    let calls = transport.calls_to("session_add_slave");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].session, master);
    assert_eq!(calls[0].args, vec![encode_receivers(&slaves)]);
}
