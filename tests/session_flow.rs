//! End-to-end streaming of a real file through the receiver callbacks

mod common;

use std::io::Write;

use bytes::{Bytes, BytesMut};
use nymphcast_client::testing::MockTransport;
use nymphcast_client::{RpcValue, SessionCallbacks, SessionHandle, SessionState};

fn file_with(len: usize) -> (tempfile::NamedTempFile, Vec<u8>) {
    let data: Vec<u8> = (0..len).map(|i| (i * 7 % 256) as u8).collect();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();
    file.flush().unwrap();
    (file, data)
}

fn last_block(transport: &MockTransport) -> (Bytes, bool) {
    let call = transport.calls_to("session_data").pop().unwrap();
    (
        call.args[0].as_blob().cloned().unwrap(),
        call.args[1].as_bool().unwrap(),
    )
}

async fn pull_until_eof(transport: &MockTransport, handle: SessionHandle, kib: Option<u32>) -> (Vec<u8>, usize) {
    let endpoint = transport.callbacks(handle).unwrap();
    let mut received = BytesMut::new();
    let mut blocks = 0;
    loop {
        endpoint.on_read(handle, kib).await;
        let (data, eof) = last_block(transport);
        received.extend_from_slice(&data);
        blocks += 1;
        if eof {
            break;
        }
    }
    (received.to_vec(), blocks)
}

#[tokio::test]
async fn test_stream_whole_file() {
    common::init_logging();
    let (client, transport, _) = common::mock_client();
    let (file, data) = file_with(650 * 1024);

    let handle = client.connect_server("192.168.1.10", 4004).await.unwrap();
    assert_eq!(
        transport.calls_to("connect")[0].args,
        vec![RpcValue::from("integration-test")]
    );
    assert_eq!(client.cast_file(handle, file.path()).await.unwrap(), 0);

    let (received, blocks) = pull_until_eof(&transport, handle, None).await;

    assert_eq!(blocks, 4);
    assert_eq!(received, data);
    assert_eq!(client.session_state(handle).await, Some(SessionState::Serving));
}

#[tokio::test]
async fn test_seek_back_and_replay() {
    common::init_logging();
    let (client, transport, _) = common::mock_client();
    let (file, data) = file_with(10 * 1024);

    let handle = client.connect_server("192.168.1.10", 4004).await.unwrap();
    client.cast_file(handle, file.path()).await.unwrap();
    let endpoint = transport.callbacks(handle).unwrap();

    endpoint.on_read(handle, Some(4)).await;
    endpoint.on_seek(handle, 2048, Some(4)).await;
    let (block, eof) = last_block(&transport);
    assert_eq!(&block[..], &data[2048..2048 + 4096]);
    assert!(!eof);

    let (rest, _) = pull_until_eof(&transport, handle, Some(4)).await;
    assert_eq!(&rest[..], &data[2048 + 4096..]);
}

#[tokio::test]
async fn test_recast_after_stop() {
    common::init_logging();
    let (client, transport, _) = common::mock_client();
    let (first, _) = file_with(1024);
    let (second, second_data) = file_with(3000);

    let handle = client.connect_server("192.168.1.10", 4004).await.unwrap();
    client.cast_file(handle, first.path()).await.unwrap();
    transport.callbacks(handle).unwrap().on_stop(handle).await;
    assert_eq!(client.session_state(handle).await, Some(SessionState::Stopped));

    client.cast_file(handle, second.path()).await.unwrap();
    assert_eq!(client.session_state(handle).await, Some(SessionState::Started));

    let (received, blocks) = pull_until_eof(&transport, handle, None).await;
    assert_eq!(blocks, 1);
    assert_eq!(received, second_data);
}

#[tokio::test]
async fn test_disconnect_ends_streaming() {
    common::init_logging();
    let (client, transport, _) = common::mock_client();
    let (file, _) = file_with(2048);

    let handle = client.connect_server("192.168.1.10", 4004).await.unwrap();
    client.cast_file(handle, file.path()).await.unwrap();
    client.disconnect_server(handle).await.unwrap();

    assert!(transport.callbacks(handle).is_none());
    assert_eq!(client.session_state(handle).await, None);
    assert_eq!(transport.disconnects(), vec![handle]);
}
