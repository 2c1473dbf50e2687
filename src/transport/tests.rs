use super::framed::{FrameReader, FrameWriter, MAX_FRAME_LEN, encode_frame, truncate};
use super::message::{ClientMessage, CommandCode};
use crate::utils::error::{FrameError, SessionError};
use tokio::io::{AsyncWriteExt, duplex};

#[tokio::test]
async fn test_framed_string_round_trip() {
    let (client, server) = duplex(1024);
    let mut writer = FrameWriter::new(client);
    let mut reader = FrameReader::new(server);

    writer.write_string("hello").await;
    writer.write_string("").await;
    writer.flush().await.unwrap();

    assert_eq!(reader.read_string().await.unwrap(), "hello");
    assert_eq!(reader.read_string().await.unwrap(), "");
}

#[tokio::test]
async fn test_long_string_is_truncated_to_255_bytes() {
    let long = "x".repeat(300);
    let (client, server) = duplex(1024);
    let mut writer = FrameWriter::new(client);
    let mut reader = FrameReader::new(server);

    writer.write_string(&long).await;
    writer.flush().await.unwrap();

    let received = reader.read_string().await.unwrap();
    assert_eq!(received.len(), MAX_FRAME_LEN);
    assert_eq!(received, long[..255]);
}

#[test]
fn test_encode_frame_layout() {
    let mut buf = Vec::new();
    encode_frame("abc", &mut buf);
    assert_eq!(buf, [3, b'a', b'b', b'c']);

    assert_eq!(truncate(&"y".repeat(256)).len(), 255);
    assert_eq!(truncate("short"), b"short");
}

#[tokio::test]
async fn test_eof_mid_frame_is_end_of_stream() {
    let (mut client, server) = duplex(64);
    let mut reader = FrameReader::new(server);

    // Promises five bytes, delivers two.
    client.write_all(&[5, b'h', b'i']).await.unwrap();
    drop(client);

    assert!(matches!(
        reader.read_string().await,
        Err(FrameError::EndOfStream)
    ));
}

#[tokio::test]
async fn test_eof_before_frame_is_end_of_stream() {
    let (client, server) = duplex(64);
    drop(client);
    let mut reader = FrameReader::new(server);
    assert!(matches!(reader.read_u8().await, Err(FrameError::EndOfStream)));
}

#[tokio::test]
async fn test_invalid_utf8_is_rejected() {
    let (mut client, server) = duplex(64);
    client.write_all(&[2, 0xff, 0xfe]).await.unwrap();
    let mut reader = FrameReader::new(server);
    assert!(matches!(
        reader.read_string().await,
        Err(FrameError::InvalidUtf8(_))
    ));
}

#[test]
fn test_command_codes() {
    assert_eq!(CommandCode::try_from(0).unwrap(), CommandCode::Subscribe);
    assert_eq!(CommandCode::try_from(1).unwrap(), CommandCode::Unsubscribe);
    assert_eq!(CommandCode::try_from(2).unwrap(), CommandCode::Publish);
    assert!(matches!(
        CommandCode::try_from(3),
        Err(SessionError::UnknownCommand(3))
    ));
}

#[tokio::test]
async fn test_decode_commands_in_order() {
    let (mut client, server) = duplex(1024);
    let mut reader = FrameReader::new(server);

    let sent = [
        ClientMessage::Subscribe {
            topic: "weather".to_string(),
        },
        ClientMessage::Publish {
            topic: "weather".to_string(),
            payload: "sunny".to_string(),
        },
        ClientMessage::Unsubscribe {
            topic: "weather".to_string(),
        },
    ];
    for msg in &sent {
        client.write_all(&msg.encode()).await.unwrap();
    }

    for expected in &sent {
        let decoded = ClientMessage::read_from(&mut reader).await.unwrap();
        assert_eq!(&decoded, expected);
    }
}

#[test]
fn test_publish_wire_layout() {
    let msg = ClientMessage::Publish {
        topic: "t".to_string(),
        payload: "hi".to_string(),
    };
    assert_eq!(msg.encode(), [2, 1, b't', 2, b'h', b'i']);
}

#[tokio::test]
async fn test_unknown_command_is_a_protocol_error() {
    let (mut client, server) = duplex(64);
    client.write_all(&[9, 1, b't']).await.unwrap();
    let mut reader = FrameReader::new(server);

    assert!(matches!(
        ClientMessage::read_from(&mut reader).await,
        Err(SessionError::UnknownCommand(9))
    ));
}
