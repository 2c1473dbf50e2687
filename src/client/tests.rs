use super::PubSubClient;
use crate::transport::framed::FrameReader;
use crate::transport::message::ClientMessage;
use tokio::io::{duplex, split};

#[tokio::test]
async fn test_client_writes_registration_then_commands() {
    let (client_side, server_side) = duplex(1024);
    let (r, w) = split(client_side);
    let mut client = PubSubClient::handshake(r, w, "alice").await.unwrap();
    assert_eq!(client.id, "alice");

    client.subscribe("news").await.unwrap();
    client.publish("news", "extra").await.unwrap();
    client.unsubscribe("news").await.unwrap();

    let mut server = FrameReader::new(server_side);
    assert_eq!(server.read_string().await.unwrap(), "alice");
    assert_eq!(
        ClientMessage::read_from(&mut server).await.unwrap(),
        ClientMessage::Subscribe {
            topic: "news".to_string()
        }
    );
    assert_eq!(
        ClientMessage::read_from(&mut server).await.unwrap(),
        ClientMessage::Publish {
            topic: "news".to_string(),
            payload: "extra".to_string()
        }
    );
    assert_eq!(
        ClientMessage::read_from(&mut server).await.unwrap(),
        ClientMessage::Unsubscribe {
            topic: "news".to_string()
        }
    );
}
