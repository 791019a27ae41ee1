//! Integration tests for the WebSocket transport.
//!
//! These spin up a real WebSocket listener and client to verify that frames
//! flow in both directions through the split halves.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use pairmatch_transport::{
        Connection, FrameReceiver, FrameSender, Transport, WebSocketTransport,
    };
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn connect_client(addr: &str) -> ClientWs {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        ws
    }

    /// Binds on an OS-assigned port and returns the transport and its address.
    async fn bind() -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("local addr").to_string();
        (transport, addr)
    }

    #[tokio::test]
    async fn test_websocket_split_send_and_receive() {
        let (mut transport, addr) = bind().await;
        let server = tokio::spawn(async move { transport.accept().await.expect("accept") });

        let mut client = connect_client(&addr).await;
        let conn = server.await.expect("task should complete");
        assert!(conn.id().into_inner() > 0);

        let (mut tx, mut rx) = conn.split();

        // Server → client: JSON goes out as a text frame.
        tx.send(br#"{"type":"event"}"#).await.expect("send");
        let msg = client.next().await.unwrap().unwrap();
        assert!(msg.is_text());
        assert_eq!(msg.into_data().as_ref(), br#"{"type":"event"}"#);

        // Client → server, text and binary both arrive as bytes.
        client.send(Message::Text("hello".into())).await.unwrap();
        client
            .send(Message::Binary(b"\xff\x00".to_vec().into()))
            .await
            .unwrap();

        let first = rx.recv().await.expect("recv").expect("data");
        assert_eq!(first, b"hello");
        let second = rx.recv().await.expect("recv").expect("data");
        assert_eq!(second, b"\xff\x00");

        tx.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_websocket_sender_usable_while_receiver_waits() {
        let (mut transport, addr) = bind().await;
        let server = tokio::spawn(async move { transport.accept().await.expect("accept") });
        let mut client = connect_client(&addr).await;
        let (mut tx, mut rx) = server.await.unwrap().split();

        // The receiver is parked on recv() in another task; sends must not
        // be blocked behind it.
        let reader = tokio::spawn(async move { rx.recv().await });

        tx.send(b"push").await.expect("send while reader is parked");
        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"push");

        client.send(Message::Close(None)).await.unwrap();
        let result = reader.await.unwrap().expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }
}
