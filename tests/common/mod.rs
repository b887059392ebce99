//! 集成测试共用的本地 HTTP 服务
//!
//! 每个服务只接受一个连接，记录请求后按段写出响应体，然后关闭连接。

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const EVENT_STREAM: &str = "text/event-stream";
pub const JSON: &str = "application/json";

/// 收到的请求
pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

/// 启动只处理一个连接的服务，按段写出响应体
pub async fn spawn_server(
    status_line: &'static str,
    content_type: &'static str,
    segments: Vec<Vec<u8>>,
) -> (SocketAddr, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let _ = tx.send(request);

        let head = format!(
            "{}\r\nContent-Type: {}\r\nConnection: close\r\n\r\n",
            status_line, content_type
        );
        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        for segment in segments {
            if socket.write_all(&segment).await.is_err() {
                return;
            }
            let _ = socket.flush().await;
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        let _ = socket.shutdown().await;
    });

    (addr, rx)
}

/// 返回单个 JSON 响应体的服务
pub async fn spawn_json_server(
    status_line: &'static str,
    body: &str,
) -> (SocketAddr, oneshot::Receiver<CapturedRequest>) {
    spawn_server(status_line, JSON, vec![body.as_bytes().to_vec()]).await
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = find_header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..end]).to_string();
            let content_length = head
                .lines()
                .find_map(|l| {
                    let lower = l.to_ascii_lowercase();
                    lower
                        .strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                })
                .unwrap_or(0);
            let body_start = end + 4;
            if buf.len() >= body_start + content_length {
                let body =
                    String::from_utf8_lossy(&buf[body_start..body_start + content_length]).to_string();
                return CapturedRequest { head, body };
            }
        }
    }
    CapturedRequest {
        head: String::from_utf8_lossy(&buf).to_string(),
        body: String::new(),
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
