use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use txc_report::api::{CoinGeckoClient, ReqwestTransport};
use txc_report::models::PriceQuote;

pub const LIVE_BODY: &str = r#"{"texitcoin":{"usd":0.7712,"usd_24h_change":-3.25,"usd_24h_vol":312000.5,"usd_market_cap":44100000.0}}"#;

/// Minimal HTTP server that answers every request with one canned response.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn start(status: u16, body: &'static str, delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let seen = seen.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let mut read = 0;
                    while read < buf.len() {
                        match socket.read(&mut buf[read..]).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => read += n,
                        }
                        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    seen.lock()
                        .unwrap()
                        .push(String::from_utf8_lossy(&buf[..read]).to_string());

                    tokio::time::sleep(delay).await;
                    let response = format!(
                        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{}/api/v3", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Base URL of a port nothing is listening on.
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/v3", addr)
}

pub fn client_for(base_url: &str, timeout: Duration, api_key: Option<&str>) -> CoinGeckoClient {
    let transport = ReqwestTransport::new(timeout, api_key).unwrap();
    CoinGeckoClient::with_transport(transport, base_url, "texitcoin")
}

pub fn assert_same_figures(a: &PriceQuote, b: &PriceQuote) {
    assert_eq!(a.price, b.price);
    assert_eq!(a.change_24h, b.change_24h);
    assert_eq!(a.volume_24h, b.volume_24h);
    assert_eq!(a.market_cap, b.market_cap);
}
