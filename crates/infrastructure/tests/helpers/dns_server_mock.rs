#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, PTR};
use hickory_proto::rr::{Name, RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// What the mock server puts in every answer.
#[derive(Debug, Clone)]
pub struct MockAnswer {
    pub address: Option<Ipv4Addr>,
    pub ptr: Option<String>,
    pub rcode: ResponseCode,
    /// UDP answers carry TC and no records; TCP answers are complete.
    pub truncate_udp: bool,
    pub mangle_id: bool,
}

impl MockAnswer {
    pub fn address(ip: Ipv4Addr) -> Self {
        Self {
            address: Some(ip),
            ptr: None,
            rcode: ResponseCode::NoError,
            truncate_udp: false,
            mangle_id: false,
        }
    }

    pub fn ptr(target: &str) -> Self {
        Self {
            address: None,
            ptr: Some(target.to_string()),
            ..Self::address(Ipv4Addr::LOCALHOST)
        }
    }

    pub fn rcode(rcode: ResponseCode) -> Self {
        Self {
            address: None,
            ptr: None,
            rcode,
            truncate_udp: false,
            mangle_id: false,
        }
    }

    pub fn truncated_over_udp(mut self) -> Self {
        self.truncate_udp = true;
        self
    }

    pub fn with_wrong_id(mut self) -> Self {
        self.mangle_id = true;
        self
    }
}

/// Loopback DNS server answering UDP and TCP on the same port.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_hits: Arc<AtomicUsize>,
    tcp_hits: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(answer: MockAnswer) -> std::io::Result<Self> {
        let (socket, listener) = bind_pair().await?;
        let addr = socket.local_addr()?;
        let udp_hits = Arc::new(AtomicUsize::new(0));
        let tcp_hits = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_counter = Arc::clone(&udp_hits);
        let tcp_counter = Arc::clone(&tcp_hits);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(reply) = build_reply(&buf[..len], &answer, true) {
                                let _ = socket.send_to(&reply, peer).await;
                            }
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            tcp_counter.fetch_add(1, Ordering::SeqCst);
                            let answer = answer.clone();
                            tokio::spawn(async move {
                                let Ok(len) = stream.read_u16().await else { return };
                                let mut query = vec![0u8; len as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                if let Some(reply) = build_reply(&query, &answer, false) {
                                    let _ = stream.write_u16(reply.len() as u16).await;
                                    let _ = stream.write_all(&reply).await;
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_hits,
            tcp_hits,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_hits(&self) -> usize {
        self.udp_hits.load(Ordering::SeqCst)
    }

    pub fn tcp_hits(&self) -> usize {
        self.tcp_hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Picks a UDP port whose TCP twin is also free.
async fn bind_pair() -> std::io::Result<(UdpSocket, TcpListener)> {
    let mut last_err = None;
    for _ in 0..16 {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        match TcpListener::bind(addr).await {
            Ok(listener) => return Ok((socket, listener)),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| std::io::Error::other("no free port pair")))
}

fn build_reply(query_bytes: &[u8], answer: &MockAnswer, over_udp: bool) -> Option<Vec<u8>> {
    let query = Message::from_vec(query_bytes).ok()?;
    let question = query.queries().first()?.clone();

    let id = if answer.mangle_id {
        query.id().wrapping_add(1)
    } else {
        query.id()
    };
    let mut reply = Message::new(id, MessageType::Response, OpCode::Query);
    reply.set_recursion_desired(true);
    reply.set_recursion_available(true);
    reply.set_response_code(answer.rcode);
    reply.add_query(question.clone());

    if over_udp && answer.truncate_udp {
        reply.set_truncated(true);
    } else {
        let owner = question.name().clone();
        if let Some(ip) = answer.address {
            reply.add_answer(Record::from_rdata(owner.clone(), 60, RData::A(A(ip))));
        }
        if let Some(target) = &answer.ptr {
            let target = Name::from_str(target).ok()?;
            reply.add_answer(Record::from_rdata(owner, 60, RData::PTR(PTR(target))));
        }
    }

    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    reply.emit(&mut encoder).ok()?;
    Some(buf)
}
