//! Full-stack integration tests for the auris monitor.
//!
//! These exercise the pipeline the binary wires together: a datagram
//! arrives on a socket, the listener loop hands it to a handler, and the
//! protocol crate decodes it. The service-browse test builds the kind of
//! compressed multi-record response a real mDNS responder sends.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use auris_net::{DatagramHandler, Family, ListenerLoop, MulticastSocket, ReceiveMetadata};
use auris_proto::{encode_query, Message, Name, RData, RecordType, Type};

/// Collects received payloads for later inspection.
#[derive(Default)]
struct Recorder {
    payloads: Mutex<Vec<(Vec<u8>, ReceiveMetadata)>>,
}

impl DatagramHandler for Recorder {
    fn handle(&self, payload: &[u8], meta: &ReceiveMetadata) {
        self.payloads.lock().push((payload.to_vec(), *meta));
    }
}

#[test]
fn test_decode_service_announcement() {
    let data = build_service_announcement();
    let message = Message::parse(&data).unwrap();

    assert!(message.header.is_response());
    assert_eq!(message.answers.len(), 1);
    assert_eq!(message.additionals.len(), 3);

    let ptr = &message.answers[0];
    assert_eq!(ptr.name.to_string(), "_ipp._tcp.local");
    assert_eq!(ptr.ttl, 4500);
    let RData::Ptr(instance) = ptr.data().unwrap() else {
        panic!("expected PTR data");
    };
    assert_eq!(instance.to_string(), "printer._ipp._tcp.local");

    let srv = &message.additionals[0];
    assert_eq!(srv.name.to_string(), "printer._ipp._tcp.local");
    assert!(srv.cache_flush());
    let RData::Srv { port, target, .. } = srv.data().unwrap() else {
        panic!("expected SRV data");
    };
    assert_eq!(port, 631);
    assert_eq!(target.to_string(), "host.local");

    let txt = &message.additionals[1];
    let RData::Txt(strings) = txt.data().unwrap() else {
        panic!("expected TXT data");
    };
    assert_eq!(strings, vec![b"txtvers=1".as_slice()]);

    let a = &message.additionals[2];
    assert_eq!(a.name.to_string(), "host.local");
    assert_eq!(a.rtype, Type::Known(RecordType::A));
    let RData::A(addr) = a.data().unwrap() else {
        panic!("expected A data");
    };
    assert_eq!(addr, Ipv4Addr::new(192, 168, 1, 50));
}

/// Builds a response resembling a printer announcing itself: a PTR
/// answer plus SRV, TXT, and A additionals, names compressed against
/// each other the way responders actually emit them. Offsets are tracked
/// as the buffer grows.
fn build_service_announcement() -> Vec<u8> {
    fn pointer(offset: u16) -> [u8; 2] {
        (0xC000 | offset).to_be_bytes()
    }

    let mut data = Vec::new();
    data.extend_from_slice(&[
        0x00, 0x00, 0x84, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x03,
    ]);

    // Answer: _ipp._tcp.local 4500 IN PTR printer._ipp._tcp.local
    let service = data.len() as u16;
    data.extend_from_slice(b"\x04_ipp\x04_tcp");
    let local = data.len() as u16;
    data.extend_from_slice(b"\x05local\x00");
    data.extend_from_slice(&12u16.to_be_bytes()); // PTR
    data.extend_from_slice(&1u16.to_be_bytes()); // IN
    data.extend_from_slice(&4500u32.to_be_bytes());
    let instance = data.len() as u16 + 2; // rdata starts after rdlength
    let mut rdata = Vec::new();
    rdata.extend_from_slice(b"\x07printer");
    rdata.extend_from_slice(&pointer(service));
    data.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    data.extend_from_slice(&rdata);

    // Additional: printer._ipp._tcp.local 120 IN+flush SRV 0 0 631 host.local
    data.extend_from_slice(&pointer(instance));
    data.extend_from_slice(&33u16.to_be_bytes()); // SRV
    data.extend_from_slice(&0x8001u16.to_be_bytes());
    data.extend_from_slice(&120u32.to_be_bytes());
    let mut rdata = Vec::new();
    rdata.extend_from_slice(&0u16.to_be_bytes()); // priority
    rdata.extend_from_slice(&0u16.to_be_bytes()); // weight
    rdata.extend_from_slice(&631u16.to_be_bytes()); // port
    let host = data.len() as u16 + 2 + 6; // target name offset within message
    rdata.extend_from_slice(b"\x04host");
    rdata.extend_from_slice(&pointer(local));
    data.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    data.extend_from_slice(&rdata);

    // Additional: printer._ipp._tcp.local 4500 IN+flush TXT "txtvers=1"
    data.extend_from_slice(&pointer(instance));
    data.extend_from_slice(&16u16.to_be_bytes()); // TXT
    data.extend_from_slice(&0x8001u16.to_be_bytes());
    data.extend_from_slice(&4500u32.to_be_bytes());
    let txt = b"\x09txtvers=1"; // no trailing zero, RFC 6763 style
    data.extend_from_slice(&(txt.len() as u16).to_be_bytes());
    data.extend_from_slice(txt);

    // Additional: host.local 120 IN+flush A 192.168.1.50
    data.extend_from_slice(&pointer(host));
    data.extend_from_slice(&1u16.to_be_bytes()); // A
    data.extend_from_slice(&0x8001u16.to_be_bytes());
    data.extend_from_slice(&120u32.to_be_bytes());
    data.extend_from_slice(&4u16.to_be_bytes());
    data.extend_from_slice(&[192, 168, 1, 50]);

    data
}

#[tokio::test]
async fn test_listener_delivers_decodable_query() {
    let receiver = MulticastSocket::bind(Family::V4, 0).unwrap();
    let port = receiver.local_addr().port();
    let recorder = Arc::new(Recorder::default());
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(ListenerLoop::new(receiver, recorder.clone(), shutdown.clone()).run());

    let name: Name = "_services._dns-sd._udp.local".parse().unwrap();
    let query = encode_query(0, &name, RecordType::PTR, false);

    let sender = MulticastSocket::bind(Family::V4, 0).unwrap();
    let target = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port);
    sender.send_to(&query, target).await.unwrap();

    for _ in 0..100 {
        if !recorder.payloads.lock().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    shutdown.cancel();
    task.await.unwrap().unwrap();

    let payloads = recorder.payloads.lock();
    let (payload, meta) = payloads.first().expect("query never arrived");
    assert_eq!(meta.destination, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));

    let message = Message::parse(payload).unwrap();
    assert!(message.header.is_query());
    assert_eq!(message.questions.len(), 1);
    assert_eq!(message.questions[0].name, name);
}
