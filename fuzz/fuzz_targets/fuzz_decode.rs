#![no_main]

use booster_draft::core::codec::TextCodec;
use booster_draft::protocol::message::Message;
use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic the decoder or the message parsers
    let mut codec = TextCodec::default().with_max_payload(64 * 1024);
    let mut buf = BytesMut::from(data);
    while let Ok(Some(text)) = codec.decode(&mut buf) {
        let _ = Message::parse_server(&text);
        let _ = Message::parse_pick(&text);
    }
});
