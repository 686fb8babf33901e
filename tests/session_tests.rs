mod support;

use mnet_rs::constants::{CMD_START, REQ_COMMAND, REQ_DATA, REQ_LOGIN};
use mnet_rs::frame::Frame;
use mnet_rs::obfuscation::{derive_key, encode};
use mnet_rs::typed_value::Value;
use support::{serial_response, ScriptedTransport};

#[tokio::test]
async fn request_data_fetches_serial_then_decodes() {
    let serial = [0x01, 0x02, 0x03, 0x04];
    let key = derive_key(serial);
    // signed-16 value 1234, passthrough conversion
    let typed = [0x03, 0x00, 0x00, 0x00, 0x02, 0x04, 0xD2];
    let encrypted = encode(&typed, &key);
    let data_response = Frame { destination: 0x01, source: 0x02, packet_type: REQ_DATA, payload: encrypted };

    let transport = ScriptedTransport::new(vec![serial_response(serial), data_response]);
    let mut session = mnet_rs::open(transport);

    let value = session.request_data(0x02, 0x9C43, 0).await.unwrap();
    assert_eq!(value, Value::Integer(1234));
}

#[tokio::test]
async fn login_sends_serial_request_then_login() {
    let serial = [0x0A, 0x0B, 0x0C, 0x0D];
    let login_ack = Frame { destination: 0x01, source: 0x02, packet_type: REQ_LOGIN, payload: vec![0x00] };

    let transport = ScriptedTransport::new(vec![serial_response(serial), login_ack]);
    let mut session = mnet_rs::open(transport);
    session.login(0x02).await.unwrap();

    assert_eq!(session.state(), mnet_rs::State::LoggedIn);
}

#[tokio::test]
async fn send_command_round_trips_without_decryption() {
    let serial = [0x01, 0x02, 0x03, 0x04];
    let ack = Frame { destination: 0x01, source: 0x02, packet_type: REQ_COMMAND, payload: vec![] };

    let transport = ScriptedTransport::new(vec![serial_response(serial), ack]);
    let mut session = mnet_rs::open(transport);
    session.send_command(0x02, CMD_START).await.unwrap();
}

#[tokio::test]
async fn write_data_sends_plain_body() {
    let serial = [0x01, 0x02, 0x03, 0x04];
    let ack = Frame {
        destination: 0x01,
        source: 0x02,
        packet_type: mnet_rs::constants::REQ_WRITE_DATA,
        payload: vec![],
    };
    let transport = ScriptedTransport::new(vec![serial_response(serial), ack]);
    let mut session = mnet_rs::open(transport);
    session.write_data(0x02, 0xC353, 1, &[0x00, 0x01, 0x51, 0x80]).await.unwrap();
}
