//! # Payload encoding example
//!
//! Shows the Base64 block encoder used for frame payloads:
//! - one-shot encoding into a caller buffer
//! - inline text values and the `Display` adapter
//! - streaming a payload delivered in pieces
//!
//! ```bash
//! cargo run --example encode_payload
//! ```

use korri_listen::core::PayloadText;
use korri_listen::infra::codec::base64::{
    decode_into, encode_into, encode_into_nul, encoded_len, Base64Writer,
};
use korri_listen::infra::codec::traits::ToBase64;
use korri_listen::protocol::transport::can_frame::CanFrame;

fn main() {
    println!("=== korri-listen payload encoding ===\n");

    // ======================================================================
    // 1. Encode into a caller buffer
    // ======================================================================
    let input = b"Hello";
    let mut buffer = [0u8; 8];
    match encode_into(input, &mut buffer) {
        Ok(text) => println!("Base64: {}", text),
        Err(e) => eprintln!("Encoding error: {}", e),
    }
    println!(
        "   {} bytes -> {} symbols\n",
        input.len(),
        encoded_len(input.len())
    );

    // ======================================================================
    // 2. NUL-terminated output for C-style consumers
    // ======================================================================
    let mut c_buffer = [0xAAu8; 9];
    if let Ok(len) = encode_into_nul(input, &mut c_buffer) {
        println!("2. NUL-terminated: {:?}\n", &c_buffer[..=len]);
    }

    // ======================================================================
    // 3. Frame payloads
    // ======================================================================
    println!("3. Frame payloads");
    let payloads: [&[u8]; 4] = [&[], &[0x4D], &[0x4D, 0x61], &[0x4D, 0x61, 0x6E]];
    for payload in payloads {
        let Some(frame) = CanFrame::standard(0x0B1, payload) else {
            continue;
        };
        let text: PayloadText = frame.to_base64().unwrap_or_default();
        println!(
            "   {:02X?} -> {:<6} ({})",
            frame.payload(),
            text.as_str(),
            frame.base64_display()
        );
    }
    println!();

    // ======================================================================
    // 4. Streaming
    // ======================================================================
    println!("4. Streaming a payload received in pieces");
    let mut out = String::new();
    let mut writer = Base64Writer::new(&mut out);
    for chunk in [&b"Hel"[..], b"l", b"o"] {
        if writer.write(chunk).is_err() {
            eprintln!("   sink refused output");
        }
    }
    if writer.finish().is_ok() {
        println!("   {}", out);
    }

    // ======================================================================
    // 5. Decoding back
    // ======================================================================
    let mut decoded = [0u8; 8];
    match decode_into("SGVsbG8=", &mut decoded) {
        Ok(bytes) => println!("\n5. Decoded: {:?}", String::from_utf8_lossy(bytes)),
        Err(e) => eprintln!("\n5. Decoding error: {}", e),
    }
}
