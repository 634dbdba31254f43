//! Encode a payment, decode it back and print the QR image link.
//!
//! Uses `PIX_KEY` (and the other `PIX_*` variables) when set, otherwise a
//! sample random key.
//!
//! Run: `cargo run --example encode_payment`

use std::process::ExitCode;

use pix_brcode::config::EncoderConfig;
use pix_brcode::models::EncodeRequest;
use pix_brcode::qr::{QrImageOptions, qr_image_url};
use pix_brcode::{PixEncoder, decode};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = EncoderConfig::from_env()?;
    let mut request = EncodeRequest::new().amount("49.90").reference("DEMO01");
    if config.payee_key().is_none() {
        request = request.payee_key("9aacbabc-39ad-4602-b73e-955703ec502e");
    }
    let encoder = PixEncoder::new(config);

    let encoded = encoder.encode_request(&request)?;
    println!("Payload:  {encoded}");
    println!("Checksum: {}", encoded.checksum());

    let decoded = decode(encoded.as_str())?;
    let payment = decoded.payment();
    println!(
        "Decoded:  key={} ({}) amount={} merchant={} / {}",
        payment.key(),
        payment.key().kind(),
        payment
            .amount()
            .map_or_else(|| "none".to_owned(), |amount| amount.to_string()),
        payment.merchant_name(),
        payment.merchant_city()
    );

    let url = qr_image_url(&encoded, &QrImageOptions::default())?;
    println!("QR image: {url}");
    Ok(())
}
