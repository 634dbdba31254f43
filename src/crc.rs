//! CRC-16/CCITT-FALSE checksum carried in `BRCode` tag `63`.
//!
//! Polynomial `0x1021`, initial register `0xFFFF`, MSB-first, no reflection
//! and no final XOR, computed over the UTF-8 bytes of the input. Encoded
//! payloads are ASCII, so bytes and characters coincide.

/// Generator polynomial.
const POLYNOMIAL: u16 = 0x1021;

/// Initial register value.
const INITIAL: u16 = 0xFFFF;

/// Computes the CRC-16/CCITT-FALSE of `input`.
///
/// # Examples
///
/// ```
/// assert_eq!(pix_brcode::crc::crc16("123456789"), 0x29B1);
/// ```
#[inline]
#[must_use]
pub fn crc16(input: &str) -> u16 {
    input.bytes().fold(INITIAL, update)
}

/// Computes the checksum of `input` rendered as 4 uppercase hex digits.
#[inline]
#[must_use]
pub fn checksum_hex(input: &str) -> String {
    format_checksum(crc16(input))
}

/// Renders a checksum as 4 uppercase, zero-padded hex digits.
pub(crate) fn format_checksum(value: u16) -> String {
    format!("{value:04X}")
}

/// Feeds one byte through the register.
fn update(register: u16, byte: u8) -> u16 {
    let mut crc = register ^ (u16::from(byte) << 8_u8);
    for _ in 0..8_u8 {
        crc = if crc & 0x8000 == 0 {
            crc << 1_u8
        } else {
            (crc << 1_u8) ^ POLYNOMIAL
        };
    }
    crc
}
