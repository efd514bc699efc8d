//! Bit-oriented HDLC framing for byte messages
//!
//! Turns a byte payload into the bit stream the modulator transmits:
//! `flag, escaped payload, escaped FCS, flag`. Bytes go out LSB first and a
//! 0 is stuffed after every run of five 1s outside the flags.

/// Frame boundary octet, never stuffed
pub const FRAME_BOUNDARY_OCTET: u8 = 0x7E;

/// Escape octet; the following byte has bit 5 inverted
pub const CONTROL_ESCAPE_OCTET: u8 = 0x7D;

const INVERT_OCTET: u8 = 0x20;

const CRC16_CCITT_INIT: u16 = 0xFFFF;

/// CRC-16-CCITT (poly 0x1021, init 0xFFFF, MSB first) used as the frame check sequence
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u32 = CRC16_CCITT_INIT as u32;
    for &byte in data {
        crc ^= (byte as u32) << 8;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x10000 != 0 {
                crc ^= 0x1021;
            }
        }
    }
    (crc & 0xFFFF) as u16
}

/// Bitwise HDLC frame encoder
///
/// The run of consecutive 1 bits is carried from byte to byte, so a single
/// encoder should be used for a whole frame.
#[derive(Debug, Default)]
pub struct HdlcEncoder {
    ones_run: usize,
    bits: Vec<u8>,
}

impl HdlcEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode one frame and return its bits (each 0 or 1)
    pub fn encode_frame(&mut self, payload: &[u8]) -> Vec<u8> {
        self.bits.clear();
        self.ones_run = 0;

        self.push_raw(FRAME_BOUNDARY_OCTET);
        for &byte in payload {
            self.push_escaped(byte);
        }

        // FCS goes out high byte first
        let fcs = crc16(payload);
        self.push_escaped((fcs >> 8) as u8);
        self.push_escaped(fcs as u8);

        self.push_raw(FRAME_BOUNDARY_OCTET);

        log::trace!(
            "HDLC framed {} bytes into {} bits",
            payload.len(),
            self.bits.len()
        );
        std::mem::take(&mut self.bits)
    }

    fn push_raw(&mut self, byte: u8) {
        for i in 0..8 {
            self.bits.push((byte >> i) & 1);
        }
    }

    fn push_stuffed(&mut self, byte: u8) {
        for i in 0..8 {
            let bit = (byte >> i) & 1;
            self.bits.push(bit);
            if bit == 1 {
                self.ones_run += 1;
                if self.ones_run == 5 {
                    self.bits.push(0);
                    self.ones_run = 0;
                }
            } else {
                self.ones_run = 0;
            }
        }
    }

    fn push_escaped(&mut self, byte: u8) {
        if byte == FRAME_BOUNDARY_OCTET || byte == CONTROL_ESCAPE_OCTET {
            self.push_stuffed(CONTROL_ESCAPE_OCTET);
            self.push_stuffed(byte ^ INVERT_OCTET);
        } else {
            self.push_stuffed(byte);
        }
    }
}

/// Frame a payload with a fresh encoder
pub fn frame_bits(payload: &[u8]) -> Vec<u8> {
    HdlcEncoder::new().encode_frame(payload)
}
