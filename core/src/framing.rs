use crate::{POSTAMBLE_SYMBOLS, PREAMBLE_SYMBOLS};

/// Symbol framing around a payload
///
/// A frame is `preamble ++ payload ++ postamble`. The preamble alternates
/// 0,1,0,1,... so a receiver sees a steady edge pattern to lock onto; the
/// postamble is all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub preamble_symbols: usize,
    pub postamble_symbols: usize,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            preamble_symbols: PREAMBLE_SYMBOLS,
            postamble_symbols: POSTAMBLE_SYMBOLS,
        }
    }
}

impl FrameLayout {
    pub fn new(preamble_symbols: usize, postamble_symbols: usize) -> Self {
        Self {
            preamble_symbols,
            postamble_symbols,
        }
    }

    /// Total symbols in a frame carrying `payload_len` bits
    pub fn frame_len(&self, payload_len: usize) -> usize {
        self.preamble_symbols + payload_len + self.postamble_symbols
    }

    /// `frame_len` that reports overflow instead of wrapping
    pub fn checked_frame_len(&self, payload_len: usize) -> Option<usize> {
        self.preamble_symbols
            .checked_add(payload_len)?
            .checked_add(self.postamble_symbols)
    }

    pub fn preamble(&self) -> impl Iterator<Item = bool> {
        (0..self.preamble_symbols).map(|k| k % 2 == 1)
    }

    pub fn postamble(&self) -> impl Iterator<Item = bool> {
        std::iter::repeat(false).take(self.postamble_symbols)
    }

    /// Full symbol sequence for a payload
    ///
    /// Payload values wider than one bit are reduced to their least
    /// significant bit.
    pub fn symbols<'a>(&self, bits: &'a [u8]) -> impl Iterator<Item = bool> + 'a {
        self.preamble()
            .chain(bits.iter().map(|&b| b & 1 == 1))
            .chain(self.postamble())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = FrameLayout::default();
        assert_eq!(layout.preamble_symbols, 20);
        assert_eq!(layout.postamble_symbols, 5);
        assert_eq!(layout.frame_len(3), 28);
        assert_eq!(layout.frame_len(0), 25);
        assert_eq!(layout.checked_frame_len(3), Some(28));
        assert_eq!(layout.checked_frame_len(usize::MAX), None);
    }

    #[test]
    fn test_preamble_alternates_from_zero() {
        let preamble: Vec<bool> = FrameLayout::default().preamble().collect();
        assert_eq!(preamble.len(), 20);
        for (k, &symbol) in preamble.iter().enumerate() {
            assert_eq!(symbol, k % 2 == 1, "preamble symbol {}", k);
        }
    }

    #[test]
    fn test_symbols_order() {
        let layout = FrameLayout::new(4, 2);
        let symbols: Vec<bool> = layout.symbols(&[1, 1, 0]).collect();
        assert_eq!(
            symbols,
            vec![false, true, false, true, true, true, false, false, false]
        );
    }

    #[test]
    fn test_wide_values_use_lsb() {
        let layout = FrameLayout::new(0, 0);
        let symbols: Vec<bool> = layout.symbols(&[2, 3, 0xFF, 0x10]).collect();
        assert_eq!(symbols, vec![false, true, true, false]);
    }
}
