//! Packed 16-bit codeword layout shared by the block encoder and the
//! lookup table generator.
//!
//! Every coefficient travels as `(top6 << 10) | int10`, where the top six
//! bits carry the quantization scale (DC words) or a zero-run length (AC
//! words), and the low ten bits carry the coefficient in two's complement.
//! Keeping the packing here guarantees the encoder's stream and the
//! decoder's tables agree on bit layout.

/// End-of-block marker. Also used as the stream padding filler, since the
/// decoder treats surplus markers as empty blocks.
pub const EOB_WORD: u16 = 0xfe00;

/// Encode a coefficient as a 10-bit two's-complement field.
///
/// Values outside [-512, 511] saturate to the boundary.
#[inline]
pub fn to_int10(value: i32) -> u16 {
    let clamped = value.clamp(-0x200, 0x1ff);
    (clamped & 0x3ff) as u16
}

/// Decode a 10-bit two's-complement field back to a coefficient.
#[inline]
pub fn from_int10(field: u16) -> i32 {
    let field = (field & 0x3ff) as i32;
    if field >= 0x200 {
        field - 0x400
    } else {
        field
    }
}

/// Pack a DC word: quantization scale in the top 6 bits, clamped DC
/// coefficient in the low 10.
#[inline]
pub fn dc_word(scale: u8, dc: i32) -> u16 {
    ((scale as u16) << 10) | to_int10(dc)
}

/// Pack an AC word: preceding zero-run length in the top 6 bits, nonzero
/// coefficient in the low 10.
#[inline]
pub fn ac_word(run_length: u8, ac: i32) -> u16 {
    ((run_length as u16) << 10) | to_int10(ac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int10_roundtrip_in_range() {
        for v in -512..=511 {
            assert_eq!(from_int10(to_int10(v)), v, "value {}", v);
        }
    }

    #[test]
    fn test_int10_saturates_out_of_range() {
        assert_eq!(from_int10(to_int10(512)), 511);
        assert_eq!(from_int10(to_int10(100_000)), 511);
        assert_eq!(from_int10(to_int10(-513)), -512);
        assert_eq!(from_int10(to_int10(-100_000)), -512);
    }

    #[test]
    fn test_int10_known_encodings() {
        assert_eq!(to_int10(0), 0x000);
        assert_eq!(to_int10(1), 0x001);
        assert_eq!(to_int10(-1), 0x3ff);
        assert_eq!(to_int10(-11), 0x3f5);
        assert_eq!(to_int10(511), 0x1ff);
        assert_eq!(to_int10(-512), 0x200);
    }

    #[test]
    fn test_word_packing() {
        assert_eq!(dc_word(8, 5), (8 << 10) | 5);
        assert_eq!(ac_word(3, -2), (3 << 10) | 0x3fe);
    }

    #[test]
    fn test_eob_marker_decomposition() {
        // 0xfe00 reads as run 63 with a -512 value field; a genuine run-63
        // word with an empty value field is a different word.
        assert_eq!(ac_word(63, -512), EOB_WORD);
        assert_eq!(EOB_WORD >> 10, 63);
        assert_eq!(from_int10(EOB_WORD), -512);
        assert_ne!(ac_word(63, 0), EOB_WORD);
    }
}
