use crate::bits::BitString;
use crate::consts::MATTRESS_CHECKSUM_LEN;

/// Mattress checksum: the number of `1` bits in `payload`, as a 6-bit field.
pub(crate) fn ones_count(payload: &BitString) -> BitString {
    BitString::from_value_truncated(payload.count_ones(), MATTRESS_CHECKSUM_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_ones() {
        let payload: BitString = "1000000000000000111".parse().unwrap();
        assert_eq!(ones_count(&payload), "000100".parse().unwrap());
    }

    #[test]
    fn test_single_bit_flip_moves_checksum_by_one() {
        let payload: BitString = "1010011100001010110".parse().unwrap();
        let base = ones_count(&payload).value() as i32;
        for i in 0..payload.len() {
            let flipped =
                BitString::from_value(payload.value() ^ (1 << i), payload.len()).unwrap();
            let sum = ones_count(&flipped).value() as i32;
            assert_eq!((sum - base).abs(), 1);
        }
    }
}
