#[cfg(test)]
mod test {
    use super::super::*;

    #[test]
    fn encodings_are_big_endian() {
        assert_eq!(vec![0x12, 0x34], 0x1234i16.to_be_vec());
        assert_eq!(vec![0, 0, 0, 7], 7i32.to_be_vec());
        assert_eq!(vec![0xff, 0xff, 0xff, 0xfe], (-2i32).to_be_vec());
        assert_eq!(vec![0, 0, 0, 0, 0, 0, 0x01, 0x00], 256i64.to_be_vec());
        assert_eq!(vec![0, 0x61], ('a' as u16).to_be_vec());
        assert_eq!(
            vec![0x3f, 0xf0, 0, 0, 0, 0, 0, 0],
            1.0f64.to_be_vec(),
            "f64 is encoded through its bits, not textually"
        );
    }

    #[test]
    fn decodings() {
        assert_eq!(Some(-2), i32::from_be_slice(&[0xff, 0xff, 0xff, 0xfe]));
        assert_eq!(Some(-1), i16::from_be_slice(&[0xff, 0xff]));
        assert_eq!(Some(0x1234), i16::from_be_slice(&[0x12, 0x34, 0x56]));
        assert_eq!(
            Some(i64::MAX),
            i64::from_be_slice(&[0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff])
        );
        let pi = std::f64::consts::PI;
        assert_eq!(Some(pi), f64::from_be_slice(&pi.to_be_vec()));
    }

    #[test]
    fn short_input() {
        assert_eq!(None, i16::from_be_slice(&[1]));
        assert_eq!(None, i32::from_be_slice(&[1, 2, 3]));
        assert_eq!(None, i64::from_be_slice(&[]));
        assert_eq!(None, f64::from_be_slice(&[0; 7]));

        assert_eq!(i16::MIN, i16::from_be_slice_or_sentinel(&[1]));
        assert_eq!(i32::MIN, i32::from_be_slice_or_sentinel(&[1, 2, 3]));
        assert_eq!(i64::MIN, i64::from_be_slice_or_sentinel(&[]));
        assert!(f64::from_be_slice_or_sentinel(&[0; 7]).is_nan());
    }

    #[test]
    fn sentinel_valued_payload_is_not_a_failure() {
        let buf = i32::MIN.to_be_vec();
        assert_eq!(Some(i32::MIN), i32::from_be_slice(&buf));
        assert_eq!(i32::MIN, i32::from_be_slice_or_sentinel(&buf));
    }
}
