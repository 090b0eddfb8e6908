use super::*;
use proptest::prelude::*;

/// Interpret up to 16 bytes as a big-endian integer, so shifts can be checked against
/// native integer shifts.
fn to_u128(buf: &[u8]) -> u128 {
    buf.iter().fold(0, |acc, &b| (acc << 8) | u128::from(b))
}

fn reference_shift(dir: ShiftDirection, buf: &[u8], n: usize) -> u128 {
    let bits = buf.len() * 8;
    let value = to_u128(buf);
    if n >= bits {
        return 0;
    }
    let mask = if bits == 128 {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    };
    match dir {
        ShiftDirection::Left => (value << n) & mask,
        ShiftDirection::Right => value >> n,
    }
}

#[test]
fn test_shift_beef() {
    let mut out = [0u8; 2];
    let shifted = shift(ShiftDirection::Left, &[0xBE, 0xEF], 4, &mut out).unwrap();
    assert_eq!(shifted, &[0xEE, 0xF0]);

    // 0xBEEF >> 4 read as one big-endian value, not [0x0E, 0xEF]
    let shifted = shift(ShiftDirection::Right, &[0xBE, 0xEF], 4, &mut out).unwrap();
    assert_eq!(shifted, &[0x0B, 0xEE]);
}

#[test]
fn test_shift_zero_copies() {
    let input = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
    let mut out = [0u8; 11];
    shift(ShiftDirection::Left, &input, 0, &mut out).unwrap();
    assert_eq!(out, input);
    shift(ShiftDirection::Right, &input, 0, &mut out).unwrap();
    assert_eq!(out, input);
}

#[test]
fn test_shift_out_everything() {
    let input = [0xFFu8; 13];
    let mut out = [0xAAu8; 13];
    shift(ShiftDirection::Left, &input, 13 * 8, &mut out).unwrap();
    assert_eq!(out, [0; 13]);

    let mut out = [0xAAu8; 13];
    shift(ShiftDirection::Right, &input, 1000, &mut out).unwrap();
    assert_eq!(out, [0; 13]);

    let mut buf = [0xFFu8; 5];
    shift_in_place(ShiftDirection::Left, &mut buf, 40);
    assert_eq!(buf, [0; 5]);
}

#[test]
fn test_shift_undersized_output() {
    let mut out = [0u8; 3];
    let result = shift(ShiftDirection::Left, &[1, 2, 3, 4], 1, &mut out);
    assert!(matches!(
        result,
        Err(Error::InvalidArgument { name: "out", .. })
    ));
}

#[test]
fn test_shift_leaves_surplus_output() {
    let mut out = [0x55u8; 4];
    let shifted = shift(ShiftDirection::Right, &[0x80, 0x01], 1, &mut out).unwrap();
    assert_eq!(shifted.len(), 2);
    assert_eq!(out, [0x40, 0x00, 0x55, 0x55]);
}

#[test]
fn test_shift_carries_across_chunks() {
    // a single set bit walks over the boundary between the first chunk and the tail
    let mut buf = [0u8; 10];
    buf[7] = 0x01;
    shift_in_place(ShiftDirection::Right, &mut buf, 1);
    assert_eq!(buf, [0, 0, 0, 0, 0, 0, 0, 0, 0x80, 0]);

    shift_in_place(ShiftDirection::Left, &mut buf, 1);
    assert_eq!(buf, [0, 0, 0, 0, 0, 0, 0, 0x01, 0, 0]);

    shift_in_place(ShiftDirection::Right, &mut buf, 9);
    assert_eq!(buf, [0, 0, 0, 0, 0, 0, 0, 0, 0, 0x80]);
}

#[test]
fn test_shift_in_place_whole_bytes() {
    let mut buf = [1, 2, 3, 4, 5, 6, 7, 8, 9];
    shift_in_place(ShiftDirection::Left, &mut buf, 16);
    assert_eq!(buf, [3, 4, 5, 6, 7, 8, 9, 0, 0]);
    shift_in_place(ShiftDirection::Right, &mut buf, 24);
    assert_eq!(buf, [0, 0, 0, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_combine_truncates() {
    let a = [0xF0u8; 12];
    let b = [0x3Cu8; 9];
    let mut out = [0x11u8; 12];
    combine(BitOp::And, &a, &b, &mut out);
    assert_eq!(&out[..9], &[0x30; 9]);
    assert_eq!(&out[9..], &[0x11; 3]);

    let mut a = [0xF0u8; 3];
    combine_in_place(BitOp::Or, &mut a, &[0x0F]);
    assert_eq!(a, [0xFF, 0xF0, 0xF0]);
}

#[test]
fn test_combine_all_ops() {
    let a = [0b1100u8];
    let b = [0b1010u8];
    let mut out = [0u8];
    let cases = [
        (BitOp::And, 0b0000_1000),
        (BitOp::Or, 0b0000_1110),
        (BitOp::Xor, 0b0000_0110),
        (BitOp::Nand, 0b1111_0111),
        (BitOp::Nor, 0b1111_0001),
        (BitOp::Xnor, 0b1111_1001),
    ];
    for (op, expected) in cases {
        combine(op, &a, &b, &mut out);
        assert_eq!(out[0], expected, "mismatch for {:?}", op);
    }
}

#[test]
fn test_mask_u8_and_u64() {
    let mut buf = [0xFFu8; 5];
    apply_mask_in_place(MaskOp::And, &mut buf, 0x0Fu8);
    assert_eq!(buf, [0x0F; 5]);

    let mut out = [0u8; 11];
    apply_mask(
        MaskOp::Or,
        &[0u8; 11],
        0x0102_0304_0506_0708u64,
        &mut out,
    );
    assert_eq!(out, [1, 2, 3, 4, 5, 6, 7, 8, 1, 2, 3]);
}

#[test]
fn test_mask_partial_chunk_uses_high_bytes() {
    let mut buf = [0xFFu8; 3];
    apply_mask_in_place(MaskOp::And, &mut buf, 0xAB00_00CDu32);
    assert_eq!(buf, [0xAB, 0x00, 0x00]);
}

#[test]
fn test_invert() {
    let mut out = [0u8; 10];
    invert(&[0x0F; 10], &mut out);
    assert_eq!(out, [0xF0; 10]);
}

fn two_buffers() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    (0usize..40).prop_flat_map(|len| {
        (
            prop::collection::vec(any::<u8>(), len),
            prop::collection::vec(any::<u8>(), len),
        )
    })
}

proptest! {
    #[test]
    fn and_with_self_is_identity(x in prop::collection::vec(any::<u8>(), 0..40)) {
        let mut out = vec![0; x.len()];
        combine(BitOp::And, &x, &x, &mut out);
        prop_assert_eq!(out, x);
    }

    #[test]
    fn xor_with_self_is_zero(x in prop::collection::vec(any::<u8>(), 0..40)) {
        let mut out = x.clone();
        combine_in_place(BitOp::Xor, &mut out, &x);
        prop_assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn or_with_zero_is_identity(x in prop::collection::vec(any::<u8>(), 0..40)) {
        let zeros = vec![0; x.len()];
        let mut out = vec![0xAA; x.len()];
        combine(BitOp::Or, &x, &zeros, &mut out);
        prop_assert_eq!(out, x);
    }

    #[test]
    fn nand_is_inverted_and((x, y) in two_buffers()) {
        let mut nand = vec![0; x.len()];
        combine(BitOp::Nand, &x, &y, &mut nand);

        let mut and = vec![0; x.len()];
        combine(BitOp::And, &x, &y, &mut and);
        invert_in_place(&mut and);

        prop_assert_eq!(nand, and);
    }

    #[test]
    fn xnor_and_nor_match_bytewise((x, y) in two_buffers()) {
        let mut xnor = vec![0; x.len()];
        let mut nor = vec![0; x.len()];
        combine(BitOp::Xnor, &x, &y, &mut xnor);
        combine(BitOp::Nor, &x, &y, &mut nor);
        for i in 0..x.len() {
            prop_assert_eq!(xnor[i], !(x[i] ^ y[i]));
            prop_assert_eq!(nor[i], !(x[i] | y[i]));
        }
    }

    #[test]
    fn shift_matches_integer_shift(
        buf in prop::collection::vec(any::<u8>(), 0..=16),
        n in 0usize..140,
        left in any::<bool>(),
    ) {
        let dir = if left { ShiftDirection::Left } else { ShiftDirection::Right };
        let expected = reference_shift(dir, &buf, n);

        let mut out = vec![0; buf.len()];
        shift(dir, &buf, n, &mut out).unwrap();
        prop_assert_eq!(to_u128(&out), expected);

        let mut in_place = buf.clone();
        shift_in_place(dir, &mut in_place, n);
        prop_assert_eq!(in_place, out);
    }

    #[test]
    fn shift_round_trip_keeps_middle_bits(
        buf in prop::collection::vec(any::<u8>(), 1..64),
        n in 0usize..16,
    ) {
        // shifting left and back right clears exactly the top `n` bits
        let mut shifted = buf.clone();
        shift_in_place(ShiftDirection::Left, &mut shifted, n);
        shift_in_place(ShiftDirection::Right, &mut shifted, n);

        let mut expected = buf.clone();
        let mut mask = vec![0xFFu8; buf.len()];
        shift_in_place(ShiftDirection::Right, &mut mask, n);
        combine_in_place(BitOp::And, &mut expected, &mask);
        prop_assert_eq!(shifted, expected);
    }

    #[test]
    fn mask_matches_bytewise_tiling(
        buf in prop::collection::vec(any::<u8>(), 0..40),
        mask in any::<u32>(),
        and in any::<bool>(),
    ) {
        let op = if and { MaskOp::And } else { MaskOp::Or };
        let mut out = vec![0; buf.len()];
        apply_mask(op, &buf, mask, &mut out);

        let tile = mask.to_be_bytes();
        for (i, (&b, &o)) in buf.iter().zip(&out).enumerate() {
            let m = tile[i % 4];
            prop_assert_eq!(o, if and { b & m } else { b | m });
        }
    }
}
