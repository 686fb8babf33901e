//! Session-keyed symmetric obfuscation. The 5-byte key is derived once from
//! the controller's 4-byte serial number; `encode`/`decode` are a stateful
//! stream transform keyed by that derived key plus a running byte chain.

use crate::constants::OBFUSCATION_CONSTANT;

/// Derive the 5-byte session key from a controller's 4-byte serial number.
pub fn derive_key(serial: [u8; 4]) -> [u8; 5] {
    let [p0, p1, p2, p3] = serial;
    [
        (p2 & p1).wrapping_sub(p2),
        p1.wrapping_add(p0).wrapping_add(p3),
        (p3.wrapping_add(p0)) ^ p1,
        (p3 & p1).wrapping_add(p2),
        (p3 | p2).wrapping_sub(p3),
    ]
}

/// Obfuscate `data` for transmission.
pub fn encode(data: &[u8], key: &[u8; 5]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut prev: u8 = 0;
    for (i, &b) in data.iter().enumerate() {
        let k = key[i % 5];
        let transformed = (k.wrapping_sub(prev) ^ b).wrapping_add(OBFUSCATION_CONSTANT);
        out.push(transformed);
        prev = b;
    }
    out
}

/// Recover plaintext from a payload produced by [`encode`].
pub fn decode(data: &[u8], key: &[u8; 5]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut prev: u8 = 0;
    for (i, &b) in data.iter().enumerate() {
        let k = key[i % 5];
        let plain = b.wrapping_sub(OBFUSCATION_CONSTANT) ^ k.wrapping_sub(prev);
        out.push(plain);
        prev = plain;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn derive_key_worked_example() {
        let key = derive_key([0x01, 0x02, 0x03, 0x04]);
        assert_eq!(key, [0xFF, 0x07, 0x07, 0x03, 0x03]);
    }

    #[test]
    fn round_trip_ascii() {
        let key = derive_key([0x01, 0x02, 0x03, 0x04]);
        let plain = b"Hello, World!";
        let cipher = encode(plain, &key);
        let recovered = decode(&cipher, &key);
        assert_eq!(recovered, plain);
    }

    proptest! {
        #[test]
        fn round_trip_arbitrary(serial in any::<[u8; 4]>(), data in proptest::collection::vec(any::<u8>(), 0..64)) {
            let key = derive_key(serial);
            let cipher = encode(&data, &key);
            let recovered = decode(&cipher, &key);
            prop_assert_eq!(recovered, data);
        }
    }
}
