// tests/envelope_tests.rs
mod common;
use common::{setup, SAMPLE_SOURCE, ZERO_KEY};

use std::collections::HashSet;

use blackbox_envelope::consts::{BLOCK_LEN, IV_LEN};
use blackbox_envelope::{
    decode, decode_to_string, encode, encode_str, encode_with_rng, generate_key,
    generate_key_with, inspect, reseal, CoreError,
};
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use rand::{TryCryptoRng, TryRngCore};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

/// Build `iv ‖ E(block)` without padding, to hand-craft bad pad bytes
fn craft_envelope(key: &[u8], iv: [u8; 16], plaintext_blocks: &[u8]) -> Vec<u8> {
    let ct = Aes256CbcEnc::new_from_slices(key, &iv)
        .unwrap()
        .encrypt_padded_vec_mut::<NoPadding>(plaintext_blocks);
    let mut out = iv.to_vec();
    out.extend_from_slice(&ct);
    out
}

struct DeadRng;

impl TryRngCore for DeadRng {
    type Error = std::io::Error;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        Err(std::io::Error::other("no entropy in sandbox"))
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        Err(std::io::Error::other("no entropy in sandbox"))
    }

    fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
        Err(std::io::Error::other("no entropy in sandbox"))
    }
}

impl TryCryptoRng for DeadRng {}

#[test]
fn round_trip_across_boundary_lengths() {
    setup();
    let key = generate_key().unwrap();
    for len in [0usize, 1, 2, 15, 16, 17, 31, 32, 33, 255, 1000] {
        let plaintext: Vec<u8> = (0..len).map(|i| (i * 7 % 256) as u8).collect();
        let envelope = encode(&plaintext, key.expose_secret()).unwrap();

        let expected_ct = (len / BLOCK_LEN + 1) * BLOCK_LEN;
        assert_eq!(envelope.len(), IV_LEN + expected_ct, "length {len}");

        let decoded = decode(envelope.as_bytes(), key.expose_secret()).unwrap();
        assert_eq!(decoded, plaintext, "length {len}");
    }
}

#[test]
fn round_trip_non_ascii_bytes() {
    let key = generate_key().unwrap();
    let all_bytes: Vec<u8> = (0..=255).collect();
    let envelope = encode(&all_bytes, key.expose_secret()).unwrap();
    assert_eq!(decode(envelope.as_bytes(), key.expose_secret()).unwrap(), all_bytes);

    let text = "λ → 🦀 — naïve façade";
    let envelope = encode_str(text, key.expose_secret()).unwrap();
    assert_eq!(decode_to_string(envelope.as_bytes(), key.expose_secret()).unwrap(), text);
}

#[test]
fn empty_plaintext_yields_one_full_block() {
    let envelope = encode(b"", &ZERO_KEY).unwrap();
    assert_eq!(envelope.ciphertext().len(), BLOCK_LEN);
    assert!(decode(envelope.as_bytes(), &ZERO_KEY).unwrap().is_empty());
}

#[test]
fn zero_key_ab_scenario() {
    let envelope = encode(b"AB", &ZERO_KEY).unwrap();
    assert_eq!(envelope.len(), 32);
    assert_eq!(decode(envelope.as_bytes(), &ZERO_KEY).unwrap(), b"AB");
}

#[test]
fn iv_is_fresh_on_every_encode() {
    let key = generate_key().unwrap();
    let first = encode(b"same plaintext", key.expose_secret()).unwrap();
    let second = encode(b"same plaintext", key.expose_secret()).unwrap();
    assert_ne!(first.iv(), second.iv());
    assert_ne!(first.ciphertext(), second.ciphertext());

    let ivs: HashSet<Vec<u8>> = (0..100)
        .map(|_| encode(b"x", key.expose_secret()).unwrap().iv().to_vec())
        .collect();
    assert_eq!(ivs.len(), 100);
}

#[test]
fn single_bit_flip_never_returns_original() {
    let key = generate_key().unwrap();
    let plaintext = b"print('tamper me please')";
    let envelope = encode(plaintext, key.expose_secret()).unwrap().into_bytes();

    for byte in IV_LEN..envelope.len() {
        for bit in 0..8 {
            let mut tampered = envelope.clone();
            tampered[byte] ^= 1 << bit;
            match decode(&tampered, key.expose_secret()) {
                Ok(decoded) => assert_ne!(decoded, plaintext, "byte {byte} bit {bit}"),
                Err(err) => assert!(
                    matches!(err, CoreError::InvalidPadding),
                    "byte {byte} bit {bit}: {err}"
                ),
            }
        }
    }
}

#[test]
fn wrong_key_never_returns_original() {
    let right = generate_key().unwrap();
    let envelope = encode_str(SAMPLE_SOURCE, right.expose_secret()).unwrap();

    for _ in 0..32 {
        let wrong = generate_key().unwrap();
        match decode(envelope.as_bytes(), wrong.expose_secret()) {
            Ok(decoded) => assert_ne!(decoded, SAMPLE_SOURCE.as_bytes()),
            Err(err) => assert!(matches!(err, CoreError::InvalidPadding), "{err}"),
        }
    }
}

#[test]
fn decode_rejects_malformed_lengths() {
    for len in [0usize, 15, 16, 17, 33, 40] {
        let bytes = vec![0xabu8; len];
        let err = decode(&bytes, &ZERO_KEY).unwrap_err();
        assert!(
            matches!(err, CoreError::MalformedEnvelope { len: l } if l == len),
            "length {len}: {err}"
        );
    }
}

#[test]
fn decode_rejects_bad_pad_bytes() {
    let iv = [7u8; 16];

    let mut pad_zero = [b'A'; 16];
    pad_zero[15] = 0;

    let mut pad_too_big = [b'A'; 16];
    pad_too_big[15] = 17;

    // claims 3 bytes of padding but only the last two match
    let mut pad_inconsistent = [b'A'; 16];
    pad_inconsistent[14] = 3;
    pad_inconsistent[15] = 3;

    for block in [pad_zero, pad_too_big, pad_inconsistent] {
        let envelope = craft_envelope(&ZERO_KEY, iv, &block);
        assert_eq!(envelope.len(), 32);
        assert!(matches!(
            decode(&envelope, &ZERO_KEY),
            Err(CoreError::InvalidPadding)
        ));
    }

    let mut full_pad = [16u8; 16];
    let envelope = craft_envelope(&ZERO_KEY, iv, &full_pad);
    assert!(decode(&envelope, &ZERO_KEY).unwrap().is_empty());

    full_pad[0] = 15;
    let envelope = craft_envelope(&ZERO_KEY, iv, &full_pad);
    assert!(matches!(
        decode(&envelope, &ZERO_KEY),
        Err(CoreError::InvalidPadding)
    ));
}

#[test]
fn key_length_is_checked_on_both_paths() {
    for len in [0usize, 16, 31, 33, 64] {
        let key = vec![1u8; len];
        let err = encode(b"data", &key).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidKeyLength { expected: 32, actual } if actual == len
        ));

        let envelope = encode(b"data", &ZERO_KEY).unwrap();
        let err = decode(envelope.as_bytes(), &key).unwrap_err();
        assert!(matches!(err, CoreError::InvalidKeyLength { .. }));
    }
}

#[test]
fn key_length_is_checked_before_malformed_envelope() {
    let err = decode(&[0u8; 3], &[0u8; 5]).unwrap_err();
    assert!(matches!(err, CoreError::InvalidKeyLength { .. }));
}

#[test]
fn entropy_failure_is_fatal() {
    let err = encode_with_rng(b"data", &ZERO_KEY, &mut DeadRng).unwrap_err();
    assert!(matches!(err, CoreError::EntropySource(ref msg) if msg.contains("no entropy")));

    let err = generate_key_with(&mut DeadRng).unwrap_err();
    assert!(matches!(err, CoreError::EntropySource(_)));

    // the key is rejected before randomness is touched
    let err = encode_with_rng(b"data", &[0u8; 8], &mut DeadRng).unwrap_err();
    assert!(matches!(err, CoreError::InvalidKeyLength { .. }));
}

#[test]
fn decode_to_string_rejects_invalid_utf8() {
    let envelope = encode(&[0xff, 0xfe, 0xfd], &ZERO_KEY).unwrap();
    let err = decode_to_string(envelope.as_bytes(), &ZERO_KEY).unwrap_err();
    assert!(matches!(err, CoreError::InvalidUtf8(_)));
}

#[test]
fn reseal_moves_envelope_to_a_new_key() {
    let old_key = generate_key().unwrap();
    let original = encode_str(SAMPLE_SOURCE, old_key.expose_secret()).unwrap();

    let (resealed, new_key) = reseal(original.as_bytes(), old_key.expose_secret()).unwrap();

    assert_ne!(old_key.expose_secret(), new_key.expose_secret());
    assert_ne!(original.as_bytes(), resealed.as_bytes());
    assert_eq!(
        decode_to_string(resealed.as_bytes(), new_key.expose_secret()).unwrap(),
        SAMPLE_SOURCE
    );
    if let Ok(decoded) = decode(resealed.as_bytes(), old_key.expose_secret()) {
        assert_ne!(decoded, SAMPLE_SOURCE.as_bytes());
    }
}

#[test]
fn reseal_propagates_padding_failure() {
    let key = generate_key().unwrap();
    let envelope = craft_envelope(key.expose_secret(), [1u8; 16], &[0u8; 16]);
    assert!(matches!(
        reseal(&envelope, key.expose_secret()),
        Err(CoreError::InvalidPadding)
    ));
}

#[test]
fn inspect_describes_layout_without_key() {
    let envelope = encode(&[0u8; 20], &ZERO_KEY).unwrap();
    let info = inspect(envelope.as_bytes()).unwrap();

    assert_eq!(info.iv_hex, hex::encode(envelope.iv()));
    assert_eq!(info.envelope_len, 48);
    assert_eq!(info.ciphertext_len, 32);
    assert_eq!(info.blocks, 2);
    assert_eq!(info.min_plaintext_len, 16);
    assert_eq!(info.max_plaintext_len, 31);
    assert_eq!(info.blake3.len(), 64);

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["blocks"], 2);

    assert!(matches!(
        inspect(&[0u8; 16]),
        Err(CoreError::MalformedEnvelope { len: 16 })
    ));
}

#[test]
fn concurrent_encode_decode_share_nothing() {
    let key = generate_key().unwrap();
    let key = key.expose_secret();

    std::thread::scope(|scope| {
        for t in 0..8u8 {
            scope.spawn(move || {
                for i in 0..50usize {
                    let plaintext = vec![t; i];
                    let envelope = encode(&plaintext, key).unwrap();
                    assert_eq!(decode(envelope.as_bytes(), key).unwrap(), plaintext);
                }
            });
        }
    });
}
