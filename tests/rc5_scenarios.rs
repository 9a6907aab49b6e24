//! End-to-end scenarios for password based RC5 encryption.

use cryptolabs::security::{
    derive_key, derive_key_bits, md5_digest, md5_hex, IvFraming, KeySize, Rc5, Rc5Config,
    Rc5Service,
};
use cryptolabs::Error;

#[test]
fn hello_rc5_with_128_bit_key() {
    let key = derive_key("testpass", KeySize::Bits128);
    let rc5 = Rc5::new(&key).unwrap();

    let ct = rc5.encrypt_cbc(b"Hello RC5!");
    // one 8-byte encrypted IV block, then 10 bytes padded to 16
    assert_eq!(ct.len(), 8 + 16);
    assert_eq!(rc5.decrypt_cbc(&ct).unwrap(), b"Hello RC5!".to_vec());

    let wrong = Rc5::new(&derive_key("otherpass", KeySize::Bits128)).unwrap();
    match wrong.decrypt_cbc(&ct) {
        Ok(plain) => assert_ne!(plain, b"Hello RC5!".to_vec()),
        Err(err) => assert!(matches!(err, Error::CorruptedData(_))),
    }
}

#[test]
fn same_plaintext_encrypts_differently() {
    let service = Rc5Service::default();
    let a = service.encrypt_text("repeat", "pw").unwrap();
    let b = service.encrypt_text("repeat", "pw").unwrap();
    assert_ne!(a, b);
    assert_eq!(service.decrypt_text(&a, "pw").unwrap(), "repeat");
    assert_eq!(service.decrypt_text(&b, "pw").unwrap(), "repeat");
}

#[test]
fn key_derivation_consistency() {
    assert_eq!(derive_key("pw", KeySize::Bits128), md5_digest(b"pw").to_vec());

    let long = derive_key_bits("pw", 256).unwrap();
    let mut expected = md5_digest(&md5_digest(b"pw")).to_vec();
    expected.extend_from_slice(&md5_digest(b"pw"));
    assert_eq!(long, expected);

    assert!(matches!(derive_key_bits("pw", 100), Err(Error::InvalidArgument(_))));
}

#[test]
fn known_digests() {
    assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(md5_hex(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
}

#[test]
fn file_envelope_recovers_name_and_size() {
    let service = Rc5Service::new(Rc5Config::with_key_size(KeySize::Bits256));
    let data = b"line one\nline two\n".to_vec();

    let envelope = service.encrypt_file(&data, "file.txt", "secret").unwrap();
    let (plain, meta) = service.decrypt_file(&envelope, "secret").unwrap();

    assert_eq!(plain, data);
    assert_eq!(meta.original_file_name, "file");
    assert_eq!(meta.original_extension, ".txt");
    assert_eq!(meta.original_size, data.len() as u64);
    assert_eq!(meta.key_size, 256);
}

#[test]
fn standard_cbc_framing_is_available() {
    let service = Rc5Service::new(Rc5Config {
        framing: IvFraming::PlainIv,
        ..Default::default()
    });
    let ct = service.encrypt_bytes(b"interop", "pw").unwrap();
    assert_eq!(service.decrypt_bytes(&ct, "pw").unwrap(), b"interop".to_vec());
}

#[test]
fn cipher_is_shareable_across_threads() {
    let rc5 = std::sync::Arc::new(Rc5::new(&[3u8; 32]).unwrap());
    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let rc5 = rc5.clone();
            std::thread::spawn(move || {
                let msg = vec![i; 100];
                let ct = rc5.encrypt_cbc(&msg);
                rc5.decrypt_cbc(&ct).unwrap() == msg
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
