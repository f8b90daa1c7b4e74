#![no_main]
use libfuzzer_sys::fuzz_target;
use sslrec::record::MAX_CIPHERTEXT_LENGTH;
use sslrec::{CipherState, CipherSuite, ProtocolVersion, RecordConfig, RecordLayer};

// First byte picks version and suite; the rest is fed to the read path.
fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let version = match selector & 0x03 {
        0 => ProtocolVersion::Ssl30,
        1 => ProtocolVersion::Tls10,
        2 => ProtocolVersion::Tls11,
        _ => ProtocolVersion::Dtls10,
    };
    let (suite, key, iv, mac): (CipherSuite, &[u8], &[u8], &[u8]) = match (selector >> 2) & 0x03 {
        0 => (CipherSuite::NULL_WITH_NULL_NULL, &[], &[], &[]),
        1 => (CipherSuite::RSA_WITH_RC4_128_MD5, &[7; 16], &[], &[9; 16]),
        2 => (CipherSuite::RSA_WITH_DES_CBC_SHA, &[7; 8], &[8; 8], &[9; 20]),
        _ => (CipherSuite::RSA_WITH_AES_128_CBC_SHA, &[7; 16], &[8; 16], &[9; 20]),
    };
    let Ok(state) = CipherState::new(version, suite, key, iv, mac) else {
        return;
    };

    let config = RecordConfig::builder()
        .version(version)
        .strict_version(selector & 0x10 != 0)
        .build();
    let mut layer = RecordLayer::new(config);
    if layer.activate_read(state).is_err() {
        return;
    }

    let mut buf = rest.to_vec();
    let mut offset = 0;
    while offset < buf.len() {
        match layer.open_record(&mut buf[offset..]) {
            Ok((_, content, used)) => {
                assert!(content.len() <= MAX_CIPHERTEXT_LENGTH);
                offset += used;
            }
            Err(_) => break,
        }
    }
});
