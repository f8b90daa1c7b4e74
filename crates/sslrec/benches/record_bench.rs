//! Record write/read throughput.
//!
//! Run with: cargo bench -p sslrec

use std::io::Cursor;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sslrec::{
    CipherState, CipherSuite, CipherSuiteParams, ContentType, ProtocolVersion, RecordConfig,
    RecordLayer,
};

fn keyed(version: ProtocolVersion, suite: CipherSuite) -> CipherState {
    let params = CipherSuiteParams::from_suite(suite).unwrap();
    CipherState::new(
        version,
        suite,
        &vec![0x5A; params.key_len],
        &vec![0xA5; params.iv_len],
        &vec![0x3C; params.mac_len],
    )
    .unwrap()
}

fn bench_record(c: &mut Criterion) {
    let suites = [
        ("rc4-sha", CipherSuite::RSA_WITH_RC4_128_SHA),
        ("aes128-cbc-sha", CipherSuite::RSA_WITH_AES_128_CBC_SHA),
        ("3des-cbc-sha", CipherSuite::RSA_WITH_3DES_EDE_CBC_SHA),
    ];
    let version = ProtocolVersion::Tls10;

    let mut group = c.benchmark_group("record");
    for size in [64usize, 1024, 16384] {
        group.throughput(Throughput::Bytes(size as u64));
        let data = vec![0x42u8; size];

        for (name, suite) in suites {
            group.bench_with_input(BenchmarkId::new(format!("write/{name}"), size), &size, |b, _| {
                let mut layer = RecordLayer::new(RecordConfig::builder().version(version).build());
                layer.activate_write(keyed(version, suite)).unwrap();
                let mut sink = Vec::with_capacity(size + 64);
                b.iter(|| {
                    layer.write_record(ContentType::ApplicationData, &data).unwrap();
                    sink.clear();
                    layer.flush(&mut sink).unwrap();
                });
            });

            group.bench_with_input(BenchmarkId::new(format!("read/{name}"), size), &size, |b, _| {
                // Pre-encrypt a long run of records so each iteration reads the next one.
                let records = 256;
                let config = RecordConfig::builder()
                    .version(version)
                    .max_queued_records(records)
                    .build();
                let mut tx = RecordLayer::new(config.clone());
                tx.activate_write(keyed(version, suite)).unwrap();
                for _ in 0..records {
                    tx.write_record(ContentType::ApplicationData, &data).unwrap();
                }
                let mut wire = Vec::new();
                tx.flush(&mut wire).unwrap();

                let mut rx = RecordLayer::new(config.clone());
                rx.activate_read(keyed(version, suite)).unwrap();
                let mut cursor = Cursor::new(wire.clone());
                let mut read = 0;
                b.iter(|| {
                    if read == records {
                        rx = RecordLayer::new(config.clone());
                        rx.activate_read(keyed(version, suite)).unwrap();
                        cursor = Cursor::new(wire.clone());
                        read = 0;
                    }
                    let (_, content) = rx.read_record(&mut cursor).unwrap();
                    read += 1;
                    content.len()
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_record);
criterion_main!(benches);
