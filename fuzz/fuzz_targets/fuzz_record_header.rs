#![no_main]
use libfuzzer_sys::fuzz_target;
use sslrec::record::dtls::DtlsRecordHeader;
use sslrec::record::RecordHeader;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = RecordHeader::parse(data) {
        assert_eq!(&header.encode()[..], &data[..5]);
    }
    let _ = DtlsRecordHeader::parse(data);
});
