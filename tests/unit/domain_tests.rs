use chrono::{Duration, TimeZone, Utc};
use notary::domain::{fingerprint, is_valid_fingerprint, SealReceipt, SealStatus, SealedRecord};

#[test]
fn test_fingerprint_is_lowercase_sha256_hex() {
    let fp = fingerprint("test content");

    assert_eq!(fp.len(), 64);
    assert!(is_valid_fingerprint(&fp));
    assert!(fp.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
}

#[test]
fn test_fingerprint_is_deterministic() {
    let text = "Same content,\nincluding whitespace.  ";
    assert_eq!(fingerprint(text), fingerprint(text));
}

#[test]
fn test_fingerprint_avalanche_on_single_character_changes() {
    let original = "Flying cars by 2045";
    let base = fingerprint(original);
    let chars: Vec<char> = original.chars().collect();

    for i in 0..chars.len() {
        let mut mutated = chars.clone();
        mutated[i] = if chars[i] == 'x' { 'y' } else { 'x' };
        let mutated: String = mutated.into_iter().collect();

        let fp = fingerprint(&mutated);
        assert_ne!(fp, base, "mutation at {} collided", i);

        // Roughly half the hex digits should differ; demand at least a quarter.
        let differing = fp.chars().zip(base.chars()).filter(|(a, b)| a != b).count();
        assert!(differing > 16, "mutation at {} changed only {} digits", i, differing);
    }
}

#[test]
fn test_fingerprint_is_whitespace_and_encoding_sensitive() {
    assert_ne!(fingerprint("note"), fingerprint("note "));
    assert_ne!(fingerprint("line\n"), fingerprint("line\r\n"));
    // Precomposed vs. combining accent
    assert_ne!(fingerprint("caf\u{e9}"), fingerprint("cafe\u{301}"));
}

#[test]
fn test_record_fingerprint_depends_only_on_content() {
    let t = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let a = SealedRecord::new("same", "Ann", t, t + Duration::days(1));
    let b = SealedRecord::new("same", "Bob", t + Duration::days(5), t + Duration::days(9));

    assert_eq!(a.fingerprint, b.fingerprint);
    assert_eq!(a.fingerprint, fingerprint("same"));
}

#[test]
fn test_record_status_transitions_at_release() {
    let t = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let record = SealedRecord::new("doc", "Ann", t, t + Duration::days(1));

    assert_eq!(record.status(t), SealStatus::Locked);
    assert_eq!(record.status(t + Duration::days(1)), SealStatus::Released);
    assert_eq!(record.status(t + Duration::days(400)), SealStatus::Released);
}

#[test]
fn test_receipt_proof_format() {
    let t = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let record = SealedRecord::new("doc", "Ann", t, t + Duration::days(1));
    let receipt = SealReceipt::new(&record);

    assert_eq!(receipt.proof, format!("sha256:{}@{}", record.fingerprint, t.timestamp()));
    assert_eq!(receipt.release_at, record.release_at);
}
