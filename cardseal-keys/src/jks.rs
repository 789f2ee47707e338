//! Minimal reader for the JKS keystore format.
//!
//! Peer provisioning ships private keys in password-protected JKS stores
//! (`<identity>.jks`). Only what key resolution needs is implemented here:
//! store-level integrity verification, entry enumeration, and recovery of
//! protected private keys. A matching writer for fixture provisioning lives
//! behind the `test-util` feature.
//!
//! Layout: `0xFEEDFEED` magic, version 2, entry count, entries (private-key
//! or trusted-certificate), then a 20-byte SHA-1 digest over
//! `utf16_be(secret) || "Mighty Aphrodite" || preceding bytes`.

use crate::error::{ConfigError, ConfigResult};
use der::asn1::{Null, ObjectIdentifier, OctetString};
use der::{Decode, Sequence};
use sha1::{Digest, Sha1};
use zeroize::Zeroize;

const MAGIC: u32 = 0xFEED_FEED;
const VERSION: u32 = 2;
const TAG_PRIVATE_KEY: u32 = 1;
const TAG_TRUSTED_CERT: u32 = 2;
const DIGEST_LEN: usize = 20;
const SALT_LEN: usize = 20;

/// Proprietary key-protector algorithm identifier used by JKS stores.
const KEY_PROTECTOR_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.42.2.17.1.1");

/// Fixed whitener the format mixes into the store digest.
const DIGEST_WHITENER: &[u8] = b"Mighty Aphrodite";

/// One keystore entry.
#[derive(Clone, Debug)]
pub enum KeystoreEntry {
    /// A protected private key with its certificate chain.
    PrivateKey {
        alias: String,
        protected_key: Vec<u8>,
        chain: Vec<Vec<u8>>,
    },
    /// A certificate trusted without an accompanying private key.
    TrustedCert { alias: String, cert: Vec<u8> },
}

impl KeystoreEntry {
    pub fn alias(&self) -> &str {
        match self {
            KeystoreEntry::PrivateKey { alias, .. } => alias,
            KeystoreEntry::TrustedCert { alias, .. } => alias,
        }
    }
}

/// A parsed, integrity-checked keystore.
#[derive(Debug)]
pub struct Keystore {
    entries: Vec<KeystoreEntry>,
}

impl Keystore {
    /// Parses `bytes` after verifying the store digest against `secret`.
    ///
    /// A digest mismatch is indistinguishable from a wrong secret and both
    /// surface as [`ConfigError::KeystoreIntegrity`].
    pub fn parse(bytes: &[u8], secret: &str) -> ConfigResult<Self> {
        if bytes.len() < 12 + DIGEST_LEN {
            return Err(ConfigError::KeystoreFormat("store is truncated".into()));
        }
        let (content, digest) = bytes.split_at(bytes.len() - DIGEST_LEN);
        if store_digest(secret, content).as_slice() != digest {
            return Err(ConfigError::KeystoreIntegrity);
        }

        let mut cur = Cursor::new(content);
        if cur.u32()? != MAGIC {
            return Err(ConfigError::KeystoreFormat("bad magic".into()));
        }
        let version = cur.u32()?;
        if version != VERSION {
            return Err(ConfigError::KeystoreFormat(format!(
                "unsupported store version {version}"
            )));
        }

        let count = cur.u32()? as usize;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let tag = cur.u32()?;
            let alias = cur.utf()?;
            let _created_at = cur.u64()?;
            match tag {
                TAG_PRIVATE_KEY => {
                    let protected_key = cur.bytes()?;
                    let chain_len = cur.u32()? as usize;
                    let mut chain = Vec::with_capacity(chain_len);
                    for _ in 0..chain_len {
                        let _cert_type = cur.utf()?;
                        chain.push(cur.bytes()?);
                    }
                    entries.push(KeystoreEntry::PrivateKey {
                        alias,
                        protected_key,
                        chain,
                    });
                }
                TAG_TRUSTED_CERT => {
                    let _cert_type = cur.utf()?;
                    entries.push(KeystoreEntry::TrustedCert {
                        alias,
                        cert: cur.bytes()?,
                    });
                }
                other => {
                    return Err(ConfigError::KeystoreFormat(format!(
                        "unknown entry tag {other}"
                    )));
                }
            }
        }
        if cur.remaining() != 0 {
            return Err(ConfigError::KeystoreFormat(
                "trailing bytes after last entry".into(),
            ));
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[KeystoreEntry] {
        &self.entries
    }

    /// Recovers the plaintext PKCS#8 document stored under `alias`.
    ///
    /// The caller owns the returned key bytes and must zeroize them once
    /// the key has been parsed.
    pub fn private_key_der(&self, alias: &str, secret: &str) -> ConfigResult<Vec<u8>> {
        let protected = self
            .entries
            .iter()
            .find_map(|entry| match entry {
                KeystoreEntry::PrivateKey {
                    alias: a,
                    protected_key,
                    ..
                } if a == alias => Some(protected_key),
                _ => None,
            })
            .ok_or_else(|| ConfigError::AliasNotFound {
                alias: alias.to_string(),
            })?;

        recover_key(protected, secret)
    }
}

/// DER envelope around the protected key bytes.
#[derive(Sequence)]
struct ProtectedKeyInfo {
    algorithm: ProtectorAlgorithm,
    data: OctetString,
}

#[derive(Sequence)]
struct ProtectorAlgorithm {
    oid: ObjectIdentifier,
    params: Option<Null>,
}

/// Unwraps the key-protector blob: `salt(20) || ciphertext || check(20)`,
/// keystream blocks chained as `SHA1(passwd || prev)` starting from the
/// salt, `check = SHA1(passwd || plaintext)`.
fn recover_key(protected: &[u8], secret: &str) -> ConfigResult<Vec<u8>> {
    let info = ProtectedKeyInfo::from_der(protected)
        .map_err(|e| ConfigError::KeystoreFormat(format!("protected key envelope: {e}")))?;
    if info.algorithm.oid != KEY_PROTECTOR_OID {
        return Err(ConfigError::KeystoreFormat(format!(
            "unsupported key-protector algorithm {}",
            info.algorithm.oid
        )));
    }

    let data = info.data.as_bytes();
    if data.len() < SALT_LEN + DIGEST_LEN {
        return Err(ConfigError::KeystoreFormat(
            "protected key blob is truncated".into(),
        ));
    }
    let (salt, rest) = data.split_at(SALT_LEN);
    let (ciphertext, check) = rest.split_at(rest.len() - DIGEST_LEN);

    let mut passwd = utf16_be(secret);
    let mut plain = xor_keystream(&passwd, salt, ciphertext);

    let mut hasher = Sha1::new();
    hasher.update(&passwd);
    hasher.update(&plain);
    let expected: [u8; DIGEST_LEN] = hasher.finalize().into();
    passwd.zeroize();

    if expected.as_slice() != check {
        plain.zeroize();
        return Err(ConfigError::KeystoreIntegrity);
    }
    Ok(plain)
}

fn store_digest(secret: &str, content: &[u8]) -> [u8; DIGEST_LEN] {
    let mut passwd = utf16_be(secret);
    let mut hasher = Sha1::new();
    hasher.update(&passwd);
    hasher.update(DIGEST_WHITENER);
    hasher.update(content);
    passwd.zeroize();
    hasher.finalize().into()
}

/// The format hashes the secret as big-endian UTF-16 code units.
fn utf16_be(secret: &str) -> Vec<u8> {
    secret
        .encode_utf16()
        .flat_map(|unit| unit.to_be_bytes())
        .collect()
}

/// XORs `input` against chained SHA-1 keystream blocks. Self-inverse.
fn xor_keystream(passwd: &[u8], salt: &[u8], input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut block = salt.to_vec();
    for chunk in input.chunks(DIGEST_LEN) {
        let mut hasher = Sha1::new();
        hasher.update(passwd);
        hasher.update(&block);
        block = hasher.finalize().to_vec();
        out.extend(chunk.iter().zip(&block).map(|(c, k)| c ^ k));
    }
    out
}

/// Big-endian cursor over the store body.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> ConfigResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(ConfigError::KeystoreFormat("store is truncated".into()));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u16(&mut self) -> ConfigResult<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> ConfigResult<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u64(&mut self) -> ConfigResult<u64> {
        let b = self.take(8)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Length-prefixed (u16) string.
    fn utf(&mut self) -> ConfigResult<String> {
        let len = self.u16()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| ConfigError::KeystoreFormat("string field is not valid UTF-8".into()))
    }

    /// Length-prefixed (u32) byte block.
    fn bytes(&mut self) -> ConfigResult<Vec<u8>> {
        let len = self.u32()? as usize;
        Ok(self.take(len)?.to_vec())
    }
}

/// Keystore writer for fixture provisioning. Production nodes only ever
/// read pre-provisioned stores.
#[cfg(any(test, feature = "test-util"))]
pub mod writer {
    use super::*;
    use der::Encode;
    use std::time::{SystemTime, UNIX_EPOCH};

    const CERT_TYPE: &str = "X.509";

    /// Serializes `entries` into a password-protected store.
    pub fn write_keystore(entries: &[KeystoreEntry], secret: &str) -> Vec<u8> {
        let mut out = Vec::new();
        put_u32(&mut out, MAGIC);
        put_u32(&mut out, VERSION);
        put_u32(&mut out, entries.len() as u32);

        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        for entry in entries {
            match entry {
                KeystoreEntry::PrivateKey {
                    alias,
                    protected_key,
                    chain,
                } => {
                    put_u32(&mut out, TAG_PRIVATE_KEY);
                    put_utf(&mut out, alias);
                    put_u64(&mut out, created_at);
                    put_bytes(&mut out, protected_key);
                    put_u32(&mut out, chain.len() as u32);
                    for cert in chain {
                        put_utf(&mut out, CERT_TYPE);
                        put_bytes(&mut out, cert);
                    }
                }
                KeystoreEntry::TrustedCert { alias, cert } => {
                    put_u32(&mut out, TAG_TRUSTED_CERT);
                    put_utf(&mut out, alias);
                    put_u64(&mut out, created_at);
                    put_utf(&mut out, CERT_TYPE);
                    put_bytes(&mut out, cert);
                }
            }
        }

        let digest = store_digest(secret, &out);
        out.extend_from_slice(&digest);
        out
    }

    /// Wraps a plaintext PKCS#8 document in the key-protector envelope.
    pub fn protect_key(pkcs8_der: &[u8], secret: &str, salt: [u8; SALT_LEN]) -> Vec<u8> {
        let mut passwd = utf16_be(secret);
        let ciphertext = xor_keystream(&passwd, &salt, pkcs8_der);

        let mut hasher = Sha1::new();
        hasher.update(&passwd);
        hasher.update(pkcs8_der);
        let check: [u8; DIGEST_LEN] = hasher.finalize().into();
        passwd.zeroize();

        let mut data = Vec::with_capacity(SALT_LEN + ciphertext.len() + DIGEST_LEN);
        data.extend_from_slice(&salt);
        data.extend_from_slice(&ciphertext);
        data.extend_from_slice(&check);

        let info = ProtectedKeyInfo {
            algorithm: ProtectorAlgorithm {
                oid: KEY_PROTECTOR_OID,
                params: Some(Null),
            },
            data: OctetString::new(data).expect("octet string within DER limits"),
        };
        info.to_der().expect("protected key envelope encodes")
    }

    fn put_u32(out: &mut Vec<u8>, value: u32) {
        out.extend_from_slice(&value.to_be_bytes());
    }

    fn put_u64(out: &mut Vec<u8>, value: u64) {
        out.extend_from_slice(&value.to_be_bytes());
    }

    fn put_utf(out: &mut Vec<u8>, value: &str) {
        out.extend_from_slice(&(value.len() as u16).to_be_bytes());
        out.extend_from_slice(value.as_bytes());
    }

    fn put_bytes(out: &mut Vec<u8>, value: &[u8]) {
        put_u32(out, value.len() as u32);
        out.extend_from_slice(value);
    }
}

#[cfg(test)]
mod tests {
    use super::writer::{protect_key, write_keystore};
    use super::*;

    const SECRET: &str = "s3cr3t";

    fn single_key_store(alias: &str, key_bytes: &[u8], secret: &str) -> Vec<u8> {
        let protected_key = protect_key(key_bytes, secret, [7u8; SALT_LEN]);
        write_keystore(
            &[KeystoreEntry::PrivateKey {
                alias: alias.to_string(),
                protected_key,
                chain: vec![b"fake-cert-der".to_vec()],
            }],
            secret,
        )
    }

    #[test]
    fn write_parse_roundtrip() {
        let bytes = single_key_store("mediator", b"pkcs8-document-bytes", SECRET);
        let store = Keystore::parse(&bytes, SECRET).unwrap();

        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.entries()[0].alias(), "mediator");
        let recovered = store.private_key_der("mediator", SECRET).unwrap();
        assert_eq!(recovered, b"pkcs8-document-bytes");
    }

    #[test]
    fn wrong_store_secret_fails_integrity() {
        let bytes = single_key_store("mediator", b"pkcs8-document-bytes", SECRET);
        let err = Keystore::parse(&bytes, "wrong").unwrap_err();
        assert!(matches!(err, ConfigError::KeystoreIntegrity));
    }

    #[test]
    fn wrong_key_secret_fails_integrity() {
        // Store digest passes, the key-protector check must still reject.
        let protected_key = protect_key(b"pkcs8-document-bytes", "other-secret", [7u8; SALT_LEN]);
        let bytes = write_keystore(
            &[KeystoreEntry::PrivateKey {
                alias: "mediator".to_string(),
                protected_key,
                chain: vec![],
            }],
            SECRET,
        );

        let store = Keystore::parse(&bytes, SECRET).unwrap();
        let err = store.private_key_der("mediator", SECRET).unwrap_err();
        assert!(matches!(err, ConfigError::KeystoreIntegrity));
    }

    #[test]
    fn tampered_store_detected() {
        let mut bytes = single_key_store("mediator", b"pkcs8-document-bytes", SECRET);
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;

        let err = Keystore::parse(&bytes, SECRET).unwrap_err();
        assert!(matches!(err, ConfigError::KeystoreIntegrity));
    }

    #[test]
    fn truncated_store_rejected() {
        let bytes = single_key_store("mediator", b"pkcs8-document-bytes", SECRET);
        let err = Keystore::parse(&bytes[..10], SECRET).unwrap_err();
        assert!(matches!(err, ConfigError::KeystoreFormat(_)));
    }

    #[test]
    fn bad_magic_rejected() {
        let mut bytes = single_key_store("mediator", b"pkcs8-document-bytes", SECRET);
        bytes[0] = 0x00;
        // Fix up the digest so the failure is attributed to the layout.
        let content_len = bytes.len() - DIGEST_LEN;
        let digest = store_digest(SECRET, &bytes[..content_len]);
        bytes[content_len..].copy_from_slice(&digest);

        let err = Keystore::parse(&bytes, SECRET).unwrap_err();
        assert!(matches!(err, ConfigError::KeystoreFormat(_)));
    }

    #[test]
    fn missing_alias_reported() {
        let bytes = single_key_store("mediator", b"pkcs8-document-bytes", SECRET);
        let store = Keystore::parse(&bytes, SECRET).unwrap();

        let err = store.private_key_der("supplier", SECRET).unwrap_err();
        match err {
            ConfigError::AliasNotFound { alias } => assert_eq!(alias, "supplier"),
            other => panic!("expected AliasNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn trusted_cert_entries_roundtrip() {
        let bytes = write_keystore(
            &[KeystoreEntry::TrustedCert {
                alias: "ca".to_string(),
                cert: b"ca-cert-der".to_vec(),
            }],
            SECRET,
        );
        let store = Keystore::parse(&bytes, SECRET).unwrap();

        match &store.entries()[0] {
            KeystoreEntry::TrustedCert { alias, cert } => {
                assert_eq!(alias, "ca");
                assert_eq!(cert, b"ca-cert-der");
            }
            other => panic!("expected TrustedCert, got: {other:?}"),
        }
    }

    #[test]
    fn keystream_handles_non_block_multiple_lengths() {
        // 33 bytes spans two SHA-1 blocks with a ragged tail.
        let plaintext = [0xA5u8; 33];
        let protected = protect_key(&plaintext, SECRET, [1u8; SALT_LEN]);
        let recovered = recover_key(&protected, SECRET).unwrap();
        assert_eq!(recovered, plaintext);
    }
}
