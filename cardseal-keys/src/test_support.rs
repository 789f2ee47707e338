//! Fixture provisioning for tests.
//!
//! Generates an RSA keypair per identity, writes a self-signed X.509
//! certificate as `<identity>.cer` and a protected keystore as
//! `<identity>.jks`, mirroring the production resource layout so tests
//! exercise the same loading paths as a deployed node.

use crate::identity::Identity;
use crate::jks::KeystoreEntry;
use crate::jks::writer::{protect_key, write_keystore};
use rand::RngCore;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use std::path::Path;
use std::str::FromStr;
use x509_cert::Certificate;
use x509_cert::builder::{Builder, CertificateBuilder, Profile};
use x509_cert::der::{Decode, Encode};
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::time::Validity;

/// 1024-bit keys keep debug-profile keygen fast in tests.
pub const TEST_KEY_BITS: usize = 1024;

/// Key material behind a provisioned identity, for direct assertions.
pub struct ProvisionedIdentity {
    pub identity: Identity,
    pub private_key: RsaPrivateKey,
    pub public_key: RsaPublicKey,
}

/// Generates a keypair for `name` and writes its `.cer` and `.jks`
/// resources into `dir`, the keystore under the lowercase alias.
pub fn provision_identity(dir: &Path, name: &str, secret: &str) -> ProvisionedIdentity {
    let identity = Identity::new(name);
    let private_key =
        RsaPrivateKey::new(&mut rand::rngs::OsRng, TEST_KEY_BITS).expect("keygen must succeed");
    let public_key = private_key.to_public_key();

    let cert_der = self_signed_cert(&identity, &private_key, &public_key);
    std::fs::write(dir.join(identity.cert_resource()), &cert_der)
        .expect("certificate resource must be writable");

    let store = keystore_with_alias(&identity.alias(), &private_key, &cert_der, secret);
    std::fs::write(dir.join(identity.keystore_resource()), store)
        .expect("keystore resource must be writable");

    ProvisionedIdentity {
        identity,
        private_key,
        public_key,
    }
}

/// Builds a self-signed DER certificate carrying `public_key`.
pub fn self_signed_cert(
    identity: &Identity,
    signer_key: &RsaPrivateKey,
    public_key: &RsaPublicKey,
) -> Vec<u8> {
    let spki_der = public_key
        .to_public_key_der()
        .expect("SPKI encoding must succeed");
    let spki =
        SubjectPublicKeyInfoOwned::from_der(spki_der.as_bytes()).expect("SPKI reparse must succeed");

    let signer: SigningKey<Sha256> = SigningKey::new(signer_key.clone());
    let builder = CertificateBuilder::new(
        Profile::Manual { issuer: None },
        SerialNumber::new(&[1u8]).expect("serial number encodes"),
        Validity::from_now(std::time::Duration::from_secs(365 * 24 * 60 * 60))
            .expect("validity window encodes"),
        Name::from_str(&format!("CN={identity}")).expect("subject name parses"),
        spki,
        &signer,
    )
    .expect("certificate builder accepts the profile");

    let cert: Certificate = builder
        .build::<rsa::pkcs1v15::Signature>()
        .expect("certificate signing must succeed");
    cert.to_der().expect("certificate DER encoding must succeed")
}

/// Builds a single-entry keystore holding `private_key` under `alias`,
/// store and key both protected by `secret`.
pub fn keystore_with_alias(
    alias: &str,
    private_key: &RsaPrivateKey,
    cert_der: &[u8],
    secret: &str,
) -> Vec<u8> {
    let pkcs8 = private_key
        .to_pkcs8_der()
        .expect("PKCS#8 encoding must succeed");

    let mut salt = [0u8; 20];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    let protected_key = protect_key(pkcs8.as_bytes(), secret, salt);

    write_keystore(
        &[KeystoreEntry::PrivateKey {
            alias: alias.to_string(),
            protected_key,
            chain: vec![cert_der.to_vec()],
        }],
        secret,
    )
}
