//! X.509 certificate loading and public key extraction.

use crate::error::{ConfigError, ConfigResult};
use rsa::RsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use std::path::Path;
use x509_cert::Certificate;
use x509_cert::der::{Decode, DecodePem, Encode};

/// Loads a certificate resource and extracts its RSA public key.
///
/// Only the public key is taken from the certificate; chain validation is
/// the provisioning toolchain's responsibility, not a per-message concern.
pub fn load_public_key(path: &Path) -> ConfigResult<RsaPublicKey> {
    let bytes = std::fs::read(path).map_err(|source| ConfigError::CertificateRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_certificate(&bytes)
        .and_then(|cert| public_key_of(&cert))
        .map_err(|reason| ConfigError::CertificateParse {
            path: path.to_path_buf(),
            reason,
        })
}

/// Accepts DER or PEM; provisioned resources have shipped as both.
fn parse_certificate(bytes: &[u8]) -> Result<Certificate, String> {
    if bytes.starts_with(b"-----BEGIN") {
        Certificate::from_pem(bytes).map_err(|e| e.to_string())
    } else {
        Certificate::from_der(bytes).map_err(|e| e.to_string())
    }
}

fn public_key_of(cert: &Certificate) -> Result<RsaPublicKey, String> {
    let spki = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| e.to_string())?;
    RsaPublicKey::from_public_key_der(&spki).map_err(|e| e.to_string())
}
