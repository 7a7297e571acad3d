//! Certificate generation for signers, servers, and clients.
//!
//! All certificates are generated locally; nothing here talks to the
//! control plane. Serial numbers are random, so regenerating a certificate
//! never collides with an earlier one.

use openssl::asn1::{Asn1Integer, Asn1Time};
use openssl::bn::{BigNum, MsbOption};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::x509::extension::{
    BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAlternativeName, SubjectKeyIdentifier,
};
use openssl::x509::{X509, X509Builder, X509Name, X509NameBuilder};
use std::fs;
use std::net::IpAddr;
use std::path::Path;

use crate::error::Result;

pub const RSA_KEY_BITS: u32 = 2048;
pub const DEFAULT_SIGNER_EXPIRE_DAYS: u32 = 1825;
pub const DEFAULT_CERT_EXPIRE_DAYS: u32 = 730;

/// A certificate together with its private key.
pub struct CertBundle {
    pub cert: X509,
    pub key: PKey<Private>,
}

pub fn generate_rsa_key() -> Result<PKey<Private>> {
    let rsa = Rsa::generate(RSA_KEY_BITS)?;
    Ok(PKey::from_rsa(rsa)?)
}

fn random_serial() -> Result<Asn1Integer> {
    let mut serial = BigNum::new()?;
    serial.rand(128, MsbOption::MAYBE_ZERO, false)?;
    Ok(serial.to_asn1_integer()?)
}

fn subject(common_name: &str, organizations: &[String]) -> Result<X509Name> {
    let mut name = X509NameBuilder::new()?;
    name.append_entry_by_nid(Nid::COMMONNAME, common_name)?;
    for org in organizations {
        name.append_entry_by_nid(Nid::ORGANIZATIONNAME, org)?;
    }
    Ok(name.build())
}

fn base_builder(subject: &X509Name, expire_days: u32) -> Result<X509Builder> {
    let mut builder = X509::builder()?;
    builder.set_version(2)?;
    let serial = random_serial()?;
    builder.set_serial_number(&serial)?;
    builder.set_subject_name(subject)?;
    let not_before = Asn1Time::days_from_now(0)?;
    builder.set_not_before(&not_before)?;
    let not_after = Asn1Time::days_from_now(expire_days)?;
    builder.set_not_after(&not_after)?;
    Ok(builder)
}

/// Generate a self-signed CA certificate.
pub fn make_signer_cert(name: &str, expire_days: u32) -> Result<CertBundle> {
    let key = generate_rsa_key()?;
    let subject = subject(name, &[])?;
    let mut builder = base_builder(&subject, expire_days)?;
    builder.set_issuer_name(&subject)?;
    builder.set_pubkey(&key)?;
    builder.append_extension(BasicConstraints::new().critical().ca().build()?)?;
    builder.append_extension(KeyUsage::new().critical().key_cert_sign().crl_sign().build()?)?;
    let ski = SubjectKeyIdentifier::new().build(&builder.x509v3_context(None, None))?;
    builder.append_extension(ski)?;
    builder.sign(&key, MessageDigest::sha256())?;
    Ok(CertBundle {
        cert: builder.build(),
        key,
    })
}

/// Generate a server certificate signed by `signer`, valid for `hostnames`
/// (DNS names or IP addresses).
pub fn make_server_cert(
    signer: &CertBundle,
    hostnames: &[String],
    expire_days: u32,
) -> Result<CertBundle> {
    let key = generate_rsa_key()?;
    let common_name = hostnames.first().map(String::as_str).unwrap_or("localhost");
    let subject = subject(common_name, &[])?;
    let mut builder = base_builder(&subject, expire_days)?;
    builder.set_issuer_name(signer.cert.subject_name())?;
    builder.set_pubkey(&key)?;
    builder.append_extension(BasicConstraints::new().build()?)?;
    builder.append_extension(
        KeyUsage::new()
            .critical()
            .digital_signature()
            .key_encipherment()
            .build()?,
    )?;
    builder.append_extension(ExtendedKeyUsage::new().server_auth().build()?)?;

    let mut san = SubjectAlternativeName::new();
    for hostname in hostnames {
        if hostname.parse::<IpAddr>().is_ok() {
            san.ip(hostname);
        } else {
            san.dns(hostname);
        }
    }
    let san = san.build(&builder.x509v3_context(Some(&signer.cert), None))?;
    builder.append_extension(san)?;

    builder.sign(&signer.key, MessageDigest::sha256())?;
    Ok(CertBundle {
        cert: builder.build(),
        key,
    })
}

/// Generate a client certificate signed by `signer`. The user lands in the
/// common name, group memberships in the organization entries.
pub fn make_client_cert(
    signer: &CertBundle,
    user: &str,
    groups: &[String],
    expire_days: u32,
) -> Result<CertBundle> {
    let key = generate_rsa_key()?;
    let subject = subject(user, groups)?;
    let mut builder = base_builder(&subject, expire_days)?;
    builder.set_issuer_name(signer.cert.subject_name())?;
    builder.set_pubkey(&key)?;
    builder.append_extension(BasicConstraints::new().build()?)?;
    builder.append_extension(KeyUsage::new().critical().digital_signature().build()?)?;
    builder.append_extension(ExtendedKeyUsage::new().client_auth().build()?)?;
    builder.sign(&signer.key, MessageDigest::sha256())?;
    Ok(CertBundle {
        cert: builder.build(),
        key,
    })
}

impl CertBundle {
    /// Write the certificate and key as PEM files, creating parent
    /// directories as needed.
    pub fn write(&self, cert_path: &Path, key_path: &Path) -> Result<()> {
        for path in [cert_path, key_path] {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }
        fs::write(cert_path, self.cert.to_pem()?)?;
        fs::write(key_path, self.key.private_key_to_pem_pkcs8()?)?;
        Ok(())
    }

    pub fn load(cert_path: &Path, key_path: &Path) -> Result<Self> {
        let cert = X509::from_pem(&fs::read(cert_path)?)?;
        let key = PKey::private_key_from_pem(&fs::read(key_path)?)?;
        Ok(Self { cert, key })
    }
}

/// Write an RSA key pair as separate public and private PEM files
/// (used for service-account token signing).
pub fn write_key_pair(public_path: &Path, private_path: &Path) -> Result<()> {
    let key = generate_rsa_key()?;
    for path in [public_path, private_path] {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
    }
    fs::write(public_path, key.public_key_to_pem()?)?;
    fs::write(private_path, key.private_key_to_pem_pkcs8()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signer_cert_is_self_signed_ca() {
        let signer = make_signer_cert("tessera-signer", 30).unwrap();
        assert_eq!(
            signer.cert.issuer_name().entries().count(),
            signer.cert.subject_name().entries().count()
        );
        let ca_key = signer.key.public_key_to_pem().unwrap();
        let cert_key = signer.cert.public_key().unwrap().public_key_to_pem().unwrap();
        assert_eq!(ca_key, cert_key);
    }

    #[test]
    fn test_signer_cert_carries_validity_window() {
        let signer = make_signer_cert("tessera-signer", 30).unwrap();
        assert!(signer.cert.not_before() < signer.cert.not_after());
    }

    #[test]
    fn test_server_cert_verifies_against_signer() {
        let signer = make_signer_cert("tessera-signer", 30).unwrap();
        let server = make_server_cert(
            &signer,
            &["master.tessera.local".to_string(), "127.0.0.1".to_string()],
            30,
        )
        .unwrap();
        assert!(server.cert.verify(&signer.key).unwrap());
        let san = server.cert.subject_alt_names().unwrap();
        assert_eq!(san.len(), 2);
    }

    #[test]
    fn test_client_cert_carries_user_and_groups() {
        let signer = make_signer_cert("tessera-signer", 30).unwrap();
        let client = make_client_cert(
            &signer,
            "alice",
            &["system:admins".to_string()],
            30,
        )
        .unwrap();
        assert!(client.cert.verify(&signer.key).unwrap());
        let cn = client
            .cert
            .subject_name()
            .entries_by_nid(Nid::COMMONNAME)
            .next()
            .unwrap();
        assert_eq!(cn.data().as_slice(), b"alice");
    }

    #[test]
    fn test_bundle_roundtrips_through_pem_files() {
        let dir = tempfile::tempdir().unwrap();
        let cert_path = dir.path().join("certs").join("ca.crt");
        let key_path = dir.path().join("certs").join("ca.key");
        let signer = make_signer_cert("tessera-signer", 30).unwrap();
        signer.write(&cert_path, &key_path).unwrap();

        let loaded = CertBundle::load(&cert_path, &key_path).unwrap();
        assert_eq!(
            loaded.cert.to_pem().unwrap(),
            signer.cert.to_pem().unwrap()
        );
    }

    #[test]
    fn test_write_key_pair_produces_pem_files() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("sa.public.key");
        let private = dir.path().join("sa.private.key");
        write_key_pair(&public, &private).unwrap();
        let pem = fs::read_to_string(&public).unwrap();
        assert!(pem.contains("BEGIN PUBLIC KEY"));
        let pem = fs::read_to_string(&private).unwrap();
        assert!(pem.contains("BEGIN PRIVATE KEY"));
    }
}
