//! `create-client` - issue a client identity: certificate, key and a
//! kubeconfig wired to use them.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::PathBuf;

use crate::admin::Context;
use crate::display;
use crate::error::Result;
use tessera_core::certs::{DEFAULT_CERT_EXPIRE_DAYS, make_client_cert};
use tessera_core::kubeconfig::KubeconfigBuilder;
use tessera_core::{CertBundle, Kubeconfig};

use super::{required_path, required_str, split_csv};
use super::create_signer_cert::refuse_existing;

pub const NAME: &str = "create-client";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Create a client certificate and kubeconfig for a user")
        .after_help(format!(
            "Examples:\n  {} {NAME} --user=alice --groups=dev,ops \
             --signer-cert=ca.crt --signer-key=ca.key --client-dir=clients/alice",
            ctx.full_name
        ))
        .arg(
            Arg::new("user")
                .long("user")
                .value_name("NAME")
                .required(true)
                .help("User the certificate identifies"),
        )
        .arg(
            Arg::new("groups")
                .long("groups")
                .value_name("NAMES")
                .help("Comma-separated groups the user belongs to"),
        )
        .arg(
            Arg::new("client-dir")
                .long("client-dir")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value(".")
                .help("Directory to write the certificate, key and kubeconfig into"),
        )
        .arg(
            Arg::new("master")
                .long("master")
                .value_name("URL")
                .default_value("https://localhost:8443")
                .help("API server the kubeconfig points at"),
        )
        .arg(
            Arg::new("signer-cert")
                .long("signer-cert")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value("ca.crt")
                .help("CA certificate to sign with"),
        )
        .arg(
            Arg::new("signer-key")
                .long("signer-key")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value("ca.key")
                .help("CA key to sign with"),
        )
        .arg(
            Arg::new("expire-days")
                .long("expire-days")
                .value_name("DAYS")
                .value_parser(value_parser!(u32))
                .default_value("730")
                .help("Days until the certificate expires"),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Replace existing files"),
        )
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let user = required_str(matches, "user");
    let groups = matches
        .get_one::<String>("groups")
        .map(|g| split_csv(g))
        .unwrap_or_default();

    let dir = required_path(matches, "client-dir");
    let cert_path = dir.join(format!("{user}.crt"));
    let key_path = dir.join(format!("{user}.key"));
    let kubeconfig_path = dir.join(format!("{user}.kubeconfig"));
    refuse_existing(
        &[&cert_path, &key_path, &kubeconfig_path],
        matches.get_flag("overwrite"),
    )?;
    std::fs::create_dir_all(&dir)?;

    let signer_cert = required_path(matches, "signer-cert");
    let signer = CertBundle::load(&signer_cert, &required_path(matches, "signer-key"))?;
    let days = *matches
        .get_one::<u32>("expire-days")
        .unwrap_or(&DEFAULT_CERT_EXPIRE_DAYS);
    let bundle = make_client_cert(&signer, user, &groups, days)?;
    bundle.write(&cert_path, &key_path)?;

    let kubeconfig = Kubeconfig::build(&KubeconfigBuilder {
        server: required_str(matches, "master").to_string(),
        user: user.to_string(),
        namespace: "default".to_string(),
        client_certificate: Some(cert_path.display().to_string()),
        client_key: Some(key_path.display().to_string()),
        certificate_authority: Some(signer_cert.display().to_string()),
        token: None,
    })?;
    kubeconfig.save(&kubeconfig_path)?;

    display::success(&format!(
        "Created client identity for {} in {}",
        user,
        dir.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::certs::make_signer_cert;

    fn ctx() -> Context {
        Context {
            full_name: "tesseradm".to_string(),
        }
    }

    #[test]
    fn test_writes_certificate_key_and_kubeconfig() {
        let dir = tempfile::tempdir().unwrap();
        let ca_cert = dir.path().join("ca.crt");
        let ca_key = dir.path().join("ca.key");
        make_signer_cert("test-signer", 30)
            .unwrap()
            .write(&ca_cert, &ca_key)
            .unwrap();

        let client_dir = dir.path().join("clients").join("alice");
        let matches = command(&ctx())
            .try_get_matches_from([
                NAME,
                "--user=alice",
                "--groups=dev,ops",
                "--signer-cert",
                ca_cert.to_str().unwrap(),
                "--signer-key",
                ca_key.to_str().unwrap(),
                "--client-dir",
                client_dir.to_str().unwrap(),
            ])
            .unwrap();
        run(&matches).unwrap();

        let bundle = CertBundle::load(
            &client_dir.join("alice.crt"),
            &client_dir.join("alice.key"),
        )
        .unwrap();
        let subject = format!("{:?}", bundle.cert.subject_name());
        assert!(subject.contains("alice"));

        let kubeconfig =
            Kubeconfig::load(&client_dir.join("alice.kubeconfig")).unwrap();
        assert_eq!(kubeconfig.users[0].name, "alice");
    }
}
