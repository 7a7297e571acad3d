//! `create-master-certs` - lay down the full certificate directory a
//! master needs to start.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::{Path, PathBuf};

use crate::admin::Context;
use crate::display;
use crate::error::Result;
use tessera_core::certs::{
    DEFAULT_CERT_EXPIRE_DAYS, DEFAULT_SIGNER_EXPIRE_DAYS, make_client_cert, make_server_cert,
    make_signer_cert, write_key_pair,
};
use tessera_core::kubeconfig::KubeconfigBuilder;
use tessera_core::{CertBundle, Kubeconfig};

use super::create_signer_cert::DEFAULT_SIGNER_NAME;
use super::{required_path, required_str, split_csv};

pub const NAME: &str = "create-master-certs";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Create all certificates and keys a master needs")
        .long_about(
            "Populate a certificate directory with a CA, a serving \
             certificate for the master, an admin client identity with a \
             ready-to-use kubeconfig, and the service-account signing keys. \
             An existing CA in the directory is reused so nodes and clients \
             keep trusting certificates issued earlier.",
        )
        .after_help(format!(
            "Examples:\n  {} {NAME} --cert-dir=certs \
             --hostnames=master.example.com,10.0.0.1 --master=https://master.example.com:8443",
            ctx.full_name
        ))
        .arg(
            Arg::new("cert-dir")
                .long("cert-dir")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value("certs")
                .help("Directory to populate"),
        )
        .arg(
            Arg::new("hostnames")
                .long("hostnames")
                .value_name("NAMES")
                .default_value("localhost,127.0.0.1")
                .help("Comma-separated hostnames and IPs the master answers on"),
        )
        .arg(
            Arg::new("master")
                .long("master")
                .value_name("URL")
                .default_value("https://localhost:8443")
                .help("URL clients reach the master at"),
        )
        .arg(
            Arg::new("signer-name")
                .long("signer-name")
                .value_name("CN")
                .default_value(DEFAULT_SIGNER_NAME)
                .help("Common name of the CA, when one has to be created"),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Regenerate everything, including the CA"),
        )
}

fn load_or_create_signer(
    cert_path: &Path,
    key_path: &Path,
    name: &str,
    overwrite: bool,
) -> Result<(CertBundle, bool)> {
    if !overwrite && cert_path.exists() && key_path.exists() {
        return Ok((CertBundle::load(cert_path, key_path)?, true));
    }
    let signer = make_signer_cert(name, DEFAULT_SIGNER_EXPIRE_DAYS)?;
    signer.write(cert_path, key_path)?;
    Ok((signer, false))
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let dir = required_path(matches, "cert-dir");
    std::fs::create_dir_all(&dir)?;
    let overwrite = matches.get_flag("overwrite");

    let ca_cert = dir.join("ca.crt");
    let ca_key = dir.join("ca.key");
    let (signer, reused) = load_or_create_signer(
        &ca_cert,
        &ca_key,
        required_str(matches, "signer-name"),
        overwrite,
    )?;
    if reused {
        display::note(&format!("Reusing existing CA at {}", ca_cert.display()));
    }

    let hostnames = split_csv(required_str(matches, "hostnames"));
    let server = make_server_cert(&signer, &hostnames, DEFAULT_CERT_EXPIRE_DAYS)?;
    server.write(&dir.join("master.server.crt"), &dir.join("master.server.key"))?;

    let admin_cert = dir.join("admin.crt");
    let admin_key = dir.join("admin.key");
    let admin = make_client_cert(
        &signer,
        "admin",
        &["cluster-admins".to_string()],
        DEFAULT_CERT_EXPIRE_DAYS,
    )?;
    admin.write(&admin_cert, &admin_key)?;

    let kubeconfig = Kubeconfig::build(&KubeconfigBuilder {
        server: required_str(matches, "master").to_string(),
        user: "admin".to_string(),
        namespace: "default".to_string(),
        client_certificate: Some(admin_cert.display().to_string()),
        client_key: Some(admin_key.display().to_string()),
        certificate_authority: Some(ca_cert.display().to_string()),
        token: None,
    })?;
    kubeconfig.save(&dir.join("admin.kubeconfig"))?;

    write_key_pair(
        &dir.join("serviceaccounts.public.key"),
        &dir.join("serviceaccounts.private.key"),
    )?;

    display::success(&format!("Populated {}", dir.display()));
    Ok(())
}
