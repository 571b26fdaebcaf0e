use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{info, warn, LevelFilter};

use rsa_file_cipher::config::RsaConfig;
use rsa_file_cipher::rsa::{decrypt_bytes, encrypt_bytes, generate_keypair, RsaError};
use rsa_file_cipher::util::file_ops::{
    format_file_size, read_file, read_private_key, read_public_key, write_file, write_keypair,
};

// p == q is rare but possible for small widths
const KEYGEN_ATTEMPTS: usize = 16;

fn io_args(cmd: Command, key_help: &'static str) -> Command {
    cmd.arg(
        Arg::new("key")
            .long("key")
            .short('k')
            .action(ArgAction::Set)
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help(key_help),
    )
    .arg(
        Arg::new("input")
            .long("input")
            .short('i')
            .action(ArgAction::Set)
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("file to read"),
    )
    .arg(
        Arg::new("output")
            .long("output")
            .short('o')
            .action(ArgAction::Set)
            .required(false)
            .value_parser(value_parser!(PathBuf))
            .help("file to write, hex to stdout when omitted"),
    )
}

fn cli() -> Command {
    Command::new("rsa-file")
        .version(clap::crate_version!())
        .about("RSA key generation and file encryption")
        .subcommand_required(true)
        .subcommand(
            Command::new("keygen")
                .about("generate a key pair")
                .arg(
                    Arg::new("bits")
                        .long("bits")
                        .short('b')
                        .action(ArgAction::Set)
                        .value_parser(value_parser!(u64).range(2..))
                        .help("bit width of each prime"),
                )
                .arg(
                    Arg::new("rounds")
                        .long("rounds")
                        .short('r')
                        .action(ArgAction::Set)
                        .value_parser(value_parser!(u32).range(1..))
                        .help("Miller-Rabin rounds per candidate"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .action(ArgAction::Set)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON configuration file"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .action(ArgAction::Set)
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("path stem for <stem>.pub.json and <stem>.priv.json"),
                ),
        )
        .subcommand(io_args(
            Command::new("encrypt").about("encrypt a file with a public key"),
            "public key file",
        ))
        .subcommand(io_args(
            Command::new("decrypt").about("decrypt a file with a private key"),
            "private key file",
        ))
}

fn keygen(m: &ArgMatches) -> anyhow::Result<()> {
    let mut cfg = RsaConfig::load(m.get_one::<PathBuf>("config").map(PathBuf::as_path))
        .context("failed to load configuration")?;
    if let Some(bits) = m.get_one::<u64>("bits") {
        cfg = cfg.with_prime_bits(*bits);
    }
    if let Some(rounds) = m.get_one::<u32>("rounds") {
        cfg = cfg.with_rounds(*rounds);
    }

    let mut rng = rand::thread_rng();
    let mut attempt = 1;
    let keypair = loop {
        match generate_keypair(cfg.prime_bits, cfg.rounds, &mut rng) {
            Err(RsaError::InvalidKeyMaterial) if attempt < KEYGEN_ATTEMPTS => {
                warn!("primes coincided, retrying ({}/{})", attempt, KEYGEN_ATTEMPTS);
                attempt += 1;
            }
            res => break res.context("key generation failed")?,
        }
    };

    let stem = m.get_one::<PathBuf>("out").context("missing --out")?;
    let (pub_path, priv_path) = write_keypair(stem, &keypair)?;
    info!(
        "wrote {}-bit key pair to {} and {}",
        keypair.bit_length(),
        pub_path.display(),
        priv_path.display()
    );
    Ok(())
}

fn emit(output: Option<&PathBuf>, data: &[u8]) -> anyhow::Result<()> {
    match output {
        Some(p) => {
            write_file(p, data)?;
            info!("wrote {} to {}", format_file_size(data.len() as u64), p.display());
        }
        None => println!("{}", hex::encode(data)),
    }
    Ok(())
}

fn input(m: &ArgMatches) -> anyhow::Result<(&Path, Vec<u8>)> {
    let key = m.get_one::<PathBuf>("key").context("missing --key")?;
    let path = m.get_one::<PathBuf>("input").context("missing --input")?;
    let data = read_file(path)?;
    info!("read {} from {}", format_file_size(data.len() as u64), path.display());
    Ok((key.as_path(), data))
}

fn encrypt(m: &ArgMatches) -> anyhow::Result<()> {
    let (key, data) = input(m)?;
    let key = read_public_key(key)?;
    let ciphertext = encrypt_bytes(&data, &key).context("encryption failed")?;
    emit(m.get_one::<PathBuf>("output"), &ciphertext)
}

fn decrypt(m: &ArgMatches) -> anyhow::Result<()> {
    let (key, data) = input(m)?;
    let key = read_private_key(key)?;
    let plaintext = decrypt_bytes(&data, &key).context("decryption failed")?;
    emit(m.get_one::<PathBuf>("output"), &plaintext)
}

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = cli().get_matches();
    let res = match matches.subcommand() {
        Some(("keygen", m)) => keygen(m),
        Some(("encrypt", m)) => encrypt(m),
        Some(("decrypt", m)) => decrypt(m),
        Some((name, _)) => Err(anyhow::anyhow!("unsupported command {}", name)),
        None => Ok(()),
    };

    if let Err(e) = res {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
