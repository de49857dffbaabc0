// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line front end: runs one demonstration and prints its transcript.
//!
//! Exit status is 0 on success, 2 when the bit length or round count is rejected
//! and 1 when a demonstration fails its own cross-check.

use std::io::{self, BufRead, Write};
use std::num::ParseIntError;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use classic_pkc::scheme::{commutative, dh, elgamal, rsa};
use classic_pkc::{Engine, Error, MillerRabin, rng::demo_rng, validate_bit_length};

/// Classical public-key schemes between two simulated parties
#[derive(Parser, Debug)]
#[command(name = "classic-pkc")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    scheme: Scheme,

    /// Key length in bits, a multiple of 8 (prompted on stdin if omitted)
    #[arg(short, long, global = true)]
    bits: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Miller-Rabin rounds
    #[arg(long, global = true, default_value_t = MillerRabin::DEFAULT_ROUNDS)]
    rounds: usize,

    /// Give up any sampling loop after this many attempts
    #[arg(long, global = true)]
    max_attempts: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Scheme {
    /// Diffie-Hellman key agreement plus XOR encryption
    Dh,
    /// ElGamal encryption
    Elgamal,
    /// RSA encryption
    Rsa,
    /// Single-exponent encryption modulo a prime ("Shamir")
    Commutative,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    });

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let bits = match cli.bits {
        Some(bits) => bits,
        None => prompt_bits()?,
    };
    let bits = validate_bit_length(bits)?;

    let engine = Engine::builder().rounds(cli.rounds).max_attempts(cli.max_attempts).build()?;
    let mut rng = demo_rng(cli.seed);

    match cli.scheme {
        Scheme::Dh => print_dh(&dh::run(&engine, bits, dh::DEMO_TEXT.as_bytes(), &mut rng)?),
        Scheme::Elgamal => print_elgamal(&elgamal::run(&engine, bits, &mut rng)?),
        Scheme::Rsa => print_rsa(&rsa::run(&engine, bits, &mut rng)?),
        Scheme::Commutative => print_commutative(&commutative::run(&engine, bits, &mut rng)?),
    }

    Ok(())
}

fn prompt_bits() -> Result<usize> {
    print!("Key length in bits (multiple of 8): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let bits = line
        .trim()
        .parse::<usize>()
        .with_context(|| format!("'{}' is not a bit length", line.trim()))?;

    Ok(bits)
}

/// 2 for rejected input, 1 for everything else (including failed cross-checks).
fn exit_status(err: &anyhow::Error) -> u8 {
    let invalid_input = err.downcast_ref::<Error>().is_some_and(Error::is_invalid_input)
        || err.downcast_ref::<ParseIntError>().is_some();

    if invalid_input { 2 } else { 1 }
}

fn print_dh(t: &dh::DhTranscript) {
    println!("Prime (p): {}", t.params.modulus());
    println!("Generator (g): {}", t.params.generator());
    println!("Alice - private: {}, public: {}", t.alice.private_key().expose(), t.alice.public_key());
    println!("Bob - private: {}, public: {}", t.bob.private_key().expose(), t.bob.public_key());
    println!("Alice's session key: {}", t.alice_session_key);
    println!("Bob's session key: {}", t.bob_session_key);
    println!("Session keys match.");
    println!("Original message: {}", String::from_utf8_lossy(&t.plaintext));
    println!("Encrypted message: {}", hex::encode(&t.ciphertext));
    println!("Decrypted message: {}", String::from_utf8_lossy(&t.recovered));
}

fn print_elgamal(t: &elgamal::ElGamalTranscript) {
    let alice = t.alice.public_key();
    println!("Prime (p): {}", t.modulus);
    println!(
        "Alice - private: {}, public: {}, generator: {}",
        t.alice.private_key().exponent().expose(),
        alice.value(),
        alice.generator()
    );
    println!(
        "Bob - private: {}, public: {}",
        t.bob.private_key().exponent().expose(),
        t.bob.public_key().value()
    );
    println!("Bob's message: {}", t.to_alice.message);
    println!("Encrypted (c1, c2): ({}, {})", t.to_alice.ciphertext.c1, t.to_alice.ciphertext.c2);
    println!("Alice decrypted: {}", t.to_alice.recovered);
}

fn print_rsa(t: &rsa::RsaTranscript) {
    for (name, pair) in [("Alice", &t.alice), ("Bob", &t.bob)] {
        let public = pair.public_key();
        let private = pair.private_key();
        println!("{name} - public key: ({}, {})", public.e(), public.n());
        println!("{name} - private key: ({}, {})", private.d().expose(), private.n());
    }
    print_delivery("Alice", "Bob", &t.to_bob);
    print_delivery("Bob", "Alice", &t.to_alice);
}

fn print_commutative(t: &commutative::CommutativeTranscript) {
    println!("Prime (p): {}", t.modulus);
    for (name, pair) in [("Alice", &t.alice), ("Bob", &t.bob)] {
        println!(
            "{name} - private: {}, public: {}",
            pair.private_key().exponent().expose(),
            pair.public_key().exponent()
        );
    }
    print_delivery("Alice", "Bob", &t.to_bob);
    print_delivery("Bob", "Alice", &t.to_alice);
}

fn print_delivery(from: &str, to: &str, d: &classic_pkc::Delivery<classic_pkc::Ciphertext>) {
    println!("{from} sends: {}", d.message);
    println!("Encrypted: {}", d.ciphertext);
    println!("{to} decrypted: {}", d.recovered);
}

/// Initializes the tracing subscriber.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .with(filter)
        .try_init()
        .ok();
}
