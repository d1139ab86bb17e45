//! Build automation tasks for Monolith
//!
//! Run with: cargo xtask <command>

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;
use clap::{Parser, Subcommand};
use monolith_payload::{Footer, PayloadKey};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Monolith build automation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all tests
    Test,

    /// Run clippy lints
    Lint,

    /// Check formatting
    Fmt,

    /// Run all CI checks
    Ci,

    /// Generate documentation
    Doc,

    /// Check the payload of a built image (uses HCAI_MONOLITH_KEY if set)
    Verify {
        /// Monolith image to check
        image: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Test => {
            run_command("cargo", &["test", "--all-features", "--workspace"])?;
        }
        Commands::Lint => {
            run_command("cargo", &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?;
        }
        Commands::Fmt => {
            run_command("cargo", &["fmt", "--all", "--check"])?;
        }
        Commands::Ci => {
            println!("Running CI checks...");
            run_command("cargo", &["fmt", "--all", "--check"])?;
            run_command("cargo", &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?;
            run_command("cargo", &["test", "--all-features", "--workspace"])?;
            println!("All CI checks passed!");
        }
        Commands::Doc => {
            run_command("cargo", &["doc", "--workspace", "--no-deps", "--open"])?;
        }
        Commands::Verify { image } => verify(&image)?,
    }

    Ok(())
}

fn verify(image: &Path) -> anyhow::Result<()> {
    let mut file =
        File::open(image).with_context(|| format!("cannot open {}", image.display()))?;
    let (footer, image_len) = Footer::read_from(&mut file).context("no valid footer")?;

    println!("image:        {} ({image_len} bytes)", image.display());
    println!("payload size: {} bytes", footer.payload_size());
    println!("nonce:        {}", hex::encode(footer.nonce()));
    println!("auth tag:     {}", hex::encode(footer.auth_tag()));

    let (key, source) = PayloadKey::resolve();
    let ciphertext = footer.read_ciphertext(&mut file, image_len)?;
    monolith_payload::open(&footer, ciphertext, &key)
        .with_context(|| format!("payload does not verify with the {source:?} key"))?;

    println!("payload verified ({source:?} key)");
    Ok(())
}

fn run_command(program: &str, args: &[&str]) -> anyhow::Result<()> {
    let status = Command::new(program)
        .args(args)
        .status()?;

    if !status.success() {
        anyhow::bail!("{} {:?} failed", program, args);
    }

    Ok(())
}
