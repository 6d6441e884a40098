use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for seascape")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// fmt check, clippy, then tests in both profiles
    Check,
    /// Run all tests
    Test {
        /// Also run with release settings, where desync checks log instead of panic
        #[arg(long)]
        release: bool,
    },
    /// Run the LOD selection timing bench
    Bench,
    /// Run the CLI end to end: a wave replay check and a short fly-through
    Smoke,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo("fmt check", &["fmt", "--all", "--", "--check"])?;
            cargo(
                "clippy",
                &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            )?;
            run_tests(true)?;
        }
        Commands::Test { release } => run_tests(release)?,
        Commands::Bench => cargo(
            "lod bench",
            &["bench", "-p", "seascape-stream", "--bench", "bench_lod_select"],
        )?,
        Commands::Smoke => {
            cargo(
                "simulate",
                &["run", "-p", "seascape-cli", "--", "simulate", "--ticks", "200"],
            )?;
            cargo(
                "fly",
                &["run", "-p", "seascape-cli", "--", "fly", "--frames", "30"],
            )?;
        }
    }

    Ok(())
}

fn run_tests(release: bool) -> Result<()> {
    cargo("test", &["test", "--workspace"])?;
    if release {
        cargo("test (release)", &["test", "--workspace", "--release"])?;
    }
    Ok(())
}

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> {step}: cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{step} failed");
    }
    Ok(())
}
