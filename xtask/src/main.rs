use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for glbview")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Write the sample model the desktop viewer opens by default
    Sample,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for step in [Step::Fmt, Step::Clippy, Step::Test, Step::Doc] {
                step.run()?;
            }
        }
        Commands::Fmt => Step::Fmt.run()?,
        Commands::Clippy => Step::Clippy.run()?,
        Commands::Test => Step::Test.run()?,
        Commands::Doc => Step::Doc.run()?,
        Commands::Build => Step::Build.run()?,
        Commands::Sample => write_sample()?,
    }

    Ok(())
}

#[derive(Clone, Copy)]
enum Step {
    Fmt,
    Clippy,
    Test,
    Doc,
    Build,
}

impl Step {
    fn args(self) -> &'static [&'static str] {
        match self {
            Step::Fmt => &["fmt", "--all", "--", "--check"],
            Step::Clippy => &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            Step::Test => &["test", "--workspace"],
            Step::Doc => &["doc", "--workspace", "--no-deps"],
            Step::Build => &["build", "--workspace"],
        }
    }

    fn run(self) -> Result<()> {
        cargo(self.args())
    }
}

fn cargo(args: &[&str]) -> Result<()> {
    println!("==> Running cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {} failed", args[0]);
    }
    Ok(())
}

const SAMPLE_MODEL: &str = "models/thixotropic-gel.glb";

fn write_sample() -> Result<()> {
    cargo(&["run", "--quiet", "-p", "glbview-cli", "--", "sample", SAMPLE_MODEL])
}
