use anyhow::Result;
use clap::{Parser, Subcommand};
mod auth;
use credparser::{Config, CredParser, CredParserBuilder};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Args)]
struct ConfigArgs {
    /// Salt length in bytes (default: 12)
    #[arg(long = "salt-len")]
    salt_len: Option<usize>,

    /// Minimum key-stretching hash rounds (default: 3)
    #[arg(long = "min-rounds")]
    min_hash_rounds: Option<u32>,

    /// Maximum key-stretching hash rounds (default: 24)
    #[arg(long = "max-rounds")]
    max_hash_rounds: Option<u32>,
}

impl ConfigArgs {
    fn to_config(&self) -> Result<Config, credparser::CredError> {
        let default = Config::default();

        Config::new(
            self.salt_len.unwrap_or(default.salt_len()),
            self.min_hash_rounds.unwrap_or(default.min_hash_rounds()),
            self.max_hash_rounds.unwrap_or(default.max_hash_rounds()),
        )
    }
}

#[derive(Debug, Parser)]
#[command(name = "credparser")]
#[command(
    version,
    about = "Encode username/password pairs into reversible credential strings for config files."
)]
struct Cli {
    /// Path to the master seed file
    #[arg(long, global = true, value_name = "PATH", env = "CREDPARSER_SEED")]
    seed: Option<PathBuf>,

    /// Signer identity mixed into key derivation (default: current OS user)
    #[arg(long, global = true, value_name = "NAME", env = "CREDPARSER_SIGNER")]
    signer: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generates a credential string from a username/password pair
    Make {
        /// Username or label (prompted for if omitted)
        username: Option<String>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Decodes a credential string
    #[command(arg_required_else_help = true)]
    Show {
        /// The encoded credential string
        credentials: String,

        /// Print the decoded password instead of masking it
        #[arg(long, default_value_t = false)]
        reveal: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn apply_overrides(
    mut builder: CredParserBuilder,
    seed: Option<PathBuf>,
    signer: Option<String>,
) -> CredParserBuilder {
    if let Some(path) = seed {
        builder = builder.seed_path(path);
    }
    if let Some(signer) = signer {
        builder = builder.signer(signer);
    }
    builder
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    match args.command {
        Commands::Make { username, config } => {
            let config = config.to_config()?;
            let username = auth::read_username(username)?;
            let password = auth::read_password()?;

            let builder = CredParser::builder()
                .username(username)
                .password(password.as_str())
                .config(config);
            let parser = apply_overrides(builder, args.seed, args.signer).build()?;

            // The credential string alone goes to stdout so it can be piped;
            // the verification readback goes to stderr.
            println!("{}", parser.credentials());
            eprintln!("username: {}", parser.username()?);
            eprintln!("password: {}", "*".repeat(parser.password()?.len()));
        }
        Commands::Show {
            credentials,
            reveal,
            config,
        } => {
            let config = config.to_config()?;

            let builder = CredParser::builder().credentials(credentials).config(config);
            let parser = apply_overrides(builder, args.seed, args.signer).build()?;

            let password = parser.password()?;
            println!("username: {}", parser.username()?);
            if reveal {
                println!("password: {}", password.as_str());
            } else {
                println!("password: {}", "*".repeat(password.len()));
            }
        }
    }

    Ok(())
}
