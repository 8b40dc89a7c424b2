use clap::{Parser, Subcommand};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "ferroftpd", about = "An FTP server written in Rust.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Listen port, overrides the configuration file
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print a bcrypt hash for a passwd file entry
    HashPassword {
        /// Password to hash
        password: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["ferroftpd", "-c", "/tmp/ftp.conf", "--port", "2200", "-v"]);
        assert_eq!(cli.config.as_deref(), Some("/tmp/ftp.conf"));
        assert_eq!(cli.port, Some(2200));
        assert!(cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_hash_password() {
        let cli = Cli::parse_from(["ferroftpd", "hash-password", "secret"]);
        match cli.command {
            Some(CliCommand::HashPassword { password }) => assert_eq!(password, "secret"),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
