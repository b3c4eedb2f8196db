//! Command-line structure for the `badgeroll` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// badgeroll - Register members and prepare their badges
///
/// Reads keep working from the local cache when the member directory cannot
/// be reached; changes are only accepted while it is online.
#[derive(Debug, Parser)]
#[command(name = "badgeroll")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show remote availability and cache age
    Status,

    /// Set the remote URL and store the access key in the keychain
    Configure(ConfigureArgs),

    /// List members, newest registration first
    List {
        /// Show at most this many members
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one member
    Show { id: String },

    /// Register a new member
    Register(RegisterArgs),

    /// Change some fields of a member
    Update(UpdateArgs),

    /// Delete a member
    Delete { id: String },

    /// Write all members to an export file
    Export {
        /// Destination file (defaults to members_<date>.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Merge an export file into the directory
    Import {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Member counts
    Stats,

    /// Print badge data for one member, or for everyone
    Badges {
        #[arg(long)]
        id: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct ConfigureArgs {
    /// Project URL, e.g. https://xyz.supabase.co
    #[arg(long)]
    pub url: String,

    /// Country calling code used for QR payloads
    #[arg(long)]
    pub country_prefix: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub surname: String,

    #[arg(long)]
    pub given_names: String,

    #[arg(long)]
    pub role: String,

    #[arg(long)]
    pub contact: String,

    #[arg(long, value_name = "YYYY-MM-DD")]
    pub baptism_date: Option<String>,

    #[arg(long, value_name = "YYYY-MM-DD")]
    pub membership_date: Option<String>,

    /// Image file to embed as the member photo
    #[arg(long, value_name = "FILE")]
    pub photo: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: String,

    #[arg(long)]
    pub surname: Option<String>,

    #[arg(long)]
    pub given_names: Option<String>,

    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub contact: Option<String>,

    #[arg(long, value_name = "YYYY-MM-DD")]
    pub baptism_date: Option<String>,

    #[arg(long, value_name = "YYYY-MM-DD")]
    pub membership_date: Option<String>,

    #[arg(long, value_name = "FILE")]
    pub photo: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_register() {
        let args = vec![
            "badgeroll",
            "register",
            "--surname",
            "Kouassi",
            "--given-names",
            "Ama",
            "--role",
            "Choriste",
            "--contact",
            "0708091011",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Register(reg) => {
                assert_eq!(reg.surname, "Kouassi");
                assert!(reg.photo.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_update_fields_are_optional() {
        let cli = Cli::try_parse_from(["badgeroll", "update", "member_1", "--role", "Diacre"]).unwrap();
        match cli.command {
            Command::Update(up) => {
                assert_eq!(up.id, "member_1");
                assert_eq!(up.role.as_deref(), Some("Diacre"));
                assert!(up.surname.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_json_flag() {
        let cli = Cli::try_parse_from(["badgeroll", "stats", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Stats));
    }

    #[test]
    fn test_parse_export_output() {
        let cli = Cli::try_parse_from(["badgeroll", "export", "-o", "/tmp/out.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Export { output: Some(ref p) } if p == &PathBuf::from("/tmp/out.json")
        ));
    }

    #[test]
    fn test_register_requires_contact() {
        let args = ["badgeroll", "register", "--surname", "A", "--given-names", "B", "--role", "C"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
