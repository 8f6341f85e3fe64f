//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vetclaim_core::models::{DependentProfile, MaritalStatus};

#[derive(Debug, Parser)]
#[command(
    name = "vetclaim",
    version,
    about = "VA disability claims assistant: ratings, compensation, presumptives and claim tracking"
)]
pub struct Cli {
    /// Profile to act on. Defaults to the last profile used.
    #[arg(long, short = 'u', global = true)]
    pub user: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

fn rating_value(s: &str) -> Result<u8, String> {
    let value: u8 = s.parse().map_err(|_| format!("'{}' is not a rating", s))?;
    if value > 100 {
        return Err(format!("rating {} is above 100", value));
    }
    Ok(value)
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Combine individual ratings into a VA combined rating
    Rating {
        #[arg(value_parser = rating_value, required = true)]
        ratings: Vec<u8>,
    },

    /// Monthly compensation for a combined rating and dependents
    Compensation {
        #[arg(value_parser = rating_value)]
        rating: u8,
        #[command(flatten)]
        dependents: DependentArgs,
    },

    /// Presumptive categories whose windows overlap a service period
    Presumptive {
        /// Entry on duty date (YYYY-MM-DD)
        eod: String,
        /// Release from active duty date (YYYY-MM-DD)
        rad: String,
        /// Group conditions that qualify under several categories
        #[arg(long)]
        merge: bool,
    },

    /// Rating, compensation and presumptive status for the profile
    Assess,

    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    Disability {
        #[command(subcommand)]
        action: DisabilityAction,
    },

    /// Replace the profile's dependents
    Dependents(DependentArgs),

    /// Set service dates (YYYY-MM-DD)
    ServiceDates { eod: String, rad: String },

    Claim {
        #[command(subcommand)]
        action: ClaimAction,
    },

    Symptom {
        #[command(subcommand)]
        action: SymptomAction,
    },

    Appointment {
        #[command(subcommand)]
        action: AppointmentAction,
    },

    Todo {
        #[command(subcommand)]
        action: TodoAction,
    },

    /// Suggest presumptive and secondary claims
    Suggest {
        /// Symptom ids answered yes (asthma, rhinitis, sinusitis, copd, ...)
        #[arg(long = "yes", value_name = "SYMPTOM")]
        yes: Vec<String>,
        /// Symptom ids answered no
        #[arg(long = "no", value_name = "SYMPTOM")]
        no: Vec<String>,
        /// Print the screening questions and exit
        #[arg(long)]
        questions: bool,
    },

    /// Generate rating increase strategies for the profile (Pro)
    Analyze,

    /// Rating criteria at every level for a condition
    Criteria { condition: String },

    /// Explain how a secondary condition connects to a primary one
    Secondary { primary: String, secondary: String },

    /// Read disabilities and service dates from a text document
    Extract {
        file: PathBuf,
        /// Show what was found without changing the profile
        #[arg(long)]
        dry_run: bool,
    },

    /// Draft a claim support document for a condition in the claim package
    Draft {
        condition: String,
        /// Template id (personal, nexus, buddy, claimStatement, ...)
        #[arg(long, short = 't', default_value = "personal")]
        template: String,
        /// Print the draft without saving it
        #[arg(long)]
        no_save: bool,
    },

    Document {
        #[command(subcommand)]
        action: DocumentAction,
    },

    Billing {
        #[command(subcommand)]
        action: BillingAction,
    },

    Membership {
        #[command(subcommand)]
        action: MembershipAction,
    },

    /// Manage API keys in the OS keychain
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },
}

#[derive(Debug, Clone, Args)]
pub struct DependentArgs {
    #[arg(long)]
    pub married: bool,
    #[arg(long, default_value_t = 0)]
    pub children: u32,
    /// Children over 18 in school
    #[arg(long, default_value_t = 0)]
    pub school_children: u32,
    #[arg(long, default_value_t = 0)]
    pub parents: u32,
    /// Spouse receives aid and attendance
    #[arg(long)]
    pub spouse_aa: bool,
    #[arg(long, default_value_t = 0)]
    pub smc_k: u32,
}

impl From<DependentArgs> for DependentProfile {
    fn from(args: DependentArgs) -> Self {
        DependentProfile {
            marital_status: if args.married {
                MaritalStatus::Married
            } else {
                MaritalStatus::Single
            },
            children_under_18: args.children,
            children_over_18_school: args.school_children,
            dependent_parents: args.parents,
            spouse_aid_attendance: args.spouse_aa,
            smc_k_awards: args.smc_k,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    Show,
    /// Create a profile and make it the default
    Init {
        user_id: String,
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    /// Edit contact and billing details
    Edit {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        date_of_birth: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        stripe_customer: Option<String>,
    },
    /// Clear disabilities, strategy, claim package, symptom logs and screening answers
    Reset,
    Delete {
        #[arg(long)]
        yes: bool,
    },
    List,
}

#[derive(Debug, Subcommand)]
pub enum DisabilityAction {
    Add {
        name: String,
        #[arg(value_parser = rating_value)]
        rating: u8,
    },
    Remove { id: i64 },
    Rate {
        id: i64,
        #[arg(value_parser = rating_value)]
        rating: u8,
    },
    Rename { id: i64, name: String },
    List,
}

#[derive(Debug, Subcommand)]
pub enum ClaimAction {
    Add {
        name: String,
        /// File as secondary to this primary condition
        #[arg(long, conflicts_with = "act")]
        secondary_of: Option<String>,
        /// File as presumptive under this act
        #[arg(long)]
        act: Option<String>,
        #[arg(long, requires = "secondary_of")]
        chance: Option<String>,
    },
    Remove { name: String },
    Status {
        name: String,
        status: String,
        /// Rating granted, for decided claims
        #[arg(long, value_parser = rating_value)]
        rating: Option<u8>,
    },
    Note {
        name: String,
        /// inServiceEvent, symptoms, workImpact or personalImpact
        field: String,
        text: String,
    },
    List,
}

#[derive(Debug, Subcommand)]
pub enum SymptomAction {
    Log {
        condition: String,
        #[arg(long)]
        date: String,
        #[arg(long, default_value_t = 5)]
        severity: u8,
        #[arg(long, default_value = "")]
        duration: String,
        #[arg(long, default_value = "")]
        impact: String,
        #[arg(long)]
        notes: String,
    },
    Remove { condition: String, id: i64 },
    List { condition: String },
    /// Write the log as CSV
    Export {
        condition: String,
        /// Output file. Defaults to `<condition>_symptom_log.csv`.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AppointmentAction {
    Add {
        title: String,
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        condition: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Change the given fields of an appointment
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        condition: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Remove { id: i64 },
    List,
}

#[derive(Debug, Subcommand)]
pub enum TodoAction {
    Add {
        text: String,
        #[arg(long)]
        due: Option<String>,
    },
    /// Toggle completion
    Done { id: i64 },
    Remove { id: i64 },
    List,
}

#[derive(Debug, Subcommand)]
pub enum DocumentAction {
    /// Templates that can be drafted for a claimed condition
    Templates { condition: String },
    List {
        #[arg(long)]
        condition: Option<String>,
    },
    Show { id: i64 },
    /// Replace a saved document's text with the contents of a file
    Edit { id: i64, file: PathBuf },
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum BillingAction {
    /// Open a billing portal session and print its URL
    Portal {
        #[arg(long)]
        return_url: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum MembershipAction {
    /// Apply a subscription status reported by the billing provider
    Sync {
        status: String,
        /// A new subscription; records its id
        #[arg(long)]
        subscription_id: Option<String>,
        /// Status before this update
        #[arg(long, conflicts_with = "subscription_id")]
        previous_status: Option<String>,
    },
    /// Grant Pro without a subscription
    Upgrade,
}

#[derive(Debug, Subcommand)]
pub enum SecretAction {
    /// Store a key, read from the terminal
    Set { kind: String },
    Delete { kind: String },
    /// Show which keys are configured
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rating_values_are_bounded() {
        assert!(Cli::try_parse_from(["vetclaim", "rating", "50", "30"]).is_ok());
        assert!(Cli::try_parse_from(["vetclaim", "rating", "150"]).is_err());
        assert!(Cli::try_parse_from(["vetclaim", "rating"]).is_err());
    }

    #[test]
    fn test_dependent_flags() {
        let cli = Cli::try_parse_from([
            "vetclaim",
            "compensation",
            "70",
            "--married",
            "--children",
            "2",
            "--smc-k",
            "1",
        ])
        .expect("parse");
        let Command::Compensation { rating, dependents } = cli.command else {
            panic!("expected compensation");
        };
        assert_eq!(rating, 70);
        let profile = DependentProfile::from(dependents);
        assert!(profile.has_spouse());
        assert_eq!(profile.children_under_18, 2);
        assert_eq!(profile.smc_k_awards, 1);
    }

    #[test]
    fn test_global_user_after_subcommand() {
        let cli = Cli::try_parse_from(["vetclaim", "assess", "--user", "jdoe"]).expect("parse");
        assert_eq!(cli.user.as_deref(), Some("jdoe"));
    }
}
