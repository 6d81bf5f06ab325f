use clap::{Args, Parser, Subcommand};
use pillbox_core::MedicineUpdate;

#[derive(Debug, Parser)]
#[command(name = "pillbox", version, about = "Medicine reminders over WhatsApp")]
pub struct Cli {
    /// Config file (default: $PILLBOX_CONFIG, then ~/.pillbox/pillbox.toml).
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new medicine.
    Add(AddArgs),
    /// Show all active medicines.
    List,
    /// Change some fields of a medicine.
    Edit {
        id: i64,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Remove a medicine (hidden from reminders, kept on disk unless --hard).
    Remove {
        id: i64,
        /// Delete the row permanently.
        #[arg(long)]
        hard: bool,
    },
    /// Start the reminder scheduler and run until interrupted.
    Run {
        /// Log digests instead of sending them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Run the reminder job once.
    Tick {
        /// Pretend the local time is HH:MM today.
        #[arg(long, value_name = "HH:MM")]
        at: Option<String>,
        /// Log digests instead of sending them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Send a one-off WhatsApp message through Twilio.
    SendTest {
        /// Destination number, E.164 (e.g. +5521999999999).
        destination: String,
        /// Free-text body.
        #[arg(long, default_value = "Hello! This is a pillbox test message.")]
        message: String,
        /// Send a content template instead of the free-text body.
        #[arg(long, value_name = "CONTENT_SID")]
        template: Option<String>,
        /// Template variable, repeatable: --var 1=12/1 --var 2=3pm
        #[arg(long = "var", value_name = "KEY=VALUE", requires = "template")]
        vars: Vec<String>,
    },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    /// Dosage, e.g. "5ml" or "1 tablet".
    #[arg(long)]
    pub quantity: String,
    /// Free text, e.g. "every 8 hours".
    #[arg(long)]
    pub frequency: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    /// YYYY-MM-DD or DD/MM/YYYY (default: today).
    #[arg(long)]
    pub start: Option<String>,
    /// YYYY-MM-DD or DD/MM/YYYY (default: today).
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub quantity: Option<String>,
    #[arg(long)]
    pub frequency: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
}

impl From<EditArgs> for MedicineUpdate {
    fn from(a: EditArgs) -> Self {
        Self {
            name: a.name,
            quantity: a.quantity,
            frequency: a.frequency,
            phone: a.phone,
            start_date: a.start.as_deref().map(pillbox_core::dates::to_canonical),
            end_date: a.end.as_deref().map(pillbox_core::dates::to_canonical),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_parses_with_defaults() {
        let cli = Cli::try_parse_from([
            "pillbox", "add", "--name", "Paracetamol", "--quantity", "500mg", "--frequency",
            "every 8h",
        ])
        .unwrap();
        match cli.command {
            Command::Add(a) => {
                assert_eq!(a.name, "Paracetamol");
                assert_eq!(a.phone, "");
                assert!(a.start.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn edit_dates_are_canonicalised() {
        let cli = Cli::try_parse_from(["pillbox", "edit", "3", "--end", "10/01/2024"]).unwrap();
        match cli.command {
            Command::Edit { id, fields } => {
                assert_eq!(id, 3);
                let update = MedicineUpdate::from(fields);
                assert_eq!(update.end_date.as_deref(), Some("2024-01-10"));
                assert!(update.name.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn template_vars_need_a_template() {
        assert!(Cli::try_parse_from(["pillbox", "send-test", "+1", "--var", "1=a"]).is_err());
        assert!(Cli::try_parse_from([
            "pillbox", "send-test", "+1", "--template", "HX1", "--var", "1=a"
        ])
        .is_ok());
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["pillbox", "list", "--config", "/tmp/p.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/p.toml"));
    }
}
