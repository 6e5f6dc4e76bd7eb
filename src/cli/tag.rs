//! Tag CLI commands
//!
//! Implements creation and listing of tags and edits of their members.

use clap::Subcommand;

use crate::display::{format_membership_outcomes, format_tag_list};
use crate::error::{ScroogeError, ScroogeResult};
use crate::services::TagService;
use crate::storage::Storage;

/// Tag subcommands
#[derive(Subcommand)]
pub enum TagCommands {
    /// Create a new tag
    Create {
        /// Tag name
        name: String,
        /// Optional description
        description: Option<String>,
    },

    /// List all tags with their direct members
    List,

    /// Add (+tag) or remove (-tag) direct members of a tag
    Members {
        /// Tag to modify
        name: String,
        /// Modifiers like +groceries or -restaurant
        #[arg(required = true, allow_hyphen_values = true, trailing_var_arg = true)]
        modifiers: Vec<String>,
    },
}

/// Handle a tag command
pub fn handle_tag_command(storage: &Storage, cmd: TagCommands) -> ScroogeResult<()> {
    let service = TagService::new(storage);

    match cmd {
        TagCommands::Create { name, description } => {
            let tag = service.create(&name, description.as_deref())?;
            println!("Created tag: {}", tag.name);
        }

        TagCommands::List => {
            let tags = service.list()?;
            print!("{}", format_tag_list(&tags));
        }

        TagCommands::Members { name, modifiers } => {
            let outcomes = service.modify_members(&name, &modifiers)?;
            print!("{}", format_membership_outcomes(&name, &outcomes));

            let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
            if failed == outcomes.len() {
                return Err(ScroogeError::Validation(format!(
                    "No member of '{}' changed",
                    name
                )));
            }
        }
    }

    Ok(())
}
