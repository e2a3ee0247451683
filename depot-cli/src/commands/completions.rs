//! Shell completion generation command.

use std::io;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;

/// Name of the installed binary.
const BIN_NAME: &str = "depot";

/// Generate shell completion scripts
#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut cmd = Cli::command();

        if !global.quiet {
            match self.shell {
                Shell::Bash => {
                    eprintln!("# Enable with:");
                    eprintln!("#   depot completions bash > ~/.local/share/bash-completion/completions/depot");
                }
                Shell::Zsh => {
                    eprintln!("# Enable with:");
                    eprintln!("#   depot completions zsh > ~/.zsh/completions/_depot");
                    eprintln!("# Make sure ~/.zsh/completions is in your $fpath");
                }
                Shell::Fish => {
                    eprintln!("# Enable with:");
                    eprintln!("#   depot completions fish > ~/.config/fish/completions/depot.fish");
                }
                Shell::PowerShell => {
                    eprintln!("# Enable with:");
                    eprintln!("#   depot completions powershell | Out-String | Invoke-Expression");
                }
                _ => {}
            }
        }

        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());
        Ok(())
    }
}
