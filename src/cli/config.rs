use clap::Subcommand;

mod set;
mod show;

#[derive(Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Change one setting and save it")]
    Set(set::ConfigSetCommand),

    #[command(about = "List the current settings")]
    Show(show::ConfigShowCommand),
}

impl ConfigCommand {
    pub async fn exec(&self) {
        match self {
            ConfigCommand::Set(cmd) => cmd.exec().await,
            ConfigCommand::Show(cmd) => cmd.exec().await,
        }
    }
}
