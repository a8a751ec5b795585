//! Interface and gateway subcommands.

use crate::cli::OutputFormat;
use crate::error::CliResult;
use crate::output;
use crate::session::ScanSession;
use clap::Parser;

/// List usable network interfaces.
#[derive(Parser, Debug)]
pub struct InterfacesCommand {
    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,
}

impl InterfacesCommand {
    /// Execute the interfaces command.
    pub fn execute(&self, quiet: bool) -> CliResult<()> {
        let session = ScanSession::default();
        let interfaces = session.interfaces();
        if interfaces.is_empty() && !quiet {
            output::print_warning("no usable network interface found");
        }
        output::print_interfaces(&interfaces, self.output)?;
        Ok(())
    }
}

/// Print the default gateway.
#[derive(Parser, Debug)]
pub struct GatewayCommand {}

impl GatewayCommand {
    /// Execute the gateway command.
    pub async fn execute(&self) -> CliResult<()> {
        let session = ScanSession::default();
        match session.default_gateway().await {
            Some(addr) => println!("{addr}"),
            None => println!("gateway not found"),
        }
        Ok(())
    }
}
