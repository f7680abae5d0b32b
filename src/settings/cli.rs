use super::Parser;

#[derive(Parser, Debug)]
#[command(name = "user-soap", about = "SOAP-style user lookup over PostgreSQL")]
pub struct Cli {
    /// Path to the TOML settings file.
    #[arg(long)]
    pub settings: Option<String>,
}
