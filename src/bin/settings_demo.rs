use user_soap::settings::*;

fn main() -> anyhow::Result<()> {
    // Load settings from the default location
    let project_settings = parse_settings(None)?;
    println!("Loaded settings: {:?}", project_settings);

    // Attempt to load from an invalid path (expected to fail)
    let is_err = parse_settings(Some("")).is_err();
    println!("Error on invalid path: {:?}", is_err);

    // Environment wins over the file for the database section
    // $ POSTGRESQL_HOST=db.internal cargo run --bin settings_demo -- --settings=settings/dev.toml
    let cli = Cli::parse();
    let project_settings = parse_settings(cli.settings.as_deref())?;
    println!(
        "Database target: {}:{}/{}",
        project_settings.database.host,
        project_settings.database.port,
        project_settings.database.name
    );

    Ok(())
}
