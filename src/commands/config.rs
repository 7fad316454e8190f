use anyhow::Result;
use owo_colors::OwoColorize;
use unical_core::config::UnicalConfig;

pub fn run() -> Result<()> {
    let config_path = UnicalConfig::config_path()?;
    let config = UnicalConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());

    println!();
    println!("{}", "Settings".bold());
    println!("  Timezone:   {}", config.zone()?);
    println!("  Week start: {:?}", config.week_start);
    println!("  Cell limit: {}", config.cell_limit);
    println!("  Day order:  {:?}", config.day_order);
    println!("  Timeout:    {}", config.timeout);

    match &config.source {
        Some(source) => println!(
            "  Source:     {} ({})",
            source.provider.name(),
            source.provider.binary_name().dimmed()
        ),
        None => println!("  Source:     {}", "not configured".yellow()),
    }

    Ok(())
}
