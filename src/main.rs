mod args;

use anyhow::{Context, Result};
use clap::Parser;

use args::{CliArgs, Commands};
use meteo_core::{AppError, Config};
use meteo_ui::error_mapping::from_weather_error;
use meteo_ui::AppServices;
use meteo_weather::units::{
    format_one_decimal, format_rounded, format_temperature, format_timestamp,
};
use meteo_weather::{City, WeatherData};

#[tokio::main]
async fn main() -> Result<()> {
    meteo_core::init()?;

    let args = CliArgs::parse();
    let (config, _) = Config::load_validated(args.config.as_deref()).map_err(report)?;

    let services = AppServices::new(&config, tokio::runtime::Handle::current())
        .map_err(report)
        .context("Failed to initialize services")?;

    match args.command {
        Commands::Search { query } => {
            let query = query.as_deref().unwrap_or("");
            if query.trim().is_empty() {
                println!(
                    "Default cities: {}",
                    services.geocoding().fallback_cities().join(", ")
                );
            }
            let cities = search(&services, query).await?;
            if cities.is_empty() {
                println!("No matching cities found.");
            }
            for city in &cities {
                print_city(city);
            }
        }
        Commands::Forecast { lat, lon } => {
            let data = fetch_forecast(&services, lat, lon).await?;
            print_forecast(&data);
        }
        Commands::City { query } => {
            let cities = search(&services, &query).await?;
            let Some(city) = cities.first() else {
                anyhow::bail!("No matching cities found for '{}'", query);
            };
            print_city(city);
            let data = fetch_forecast(&services, city.latitude, city.longitude).await?;
            print_forecast(&data);
        }
    }

    Ok(())
}

async fn search(services: &AppServices, query: &str) -> Result<Vec<City>> {
    services
        .geocoding()
        .search(query)
        .await
        .map_err(|e| report(from_weather_error(e)))
}

async fn fetch_forecast(services: &AppServices, lat: f64, lon: f64) -> Result<WeatherData> {
    services
        .forecast()
        .fetch_forecast(lat, lon)
        .await
        .map_err(|e| report(from_weather_error(e)))
}

fn report(e: AppError) -> anyhow::Error {
    tracing::debug!("{:?}", e);
    anyhow::anyhow!("{} ({})", e.user_message(), e)
}

fn print_city(city: &City) {
    let region = city.admin1.as_deref().unwrap_or("-");
    println!(
        "{:>10}  {:<24} {:<20} {:<20} {:>9.4} {:>9.4}",
        city.id, city.name, region, city.country, city.latitude, city.longitude
    );
}

fn print_forecast(data: &WeatherData) {
    let current = &data.current;
    println!(
        "\nNow ({}): {} {}",
        format_timestamp(&current.time),
        format_temperature(current.temperature),
        current.condition()
    );

    for (index, date) in data.daily.dates.iter().enumerate() {
        let Some(day) = data.daily.day(index) else {
            println!("{}  (incomplete data)", date.format("%a %d %b"));
            continue;
        };
        println!(
            "{}  {:<22} {:>4}° / {:>4}°  rain {:>5} mm ({:>3}%)  wind {:>5} km/h  sun {}",
            day.date.format("%a %d %b"),
            day.condition.to_string(),
            format_rounded(day.temperature_max),
            format_rounded(day.temperature_min),
            format_one_decimal(day.rain_sum),
            format_rounded(day.precipitation_probability_max),
            format_one_decimal(day.wind_speed_max),
            day.sunshine()
        );
    }
}
