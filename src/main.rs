use std::env;

use dotenvy::dotenv;
use serde::Serialize;

use pushkind_promotions::config::AppConfig;
use pushkind_promotions::repository::{CatalogSnapshot, MemoryRepository};
use pushkind_promotions::services::ServiceResult;
use pushkind_promotions::services::products::{
    InventoryQuery, load_inventory, resolve_product_price,
};
use pushkind_promotions::services::promotions::load_promotions_page;

const USAGE: &str =
    "usage: pushkind-promotions [inventory [CATEGORY]|promotions|price <PRODUCT_ID>]";

fn print_json<T: Serialize>(result: ServiceResult<T>) {
    let value = match result {
        Ok(value) => value,
        Err(e) => {
            log::error!("Request failed: {e}");
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to serialize response: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let snapshot = match CatalogSnapshot::from_path(&config.catalog_path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::error!(
                "Failed to load catalog from {}: {e}",
                config.catalog_path.display()
            );
            std::process::exit(1);
        }
    };

    let repo = match MemoryRepository::from_snapshot(snapshot) {
        Ok(repo) => repo,
        Err(e) => {
            log::error!("Failed to seed repository: {e}");
            std::process::exit(1);
        }
    };

    let today = config.today();
    let args: Vec<String> = env::args().skip(1).collect();

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["inventory"] => print_json(load_inventory(
            &repo,
            InventoryQuery::default(),
            today,
            &config.currency_prefix,
        )),
        ["inventory", category] => print_json(load_inventory(
            &repo,
            InventoryQuery {
                category: Some(category.to_string()),
                search: None,
            },
            today,
            &config.currency_prefix,
        )),
        ["promotions"] => print_json(load_promotions_page(&repo, today)),
        ["price", id] => match id.parse::<i64>() {
            Ok(id) => print_json(resolve_product_price(&repo, id, today)),
            Err(_) => {
                log::error!("Invalid product id `{id}`");
                std::process::exit(2);
            }
        },
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}
