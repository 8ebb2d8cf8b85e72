//! Shopping List entry point
//!
//! Native: opens the directory store, rehydrates and prints the list.
//! Web builds are driven from JS through `platform::web::WebShoppingList`.

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() {
    use shopping_list::list::format_added;
    use shopping_list::persistence::DirStore;
    use shopping_list::platform::now_millis;
    use shopping_list::{Settings, ShoppingList};

    env_logger::init();

    let data_dir = std::env::var("SHOPPING_LIST_DATA_DIR")
        .unwrap_or_else(|_| "./shopping-list-data".to_string());
    log::info!("Shopping List (native) starting, data dir: {}", data_dir);

    let store = match DirStore::open(&data_dir) {
        Ok(store) => store,
        Err(err) => {
            log::error!("Cannot open data directory: {}", err);
            std::process::exit(1);
        }
    };

    let settings = Settings::load(&store);
    log::info!("Theme: {}", settings.theme.as_str());

    let (list, worker) = ShoppingList::open(store);
    let writer = tokio::spawn(worker.run());

    if let Some(err) = list.rehydration().error() {
        log::warn!("Started with an empty list: {}", err);
    }

    if list.is_empty() {
        println!("Your shopping list is empty.");
    } else {
        let now = now_millis();
        for item in list.items() {
            let mark = if item.purchased { "x" } else { " " };
            println!(
                "[{}] {} (x{}) - {}",
                mark,
                item.name,
                item.quantity,
                format_added(item.created_at, now)
            );
        }
        let stats = list.stats();
        println!(
            "{} total, {} purchased, {} remaining ({}% complete)",
            stats.total, stats.purchased, stats.remaining, stats.percent_complete
        );
    }

    if let Err(err) = list.flush().await {
        log::warn!("Pending writes failed: {}", err);
    }
    drop(list);
    let _ = writer.await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
