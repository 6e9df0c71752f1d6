// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;

// Use library instead of local modules
use product_registry::{logging, Config, ProductStore};

fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_filter)?;

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "demo" {
        // Scripted walkthrough, no terminal needed
        run_demo()
    } else {
        // UI mode (default)
        run_ui_mode()
    }
}

fn run_demo() -> Result<()> {
    println!("📦 Product Registry - demo");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut store = ProductStore::new();

    let ok = store.add("Chair", "25.00", "Furniture");
    println!("\nadd(\"Chair\", \"25.00\", \"Furniture\") → {}", ok);
    print_products(&store);

    let ok = store.add("", "5", "X");
    println!("\nadd(\"\", \"5\", \"X\") → {}", ok);
    if let Err(err) = store.try_add("", "5", "X") {
        println!("  reason: {}", err);
    }
    print_products(&store);

    store.remove(1);
    println!("\nremove(1)");
    print_products(&store);

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Demo complete");

    Ok(())
}

fn print_products(store: &ProductStore) {
    let products = store.list();
    if products.is_empty() {
        println!("  (no products)");
    }
    for p in products.iter() {
        println!("  #{} {} - {:.2} [{}]", p.id, p.name, p.price, p.category);
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    let mut app = ui::App::new(ProductStore::new());
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin product-server --features server");
    std::process::exit(1);
}
