//! # Seed Data Generator
//!
//! Populates the database with a salvage taxonomy, vendors and items for
//! development.
//!
//! ## Usage
//! ```bash
//! # Generate 500 items (default)
//! cargo run -p salvage-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p salvage-db --bin seed -- --count 2000
//!
//! # Specify database path
//! cargo run -p salvage-db --bin seed -- --db ./data/salvage.db
//! ```
//!
//! ## Generated Data
//! - Two-level category taxonomy (Doors ⊃ Internal Doors, ...)
//! - A handful of vendors
//! - Items with numeric ids, mixed eras, some POA, some sold, some draft

use chrono::{Duration, TimeZone, Utc};
use salvage_core::{
    Availability, Category, Classification, Item, ItemId, ItemStatus, Predicate, Vendor, VendorId,
};
use salvage_db::{generate_vendor_id, Database, DbConfig};
use std::env;

/// Taxonomy: (name, slug, children[(name, slug)]).
const TAXONOMY: &[(&str, &str, &[(&str, &str)])] = &[
    (
        "Doors",
        "doors",
        &[
            ("Internal Doors", "internal-doors"),
            ("External Doors", "external-doors"),
            ("Door Furniture", "door-furniture"),
        ],
    ),
    (
        "Fireplaces",
        "fireplaces",
        &[
            ("Surrounds", "fireplace-surrounds"),
            ("Cast Iron Inserts", "cast-iron-inserts"),
            ("Grates & Baskets", "grates-baskets"),
        ],
    ),
    (
        "Flooring",
        "flooring",
        &[
            ("Parquet", "parquet"),
            ("Floorboards", "floorboards"),
            ("Encaustic Tiles", "encaustic-tiles"),
        ],
    ),
    (
        "Lighting",
        "lighting",
        &[("Pendants", "pendants"), ("Wall Lights", "wall-lights")],
    ),
    (
        "Garden",
        "garden",
        &[
            ("Statuary", "statuary"),
            ("Gates & Railings", "gates-railings"),
            ("Troughs & Planters", "troughs-planters"),
        ],
    ),
    ("Radiators", "radiators", &[]),
];

/// Item names per top-level slug.
const ITEM_NAMES: &[(&str, &[&str])] = &[
    (
        "doors",
        &[
            "Victorian Four Panel Pine Door",
            "Edwardian Glazed Oak Door",
            "Ledged And Braced Plank Door",
            "Brass Lever Handle Pair",
            "Cast Iron Door Knocker",
        ],
    ),
    (
        "fireplaces",
        &[
            "Carrara Marble Surround",
            "Art Nouveau Tiled Insert",
            "Georgian Pine Mantel",
            "Dog Grate With Firedogs",
        ],
    ),
    (
        "flooring",
        &[
            "Reclaimed Oak Parquet Lot",
            "Victorian Pine Floorboards",
            "Minton Encaustic Tile Set",
        ],
    ),
    (
        "lighting",
        &[
            "Holophane Pendant",
            "Industrial Enamel Shade",
            "Brass Gallery Wall Light",
        ],
    ),
    (
        "garden",
        &[
            "Composition Stone Urn",
            "Wrought Iron Side Gate",
            "Granite Feeding Trough",
        ],
    ),
    (
        "radiators",
        &["Column Cast Iron Radiator", "School Radiator Six Section"],
    ),
];

const VENDORS: &[&str] = &[
    "Yard & Beam",
    "Northern Reclamation",
    "The Salvage Barn",
    "Architectural Finds",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path = String::from("./salvage_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Salvage Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of items to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./salvage_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Salvage Catalog Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!("Items:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Every row, including drafts
    let existing = db.items().count(&Predicate::And(vec![])).await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Taxonomy
    let mut next_category = 1_i64;
    let mut leaves: Vec<(String, Category)> = Vec::new();
    for (name, slug, children) in TAXONOMY {
        let parent = Category::top_level(next_category, name, slug);
        next_category += 1;
        db.categories().insert(&parent).await?;

        if children.is_empty() {
            leaves.push((slug.to_string(), parent.clone()));
        }
        for (child_name, child_slug) in children.iter() {
            let child = Category::child_of(&parent, next_category, child_name, child_slug);
            next_category += 1;
            db.categories().insert(&child).await?;
            leaves.push((slug.to_string(), child));
        }
    }
    println!("✓ Created {} categories", next_category - 1);

    // Vendors
    let mut vendor_ids: Vec<VendorId> = Vec::new();
    for shop_name in VENDORS {
        let vendor = Vendor {
            id: generate_vendor_id(),
            shop_name: shop_name.to_string(),
        };
        db.vendors().insert(&vendor).await?;
        vendor_ids.push(vendor.id);
    }
    println!("✓ Created {} vendors", vendor_ids.len());

    println!();
    println!("Generating items...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    for seed in 0..count {
        let (top_slug, category) = &leaves[seed % leaves.len()];
        let names = ITEM_NAMES
            .iter()
            .find(|(slug, _)| *slug == top_slug.as_str())
            .map(|(_, names)| *names)
            .unwrap_or(&["Reclaimed Item"]);
        let name = names[seed % names.len()];
        let vendor_id = &vendor_ids[seed % vendor_ids.len()];

        let item = generate_item(seed, name, category, vendor_id);
        if let Err(e) = db.items().insert(&item).await {
            eprintln!("Failed to insert {}: {}", item.id, e);
            continue;
        }

        generated += 1;
        if generated % 100 == 0 {
            println!("  Generated {} items...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} items in {:?}", generated, elapsed);
    println!(
        "  Rate: {:.0} items/second",
        generated as f64 / elapsed.as_secs_f64()
    );

    let public = db
        .items()
        .count(&salvage_core::compose(&Default::default()))
        .await?;
    println!("  Publicly listed: {}", public);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single item with deterministic, varied data.
fn generate_item(seed: usize, name: &str, category: &Category, vendor_id: &VendorId) -> Item {
    let base = Utc
        .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    let created_at = base + Duration::hours(seed as i64 * 7);

    // Every ninth item is price on application
    let price_minor = if seed % 9 == 4 {
        None
    } else {
        Some(2_500 + ((seed * 3_737) % 250_000) as i64)
    };

    let classification = match seed % 4 {
        0 => Some(Classification::Antique),
        1 => Some(Classification::Vintage),
        2 => Some(Classification::Modern),
        _ => None,
    };

    let status = if seed % 13 == 7 {
        ItemStatus::Draft
    } else {
        ItemStatus::Published
    };

    let availability = if seed % 5 == 3 {
        Availability::Sold
    } else {
        Availability::Available
    };

    Item {
        id: ItemId::from((seed + 1) as i64),
        name: format!("{} #{}", name, seed + 1),
        price_minor,
        status,
        availability,
        classification,
        category_id: Some(category.id.clone()),
        vendor_id: vendor_id.clone(),
        thumbnail: Some(format!("items/{}/primary.jpg", seed + 1)),
        featured: seed % 17 == 0,
        created_at,
        updated_at: created_at,
    }
}
