//! # Seed Data Generator
//!
//! Populates a development database with a small Brazilian grocery catalog,
//! a cashier login and the store profile.
//!
//! ## Usage
//! ```bash
//! cargo run -p seestore-db --bin seed
//! cargo run -p seestore-db --bin seed -- --db ./data/seestore.db
//! ```
//!
//! The default cashier login is `caixa@loja.com` / `caixa123`.

use std::env;

use seestore_core::CompanyProfile;
use seestore_db::{Database, DbConfig};

/// (nome, codigo_interno, codigo_barras, preco_custo, preco_venda, estoque)
const PRODUTOS: &[(&str, &str, Option<&str>, i64, i64, i64)] = &[
    ("Café Torrado 500g", "1001", Some("7891000100103"), 250, 500, 40),
    ("Açúcar Cristal 1kg", "1002", Some("7891000100110"), 180, 350, 60),
    ("Arroz Branco 5kg", "1003", Some("7891000100127"), 1200, 2190, 25),
    ("Feijão Carioca 1kg", "1004", Some("7891000100134"), 450, 799, 30),
    ("Óleo de Soja 900ml", "1005", Some("7891000100141"), 390, 649, 48),
    ("Leite Integral 1L", "1006", Some("7891000100158"), 320, 549, 36),
    ("Macarrão Espaguete 500g", "1007", Some("7891000100165"), 210, 399, 50),
    ("Farinha de Trigo 1kg", "1008", Some("7891000100172"), 280, 489, 20),
    ("Sal Refinado 1kg", "1009", None, 90, 199, 80),
    ("Refrigerante Cola 2L", "1010", Some("7891000100196"), 420, 899, 55),
    ("Sabão em Pó 1kg", "1011", Some("7891000100202"), 550, 1099, 18),
    ("Detergente 500ml", "1012", None, 120, 249, 70),
    ("Papel Higiênico 4 rolos", "1013", Some("7891000100226"), 380, 699, 33),
    ("Biscoito Recheado 140g", "1014", Some("7891000100233"), 110, 299, 90),
    ("Suco de Laranja 1L", "1015", Some("7891000100240"), 350, 690, 0),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./seestore_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("seeStore Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./seestore_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 seeStore Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Inserting catalog...");

    for (nome, codigo, barras, custo, venda, estoque) in PRODUTOS {
        db.products()
            .create(nome, codigo, *barras, *custo, *venda, *estoque, 5, "UN", false)
            .await?;
    }
    println!("✓ {} products inserted", PRODUTOS.len());

    db.company()
        .save(&CompanyProfile {
            id: String::new(),
            nome: "Mercado Bom Preço".to_string(),
            cnpj: Some("00.000.000/0001-00".to_string()),
            endereco: Some("Rua das Flores, 123 - Centro".to_string()),
            telefone: Some("(11) 4002-8922".to_string()),
        })
        .await?;
    println!("✓ Company profile saved");

    db.users()
        .create(
            "caixa@loja.com",
            "Operador de Caixa",
            "caixa",
            Some("caixa01"),
            Some("0001"),
            "caixa123",
        )
        .await?;
    println!("✓ Cashier user created (caixa@loja.com, caixa01 or 0001 / caixa123)");

    let hits = db.products().search("café", 10).await?;
    println!();
    println!("Search 'café': {} result(s)", hits.len());
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
