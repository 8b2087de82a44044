use console::style;

use otc_migrate::repository::tables::{dependencies, ALL_TABLES};

pub fn cmd_tables() {
    println!("{} Tables, in migration order:", style("→").cyan());
    for (i, table) in ALL_TABLES.iter().enumerate() {
        let parents = dependencies(table);
        if parents.is_empty() {
            println!("  {}. {}", i + 1, table);
        } else {
            println!(
                "  {}. {} {}",
                i + 1,
                table,
                style(format!("(after {})", parents.join(", "))).dim()
            );
        }
    }
}
