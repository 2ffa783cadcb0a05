use anyhow::Result;
use chrono::NaiveDate;
use graphsight::graph::serialize_triples;
use graphsight::insight;
use graphsight::loader::{
    CustomerRecord, GraphLoader, ProductRecord, RepRecord, SaleRecord, SalesRecords,
};
use graphsight::schema::sales_schema;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Graphsight v{}", graphsight::version());
    println!("=====================================");
    println!();

    let schema = sales_schema()?;
    let summary = schema.summary();
    println!(
        "Ontology: {} classes, {} properties, {} seed triples",
        summary.classes.len(),
        summary.properties.len(),
        summary.triple_count
    );

    let records = demo_records();
    let store = GraphLoader::new(&schema).load(&records)?;
    println!("Knowledge graph populated with {} triples", store.len());
    println!();

    let report = insight::generate(&store)?;
    println!("=== Insights ===");
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!();

    let dump = serialize_triples(&store);
    println!("Triple dump: {} statements", dump.lines().count());

    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn demo_records() -> SalesRecords {
    SalesRecords {
        products: vec![
            ProductRecord {
                id: "P001".into(),
                name: "Laptop Pro".into(),
                category: "Electronics".into(),
                subcategory: "Computers".into(),
                price: 1200.0,
            },
            ProductRecord {
                id: "P002".into(),
                name: "Wireless Mouse".into(),
                category: "Electronics".into(),
                subcategory: "Accessories".into(),
                price: 45.0,
            },
            ProductRecord {
                id: "P003".into(),
                name: "Standing Desk".into(),
                category: "Furniture".into(),
                subcategory: "Desks".into(),
                price: 650.0,
            },
        ],
        customers: vec![
            CustomerRecord {
                id: "C001".into(),
                name: "Acme Corp".into(),
                customer_type: "Enterprise".into(),
                region: "North America".into(),
                industry: "Technology".into(),
            },
            CustomerRecord {
                id: "C002".into(),
                name: "Beta LLC".into(),
                customer_type: "SMB".into(),
                region: "Europe".into(),
                industry: "Retail".into(),
            },
            CustomerRecord {
                id: "C003".into(),
                name: "Gamma Partners".into(),
                customer_type: "Mid-Market".into(),
                region: "North America".into(),
                industry: "Consulting".into(),
            },
        ],
        reps: vec![
            RepRecord {
                id: "R001".into(),
                name: "Jordan Lee".into(),
                region: "North America".into(),
                experience_years: 8,
            },
            RepRecord {
                id: "R002".into(),
                name: "Sam Rivera".into(),
                region: "Europe".into(),
                experience_years: 3,
            },
        ],
        sales: vec![
            SaleRecord {
                sale_id: "S0001".into(),
                date: date(2024, 1, 15),
                customer_id: "C001".into(),
                product_id: "P001".into(),
                sales_rep_id: "R001".into(),
                quantity: 5,
                gross_revenue: 6000.0,
                discount_percentage: 10.0,
                net_revenue: 5400.0,
                status: "Completed".into(),
            },
            SaleRecord {
                sale_id: "S0002".into(),
                date: date(2024, 2, 3),
                customer_id: "C002".into(),
                product_id: "P002".into(),
                sales_rep_id: "R002".into(),
                quantity: 20,
                gross_revenue: 900.0,
                discount_percentage: 0.0,
                net_revenue: 900.0,
                status: "Completed".into(),
            },
            SaleRecord {
                sale_id: "S0003".into(),
                date: date(2024, 2, 18),
                customer_id: "C003".into(),
                product_id: "P003".into(),
                sales_rep_id: "R001".into(),
                quantity: 2,
                gross_revenue: 1300.0,
                discount_percentage: 5.0,
                net_revenue: 1235.0,
                status: "Completed".into(),
            },
            SaleRecord {
                sale_id: "S0004".into(),
                date: date(2024, 3, 1),
                customer_id: "C001".into(),
                product_id: "P002".into(),
                sales_rep_id: "R001".into(),
                quantity: 50,
                gross_revenue: 2250.0,
                discount_percentage: 15.0,
                net_revenue: 1912.5,
                status: "Pending".into(),
            },
        ],
    }
}
