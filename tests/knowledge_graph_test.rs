use chrono::NaiveDate;
use graphsight::graph::serialize_triples;
use graphsight::insight;
use graphsight::loader::{
    CustomerRecord, GraphLoader, LoadError, ProductRecord, RepRecord, SaleRecord, SalesRecords,
};
use graphsight::schema::sales_schema;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn sale(
    sale_id: &str,
    customer_id: &str,
    product_id: &str,
    rep_id: &str,
    net_revenue: f64,
    status: &str,
) -> SaleRecord {
    SaleRecord {
        sale_id: sale_id.into(),
        date: date(2024, 1, 10),
        customer_id: customer_id.into(),
        product_id: product_id.into(),
        sales_rep_id: rep_id.into(),
        quantity: 1,
        gross_revenue: net_revenue,
        discount_percentage: 0.0,
        net_revenue,
        status: status.into(),
    }
}

/// Two customers, two regions: Acme (Enterprise, NA) books 200 + 300,
/// Beta (SMB, EU) books 100. All completed.
fn snapshot() -> SalesRecords {
    SalesRecords {
        products: vec![ProductRecord {
            id: "P001".into(),
            name: "Widget".into(),
            category: "Electronics".into(),
            subcategory: "Gadgets".into(),
            price: 100.0,
        }],
        customers: vec![
            CustomerRecord {
                id: "C001".into(),
                name: "Acme".into(),
                customer_type: "Enterprise".into(),
                region: "NA".into(),
                industry: "Technology".into(),
            },
            CustomerRecord {
                id: "C002".into(),
                name: "Beta".into(),
                customer_type: "SMB".into(),
                region: "EU".into(),
                industry: "Retail".into(),
            },
        ],
        reps: vec![
            RepRecord {
                id: "R001".into(),
                name: "Jordan".into(),
                region: "NA".into(),
                experience_years: 8,
            },
            RepRecord {
                id: "R002".into(),
                name: "Sam".into(),
                region: "EU".into(),
                experience_years: 3,
            },
        ],
        sales: vec![
            sale("S001", "C001", "P001", "R001", 200.0, "Completed"),
            sale("S002", "C001", "P001", "R001", 300.0, "Completed"),
            sale("S003", "C002", "P001", "R002", 100.0, "Completed"),
        ],
    }
}

#[test]
fn revenue_by_customer_type_end_to_end() {
    let schema = sales_schema().unwrap();
    let store = GraphLoader::new(&schema).load(&snapshot()).unwrap();

    let rows = insight::revenue_by_customer_type(&store).unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].customer_type, "Enterprise");
    assert!((rows[0].total_revenue - 500.0).abs() < 1e-9);
    assert!((rows[0].avg_revenue - 250.0).abs() < 1e-9);

    assert_eq!(rows[1].customer_type, "SMB");
    assert!((rows[1].total_revenue - 100.0).abs() < 1e-9);
    assert!((rows[1].avg_revenue - 100.0).abs() < 1e-9);
}

#[test]
fn revenue_by_region_end_to_end() {
    let schema = sales_schema().unwrap();
    let store = GraphLoader::new(&schema).load(&snapshot()).unwrap();

    let rows = insight::revenue_by_region(&store).unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].region, "NA");
    assert!((rows[0].revenue - 500.0).abs() < 1e-9);
    assert_eq!(rows[0].sales, 2);

    assert_eq!(rows[1].region, "EU");
    assert!((rows[1].revenue - 100.0).abs() < 1e-9);
    assert_eq!(rows[1].sales, 1);
}

#[test]
fn pending_sales_are_excluded_from_insights() {
    let mut records = snapshot();
    records
        .sales
        .push(sale("S004", "C002", "P001", "R002", 9000.0, "Pending"));

    let schema = sales_schema().unwrap();
    let store = GraphLoader::new(&schema).load(&records).unwrap();

    let rows = insight::revenue_by_region(&store).unwrap();
    let eu = rows.iter().find(|r| r.region == "EU").unwrap();
    assert!((eu.revenue - 100.0).abs() < 1e-9);
    assert_eq!(eu.sales, 1);
}

#[test]
fn rep_effectiveness_orders_by_average_deal() {
    let schema = sales_schema().unwrap();
    let store = GraphLoader::new(&schema).load(&snapshot()).unwrap();

    let rows = insight::rep_effectiveness(&store).unwrap();
    assert_eq!(rows.len(), 2);

    // Jordan averages 250 per deal, Sam 100
    assert_eq!(rows[0].rep, "Jordan");
    assert_eq!(rows[0].experience, 8);
    assert_eq!(rows[0].sales_count, 2);
    assert!((rows[0].avg_deal - 250.0).abs() < 1e-9);
    assert_eq!(rows[1].rep, "Sam");
}

#[test]
fn full_report_is_serializable() {
    let schema = sales_schema().unwrap();
    let store = GraphLoader::new(&schema).load(&snapshot()).unwrap();

    let report = insight::generate(&store).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert!(json.get("revenue_by_region").unwrap().is_array());
    assert!(json.get("top_products").unwrap().is_array());
    assert_eq!(
        json.get("top_products").unwrap()[0]
            .get("product")
            .unwrap(),
        "Widget"
    );
    // Thresholded entries stay empty at this data volume
    assert_eq!(
        json.get("product_customer_fit").unwrap().as_array().unwrap().len(),
        0
    );
}

#[test]
fn serialized_dump_is_identical_across_reloads() {
    let schema = sales_schema().unwrap();
    let loader = GraphLoader::new(&schema);

    let first = serialize_triples(&loader.load(&snapshot()).unwrap());
    let second = serialize_triples(&loader.load(&snapshot()).unwrap());
    assert_eq!(first, second);
    assert!(first.contains("sales:S001 rdf:type sales:Sale ."));
}

#[test]
fn dangling_product_reference_rejects_whole_load() {
    let mut records = snapshot();
    records.sales[2].product_id = "P999".into();

    let schema = sales_schema().unwrap();
    let err = GraphLoader::new(&schema).load(&records).unwrap_err();
    match err {
        LoadError::DanglingReference { sale, field, id } => {
            assert_eq!(sale, "S003");
            assert_eq!(field, "product");
            assert_eq!(id, "P999");
        }
    }
}

#[test]
fn ontology_seeds_precede_instance_data() {
    let schema = sales_schema().unwrap();
    let store = GraphLoader::new(&schema).load(&snapshot()).unwrap();

    assert!(store.len() > schema.triples().len());
    // Schema triples come first and survive verbatim
    for (seed, loaded) in schema.triples().iter().zip(store.iter()) {
        assert_eq!(seed, loaded);
    }
}
