//! Deterministic tabular-to-graph loader
//!
//! Converts the external tabular snapshot (products, customers, reps,
//! transactions) into triples. Entity identifiers are derived from stable
//! key fields, never generated, so reruns over identical input produce an
//! identical graph. A transaction referencing an unknown entity fails the
//! whole load; no partially populated store is ever handed to callers.

use crate::graph::{sales, vocab, Iri, Literal, Term, Triple, TripleStore};
use crate::schema::Schema;
use chrono::NaiveDate;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use thiserror::Error;

/// Loader errors
#[derive(Error, Debug)]
pub enum LoadError {
    /// A transaction names an entity absent from the loaded entity tables
    #[error("transaction '{sale}' references unknown {field} '{id}'")]
    DanglingReference {
        /// Sale id of the offending transaction
        sale: String,
        /// Which reference field was dangling
        field: &'static str,
        /// The unresolved identifier
        id: String,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Product table row
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub price: f64,
}

/// Customer table row
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub customer_type: String,
    pub region: String,
    pub industry: String,
}

/// Sales representative table row
#[derive(Debug, Clone, Deserialize)]
pub struct RepRecord {
    pub id: String,
    pub name: String,
    pub region: String,
    pub experience_years: i64,
}

/// Transaction table row
#[derive(Debug, Clone, Deserialize)]
pub struct SaleRecord {
    pub sale_id: String,
    pub date: NaiveDate,
    pub customer_id: String,
    pub product_id: String,
    pub sales_rep_id: String,
    pub quantity: i64,
    pub gross_revenue: f64,
    pub discount_percentage: f64,
    pub net_revenue: f64,
    pub status: String,
}

/// The complete tabular snapshot consumed by one load
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesRecords {
    pub products: Vec<ProductRecord>,
    pub customers: Vec<CustomerRecord>,
    pub reps: Vec<RepRecord>,
    pub sales: Vec<SaleRecord>,
}

/// Bulk loader: one write phase per store lifetime
pub struct GraphLoader<'a> {
    schema: &'a Schema,
}

impl<'a> GraphLoader<'a> {
    /// Create a loader over an immutable schema
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Build a fresh store: schema seed triples first, then entity tables,
    /// then transactions. Fails fast on the first dangling reference.
    pub fn load(&self, records: &SalesRecords) -> LoadResult<TripleStore> {
        let mut store = TripleStore::new();
        store.bulk_insert(self.schema.triples().iter().cloned());

        // Taxonomy nodes are emitted once per distinct observed value.
        // Dedup is per kind: the same name observed as both a region and an
        // industry yields one node carrying both kinds' triples.
        let mut regions: FxHashSet<Iri> = FxHashSet::default();
        let mut industries: FxHashSet<Iri> = FxHashSet::default();
        let mut categories: FxHashSet<Iri> = FxHashSet::default();

        for product in &records.products {
            self.add_product(&mut store, &mut categories, product);
        }
        for customer in &records.customers {
            self.add_customer(&mut store, &mut regions, &mut industries, customer);
        }
        for rep in &records.reps {
            self.add_rep(&mut store, &mut regions, rep);
        }

        let products: FxHashSet<&str> =
            records.products.iter().map(|p| p.id.as_str()).collect();
        let customers: FxHashSet<&str> =
            records.customers.iter().map(|c| c.id.as_str()).collect();
        let reps: FxHashSet<&str> = records.reps.iter().map(|r| r.id.as_str()).collect();

        for sale in &records.sales {
            if !customers.contains(sale.customer_id.as_str()) {
                return Err(LoadError::DanglingReference {
                    sale: sale.sale_id.clone(),
                    field: "customer",
                    id: sale.customer_id.clone(),
                });
            }
            if !products.contains(sale.product_id.as_str()) {
                return Err(LoadError::DanglingReference {
                    sale: sale.sale_id.clone(),
                    field: "product",
                    id: sale.product_id.clone(),
                });
            }
            if !reps.contains(sale.sales_rep_id.as_str()) {
                return Err(LoadError::DanglingReference {
                    sale: sale.sale_id.clone(),
                    field: "sales rep",
                    id: sale.sales_rep_id.clone(),
                });
            }
            self.add_sale(&mut store, sale);
        }

        tracing::info!(
            products = records.products.len(),
            customers = records.customers.len(),
            reps = records.reps.len(),
            sales = records.sales.len(),
            triples = store.len(),
            "knowledge graph populated"
        );

        Ok(store)
    }

    fn add_product(
        &self,
        store: &mut TripleStore,
        categories: &mut FxHashSet<Iri>,
        product: &ProductRecord,
    ) {
        let node = entity_iri(&product.id);

        // Most specific declared subclass, chosen on the category discriminant
        let class = match product.category.as_str() {
            "Electronics" => sales("ElectronicsProduct"),
            "Furniture" => sales("FurnitureProduct"),
            _ => sales("Product"),
        };
        store.insert(Triple::new(node.clone(), vocab::rdf_type(), class));

        store.insert(Triple::new(
            node.clone(),
            sales("productId"),
            Literal::from(product.id.as_str()),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("productName"),
            Literal::from(product.name.as_str()),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("unitPrice"),
            Literal::Decimal(product.price),
        ));

        let category = self.category_node(store, categories, &product.category, None);
        let subcategory =
            self.category_node(store, categories, &product.subcategory, Some(&category));
        store.insert(Triple::new(
            node.clone(),
            sales("belongsToCategory"),
            category,
        ));
        store.insert(Triple::new(node, sales("belongsToCategory"), subcategory));
    }

    fn add_customer(
        &self,
        store: &mut TripleStore,
        regions: &mut FxHashSet<Iri>,
        industries: &mut FxHashSet<Iri>,
        customer: &CustomerRecord,
    ) {
        let node = entity_iri(&customer.id);

        // Most specific declared subclass, chosen on the type discriminant
        let class = match customer.customer_type.as_str() {
            "Enterprise" => sales("EnterpriseCustomer"),
            "SMB" => sales("SMBCustomer"),
            _ => sales("MidMarketCustomer"),
        };
        store.insert(Triple::new(node.clone(), vocab::rdf_type(), class));

        store.insert(Triple::new(
            node.clone(),
            sales("customerId"),
            Literal::from(customer.id.as_str()),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("customerName"),
            Literal::from(customer.name.as_str()),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("customerType"),
            Literal::from(customer.customer_type.as_str()),
        ));

        let region = self.region_node(store, regions, &customer.region);
        store.insert(Triple::new(node.clone(), sales("locatedIn"), region));

        let industry = self.industry_node(store, industries, &customer.industry);
        store.insert(Triple::new(node, sales("belongsToIndustry"), industry));
    }

    fn add_rep(&self, store: &mut TripleStore, regions: &mut FxHashSet<Iri>, rep: &RepRecord) {
        let node = entity_iri(&rep.id);
        store.insert(Triple::new(
            node.clone(),
            vocab::rdf_type(),
            sales("SalesRepresentative"),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("repId"),
            Literal::from(rep.id.as_str()),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("repName"),
            Literal::from(rep.name.as_str()),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("experienceYears"),
            Literal::Integer(rep.experience_years),
        ));

        let region = self.region_node(store, regions, &rep.region);
        store.insert(Triple::new(node, sales("operatesIn"), region));
    }

    fn add_sale(&self, store: &mut TripleStore, sale: &SaleRecord) {
        let node = entity_iri(&sale.sale_id);
        store.insert(Triple::new(node.clone(), vocab::rdf_type(), sales("Sale")));

        store.insert(Triple::new(
            node.clone(),
            sales("saleId"),
            Literal::from(sale.sale_id.as_str()),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("saleDate"),
            Literal::Date(sale.date),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("quantity"),
            Literal::Integer(sale.quantity),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("grossRevenue"),
            Literal::Decimal(sale.gross_revenue),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("netRevenue"),
            Literal::Decimal(sale.net_revenue),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("discountPercentage"),
            Literal::Decimal(sale.discount_percentage),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("status"),
            Literal::from(sale.status.as_str()),
        ));

        store.insert(Triple::new(
            node.clone(),
            sales("soldTo"),
            entity_iri(&sale.customer_id),
        ));
        store.insert(Triple::new(
            node.clone(),
            sales("productSold"),
            entity_iri(&sale.product_id),
        ));
        store.insert(Triple::new(
            node,
            sales("soldBy"),
            entity_iri(&sale.sales_rep_id),
        ));
    }

    fn region_node(
        &self,
        store: &mut TripleStore,
        regions: &mut FxHashSet<Iri>,
        name: &str,
    ) -> Iri {
        let node = entity_iri(name);
        if regions.insert(node.clone()) {
            store.insert(Triple::new(node.clone(), vocab::rdf_type(), sales("Region")));
            store.insert(Triple::new(
                node.clone(),
                sales("regionName"),
                Literal::from(name),
            ));
        }
        node
    }

    fn industry_node(
        &self,
        store: &mut TripleStore,
        industries: &mut FxHashSet<Iri>,
        name: &str,
    ) -> Iri {
        let node = entity_iri(name);
        if industries.insert(node.clone()) {
            store.insert(Triple::new(
                node.clone(),
                vocab::rdf_type(),
                sales("Industry"),
            ));
            store.insert(Triple::new(
                node.clone(),
                sales("industryName"),
                Literal::from(name),
            ));
        }
        node
    }

    fn category_node(
        &self,
        store: &mut TripleStore,
        categories: &mut FxHashSet<Iri>,
        name: &str,
        parent: Option<&Iri>,
    ) -> Iri {
        let node = entity_iri(name);
        if categories.insert(node.clone()) {
            store.insert(Triple::new(
                node.clone(),
                vocab::rdf_type(),
                sales("Category"),
            ));
            store.insert(Triple::new(
                node.clone(),
                sales("categoryName"),
                Literal::from(name),
            ));
            if let Some(parent) = parent {
                store.insert(Triple::new(
                    node.clone(),
                    sales("hasSubcategory"),
                    Term::Iri(parent.clone()),
                ));
            }
        }
        node
    }
}

/// Derive an entity identifier from its stable key
fn entity_iri(key: &str) -> Iri {
    sales(&key.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::sales_schema;

    fn records() -> SalesRecords {
        SalesRecords {
            products: vec![ProductRecord {
                id: "P001".into(),
                name: "Widget".into(),
                category: "Electronics".into(),
                subcategory: "Accessories".into(),
                price: 100.0,
            }],
            customers: vec![
                CustomerRecord {
                    id: "C001".into(),
                    name: "Acme".into(),
                    customer_type: "Enterprise".into(),
                    region: "North America".into(),
                    industry: "Technology".into(),
                },
                CustomerRecord {
                    id: "C002".into(),
                    name: "Beta".into(),
                    customer_type: "SMB".into(),
                    region: "North America".into(),
                    industry: "Retail".into(),
                },
            ],
            reps: vec![RepRecord {
                id: "R001".into(),
                name: "Jordan".into(),
                region: "North America".into(),
                experience_years: 7,
            }],
            sales: vec![SaleRecord {
                sale_id: "S001".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                customer_id: "C001".into(),
                product_id: "P001".into(),
                sales_rep_id: "R001".into(),
                quantity: 2,
                gross_revenue: 200.0,
                discount_percentage: 0.0,
                net_revenue: 200.0,
                status: "Completed".into(),
            }],
        }
    }

    #[test]
    fn test_subclass_choice_from_discriminants() {
        let schema = sales_schema().unwrap();
        let store = GraphLoader::new(&schema).load(&records()).unwrap();

        assert!(store.contains(&Triple::new(
            sales("C001"),
            vocab::rdf_type(),
            sales("EnterpriseCustomer"),
        )));
        assert!(store.contains(&Triple::new(
            sales("C002"),
            vocab::rdf_type(),
            sales("SMBCustomer"),
        )));
        assert!(store.contains(&Triple::new(
            sales("P001"),
            vocab::rdf_type(),
            sales("ElectronicsProduct"),
        )));
    }

    #[test]
    fn test_taxonomy_nodes_deduplicated() {
        let schema = sales_schema().unwrap();
        let store = GraphLoader::new(&schema).load(&records()).unwrap();

        // Two customers and one rep share a region: one Region node
        let region_type = Term::Iri(sales("Region"));
        let rdf_type = vocab::rdf_type();
        let regions = store
            .matching(None, Some(&rdf_type), Some(&region_type))
            .count();
        assert_eq!(regions, 1);

        // Region name uses the stable key with spaces replaced
        assert!(store.contains(&Triple::new(
            sales("North_America"),
            sales("regionName"),
            Literal::from("North America"),
        )));
    }

    #[test]
    fn test_shared_name_across_taxonomies_keeps_both_kinds() {
        let schema = sales_schema().unwrap();
        let mut records = records();
        // One customer located in "Atlantis", another in the "Atlantis"
        // industry: the shared node must carry both kinds' triples
        records.customers[0].region = "Atlantis".into();
        records.customers[1].industry = "Atlantis".into();

        let store = GraphLoader::new(&schema).load(&records).unwrap();
        let node = sales("Atlantis");

        assert!(store.contains(&Triple::new(node.clone(), vocab::rdf_type(), sales("Region"))));
        assert!(store.contains(&Triple::new(
            node.clone(),
            sales("regionName"),
            Literal::from("Atlantis"),
        )));
        assert!(store.contains(&Triple::new(
            node.clone(),
            vocab::rdf_type(),
            sales("Industry"),
        )));
        assert!(store.contains(&Triple::new(
            node,
            sales("industryName"),
            Literal::from("Atlantis"),
        )));
    }

    #[test]
    fn test_subcategory_links_to_parent() {
        let schema = sales_schema().unwrap();
        let store = GraphLoader::new(&schema).load(&records()).unwrap();

        assert!(store.contains(&Triple::new(
            sales("Accessories"),
            sales("hasSubcategory"),
            sales("Electronics"),
        )));
        assert!(store.contains(&Triple::new(
            sales("P001"),
            sales("belongsToCategory"),
            sales("Accessories"),
        )));
    }

    #[test]
    fn test_sale_edges_and_attributes() {
        let schema = sales_schema().unwrap();
        let store = GraphLoader::new(&schema).load(&records()).unwrap();

        assert!(store.contains(&Triple::new(sales("S001"), sales("soldTo"), sales("C001"))));
        assert!(store.contains(&Triple::new(
            sales("S001"),
            sales("productSold"),
            sales("P001"),
        )));
        assert!(store.contains(&Triple::new(sales("S001"), sales("soldBy"), sales("R001"))));
        assert!(store.contains(&Triple::new(
            sales("S001"),
            sales("netRevenue"),
            Literal::Decimal(200.0),
        )));
        assert!(store.contains(&Triple::new(
            sales("S001"),
            sales("saleDate"),
            Literal::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
        )));
    }

    #[test]
    fn test_dangling_customer_fails_load() {
        let schema = sales_schema().unwrap();
        let mut bad = records();
        bad.sales[0].customer_id = "C999".into();

        let err = GraphLoader::new(&schema).load(&bad).unwrap_err();
        match err {
            LoadError::DanglingReference { sale, field, id } => {
                assert_eq!(sale, "S001");
                assert_eq!(field, "customer");
                assert_eq!(id, "C999");
            }
        }
    }

    #[test]
    fn test_load_is_deterministic() {
        let schema = sales_schema().unwrap();
        let loader = GraphLoader::new(&schema);
        let first = loader.load(&records()).unwrap();
        let second = loader.load(&records()).unwrap();

        assert_eq!(first.len(), second.len());
        for triple in first.iter() {
            assert!(second.contains(triple));
        }
    }
}
