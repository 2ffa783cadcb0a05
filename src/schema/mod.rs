//! Sales domain ontology
//!
//! An explicit builder producing an immutable [`Schema`] value: no global
//! registry, callers hold the schema and pass it to the loader. Declarations
//! are descriptive — the engine never enforces domain/range at insertion
//! time (schema-on-read). The subclass hierarchy is documentation only; no
//! subsumption inference happens at query time.

use crate::graph::{sales, vocab, Iri, Literal, Term, Triple, XSD};
use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

/// Schema construction errors
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Re-declaring a class/property under the same name with different attributes
    #[error("conflicting redeclaration of {kind} '{name}'")]
    Conflict {
        /// Declaration kind (class, object property, ...)
        kind: &'static str,
        /// Declared name
        name: String,
    },
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Range of a data property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeType {
    String,
    Integer,
    Decimal,
    Date,
}

impl RangeType {
    fn xsd_iri(self) -> Iri {
        let local = match self {
            RangeType::String => "string",
            RangeType::Integer => "integer",
            RangeType::Decimal => "decimal",
            RangeType::Date => "date",
        };
        Iri::new(XSD, local)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ObjectPropertyDecl {
    domain: String,
    range: String,
    description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DataPropertyDecl {
    domain: String,
    range: RangeType,
    description: String,
}

/// Builder for an immutable [`Schema`].
///
/// Every declaration is idempotent: re-declaring the same name with the same
/// attributes is a no-op, while a conflicting redeclaration fails fast with
/// [`SchemaError::Conflict`]. Declaration maps keep insertion order so the
/// seed triples come out in a reproducible order.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    classes: IndexMap<String, String>,
    subclasses: IndexSet<(String, String)>,
    object_properties: IndexMap<String, ObjectPropertyDecl>,
    data_properties: IndexMap<String, DataPropertyDecl>,
    reasoning_concepts: IndexMap<String, String>,
    causal_properties: IndexMap<String, String>,
    inverses: IndexSet<(String, String)>,
    functional: IndexSet<String>,
}

impl SchemaBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an entity class
    pub fn declare_class(&mut self, name: &str, description: &str) -> SchemaResult<&mut Self> {
        Self::declare(&mut self.classes, "class", name, description.to_string())?;
        Ok(self)
    }

    /// Declare a subclass edge. The hierarchy is used only for labeling,
    /// never for is-a inference at query time.
    pub fn declare_subclass(&mut self, child: &str, parent: &str) -> SchemaResult<&mut Self> {
        self.subclasses.insert((child.to_string(), parent.to_string()));
        Ok(self)
    }

    /// Declare a relationship whose range is another entity
    pub fn declare_object_property(
        &mut self,
        name: &str,
        domain: &str,
        range: &str,
        description: &str,
    ) -> SchemaResult<&mut Self> {
        let decl = ObjectPropertyDecl {
            domain: domain.to_string(),
            range: range.to_string(),
            description: description.to_string(),
        };
        Self::declare(&mut self.object_properties, "object property", name, decl)?;
        Ok(self)
    }

    /// Declare an attribute whose range is a literal type
    pub fn declare_data_property(
        &mut self,
        name: &str,
        domain: &str,
        range: RangeType,
        description: &str,
    ) -> SchemaResult<&mut Self> {
        let decl = DataPropertyDecl {
            domain: domain.to_string(),
            range,
            description: description.to_string(),
        };
        Self::declare(&mut self.data_properties, "data property", name, decl)?;
        Ok(self)
    }

    /// Declare a documentation-only marker class used by downstream
    /// explanation text
    pub fn declare_reasoning_concept(
        &mut self,
        name: &str,
        description: &str,
    ) -> SchemaResult<&mut Self> {
        Self::declare(
            &mut self.reasoning_concepts,
            "reasoning concept",
            name,
            description.to_string(),
        )?;
        Ok(self)
    }

    /// Declare a documentation-only causal relation; the loader never
    /// populates it with instance data
    pub fn declare_causal_property(
        &mut self,
        name: &str,
        description: &str,
    ) -> SchemaResult<&mut Self> {
        Self::declare(
            &mut self.causal_properties,
            "causal property",
            name,
            description.to_string(),
        )?;
        Ok(self)
    }

    /// Declare two properties as inverses of each other
    pub fn declare_inverse(&mut self, property: &str, inverse: &str) -> SchemaResult<&mut Self> {
        self.inverses
            .insert((property.to_string(), inverse.to_string()));
        Ok(self)
    }

    /// Mark a property as single-valued
    pub fn declare_functional(&mut self, property: &str) -> SchemaResult<&mut Self> {
        self.functional.insert(property.to_string());
        Ok(self)
    }

    fn declare<V: PartialEq>(
        map: &mut IndexMap<String, V>,
        kind: &'static str,
        name: &str,
        value: V,
    ) -> SchemaResult<()> {
        match map.get(name) {
            Some(existing) if *existing == value => Ok(()),
            Some(_) => Err(SchemaError::Conflict {
                kind,
                name: name.to_string(),
            }),
            None => {
                map.insert(name.to_string(), value);
                Ok(())
            }
        }
    }

    /// Freeze the declarations into an immutable schema value
    pub fn build(self) -> Schema {
        let mut triples = Vec::new();

        for (name, description) in &self.classes {
            let class = sales(name);
            triples.push(Triple::new(class.clone(), vocab::rdf_type(), vocab::owl_class()));
            triples.push(Triple::new(
                class.clone(),
                vocab::rdfs_label(),
                Literal::from(name.as_str()),
            ));
            triples.push(Triple::new(
                class,
                vocab::rdfs_comment(),
                Literal::from(description.as_str()),
            ));
        }

        for (child, parent) in &self.subclasses {
            triples.push(Triple::new(
                sales(child),
                vocab::rdfs_sub_class_of(),
                sales(parent),
            ));
        }

        for (name, decl) in &self.object_properties {
            let property = sales(name);
            triples.push(Triple::new(
                property.clone(),
                vocab::rdf_type(),
                vocab::owl_object_property(),
            ));
            triples.push(Triple::new(
                property.clone(),
                vocab::rdfs_domain(),
                sales(&decl.domain),
            ));
            triples.push(Triple::new(
                property.clone(),
                vocab::rdfs_range(),
                sales(&decl.range),
            ));
            triples.push(Triple::new(
                property,
                vocab::rdfs_comment(),
                Literal::from(decl.description.as_str()),
            ));
        }

        for (name, decl) in &self.data_properties {
            let property = sales(name);
            triples.push(Triple::new(
                property.clone(),
                vocab::rdf_type(),
                vocab::owl_datatype_property(),
            ));
            triples.push(Triple::new(
                property.clone(),
                vocab::rdfs_domain(),
                sales(&decl.domain),
            ));
            triples.push(Triple::new(
                property.clone(),
                vocab::rdfs_range(),
                Term::Iri(decl.range.xsd_iri()),
            ));
            triples.push(Triple::new(
                property,
                vocab::rdfs_comment(),
                Literal::from(decl.description.as_str()),
            ));
        }

        for (name, description) in &self.reasoning_concepts {
            let concept = sales(name);
            triples.push(Triple::new(
                concept.clone(),
                vocab::rdf_type(),
                vocab::owl_class(),
            ));
            triples.push(Triple::new(
                concept,
                vocab::rdfs_comment(),
                Literal::from(description.as_str()),
            ));
        }

        for (name, description) in &self.causal_properties {
            let property = sales(name);
            triples.push(Triple::new(
                property.clone(),
                vocab::rdf_type(),
                vocab::owl_object_property(),
            ));
            triples.push(Triple::new(
                property,
                vocab::rdfs_comment(),
                Literal::from(description.as_str()),
            ));
        }

        for (property, inverse) in &self.inverses {
            triples.push(Triple::new(
                sales(property),
                vocab::owl_inverse_of(),
                sales(inverse),
            ));
        }

        for property in &self.functional {
            triples.push(Triple::new(
                sales(property),
                vocab::rdf_type(),
                vocab::owl_functional_property(),
            ));
        }

        let classes: Vec<String> = self
            .classes
            .keys()
            .chain(self.reasoning_concepts.keys())
            .cloned()
            .collect();
        let properties: Vec<String> = self
            .object_properties
            .keys()
            .chain(self.data_properties.keys())
            .chain(self.causal_properties.keys())
            .cloned()
            .collect();

        tracing::debug!(
            classes = classes.len(),
            properties = properties.len(),
            triples = triples.len(),
            "schema built"
        );

        Schema {
            triples,
            classes,
            properties,
        }
    }
}

/// Immutable ontology value: the seed triples plus name inventories
#[derive(Debug, Clone)]
pub struct Schema {
    triples: Vec<Triple>,
    classes: Vec<String>,
    properties: Vec<String>,
}

impl Schema {
    /// The full set of seed triples, in declaration order
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Summary of declared names and triple count
    pub fn summary(&self) -> SchemaSummary {
        let mut classes = self.classes.clone();
        classes.sort_unstable();
        let mut properties = self.properties.clone();
        properties.sort_unstable();
        SchemaSummary {
            classes,
            properties,
            triple_count: self.triples.len(),
        }
    }
}

/// Inventory of a schema's declared names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSummary {
    /// Declared class and reasoning-concept names, sorted
    pub classes: Vec<String>,
    /// Declared property names, sorted
    pub properties: Vec<String>,
    /// Total seed triple count
    pub triple_count: usize,
}

/// Build the sales domain ontology: core entity classes, customer/product
/// subclasses, object and data properties, reasoning concepts, and causal
/// relations.
pub fn sales_schema() -> SchemaResult<Schema> {
    let mut builder = SchemaBuilder::new();

    builder
        .declare_class("Sale", "A sales transaction")?
        .declare_class("Customer", "A customer entity")?
        .declare_class("Product", "A product or service")?
        .declare_class("SalesRepresentative", "A sales team member")?
        .declare_class("Region", "Geographical region")?
        .declare_class("Category", "Product category")?
        .declare_class("Industry", "Customer industry sector")?;

    builder
        .declare_subclass("EnterpriseCustomer", "Customer")?
        .declare_subclass("SMBCustomer", "Customer")?
        .declare_subclass("MidMarketCustomer", "Customer")?
        .declare_subclass("ElectronicsProduct", "Product")?
        .declare_subclass("FurnitureProduct", "Product")?;

    builder
        .declare_object_property("soldTo", "Sale", "Customer", "Links a sale to a customer")?
        .declare_object_property(
            "soldBy",
            "Sale",
            "SalesRepresentative",
            "Links a sale to the sales rep",
        )?
        .declare_object_property("productSold", "Sale", "Product", "Links a sale to the product")?
        .declare_object_property(
            "locatedIn",
            "Customer",
            "Region",
            "Customer's geographical location",
        )?
        .declare_object_property(
            "operatesIn",
            "SalesRepresentative",
            "Region",
            "Region where sales rep operates",
        )?
        .declare_object_property(
            "belongsToCategory",
            "Product",
            "Category",
            "Product's category",
        )?
        .declare_object_property(
            "belongsToIndustry",
            "Customer",
            "Industry",
            "Customer's industry",
        )?
        .declare_object_property(
            "hasSubcategory",
            "Category",
            "Category",
            "Hierarchical category relationship",
        )?;

    builder
        .declare_data_property("saleId", "Sale", RangeType::String, "Unique sale identifier")?
        .declare_data_property("saleDate", "Sale", RangeType::Date, "Date of sale")?
        .declare_data_property("quantity", "Sale", RangeType::Integer, "Quantity sold")?
        .declare_data_property(
            "grossRevenue",
            "Sale",
            RangeType::Decimal,
            "Revenue before discount",
        )?
        .declare_data_property(
            "netRevenue",
            "Sale",
            RangeType::Decimal,
            "Revenue after discount",
        )?
        .declare_data_property(
            "discountPercentage",
            "Sale",
            RangeType::Decimal,
            "Discount applied",
        )?
        .declare_data_property("status", "Sale", RangeType::String, "Sale status")?
        .declare_data_property("customerId", "Customer", RangeType::String, "Customer identifier")?
        .declare_data_property("customerName", "Customer", RangeType::String, "Customer name")?
        .declare_data_property(
            "customerType",
            "Customer",
            RangeType::String,
            "Customer business size",
        )?
        .declare_data_property("productId", "Product", RangeType::String, "Product identifier")?
        .declare_data_property("productName", "Product", RangeType::String, "Product name")?
        .declare_data_property("unitPrice", "Product", RangeType::Decimal, "Product unit price")?
        .declare_data_property(
            "repId",
            "SalesRepresentative",
            RangeType::String,
            "Sales rep identifier",
        )?
        .declare_data_property(
            "repName",
            "SalesRepresentative",
            RangeType::String,
            "Sales rep name",
        )?
        .declare_data_property(
            "experienceYears",
            "SalesRepresentative",
            RangeType::Integer,
            "Years of experience",
        )?
        .declare_data_property("regionName", "Region", RangeType::String, "Region name")?
        .declare_data_property("categoryName", "Category", RangeType::String, "Category name")?
        .declare_data_property("industryName", "Industry", RangeType::String, "Industry name")?;

    builder
        .declare_inverse("soldTo", "hasPurchase")?
        .declare_inverse("soldBy", "madeSale")?
        .declare_functional("saleDate")?
        .declare_functional("saleId")?;

    builder
        .declare_reasoning_concept("HighValueCustomer", "Customer with average deal size > $5000")?
        .declare_reasoning_concept("FrequentBuyer", "Customer with multiple purchases")?
        .declare_reasoning_concept("PremiumProduct", "Product with price > $400")?
        .declare_reasoning_concept("BudgetProduct", "Product with price < $100")?
        .declare_reasoning_concept("ExperiencedRep", "Sales rep with > 5 years experience")?
        .declare_reasoning_concept("SeasonalPattern", "Sales influenced by time period")?
        .declare_reasoning_concept("RegionalPreference", "Product-Region affinity pattern")?
        .declare_reasoning_concept("IndustryFit", "Product-Industry compatibility")?
        .declare_reasoning_concept("DiscountSensitive", "Customer segment responding to discounts")?;

    builder
        .declare_causal_property("causedBy", "Indicates causal relationship")?
        .declare_causal_property("influences", "Indicates influence factor")?
        .declare_causal_property("correlatesWith", "Indicates correlation")?
        .declare_causal_property("indicatesPreference", "Shows preference pattern")?;

    Ok(builder.build())
}
