//! Fixed catalogue of canned analytical queries
//!
//! Each entry is a pure function from the fact store to structured rows;
//! nothing here mutates the store. Support thresholds are fixed per entry.
//! The rows feed external consumers (dashboards, prompt builders) and are
//! serde-serializable for that reason.

use crate::graph::{sales, vocab, Literal, TripleStore};
use crate::query::{
    evaluate, var, Aggregate, CompareOp, QueryError, QueryResult, QuerySolution, SelectQuery,
};
use serde::Serialize;

/// Top-products entry returns at most this many rows
const TOP_PRODUCT_LIMIT: usize = 5;
/// Product/customer affinity is reported above this sale count
const AFFINITY_MIN_SUPPORT: i64 = 5;
/// Regional co-occurrence is reported above this sale count
const REGIONAL_MIN_SUPPORT: i64 = 3;
/// Affinity and regional-pattern entries cap their row count
const PATTERN_ROW_CAP: usize = 10;

/// Revenue and sale count per region, highest revenue first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRevenue {
    pub region: String,
    pub revenue: f64,
    pub sales: i64,
}

/// Revenue and units sold per product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRevenue {
    pub product: String,
    pub revenue: f64,
    pub units_sold: f64,
}

/// Total and average revenue per customer segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerTypeRevenue {
    pub customer_type: String,
    pub total_revenue: f64,
    pub avg_revenue: f64,
}

/// Product-to-customer-segment affinity above the support threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCustomerFit {
    pub product: String,
    pub customer_type: String,
    pub category: String,
    pub sales_count: i64,
    pub revenue: f64,
    pub avg_deal: f64,
}

/// Region/industry/product co-occurrence above the support threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalPattern {
    pub region: String,
    pub industry: String,
    pub product: String,
    pub sales_count: i64,
    pub revenue: f64,
}

/// Representative effectiveness, ordered by average deal size
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepEffectiveness {
    pub rep: String,
    pub experience: i64,
    pub region: String,
    pub sales_count: i64,
    pub revenue: f64,
    pub avg_deal: f64,
}

/// Discount-rate vs. revenue per customer segment, discounted sales only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountPattern {
    pub customer_type: String,
    pub avg_discount: f64,
    pub avg_revenue: f64,
    pub sales_count: i64,
}

/// All catalogue entries in one report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport {
    pub revenue_by_region: Vec<RegionRevenue>,
    pub top_products: Vec<ProductRevenue>,
    pub revenue_by_customer_type: Vec<CustomerTypeRevenue>,
    pub product_customer_fit: Vec<ProductCustomerFit>,
    pub regional_patterns: Vec<RegionalPattern>,
    pub rep_effectiveness: Vec<RepEffectiveness>,
    pub discount_patterns: Vec<DiscountPattern>,
}

/// Run the whole catalogue
pub fn generate(store: &TripleStore) -> QueryResult<InsightReport> {
    Ok(InsightReport {
        revenue_by_region: revenue_by_region(store)?,
        top_products: top_products(store)?,
        revenue_by_customer_type: revenue_by_customer_type(store)?,
        product_customer_fit: product_customer_fit(store)?,
        regional_patterns: regional_patterns(store)?,
        rep_effectiveness: rep_effectiveness(store)?,
        discount_patterns: discount_patterns(store)?,
    })
}

/// Total revenue and sale count per region, completed sales only
pub fn revenue_by_region(store: &TripleStore) -> QueryResult<Vec<RegionRevenue>> {
    let query = SelectQuery::builder()
        .pattern(var("sale"), vocab::rdf_type(), sales("Sale"))
        .pattern(var("sale"), sales("soldTo"), var("customer"))
        .pattern(var("sale"), sales("netRevenue"), var("revenue"))
        .pattern(var("sale"), sales("status"), Literal::from("Completed"))
        .pattern(var("customer"), sales("locatedIn"), var("region"))
        .pattern(var("region"), sales("regionName"), var("regionName"))
        .select_var("regionName")
        .select_agg(Aggregate::Sum, "revenue", "totalRevenue")
        .select_agg(Aggregate::Count, "sale", "saleCount")
        .order_by_desc("totalRevenue")
        .build()?;

    let rows = evaluate(store, &query)?;
    rows.iter()
        .map(|row| {
            Ok(RegionRevenue {
                region: text(row, "regionName")?,
                revenue: number(row, "totalRevenue")?,
                sales: integer(row, "saleCount")?,
            })
        })
        .collect()
}

/// Highest-revenue products with units sold, completed sales only
pub fn top_products(store: &TripleStore) -> QueryResult<Vec<ProductRevenue>> {
    let query = SelectQuery::builder()
        .pattern(var("sale"), vocab::rdf_type(), sales("Sale"))
        .pattern(var("sale"), sales("productSold"), var("product"))
        .pattern(var("sale"), sales("netRevenue"), var("revenue"))
        .pattern(var("sale"), sales("quantity"), var("quantity"))
        .pattern(var("sale"), sales("status"), Literal::from("Completed"))
        .pattern(var("product"), sales("productName"), var("productName"))
        .select_var("productName")
        .select_agg(Aggregate::Sum, "revenue", "totalRevenue")
        .select_agg(Aggregate::Sum, "quantity", "totalQuantity")
        .order_by_desc("totalRevenue")
        .limit(TOP_PRODUCT_LIMIT)
        .build()?;

    let rows = evaluate(store, &query)?;
    rows.iter()
        .map(|row| {
            Ok(ProductRevenue {
                product: text(row, "productName")?,
                revenue: number(row, "totalRevenue")?,
                units_sold: number(row, "totalQuantity")?,
            })
        })
        .collect()
}

/// Total and average revenue per customer segment, completed sales only
pub fn revenue_by_customer_type(store: &TripleStore) -> QueryResult<Vec<CustomerTypeRevenue>> {
    let query = SelectQuery::builder()
        .pattern(var("sale"), vocab::rdf_type(), sales("Sale"))
        .pattern(var("sale"), sales("soldTo"), var("customer"))
        .pattern(var("sale"), sales("netRevenue"), var("revenue"))
        .pattern(var("sale"), sales("status"), Literal::from("Completed"))
        .pattern(var("customer"), sales("customerType"), var("customerType"))
        .select_var("customerType")
        .select_agg(Aggregate::Sum, "revenue", "totalRevenue")
        .select_agg(Aggregate::Avg, "revenue", "avgRevenue")
        .order_by_desc("totalRevenue")
        .build()?;

    let rows = evaluate(store, &query)?;
    rows.iter()
        .map(|row| {
            Ok(CustomerTypeRevenue {
                customer_type: text(row, "customerType")?,
                total_revenue: number(row, "totalRevenue")?,
                avg_revenue: number(row, "avgRevenue")?,
            })
        })
        .collect()
}

/// Which products sell to which customer segments, with a minimum support
/// count
pub fn product_customer_fit(store: &TripleStore) -> QueryResult<Vec<ProductCustomerFit>> {
    let query = SelectQuery::builder()
        .pattern(var("sale"), vocab::rdf_type(), sales("Sale"))
        .pattern(var("sale"), sales("soldTo"), var("customer"))
        .pattern(var("sale"), sales("productSold"), var("product"))
        .pattern(var("sale"), sales("netRevenue"), var("revenue"))
        .pattern(var("sale"), sales("status"), Literal::from("Completed"))
        .pattern(var("customer"), sales("customerType"), var("customerType"))
        .pattern(var("product"), sales("productName"), var("productName"))
        .pattern(var("product"), sales("belongsToCategory"), var("cat"))
        .pattern(var("cat"), sales("categoryName"), var("category"))
        .select_var("productName")
        .select_var("customerType")
        .select_var("category")
        .select_agg(Aggregate::Count, "sale", "salesCount")
        .select_agg(Aggregate::Sum, "revenue", "totalRevenue")
        .select_agg(Aggregate::Avg, "revenue", "avgDeal")
        .having("salesCount", CompareOp::Gt, Literal::Integer(AFFINITY_MIN_SUPPORT))
        .order_by_desc("totalRevenue")
        .limit(PATTERN_ROW_CAP)
        .build()?;

    let rows = evaluate(store, &query)?;
    rows.iter()
        .map(|row| {
            Ok(ProductCustomerFit {
                product: text(row, "productName")?,
                customer_type: text(row, "customerType")?,
                category: text(row, "category")?,
                sales_count: integer(row, "salesCount")?,
                revenue: number(row, "totalRevenue")?,
                avg_deal: number(row, "avgDeal")?,
            })
        })
        .collect()
}

/// Region/industry/product co-occurrence above the support threshold
pub fn regional_patterns(store: &TripleStore) -> QueryResult<Vec<RegionalPattern>> {
    let query = SelectQuery::builder()
        .pattern(var("sale"), vocab::rdf_type(), sales("Sale"))
        .pattern(var("sale"), sales("soldTo"), var("customer"))
        .pattern(var("sale"), sales("productSold"), var("product"))
        .pattern(var("sale"), sales("netRevenue"), var("revenue"))
        .pattern(var("sale"), sales("status"), Literal::from("Completed"))
        .pattern(var("customer"), sales("locatedIn"), var("region"))
        .pattern(var("customer"), sales("belongsToIndustry"), var("ind"))
        .pattern(var("region"), sales("regionName"), var("regionName"))
        .pattern(var("ind"), sales("industryName"), var("industry"))
        .pattern(var("product"), sales("productName"), var("productName"))
        .select_var("regionName")
        .select_var("industry")
        .select_var("productName")
        .select_agg(Aggregate::Count, "sale", "salesCount")
        .select_agg(Aggregate::Sum, "revenue", "totalRevenue")
        .having("salesCount", CompareOp::Gt, Literal::Integer(REGIONAL_MIN_SUPPORT))
        .order_by_desc("totalRevenue")
        .limit(PATTERN_ROW_CAP)
        .build()?;

    let rows = evaluate(store, &query)?;
    rows.iter()
        .map(|row| {
            Ok(RegionalPattern {
                region: text(row, "regionName")?,
                industry: text(row, "industry")?,
                product: text(row, "productName")?,
                sales_count: integer(row, "salesCount")?,
                revenue: number(row, "totalRevenue")?,
            })
        })
        .collect()
}

/// Representative effectiveness: deal count, revenue, and average deal size
pub fn rep_effectiveness(store: &TripleStore) -> QueryResult<Vec<RepEffectiveness>> {
    let query = SelectQuery::builder()
        .pattern(var("sale"), vocab::rdf_type(), sales("Sale"))
        .pattern(var("sale"), sales("soldBy"), var("rep"))
        .pattern(var("sale"), sales("netRevenue"), var("revenue"))
        .pattern(var("sale"), sales("status"), Literal::from("Completed"))
        .pattern(var("rep"), sales("repName"), var("repName"))
        .pattern(var("rep"), sales("experienceYears"), var("experience"))
        .pattern(var("rep"), sales("operatesIn"), var("region"))
        .pattern(var("region"), sales("regionName"), var("regionName"))
        .select_var("repName")
        .select_var("experience")
        .select_var("regionName")
        .select_agg(Aggregate::Count, "sale", "salesCount")
        .select_agg(Aggregate::Sum, "revenue", "totalRevenue")
        .select_agg(Aggregate::Avg, "revenue", "avgDeal")
        .order_by_desc("avgDeal")
        .build()?;

    let rows = evaluate(store, &query)?;
    rows.iter()
        .map(|row| {
            Ok(RepEffectiveness {
                rep: text(row, "repName")?,
                experience: integer(row, "experience")?,
                region: text(row, "regionName")?,
                sales_count: integer(row, "salesCount")?,
                revenue: number(row, "totalRevenue")?,
                avg_deal: number(row, "avgDeal")?,
            })
        })
        .collect()
}

/// How discounting relates to revenue per customer segment; only sales with
/// a positive discount contribute
pub fn discount_patterns(store: &TripleStore) -> QueryResult<Vec<DiscountPattern>> {
    let query = SelectQuery::builder()
        .pattern(var("sale"), vocab::rdf_type(), sales("Sale"))
        .pattern(var("sale"), sales("soldTo"), var("customer"))
        .pattern(var("sale"), sales("discountPercentage"), var("discount"))
        .pattern(var("sale"), sales("netRevenue"), var("revenue"))
        .pattern(var("sale"), sales("status"), Literal::from("Completed"))
        .pattern(var("customer"), sales("customerType"), var("customerType"))
        .filter("discount", CompareOp::Gt, Literal::Decimal(0.0))
        .select_var("customerType")
        .select_agg(Aggregate::Avg, "discount", "avgDiscount")
        .select_agg(Aggregate::Avg, "revenue", "avgRevenue")
        .select_agg(Aggregate::Count, "sale", "salesCount")
        .build()?;

    let rows = evaluate(store, &query)?;
    rows.iter()
        .map(|row| {
            Ok(DiscountPattern {
                customer_type: text(row, "customerType")?,
                avg_discount: number(row, "avgDiscount")?,
                avg_revenue: number(row, "avgRevenue")?,
                sales_count: integer(row, "salesCount")?,
            })
        })
        .collect()
}

// Every catalogue query projects each alias it reads back, so a missing or
// mistyped binding is a defect in the entry itself and surfaces as an error
// rather than an empty or zero row.

fn text(row: &QuerySolution, alias: &str) -> QueryResult<String> {
    row.text(alias)
        .ok_or_else(|| QueryError::UnboundVariable(alias.to_string()))
}

fn number(row: &QuerySolution, alias: &str) -> QueryResult<f64> {
    row.number(alias)
        .ok_or_else(|| QueryError::TypeMismatch(alias.to_string()))
}

fn integer(row: &QuerySolution, alias: &str) -> QueryResult<i64> {
    row.integer(alias)
        .ok_or_else(|| QueryError::TypeMismatch(alias.to_string()))
}
