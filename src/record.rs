use crate::error::EngineError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One day of business metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar day, unique within a series
    pub date: NaiveDate,
    pub daily_revenue: f64,
    pub daily_cost: f64,
    pub active_users: f64,
    /// Conversion rate as a percentage (2.5 means 2.5%)
    pub conversion_rate: f64,
    pub customer_ltv: f64,
    pub customer_acquisition_cost: f64,
    /// Optional business category tag; untagged records belong to every category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl DailyRecord {
    /// Creates an untagged record with every metric set to zero.
    pub fn new(date: NaiveDate) -> Self {
        DailyRecord {
            date,
            daily_revenue: 0.0,
            daily_cost: 0.0,
            active_users: 0.0,
            conversion_rate: 0.0,
            customer_ltv: 0.0,
            customer_acquisition_cost: 0.0,
            category: None,
        }
    }

    /// Reads the value of a metric field.
    pub fn value(&self, field: MetricField) -> f64 {
        match field {
            MetricField::DailyRevenue => self.daily_revenue,
            MetricField::DailyCost => self.daily_cost,
            MetricField::ActiveUsers => self.active_users,
            MetricField::ConversionRate => self.conversion_rate,
            MetricField::CustomerLtv => self.customer_ltv,
            MetricField::CustomerAcquisitionCost => self.customer_acquisition_cost,
        }
    }

    pub fn with_value(mut self, field: MetricField, value: f64) -> Self {
        match field {
            MetricField::DailyRevenue => self.daily_revenue = value,
            MetricField::DailyCost => self.daily_cost = value,
            MetricField::ActiveUsers => self.active_users = value,
            MetricField::ConversionRate => self.conversion_rate = value,
            MetricField::CustomerLtv => self.customer_ltv = value,
            MetricField::CustomerAcquisitionCost => self.customer_acquisition_cost = value,
        }
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Returns true when the record belongs to the selected category.
    pub fn matches_category(&self, selected: Category) -> bool {
        match (selected, self.category) {
            (Category::General, _) => true,
            (_, None) => true,
            (selected, Some(tag)) => selected == tag,
        }
    }
}

/// Numeric fields of a [`DailyRecord`] that can be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    DailyRevenue,
    DailyCost,
    ActiveUsers,
    ConversionRate,
    CustomerLtv,
    CustomerAcquisitionCost,
}

impl MetricField {
    pub const ALL: [MetricField; 6] = [
        MetricField::DailyRevenue,
        MetricField::DailyCost,
        MetricField::ActiveUsers,
        MetricField::ConversionRate,
        MetricField::CustomerLtv,
        MetricField::CustomerAcquisitionCost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricField::DailyRevenue => "daily_revenue",
            MetricField::DailyCost => "daily_cost",
            MetricField::ActiveUsers => "active_users",
            MetricField::ConversionRate => "conversion_rate",
            MetricField::CustomerLtv => "customer_ltv",
            MetricField::CustomerAcquisitionCost => "customer_acquisition_cost",
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MetricField {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let name = value.trim().to_lowercase();
        MetricField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| EngineError::InvalidField(value.to_string()))
    }
}

/// Business category selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    General,
    Sales,
    Marketing,
    Product,
    Finance,
    Customers,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Sales => "sales",
            Category::Marketing => "marketing",
            Category::Product => "product",
            Category::Finance => "finance",
            Category::Customers => "customers",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "general" => Ok(Category::General),
            "sales" => Ok(Category::Sales),
            "marketing" => Ok(Category::Marketing),
            "product" => Ok(Category::Product),
            "finance" => Ok(Category::Finance),
            "customers" => Ok(Category::Customers),
            _ => Err(EngineError::InvalidCategory(value.to_string())),
        }
    }
}
