use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record – one sale transaction
// ---------------------------------------------------------------------------

/// One row of the sales API. Field names on the wire are the API's own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Produto")]
    pub product: String,
    #[serde(rename = "Categoria do Produto")]
    pub category: String,
    #[serde(rename = "Preço")]
    pub price: f64,
    #[serde(rename = "Frete")]
    pub freight: f64,
    #[serde(rename = "Data da Compra", with = "br_date")]
    pub purchase_date: NaiveDate,
    #[serde(rename = "Vendedor")]
    pub seller: String,
    /// State where the purchase was made.
    #[serde(rename = "Local da compra")]
    pub location: String,
    #[serde(rename = "Avaliação da compra")]
    pub rating: u8,
    #[serde(rename = "Tipo de pagamento")]
    pub payment_type: String,
    #[serde(rename = "Quantidade de parcelas")]
    pub installments: u32,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

pub const MAX_RATING: u8 = 5;

/// `DD/MM/YYYY` dates as served by the API.
pub mod br_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d/%m/%Y";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// Categorical (string-valued) fields usable for membership filters and
/// grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoricalField {
    Product,
    Category,
    Seller,
    Location,
    PaymentType,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::Product,
        CategoricalField::Category,
        CategoricalField::Seller,
        CategoricalField::Location,
        CategoricalField::PaymentType,
    ];

    pub fn value_of<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            CategoricalField::Product => &record.product,
            CategoricalField::Category => &record.category,
            CategoricalField::Seller => &record.seller,
            CategoricalField::Location => &record.location,
            CategoricalField::PaymentType => &record.payment_type,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoricalField::Product => "Product",
            CategoricalField::Category => "Category",
            CategoricalField::Seller => "Seller",
            CategoricalField::Location => "Purchase location",
            CategoricalField::PaymentType => "Payment type",
        }
    }
}

/// Every column of the raw-data table, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Product,
    Category,
    Price,
    Freight,
    PurchaseDate,
    Seller,
    Location,
    Rating,
    PaymentType,
    Installments,
    Latitude,
    Longitude,
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::Product,
        Column::Category,
        Column::Price,
        Column::Freight,
        Column::PurchaseDate,
        Column::Seller,
        Column::Location,
        Column::Rating,
        Column::PaymentType,
        Column::Installments,
        Column::Latitude,
        Column::Longitude,
    ];

    /// Header used in the table and in exported CSV (the API field name).
    pub fn header(&self) -> &'static str {
        match self {
            Column::Product => "Produto",
            Column::Category => "Categoria do Produto",
            Column::Price => "Preço",
            Column::Freight => "Frete",
            Column::PurchaseDate => "Data da Compra",
            Column::Seller => "Vendedor",
            Column::Location => "Local da compra",
            Column::Rating => "Avaliação da compra",
            Column::PaymentType => "Tipo de pagamento",
            Column::Installments => "Quantidade de parcelas",
            Column::Latitude => "lat",
            Column::Longitude => "lon",
        }
    }

    /// Cell text for a record. Dates are ISO `YYYY-MM-DD`.
    pub fn cell(&self, record: &Record) -> String {
        match self {
            Column::Product => record.product.clone(),
            Column::Category => record.category.clone(),
            Column::Price => record.price.to_string(),
            Column::Freight => record.freight.to_string(),
            Column::PurchaseDate => record.purchase_date.format("%Y-%m-%d").to_string(),
            Column::Seller => record.seller.clone(),
            Column::Location => record.location.clone(),
            Column::Rating => record.rating.to_string(),
            Column::PaymentType => record.payment_type.clone(),
            Column::Installments => record.installments.to_string(),
            Column::Latitude => record.latitude.to_string(),
            Column::Longitude => record.longitude.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// YearMonth – calendar month key
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar month after this one.
    pub fn next(self) -> Self {
        if self.month == 12 {
            YearMonth { year: self.year + 1, month: 1 }
        } else {
            YearMonth { month: self.month + 1, ..self }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded sales table
// ---------------------------------------------------------------------------

/// All records of one session plus the unique values of every categorical
/// column (used to populate the membership filters).
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub unique_values: BTreeMap<CategoricalField, BTreeSet<String>>,
}

impl Dataset {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<CategoricalField, BTreeSet<String>> = BTreeMap::new();
        for field in CategoricalField::ALL {
            let values = unique_values.entry(field).or_default();
            for record in &records {
                values.insert(field.value_of(record).to_string());
            }
        }
        Dataset {
            records,
            unique_values,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total revenue (sum of prices).
    pub fn total_revenue(&self) -> f64 {
        self.records.iter().map(|r| r.price).sum()
    }

    /// `(min, max)` of a numeric projection, `None` for an empty dataset.
    pub fn bounds<T, F>(&self, project: F) -> Option<(T, T)>
    where
        T: PartialOrd + Copy,
        F: Fn(&Record) -> T,
    {
        let mut iter = self.records.iter().map(project);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| {
            (if v < lo { v } else { lo }, if v > hi { v } else { hi })
        }))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Record with every field filled in; callers override what they test.
    pub fn record(location: &str, price: f64) -> Record {
        Record {
            product: "Modelagem preditiva".to_string(),
            category: "livros".to_string(),
            price,
            freight: 10.5,
            purchase_date: NaiveDate::from_ymd_opt(2022, 1, 15).unwrap(),
            seller: "Ana".to_string(),
            location: location.to_string(),
            rating: 4,
            payment_type: "cartao_credito".to_string(),
            installments: 1,
            latitude: -23.55,
            longitude: -46.63,
        }
    }

    pub fn sample_json() -> &'static str {
        r#"[
            {"Produto": "Modelagem preditiva", "Categoria do Produto": "livros", "Preço": 92.45,
             "Frete": 5.6096965236, "Data da Compra": "01/01/2020", "Vendedor": "Thiago Silva",
             "Local da compra": "BA", "Avaliação da compra": 1, "Tipo de pagamento": "cartao_credito",
             "Quantidade de parcelas": 3, "lat": -13.29, "lon": -41.71},
            {"Produto": "Iphone 15 Pro", "Categoria do Produto": "eletronicos", "Preço": 4500.0,
             "Frete": 240.5, "Data da Compra": "31/12/2022", "Vendedor": "Juliana Costa",
             "Local da compra": "SP", "Avaliação da compra": 5, "Tipo de pagamento": "boleto",
             "Quantidade de parcelas": 10, "lat": -22.19, "lon": -48.79}
        ]"#
    }
}
